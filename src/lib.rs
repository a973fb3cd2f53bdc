// The binary entry point is main.rs; this file re-declares the module tree so
// that integration tests and benches can drive the drill engine through
// `una_words::catalog`, `una_words::engine`, `una_words::session` and
// `una_words::store`. The UI modules are only exercised through the binary,
// so suppress dead_code warnings.
#![allow(dead_code)]

pub mod catalog;
pub mod engine;
pub mod session;
pub mod store;

// Private: the terminal front end, compiled here so its unit tests run with the lib
mod app;
mod config;
mod event;
mod ui;
