pub mod progress;
pub mod scoring;
pub mod selector;
