use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub enum AppEvent {
    Key(KeyEvent),
    /// Ctrl-C, honoured on every screen.
    Quit,
    /// Stamped when the poll timed out; drives the delayed advance.
    Tick(Instant),
    Redraw,
}

/// Map a terminal event onto what the drill loop cares about.
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Windows reports both press and release.
        Event::Key(key) if key.kind != KeyEventKind::Press => None,
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(AppEvent::Quit)
        }
        Event::Key(key) => Some(AppEvent::Key(key)),
        Event::Resize(_, _) | Event::FocusGained => Some(AppEvent::Redraw),
        _ => None,
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(ev) => translate(ev),
                        Err(_) => None,
                    }
                } else {
                    Some(AppEvent::Tick(Instant::now()))
                };
                if let Some(ev) = next {
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
