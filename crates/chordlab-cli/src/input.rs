use crate::session::KeySignal;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Puts the terminal into raw mode for the guard's lifetime.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads terminal key events on a dedicated thread and forwards normalized
/// key signals into the session channel. Exits when the session side hangs
/// up or a quit chord arrives.
pub fn spawn(tx: Sender<KeySignal>) -> thread::JoinHandle<()> {
    thread::spawn(move || read_loop(tx))
}

fn read_loop(tx: Sender<KeySignal>) {
    loop {
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => {}
            Ok(false) => {
                if tx.is_closed() {
                    return;
                }
                continue;
            }
            Err(e) => {
                debug!("input poll failed: {}", e);
                return;
            }
        }

        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                debug!("input read failed: {}", e);
                return;
            }
        };

        for signal in signals_for(&key) {
            let quit = signal == KeySignal::Quit;
            if tx.blocking_send(signal).is_err() || quit {
                return;
            }
        }
    }
}

/// Terminals never deliver a bare modifier key-down, so a modified chord
/// like Ctrl+S is expanded into the two logical events the engine expects:
/// `control` down, then `s` down. Esc and Ctrl+C end the session.
fn signals_for(key: &KeyEvent) -> Vec<KeySignal> {
    let KeyCode::Char(c) = key.code else {
        if key.code == KeyCode::Esc && key.kind == KeyEventKind::Press {
            return vec![KeySignal::Quit];
        }
        return Vec::new();
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) && c.eq_ignore_ascii_case(&'c') {
        return vec![KeySignal::Quit];
    }

    let name = c.to_lowercase().to_string();
    match key.kind {
        KeyEventKind::Press => {
            let mut signals = Vec::with_capacity(2);
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                signals.push(KeySignal::Down("control".to_string()));
            }
            if key.modifiers.contains(KeyModifiers::ALT) {
                signals.push(KeySignal::Down("alt".to_string()));
            }
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                signals.push(KeySignal::Down("shift".to_string()));
            }
            signals.push(KeySignal::Down(name));
            signals
        }
        KeyEventKind::Release => vec![KeySignal::Up(name)],
        KeyEventKind::Repeat => Vec::new(),
    }
}
