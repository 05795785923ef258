use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use herb_common::Key;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn clear_screen() -> io::Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush()?;
    Ok(())
}

/// Print a block of text that may contain `\n`, safe to use in raw mode
pub fn print_block(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    for line in text.lines() {
        write!(stdout, "{line}\r\n")?;
    }
    stdout.flush()
}

pub fn apply_theme(theme: Theme) {
    match theme {
        Theme::Cosmic => colored::control::unset_override(),
        Theme::Plain => colored::control::set_override(false),
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Translate a terminal key for the activation detector
pub fn to_activation_key(key: &KeyEvent) -> Key {
    match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

/// Raw mode for the lifetime of the guard
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads key presses on a blocking thread and forwards them to async code
pub struct InputReader {
    rx: mpsc::UnboundedReceiver<KeyEvent>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    _raw: RawModeGuard,
}

impl InputReader {
    pub fn start() -> io::Result<Self> {
        let raw = RawModeGuard::enable()?;

        // Drop anything typed before we started listening
        while event::poll(Duration::from_millis(0))? {
            event::read()?;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = tokio::task::spawn_blocking(move || {
            while !flag.load(Ordering::Relaxed) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            if tx.send(key).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log::warn!("Failed to read terminal event: {e}");
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        log::warn!("Failed to poll terminal: {e}");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            rx,
            stop,
            handle: Some(handle),
            _raw: raw,
        })
    }

    pub async fn next(&mut self) -> Option<KeyEvent> {
        self.rx.recv().await
    }

    /// Stop the reader thread and wait for it, then leave raw mode
    pub async fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
