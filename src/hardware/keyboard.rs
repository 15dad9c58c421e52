use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, poll, read};
use std::io;
use std::time::Duration;

/// Providing Keyboard Input independent of an implementation.
pub trait KeyboardInputProvider {
    /// Checks if input is available, does not block.
    ///
    /// # Errors
    /// - the input device failed
    fn check_input_available(&mut self) -> io::Result<bool>;
    /// Reads exactly one character code, blocking until one is available.
    ///
    /// # Errors
    /// - the input device failed or was interrupted
    fn read_character(&mut self) -> io::Result<u8>;
}

/// Keyboard input from the terminal via crossterm events.
///
/// The terminal should be in raw mode, see [`crate::terminal::set_terminal_raw`].
#[derive(Debug, Default)]
pub struct TerminalInputProvider {
    /// Character seen by `check_input_available` but not yet consumed.
    pending: Option<u8>,
}
impl TerminalInputProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }
}
impl KeyboardInputProvider for TerminalInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        while poll(Duration::from_secs(0))? {
            if let Some(event) = read()?.as_key_press_event()
                && let Some(c) = key_to_character(event)?
            {
                self.pending = Some(c);
                return Ok(true);
            }
        }
        Ok(false)
    }
    fn read_character(&mut self) -> io::Result<u8> {
        if let Some(c) = self.pending.take() {
            return Ok(c);
        }
        loop {
            if let Some(event) = read()?.as_key_press_event()
                && let Some(c) = key_to_character(event)?
            {
                return Ok(c);
            }
        }
    }
}

/// Maps a key press to the character code an LC-3 program expects, `None` for keys without one.
///
/// CTRL-C is reported as [`io::ErrorKind::Interrupted`] since raw mode swallows the signal.
fn key_to_character(event: KeyEvent) -> io::Result<Option<u8>> {
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        return Err(io::Error::new(
            io::ErrorKind::Interrupted,
            "Interrupted by CTRL-C",
        ));
    }
    Ok(match event.code {
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Esc => Some(0x1B),
        code => code.as_char().and_then(|c| u8::try_from(c).ok()),
    })
}
