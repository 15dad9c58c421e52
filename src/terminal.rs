use crossterm::{ExecutableCommand, terminal};
use log::warn;
use std::io;
use std::io::Write;

/// Keeps the terminal in raw mode until dropped.
pub struct RawLock {
    enabled: bool,
}
impl RawLock {
    /// Whether raw mode could be enabled, false e.g. for redirected output.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for RawLock {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        // terminal stays in raw mode but no means to repair
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Error resetting terminal {e}");
        }
    }
}

/// Set terminal to raw in best-effort mode, only log on failure, since it does not work
/// without a terminal, e.g. for cargo doc tests or piped input.
pub fn set_terminal_raw(mut stdout: impl Write) -> RawLock {
    if let Err(e) = terminal::enable_raw_mode() {
        warn!("Could not set terminal to raw mode: {e}");
        return RawLock { enabled: false };
    }
    if let Err(e) = stdout.execute(terminal::EnableLineWrap) {
        warn!("Could not enable line wrap: {e}");
    }
    RawLock { enabled: true }
}

/// Console output of the machine, translating line feeds only for a terminal in raw mode.
#[derive(Debug)]
pub enum ConsoleWriter<W: Write> {
    Raw(RawModeWriter<W>),
    Plain(W),
}
impl<W: Write> ConsoleWriter<W> {
    pub fn new(inner: W, raw_mode: bool) -> Self {
        if raw_mode {
            Self::Raw(RawModeWriter::new(inner))
        } else {
            Self::Plain(inner)
        }
    }
    pub fn into_inner(self) -> W {
        match self {
            Self::Raw(writer) => writer.into_inner(),
            Self::Plain(inner) => inner,
        }
    }
}
impl<W: Write> Write for ConsoleWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Raw(writer) => writer.write(buf),
            Self::Plain(inner) => inner.write(buf),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Raw(writer) => writer.flush(),
            Self::Plain(inner) => inner.flush(),
        }
    }
}

/// Console output for a terminal in raw mode, where a line feed does not return the cursor
/// to the first column. Every `\n` is written as `\r\n`.
#[derive(Debug)]
pub struct RawModeWriter<W: Write> {
    inner: W,
}
impl<W: Write> RawModeWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
    pub fn into_inner(self) -> W {
        self.inner
    }
}
impl<W: Write> Write for RawModeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (idx, part) in buf.split(|b| *b == b'\n').enumerate() {
            if idx > 0 {
                self.inner.write_all(b"\r\n")?;
            }
            self.inner.write_all(part)?;
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
