//! Clipboard access through the terminal (OSC 52).

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Common OSC 52 size limit (base64 payload bytes).
pub const MAX_PAYLOAD: usize = 100_000;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard payload too large ({size} > {max} bytes)")]
    TooLarge { size: usize, max: usize },
    #[error("writing clipboard sequence: {0}")]
    Write(#[from] io::Error),
}

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Writes OSC 52 "set clipboard" sequences to a terminal writer.
pub struct Osc52Clipboard<W: Write> {
    writer: W,
    tmux: bool,
}

impl Osc52Clipboard<io::Stdout> {
    /// Clipboard on the process's terminal, wrapping for tmux when `$TMUX`
    /// is set.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), std::env::var_os("TMUX").is_some())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(writer: W, tmux: bool) -> Self {
        Self { writer, tmux }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Build the escape sequence for `text`.
pub fn osc52_sequence(text: &str, tmux: bool) -> Result<String, ClipboardError> {
    let encoded = STANDARD.encode(text.as_bytes());
    if encoded.len() > MAX_PAYLOAD {
        return Err(ClipboardError::TooLarge {
            size: encoded.len(),
            max: MAX_PAYLOAD,
        });
    }
    let seq = format!("\x1b]52;c;{encoded}\x07");
    if tmux {
        // tmux passthrough: ESC P tmux; <seq with ESC doubled> ESC \
        Ok(format!("\x1bPtmux;{}\x1b\\", seq.replace('\x1b', "\x1b\x1b")))
    } else {
        Ok(seq)
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let seq = osc52_sequence(text, self.tmux)?;
        self.writer.write_all(seq.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sequence() {
        assert_eq!(osc52_sequence("night", false).unwrap(), "\x1b]52;c;bmlnaHQ=\x07");
    }

    #[test]
    fn tmux_sequence_doubles_escapes() {
        let seq = osc52_sequence("night", true).unwrap();
        assert!(seq.starts_with("\x1bPtmux;\x1b\x1b]52;c;"));
        assert!(seq.ends_with("\x07\x1b\\"));
    }

    #[test]
    fn oversized_payload_rejected() {
        let big = "x".repeat(MAX_PAYLOAD);
        assert!(matches!(
            osc52_sequence(&big, false),
            Err(ClipboardError::TooLarge { .. })
        ));
    }

    #[test]
    fn copy_writes_to_writer() {
        let mut clipboard = Osc52Clipboard::new(Vec::new(), false);
        clipboard.copy("white").unwrap();
        let out = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(out, "\x1b]52;c;d2hpdGU=\x07");
    }
}
