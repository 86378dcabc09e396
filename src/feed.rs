//! JSONL message feed written by the host process.
//!
//! One message per line:
//! `{"channel":"msg","type":"usage.cpu","data":{"name":"main","value":"12.5"}}`.
//! `channel` defaults to [`MSG_CHANNEL`](crate::bus::MSG_CHANNEL).

use std::fs;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;

use serde::Deserialize;

use crate::bus::{HostMessage, MSG_CHANNEL};

/// A message plus the channel it was sent on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub channel: String,
    pub message: HostMessage,
}

#[derive(Deserialize)]
struct RawLine {
    #[serde(default = "default_channel")]
    channel: String,
    #[serde(flatten)]
    message: HostMessage,
}

fn default_channel() -> String {
    MSG_CHANNEL.to_string()
}

/// Parse one feed line. Blank or malformed lines yield `None`.
pub fn parse_feed_line(line: &str) -> Option<FeedEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let raw: RawLine = serde_json::from_str(line).ok()?;
    Some(FeedEntry {
        channel: raw.channel,
        message: raw.message,
    })
}

/// Tails a feed file, returning only lines appended since the last read.
pub struct FeedTailer {
    path: PathBuf,
    position: u64,
    // Bytes of an unterminated trailing line, kept until its newline lands.
    partial: Vec<u8>,
}

impl FeedTailer {
    /// Start at the current end of the file so only new messages are read.
    /// A file that does not exist yet is read from its start once created.
    pub fn new(path: PathBuf) -> Self {
        let position = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self {
            path,
            position,
            partial: Vec::new(),
        }
    }

    /// Start at the beginning so existing lines are replayed.
    pub fn from_start(path: PathBuf) -> Self {
        Self {
            path,
            position: 0,
            partial: Vec::new(),
        }
    }

    /// Lines that are not valid UTF-8 are decoded lossily and then fail to
    /// parse, so they are skipped like any other malformed line.
    pub fn read_new_entries(&mut self) -> Vec<FeedEntry> {
        let mut entries = Vec::new();

        let current_len = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        if current_len < self.position {
            // Truncated or rotated: start over.
            self.position = 0;
            self.partial.clear();
        }
        if current_len == self.position {
            return entries;
        }

        let Ok(file) = fs::File::open(&self.path) else {
            return entries;
        };
        let mut reader = BufReader::new(file);
        if reader.seek(SeekFrom::Start(self.position)).is_err() {
            return entries;
        }

        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(n) => {
                    self.position += n as u64;
                    if line.last() != Some(&b'\n') {
                        self.partial.extend_from_slice(&line);
                        break;
                    }
                    let full = if self.partial.is_empty() {
                        String::from_utf8_lossy(&line).into_owned()
                    } else {
                        let mut joined = std::mem::take(&mut self.partial);
                        joined.extend_from_slice(&line);
                        String::from_utf8_lossy(&joined).into_owned()
                    };
                    entries.extend(parse_feed_line(&full));
                }
                Err(_) => break,
            }
        }

        entries
    }
}
