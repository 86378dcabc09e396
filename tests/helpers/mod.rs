use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use serde_json::json;

use crate::app::App;
use crate::bus::HostMessage;
use crate::clipboard::{Clipboard, ClipboardError};
use crate::i18n::{Catalog, Language, Localizer};
use crate::palette::Palette;
use crate::theme::builtin_tokens;

/// Palette derived from the built-in theme.
pub fn test_palette() -> Palette {
    Palette::derive(&builtin_tokens()).unwrap()
}

/// Closed app with the built-in palette, an English catalog and a
/// recording clipboard.
pub fn test_app() -> App {
    app_with(Box::new(Catalog::default()), Box::new(RecordingClipboard::default()))
}

pub fn app_with(localizer: Box<dyn Localizer>, clipboard: Box<dyn Clipboard>) -> App {
    App::new(test_palette(), localizer, clipboard, None)
}

pub fn message(kind: &str, name: &str, value: &str) -> HostMessage {
    HostMessage {
        kind: kind.to_string(),
        data: json!({"name": name, "value": value}),
    }
}

pub fn usage_msg(name: &str, value: &str) -> HostMessage {
    message("usage.cpu", name, value)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn left_click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

/// Localizer that records every change command.
pub struct RecordingLocalizer {
    current: Language,
    calls: Rc<RefCell<Vec<Language>>>,
}

impl RecordingLocalizer {
    pub fn new(current: Language) -> (Self, Rc<RefCell<Vec<Language>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                current,
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl Localizer for RecordingLocalizer {
    fn language(&self) -> Language {
        self.current
    }

    fn change_language(&mut self, lang: Language) {
        self.calls.borrow_mut().push(lang);
        self.current = lang;
    }
}

/// Clipboard that keeps copied strings in memory.
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Rc<RefCell<Vec<String>>>,
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn copy(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Write(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "terminal gone",
        )))
    }
}
