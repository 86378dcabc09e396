use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::bus::{HostMessage, MessageBus, Subscription, MSG_CHANNEL};
use crate::clipboard::Clipboard;
use crate::events::AppEvent;
use crate::i18n::{Language, Localizer, Text};
use crate::overlay::Overlay;
use crate::palette::Palette;
use crate::ui::layout::{self, Hit, OverlayLayout, TILES_PER_ROW};
use crate::usage::UsageHistory;

/// How long a copy confirmation stays in the status row.
pub const FLASH_DURATION: Duration = Duration::from_millis(1500);

/// Transient status-row message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: Text,
    pub detail: String,
    pub until: Instant,
}

pub struct App {
    pub overlay: Overlay,
    pub usage: UsageHistory,
    pub palette: Palette,
    pub should_quit: bool,

    // Palette cursor and scroll (in tile rows).
    pub selected_swatch: usize,
    pub palette_scroll: usize,

    pub flash: Option<Flash>,

    /// Clock used for animation and flash expiry; advanced by `tick`.
    pub now: Instant,
    /// Last known screen area, for mouse hit-testing.
    pub viewport: Rect,

    // Optional event log writer.
    pub event_log: Option<BufWriter<File>>,

    localizer: Box<dyn Localizer>,
    clipboard: Box<dyn Clipboard>,
    subscription: Option<Subscription>,
}

impl App {
    pub fn new(
        palette: Palette,
        localizer: Box<dyn Localizer>,
        clipboard: Box<dyn Clipboard>,
        event_log: Option<BufWriter<File>>,
    ) -> Self {
        Self {
            overlay: Overlay::new(),
            usage: UsageHistory::new(),
            palette,
            should_quit: false,
            selected_swatch: 0,
            palette_scroll: 0,
            flash: None,
            now: Instant::now(),
            viewport: Rect::default(),
            event_log,
            localizer,
            clipboard,
            subscription: None,
        }
    }

    /// Subscribe to the host message channel. Messages are forwarded to
    /// `tx` as [`AppEvent::Message`]. The subscription lives until
    /// [`unmount`](Self::unmount) or until the app is dropped.
    pub fn mount(&mut self, bus: &MessageBus, tx: mpsc::Sender<AppEvent>) {
        let subscription = bus.on(MSG_CHANNEL, move |message| {
            let _ = tx.send(AppEvent::Message(message.clone()));
        });
        self.subscription = Some(subscription);
        self.log(format_args!("mounted channel={MSG_CHANNEL}"));
    }

    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            self.log(format_args!("unmounted channel={MSG_CHANNEL}"));
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn language(&self) -> Language {
        self.localizer.language()
    }

    pub fn resize(&mut self, area: Rect) {
        self.viewport = area;
        self.ensure_selection_visible();
    }

    /// Advance the clock: settle finished slides and expire the flash.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.overlay.settle(now);
        if self.flash.as_ref().is_some_and(|f| now >= f.until) {
            self.flash = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.overlay.is_animating(self.now)
    }

    /// Apply a host message. Only usage samples change state.
    pub fn handle_message(&mut self, message: &HostMessage) {
        if self.usage.on_message(&message.kind, &message.data) {
            let name = message.data.get("name").and_then(|v| v.as_str()).unwrap_or("-");
            let value = self.usage.latest(name).unwrap_or(f64::NAN);
            self.log(format_args!("message kind={} name={} value={}", message.kind, name, value));
        }
    }

    pub fn toggle(&mut self) {
        self.overlay.toggle(self.now);
        let state = if self.overlay.is_open() { "open" } else { "closed" };
        self.log(format_args!("toggle state={state}"));
    }

    /// Command the localizer. No local check: every [`Language`] is valid.
    pub fn change_language(&mut self, lang: Language) {
        self.localizer.change_language(lang);
        self.log(format_args!("language lang={lang}"));
    }

    /// Copy the swatch's token name to the clipboard.
    pub fn copy_swatch(&mut self, index: usize) {
        let Some(name) = self.palette.swatches().get(index).map(|s| s.name.clone()) else {
            return;
        };
        self.selected_swatch = index;
        let until = self.now + FLASH_DURATION;
        match self.clipboard.copy(&name) {
            Ok(()) => {
                self.log(format_args!("copy name={name}"));
                self.flash = Some(Flash { text: Text::Copied, detail: name, until });
            }
            Err(err) => {
                self.log(format_args!("copy name={name} error=\"{err}\""));
                self.flash = Some(Flash {
                    text: Text::CopyFailed,
                    detail: err.to_string(),
                    until,
                });
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('d') | KeyCode::F(12) => self.toggle(),
            KeyCode::Esc if self.overlay.is_open() => self.toggle(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&lang) = Language::ALL.get(idx) {
                    self.change_language(lang);
                }
            }
            _ if !self.overlay.is_open() => {}
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
            KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(TILES_PER_ROW as isize),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-(TILES_PER_ROW as isize)),
            KeyCode::Enter | KeyCode::Char('y') => self.copy_swatch(self.selected_swatch),
            KeyCode::PageDown => self.scroll_palette(3),
            KeyCode::PageUp => self.scroll_palette(-3),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let layout = OverlayLayout::compute(self.viewport, self);
        let hit = layout.hit(mouse.column, mouse.row);
        match (mouse.kind, hit) {
            (MouseEventKind::Down(MouseButton::Left), Some(Hit::Handle)) => self.toggle(),
            (MouseEventKind::Down(MouseButton::Left), Some(Hit::Language(lang))) => {
                self.change_language(lang)
            }
            (MouseEventKind::Down(MouseButton::Left), Some(Hit::Swatch(i))) => self.copy_swatch(i),
            (MouseEventKind::ScrollDown, Some(Hit::Swatch(_) | Hit::Palette)) => {
                self.scroll_palette(1)
            }
            (MouseEventKind::ScrollUp, Some(Hit::Swatch(_) | Hit::Palette)) => {
                self.scroll_palette(-1)
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.palette.is_empty() {
            return;
        }
        let last = self.palette.len() as isize - 1;
        self.selected_swatch = (self.selected_swatch as isize + delta).clamp(0, last) as usize;
        self.ensure_selection_visible();
    }

    fn total_rows(&self) -> usize {
        self.palette.len().div_ceil(TILES_PER_ROW)
    }

    fn scroll_palette(&mut self, delta: isize) {
        let visible = layout::palette_rows(self.viewport);
        let max = self.total_rows().saturating_sub(visible) as isize;
        self.palette_scroll = (self.palette_scroll as isize + delta).clamp(0, max.max(0)) as usize;
    }

    fn ensure_selection_visible(&mut self) {
        let visible = layout::palette_rows(self.viewport);
        if visible == 0 {
            return;
        }
        let row = self.selected_swatch / TILES_PER_ROW;
        if row < self.palette_scroll {
            self.palette_scroll = row;
        } else if row >= self.palette_scroll + visible {
            self.palette_scroll = row + 1 - visible;
        }
    }

    fn log(&mut self, args: std::fmt::Arguments<'_>) {
        if let Some(ref mut writer) = self.event_log {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            let _ = writeln!(writer, "[{}.{:03}] {}", ts.as_secs(), ts.subsec_millis(), args);
            let _ = writer.flush();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
pub(crate) mod helpers;
