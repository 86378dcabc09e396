//! Geometry of the overlay, shared by rendering and mouse hit-testing.
//!
//! Content is laid out against the full-size panel shifted down by the
//! hidden part of the slide, then every rect is clipped to the screen.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::app::App;
use crate::i18n::Language;

pub const PANEL_WIDTH: u16 = 72;
pub const PANEL_HEIGHT: u16 = 16;
pub const HANDLE_WIDTH: u16 = 5;
/// Gap between the handle and the panel's right edge.
pub const HANDLE_INSET: u16 = 2;
pub const LANG_WIDTH: u16 = 12;
pub const LANG_HEIGHT: u16 = 3;
pub const TILE_WIDTH: u16 = 14;
pub const TILE_HEIGHT: u16 = 3;
pub const TILES_PER_ROW: usize = 2;
pub const PALETTE_WIDTH: u16 = TILE_WIDTH * TILES_PER_ROW as u16 + 1;
pub const SOURCE_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle,
    Language(Language),
    Swatch(usize),
    Palette,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayLayout {
    pub handle: Rect,
    /// Visible part of the panel (empty when fully closed).
    pub panel: Rect,
    pub languages: Vec<(Language, Rect)>,
    pub palette: Rect,
    /// Visible swatches as (palette index, tile rect).
    pub swatches: Vec<(usize, Rect)>,
    pub usage: Rect,
    pub status: Rect,
}

/// Number of tile rows that fit in the palette column.
pub fn palette_rows(area: Rect) -> usize {
    let (_, h) = panel_size(area);
    // Border top/bottom plus the status row.
    (h.saturating_sub(3) / TILE_HEIGHT) as usize
}

fn panel_size(area: Rect) -> (u16, u16) {
    (
        PANEL_WIDTH.min(area.width),
        PANEL_HEIGHT.min(area.height.saturating_sub(1)),
    )
}

impl OverlayLayout {
    pub fn compute(area: Rect, app: &App) -> Self {
        let (w, h) = panel_size(area);
        let position = app.overlay.position(app.now).clamp(0.0, 1.0);
        let hidden = ((1.0 - position) * h as f64).round() as u16;

        // Unclipped panel, possibly hanging below the screen.
        let full = Rect {
            x: area.right().saturating_sub(w),
            y: area.bottom().saturating_sub(h) + hidden,
            width: w,
            height: h,
        };
        let panel = full.intersection(area);

        let handle_y = if panel.height > 0 {
            panel.y.saturating_sub(1).max(area.y)
        } else {
            area.bottom().saturating_sub(1)
        };
        let handle = Rect {
            x: full
                .right()
                .saturating_sub(HANDLE_WIDTH + HANDLE_INSET)
                .max(area.x),
            y: handle_y,
            width: HANDLE_WIDTH.min(area.width),
            height: 1,
        }
        .intersection(area);

        let mut layout = Self {
            handle,
            panel,
            ..Self::default()
        };
        if panel.height == 0 {
            return layout;
        }

        let inner = Rect {
            x: full.x + 1,
            y: full.y + 1,
            width: full.width.saturating_sub(2),
            height: full.height.saturating_sub(2),
        };
        let [body, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        let [langs, _, palette, _, usage] = Layout::horizontal([
            Constraint::Length(LANG_WIDTH),
            Constraint::Length(1),
            Constraint::Length(PALETTE_WIDTH),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(body);

        layout.languages = Language::ALL
            .into_iter()
            .enumerate()
            .map(|(i, lang)| {
                let rect = Rect {
                    x: langs.x,
                    y: langs.y + i as u16 * LANG_HEIGHT,
                    width: langs.width,
                    height: LANG_HEIGHT,
                };
                (lang, rect.intersection(langs).intersection(area))
            })
            .filter(|(_, r)| !r.is_empty())
            .collect();

        let rows = (palette.height / TILE_HEIGHT) as usize;
        let first = app.palette_scroll * TILES_PER_ROW;
        let last = (first + rows * TILES_PER_ROW).min(app.palette.len());
        layout.swatches = (first..last)
            .map(|i| {
                let slot = i - first;
                let rect = Rect {
                    x: palette.x + (slot % TILES_PER_ROW) as u16 * (TILE_WIDTH + 1),
                    y: palette.y + (slot / TILES_PER_ROW) as u16 * TILE_HEIGHT,
                    width: TILE_WIDTH,
                    height: TILE_HEIGHT,
                };
                (i, rect.intersection(area))
            })
            .filter(|(_, r)| !r.is_empty())
            .collect();

        layout.palette = palette.intersection(area);
        layout.usage = usage.intersection(area);
        layout.status = status.intersection(area);
        layout
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        if self.handle.contains(pos) {
            return Some(Hit::Handle);
        }
        if let Some((lang, _)) = self.languages.iter().find(|(_, r)| r.contains(pos)) {
            return Some(Hit::Language(*lang));
        }
        if let Some((i, _)) = self.swatches.iter().find(|(_, r)| r.contains(pos)) {
            return Some(Hit::Swatch(*i));
        }
        if self.palette.contains(pos) {
            return Some(Hit::Palette);
        }
        None
    }
}
