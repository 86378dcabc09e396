//! Shared color palette for the overlay chrome.

use ratatui::style::Color;

// ── Panel ───────────────────────────────────────────────────────────
pub const NIGHT: Color = Color::Rgb(20, 37, 51);
pub const WHITE: Color = Color::Rgb(255, 255, 255);
pub const BORDER: Color = Color::Rgb(255, 255, 255);

// ── Sparklines ──────────────────────────────────────────────────────
pub const CHART: Color = Color::Rgb(136, 132, 216);
pub const CHART_GAP: Color = Color::Rgb(90, 90, 110);

// ── Accent / chrome ─────────────────────────────────────────────────
pub const MUTED: Color = Color::Rgb(150, 160, 170);
pub const FLASH_OK: Color = Color::Rgb(80, 220, 120);
pub const FLASH_ERR: Color = Color::Rgb(230, 90, 90);
