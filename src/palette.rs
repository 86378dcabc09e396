//! Theme palette derivation.
//!
//! A token map (name → CSS color spec) goes through four independent steps:
//! [`exclude_sentinel`], [`analyze`], [`sort_by_lightness`] and
//! [`to_swatches`]. [`Palette::derive`] chains them once at startup; the
//! result is immutable and handed to the app.

use std::collections::BTreeMap;

use ratatui::style::Color;
use thiserror::Error;

use crate::ui::colors;

/// Token excluded from the palette.
pub const SENTINEL: &str = "transparent";

/// Design-token table: token name → color spec.
pub type TokenMap = BTreeMap<String, String>;

/// A parsed color. Alpha is kept but never affects darkness or lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// YIQ luma below the midpoint means white text reads better on it.
    pub fn is_dark(&self) -> bool {
        let yiq = (self.r as f64 * 2126.0 + self.g as f64 * 7152.0 + self.b as f64 * 722.0)
            / 10000.0;
        yiq < 128.0
    }

    /// HSL lightness on a 0-100 scale.
    pub fn lightness(&self) -> f64 {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        (max + min) / 2.0 * 100.0
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color spec")]
    Empty,
    #[error("invalid hex color `{0}`")]
    Hex(String),
    #[error("invalid {function}() color `{spec}`")]
    Function { function: String, spec: String },
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token `{name}`: {source}")]
pub struct PaletteError {
    pub name: String,
    #[source]
    pub source: ColorParseError,
}

/// Parse a CSS color spec: hex, `rgb[a]()`, `hsl[a]()` or a named color.
pub fn parse_color(spec: &str) -> Result<Rgba, ColorParseError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::Hex(spec.to_string()));
    }
    let lower = spec.to_ascii_lowercase();
    if let Some(open) = lower.find('(') {
        let function = lower[..open].trim().to_string();
        let err = || ColorParseError::Function {
            function: function.clone(),
            spec: spec.to_string(),
        };
        let body = lower[open + 1..].strip_suffix(')').ok_or_else(err)?;
        let args: Vec<&str> = body
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .collect();
        let parsed = match function.as_str() {
            "rgb" | "rgba" => parse_rgb_args(&args),
            "hsl" | "hsla" => parse_hsl_args(&args),
            _ => None,
        };
        return parsed.ok_or_else(err);
    }
    named_color(&lower).ok_or_else(|| ColorParseError::UnknownName(spec.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 | 4 => {
            let alpha = if hex.len() == 4 { nibble(3)? as f64 / 255.0 } else { 1.0 };
            Some(Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, alpha })
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 { byte(6)? as f64 / 255.0 } else { 1.0 };
            Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, alpha })
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &[&str]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let channel = |a: &str| -> Option<u8> {
        let v = match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
            None => a.parse::<f64>().ok()?,
        };
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    Some(Rgba {
        r: channel(args[0])?,
        g: channel(args[1])?,
        b: channel(args[2])?,
        alpha: parse_alpha(args.get(3).copied())?,
    })
}

fn parse_hsl_args(args: &[&str]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let hue: f64 = args[0].trim_end_matches("deg").parse().ok()?;
    let pct = |a: &str| -> Option<f64> {
        Some(a.trim_end_matches('%').parse::<f64>().ok()?.clamp(0.0, 100.0) / 100.0)
    };
    let (r, g, b) = hsl_to_rgb(hue, pct(args[1])?, pct(args[2])?);
    Some(Rgba { r, g, b, alpha: parse_alpha(args.get(3).copied())? })
}

fn parse_alpha(arg: Option<&str>) -> Option<f64> {
    let Some(a) = arg else {
        return Some(1.0);
    };
    let v = match a.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => a.parse::<f64>().ok()?,
    };
    Some(v.clamp(0.0, 1.0))
}

fn hsl_to_rgb(hue: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f64| ((v + m) * 255.0).clamp(0.0, 255.0).round() as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

fn named_color(name: &str) -> Option<Rgba> {
    let (r, g, b) = match name {
        "transparent" => return Some(Rgba { r: 0, g: 0, b: 0, alpha: 0.0 }),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "silver" => (192, 192, 192),
        "gray" | "grey" => (128, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "purple" => (128, 0, 128),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "gold" => (255, 215, 0),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "brown" => (165, 42, 42),
        "coral" => (255, 127, 80),
        "salmon" => (250, 128, 114),
        "tomato" => (255, 99, 71),
        "crimson" => (220, 20, 60),
        "khaki" => (240, 230, 140),
        "beige" => (245, 245, 220),
        "ivory" => (255, 255, 240),
        "lavender" => (230, 230, 250),
        "turquoise" => (64, 224, 208),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "gainsboro" => (220, 220, 220),
        "whitesmoke" => (245, 245, 245),
        "slategray" | "slategrey" => (112, 128, 144),
        "steelblue" => (70, 130, 180),
        "royalblue" => (65, 105, 225),
        "dodgerblue" => (30, 144, 255),
        "skyblue" => (135, 206, 235),
        "seagreen" => (46, 139, 87),
        "forestgreen" => (34, 139, 34),
        "firebrick" => (178, 34, 34),
        "chocolate" => (210, 105, 30),
        "tan" => (210, 180, 140),
        _ => return None,
    };
    Some(Rgba::opaque(r, g, b))
}

/// One analyzed token.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    pub name: String,
    pub value: String,
    pub color: Rgba,
    pub is_dark: bool,
    pub lightness: f64,
}

/// Display shape of a palette entry: a tile painted in the color, labelled
/// with the token name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub name: String,
    pub bg: Color,
    pub fg: Color,
}

/// Drop the sentinel token, keeping map order for the rest.
pub fn exclude_sentinel(tokens: &TokenMap) -> Vec<(&str, &str)> {
    tokens
        .iter()
        .filter(|(name, _)| name.as_str() != SENTINEL)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

pub fn analyze(name: &str, value: &str) -> Result<ColorEntry, PaletteError> {
    let color = parse_color(value).map_err(|source| PaletteError {
        name: name.to_string(),
        source,
    })?;
    Ok(ColorEntry {
        name: name.to_string(),
        value: value.to_string(),
        color,
        is_dark: color.is_dark(),
        lightness: color.lightness(),
    })
}

/// Stable ascending sort; equal lightness keeps input order.
pub fn sort_by_lightness(mut entries: Vec<ColorEntry>) -> Vec<ColorEntry> {
    entries.sort_by(|a, b| a.lightness.total_cmp(&b.lightness));
    entries
}

pub fn to_swatches(entries: &[ColorEntry]) -> Vec<Swatch> {
    entries
        .iter()
        .map(|e| Swatch {
            name: e.name.clone(),
            bg: e.color.to_color(),
            fg: if e.is_dark { colors::WHITE } else { colors::NIGHT },
        })
        .collect()
}

/// The derived palette. Built once, read by every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<ColorEntry>,
    swatches: Vec<Swatch>,
}

impl Palette {
    pub fn derive(tokens: &TokenMap) -> Result<Self, PaletteError> {
        let analyzed = exclude_sentinel(tokens)
            .into_iter()
            .map(|(name, value)| analyze(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        let entries = sort_by_lightness(analyzed);
        let swatches = to_swatches(&entries);
        Ok(Self { entries, swatches })
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
