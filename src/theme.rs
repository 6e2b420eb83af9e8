//! Board theme: `theme[key]="value"` files and hex → ratatui Color.
//!
//! The theme file is the board's background asset. A missing or broken file
//! falls back to the built-in colours; `board_bg="none"` skips the background.

use crate::piece::ShapeKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Active piece colours: square, line, z-block.
    pub moving: [Color; 3],
    /// Settled cells.
    pub filled: Color,
    /// Board background; `None` leaves the terminal's own background.
    pub board_bg: Option<Color>,
    /// Border.
    pub div_line: Color,
    /// Text.
    pub main_fg: Color,
    /// Titles and highlights.
    pub title: Color,
    /// Help text.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            moving: [
                Color::Rgb(0xE5, 0xC0, 0x7B),
                Color::Rgb(0x56, 0xB6, 0xC2),
                Color::Rgb(0xE0, 0x6C, 0x75),
            ],
            filled: Color::Rgb(0x00, 0x00, 0xFF),
            board_bg: Some(Color::Rgb(185, 211, 238)),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }
}

impl Theme {
    /// Load from `path`; defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_theme_file(&s)))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let base = Self::default();
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let board_bg = match map.get("board_bg").map(String::as_str) {
            Some("none") => None,
            Some(v) => parse_hex(v).ok().or(base.board_bg),
            None => base.board_bg,
        };
        Self {
            moving: [
                get("square").unwrap_or(base.moving[0]),
                get("line").unwrap_or(base.moving[1]),
                get("zblock").unwrap_or(base.moving[2]),
            ],
            filled: get("filled").unwrap_or(base.filled),
            board_bg,
            div_line: get("div_line").unwrap_or(base.div_line),
            main_fg: get("main_fg").unwrap_or(base.main_fg),
            title: get("title").unwrap_or(base.title),
            inactive_fg: get("inactive_fg").unwrap_or(base.inactive_fg),
        }
    }

    /// Colour of the active piece for `shape`.
    #[inline]
    pub fn moving_color(&self, shape: ShapeKind) -> Color {
        match shape {
            ShapeKind::Square => self.moving[0],
            ShapeKind::Line => self.moving[1],
            ShapeKind::ZBlock => self.moving[2],
        }
    }
}

/// Parse a theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
