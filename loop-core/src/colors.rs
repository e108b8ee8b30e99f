//! Stable display colors for mood labels.

use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use crate::entry::normalize_label;
use crate::error::{LoopError, Result};

/// An sRGB display color, written `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB` or `RRGGBB`, any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("'{s}' is not a #RRGGBB color"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Palette used when the config doesn't name one.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0xA2, 0x8B, 0xD4), // lavender
    Color::rgb(0xF4, 0xA2, 0x61), // apricot
    Color::rgb(0x6F, 0xB7, 0xA8), // sage
    Color::rgb(0xE9, 0x7D, 0x8F), // rose
    Color::rgb(0x5E, 0x9C, 0xD3), // sky
    Color::rgb(0xE5, 0xC0, 0x7B), // sand
    Color::rgb(0x9B, 0xC5, 0x6E), // moss
    Color::rgb(0xC6, 0x78, 0xDD), // orchid
];

/// Hands out palette colors round-robin, one per distinct normalized label.
///
/// The first time a label is seen it gets `palette[known_labels % palette.len()]`
/// and keeps that color for the life of the assigner. Lookup and insert happen
/// under a single lock, so two threads seeing a new label at once agree on its
/// color.
#[derive(Debug)]
pub struct EmotionColorAssigner {
    palette: Vec<Color>,
    assignments: Mutex<HashMap<String, Color>>,
}

impl EmotionColorAssigner {
    pub fn new(palette: Vec<Color>) -> Result<Self> {
        Self::with_assignments(palette, BTreeMap::new())
    }

    /// Restores a mapping saved with [`snapshot`](Self::snapshot).
    pub fn with_assignments(palette: Vec<Color>, saved: BTreeMap<String, Color>) -> Result<Self> {
        if palette.is_empty() {
            return Err(LoopError::Config("color palette is empty".to_string()));
        }
        let assignments = saved
            .into_iter()
            .map(|(label, color)| (normalize_label(&label), color))
            .collect();
        Ok(Self {
            palette,
            assignments: Mutex::new(assignments),
        })
    }

    pub fn color_for(&self, label: &str) -> Color {
        let key = normalize_label(label);
        let mut map = self
            .assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(color) = map.get(&key) {
            return *color;
        }
        let color = self.palette[map.len() % self.palette.len()];
        debug!("assigned {color} to '{key}'");
        map.insert(key, color);
        color
    }

    /// Current label → color mapping, for callers that persist it.
    pub fn snapshot(&self) -> BTreeMap<String, Color> {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}

impl Default for EmotionColorAssigner {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            assignments: Mutex::new(HashMap::new()),
        }
    }
}
