//! Sticker colors and the `||GPW||` marker codec.
//!
//! A card description carries its big board state as a run of color letters
//! between double pipes, e.g. `||GPGW||` for green, purple, green, white.
//! Letters are case-insensitive; anything else between the pipes voids the
//! block.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// StickerColor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerColor {
    Green,
    Purple,
    Red,
    Yellow,
    White,
}

impl StickerColor {
    pub fn all() -> &'static [StickerColor] {
        &[
            StickerColor::Green,
            StickerColor::Purple,
            StickerColor::Red,
            StickerColor::Yellow,
            StickerColor::White,
        ]
    }

    pub fn letter(self) -> char {
        match self {
            StickerColor::Green => 'G',
            StickerColor::Purple => 'P',
            StickerColor::Red => 'R',
            StickerColor::Yellow => 'Y',
            StickerColor::White => 'W',
        }
    }

    /// Image filename uploaded to the automation account for this color.
    pub fn filename(self) -> &'static str {
        match self {
            StickerColor::Green => "green.png",
            StickerColor::Purple => "purple.png",
            StickerColor::Red => "red.png",
            StickerColor::Yellow => "yellow.png",
            StickerColor::White => "white.png",
        }
    }

    pub fn from_letter(letter: char) -> Option<StickerColor> {
        let upper = letter.to_ascii_uppercase();
        Self::all().iter().copied().find(|c| c.letter() == upper)
    }
}

impl fmt::Display for StickerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| Regex::new(r"(?i)\|\|([GPRWY]+)\|\|").unwrap())
}

/// Desired sticker sequence encoded in `description`.
///
/// Only the first well-formed block counts. No block yields an empty vec.
pub fn extract_code(description: &str) -> Vec<StickerColor> {
    let Some(caps) = marker_re().captures(description) else {
        return Vec::new();
    };
    caps[1].chars().filter_map(StickerColor::from_letter).collect()
}

/// Letters for `colors`, e.g. `"GPW"`.
pub fn to_code_string(colors: &[StickerColor]) -> String {
    colors.iter().map(|c| c.letter()).collect()
}
