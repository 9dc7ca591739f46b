use crate::service::Placement;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sticker placement constants. Offsets are in Trello's sticker coordinate
/// space, percentages of the card cover width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_margin_left")]
    pub margin_left: f64,
    #[serde(default = "default_margin_top")]
    pub margin_top: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default = "default_compact_step")]
    pub compact_step: f64,
    /// Above this many stickers, `compact_step` is used.
    #[serde(default = "default_compact_threshold")]
    pub compact_threshold: usize,
    #[serde(default = "default_dense_step")]
    pub dense_step: f64,
    /// Above this many stickers, `dense_step` is used.
    #[serde(default = "default_dense_threshold")]
    pub dense_threshold: usize,
    /// Rotation is drawn from `-max_rotation..=max_rotation` degrees.
    #[serde(default = "default_max_rotation")]
    pub max_rotation: i64,
}

fn default_margin_left() -> f64 {
    1.0
}

fn default_margin_top() -> f64 {
    5.0
}

fn default_step() -> f64 {
    18.0
}

fn default_compact_step() -> f64 {
    10.0
}

fn default_compact_threshold() -> usize {
    6
}

fn default_dense_step() -> f64 {
    6.0
}

fn default_dense_threshold() -> usize {
    10
}

fn default_max_rotation() -> i64 {
    10
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_left: default_margin_left(),
            margin_top: default_margin_top(),
            step: default_step(),
            compact_step: default_compact_step(),
            compact_threshold: default_compact_threshold(),
            dense_step: default_dense_step(),
            dense_threshold: default_dense_threshold(),
            max_rotation: default_max_rotation(),
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between neighbouring stickers for a row of `count`.
    pub fn step_for(&self, count: usize) -> f64 {
        if count > self.dense_threshold {
            self.dense_step
        } else if count > self.compact_threshold {
            self.compact_step
        } else {
            self.step
        }
    }
}

/// Left-to-right placements for a row of `count` stickers.
pub fn placements<R: Rng + ?Sized>(
    count: usize,
    layout: &LayoutConfig,
    rng: &mut R,
) -> Vec<Placement> {
    let step = layout.step_for(count);
    let max_rotation = layout.max_rotation.abs();
    (0..count)
        .map(|index| Placement {
            left: index as f64 * step + layout.margin_left,
            top: layout.margin_top,
            z_index: index as i64,
            rotate: rng.gen_range(-max_rotation..=max_rotation),
        })
        .collect()
}
