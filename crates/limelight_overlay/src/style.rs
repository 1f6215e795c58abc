// SPDX-License-Identifier: MIT OR Apache-2.0
//! Style parameters for the overlay.

use crate::color::{to_color32, ColorParseError};
use egui::Color32;
use serde::{Deserialize, Serialize};

/// Visual parameters of the highlight overlay.
///
/// The tint color is kept as a string (`#RRGGBB`, `#RGB`, or `rgba(...)`)
/// so styles round-trip through scripts and config unchanged; it is
/// parsed at paint time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Overlay tint, hex or rgba string
    pub color: String,
    /// Tint alpha, 0-1; ignored when `color` is already an rgba string
    pub opacity: f32,
    /// Stroke width of the corner and bottom-line markers
    pub border_width: f32,
    /// Arm length of the corner markers
    pub corner_size: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#42b983".to_string(),
            opacity: 0.3,
            border_width: 2.0,
            corner_size: 12.0,
        }
    }
}

impl OverlayStyle {
    /// The tint color combined with the style opacity
    pub fn tint(&self) -> Result<Color32, ColorParseError> {
        to_color32(&self.color, self.opacity)
    }

    /// The marker color: the tint at full opacity
    pub fn marker_color(&self) -> Result<Color32, ColorParseError> {
        to_color32(&self.color, 1.0)
    }
}
