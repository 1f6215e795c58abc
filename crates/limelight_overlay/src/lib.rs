// SPDX-License-Identifier: MIT OR Apache-2.0
//! Highlight-rect overlay widget for egui.
//!
//! This crate draws a rectangular highlight over a container: a tinted
//! hole described by four percentage edge offsets, four corner markers,
//! and a bottom-edge line. A region script can drive the hole through a
//! timed sequence of positions, with a finish signal when the script
//! completes.
//!
//! ## Architecture
//!
//! - Geometry: pure percent-space hole polygon and marker placement
//! - Color: hex/rgba parsing that rejects malformed input
//! - Style: tint, opacity, and marker sizing
//! - Widget: retained [`HighlightRect`] state shown once per frame,
//!   owning the playback sequencer from [`limelight_sequencer`]

pub mod color;
pub mod geometry;
pub mod style;
pub mod widget;

pub use color::{to_color32, to_rgba, ColorParseError};
pub use geometry::{bottom_line, corner_markers, hole_polygon, hole_rect, CornerMarker};
pub use style::OverlayStyle;
pub use widget::HighlightRect;

pub use limelight_sequencer::{
    Clock, ManualClock, Offsets, Region, RegionId, RegionScript, RegionSequencer, ScriptError,
    SequencerEvent, SequencerState, SystemClock,
};
