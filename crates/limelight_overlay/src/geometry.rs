// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hole geometry and marker placement.
//!
//! All inputs are the four percentage edge offsets; nothing here clamps
//! or validates them. Out-of-range or inverted offsets produce a
//! degenerate hole, which is the caller's responsibility.

use egui::{Pos2, Rect};
use limelight_sequencer::Offsets;

/// The hole polygon in percent space, clockwise from the top-left:
/// `(l, t) (100-r, t) (100-r, 100-b) (l, 100-b)`.
pub fn hole_polygon(offsets: Offsets) -> [[f32; 2]; 4] {
    let Offsets {
        top,
        right,
        bottom,
        left,
    } = offsets;
    [
        [left, top],
        [100.0 - right, top],
        [100.0 - right, 100.0 - bottom],
        [left, 100.0 - bottom],
    ]
}

/// Map the hole into a concrete container rect.
pub fn hole_rect(offsets: Offsets, container: Rect) -> Rect {
    let w = container.width() / 100.0;
    let h = container.height() / 100.0;
    Rect::from_min_max(
        Pos2::new(
            container.left() + offsets.left * w,
            container.top() + offsets.top * h,
        ),
        Pos2::new(
            container.right() - offsets.right * w,
            container.bottom() - offsets.bottom * h,
        ),
    )
}

/// One corner marker: the corner point plus the endpoints of its two arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerMarker {
    /// The hole corner the marker sits on
    pub corner: Pos2,
    /// Endpoint of the horizontal arm
    pub horizontal: Pos2,
    /// Endpoint of the vertical arm
    pub vertical: Pos2,
}

/// The four corner markers of a hole, arms pointing inward, ordered
/// top-left, top-right, bottom-right, bottom-left.
pub fn corner_markers(hole: Rect, size: f32) -> [CornerMarker; 4] {
    let tl = hole.left_top();
    let tr = hole.right_top();
    let br = hole.right_bottom();
    let bl = hole.left_bottom();
    [
        CornerMarker {
            corner: tl,
            horizontal: Pos2::new(tl.x + size, tl.y),
            vertical: Pos2::new(tl.x, tl.y + size),
        },
        CornerMarker {
            corner: tr,
            horizontal: Pos2::new(tr.x - size, tr.y),
            vertical: Pos2::new(tr.x, tr.y + size),
        },
        CornerMarker {
            corner: br,
            horizontal: Pos2::new(br.x - size, br.y),
            vertical: Pos2::new(br.x, br.y - size),
        },
        CornerMarker {
            corner: bl,
            horizontal: Pos2::new(bl.x + size, bl.y),
            vertical: Pos2::new(bl.x, bl.y - size),
        },
    ]
}

/// The bottom-edge marker: a segment along the hole's bottom edge.
pub fn bottom_line(hole: Rect) -> [Pos2; 2] {
    [hole.left_bottom(), hole.right_bottom()]
}
