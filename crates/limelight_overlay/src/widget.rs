// SPDX-License-Identifier: MIT OR Apache-2.0
//! The highlight-rect overlay widget.
//!
//! [`HighlightRect`] tints one rectangular region of a container and
//! decorates it with four corner markers and a bottom line. In dynamic
//! mode it walks a region script over time via a [`RegionSequencer`],
//! reporting a finish signal when the script completes.
//!
//! The widget is retained state: the host keeps it alongside its other
//! UI state and calls [`show`](HighlightRect::show) every frame with the
//! container rect to overlay.

use crate::geometry;
use crate::style::OverlayStyle;
use egui::{Color32, Rect, Stroke};
use limelight_sequencer::{
    Clock, Offsets, Region, RegionSequencer, SequencerEvent, SequencerState, SystemClock,
};
use std::time::Instant;

/// A rectangular highlight overlay with optional timed playback.
pub struct HighlightRect {
    offsets: Offsets,
    style: OverlayStyle,
    use_dynamic: bool,
    sequencer: RegionSequencer,
    clock: Box<dyn Clock>,
    auto_started: bool,
    finished: bool,
    rejected_color: Option<String>,
}

impl HighlightRect {
    /// Create a widget with zero offsets and default style
    pub fn new() -> Self {
        Self {
            offsets: Offsets::default(),
            style: OverlayStyle::default(),
            use_dynamic: false,
            sequencer: RegionSequencer::new(Vec::new()),
            clock: Box::new(SystemClock),
            auto_started: false,
            finished: false,
            rejected_color: None,
        }
    }

    /// Set the static edge offsets
    pub fn with_offsets(mut self, offsets: Offsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Set the overlay style
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable automatic playback of the region list on first show
    pub fn with_dynamic(mut self, use_dynamic: bool) -> Self {
        self.use_dynamic = use_dynamic;
        self
    }

    /// Set the region playback list
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.sequencer.update_regions(regions);
        self
    }

    /// Replace the time source (tests inject a manual clock)
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Begin playback from the first region; cancels any run in flight
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.sequencer.start(now);
    }

    /// Cancel playback, keeping the last applied region visible
    pub fn stop(&mut self) {
        self.sequencer.stop();
    }

    /// Replace the region list; takes effect on the next start
    pub fn update_regions(&mut self, regions: Vec<Region>) {
        self.sequencer.update_regions(regions);
    }

    /// The stored region list
    pub fn regions(&self) -> &[Region] {
        self.sequencer.regions()
    }

    /// The static edge offsets
    pub fn offsets(&self) -> Offsets {
        self.offsets
    }

    /// Mutable access to the static edge offsets
    pub fn offsets_mut(&mut self) -> &mut Offsets {
        &mut self.offsets
    }

    /// The overlay style
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Mutable access to the overlay style
    pub fn style_mut(&mut self) -> &mut OverlayStyle {
        &mut self.style
    }

    /// The offsets currently rendered: the sequencer's once any region
    /// has been applied, the static offsets otherwise
    pub fn current_offsets(&self) -> Offsets {
        self.sequencer.current_offsets().unwrap_or(self.offsets)
    }

    /// The rendered hole polygon in percent space
    pub fn clip_polygon(&self) -> [[f32; 2]; 4] {
        geometry::hole_polygon(self.current_offsets())
    }

    /// Playback state of the underlying sequencer
    pub fn playback_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Whether a hold is in progress
    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// Observe the finish signal.
    ///
    /// Returns true once after a playback run completes naturally; a
    /// manual [`stop`](Self::stop) never raises it.
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }

    /// Auto-start once, then drain expired holds and the event queue.
    fn prepare(&mut self, now: Instant) {
        if self.use_dynamic && !self.auto_started {
            self.auto_started = true;
            tracing::debug!("auto-starting region playback");
            self.sequencer.start(now);
        }

        self.sequencer.tick(now);
        for event in self.sequencer.take_events() {
            if event == SequencerEvent::Finished {
                self.finished = true;
            }
        }
    }

    /// Render the overlay over `container` and advance playback.
    ///
    /// While a hold is in flight a repaint is requested for its expiry,
    /// so playback progresses even when nothing else triggers frames.
    pub fn show(&mut self, ui: &mut egui::Ui, container: Rect) {
        let now = self.clock.now();
        self.prepare(now);

        match (self.style.tint(), self.style.marker_color()) {
            (Ok(tint), Ok(marker_color)) => {
                self.rejected_color = None;
                self.paint(ui.painter(), container, tint, marker_color);
            }
            (Err(err), _) | (_, Err(err)) => {
                // Refuse to paint with a malformed color; report each
                // offending value once rather than every frame.
                if self.rejected_color.as_deref() != Some(self.style.color.as_str()) {
                    tracing::error!("overlay color rejected: {err}");
                    self.rejected_color = Some(self.style.color.clone());
                }
            }
        }

        if let Some(deadline) = self.sequencer.next_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn paint(&self, painter: &egui::Painter, container: Rect, tint: Color32, marker_color: Color32) {
        let hole = geometry::hole_rect(self.current_offsets(), container);
        painter.rect_filled(hole, 0.0, tint);

        let stroke = Stroke::new(self.style.border_width, marker_color);
        for marker in geometry::corner_markers(hole, self.style.corner_size) {
            painter.line_segment([marker.corner, marker.horizontal], stroke);
            painter.line_segment([marker.corner, marker.vertical], stroke);
        }

        let [left, right] = geometry::bottom_line(hole);
        painter.line_segment([left, right], stroke);
    }
}

impl Default for HighlightRect {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_sequencer::ManualClock;
    use std::time::Duration;

    fn region(top: f32, right: f32, bottom: f32, left: f32, duration_ms: u64) -> Region {
        Region::new(Offsets::new(top, right, bottom, left), duration_ms)
    }

    #[test]
    fn test_static_mode_mirrors_props() {
        let widget = HighlightRect::new().with_offsets(Offsets::new(50.0, 25.0, 75.0, 15.0));
        assert_eq!(widget.current_offsets(), Offsets::new(50.0, 25.0, 75.0, 15.0));
        assert_eq!(widget.playback_state(), SequencerState::Idle);
    }

    #[test]
    fn test_clip_polygon_from_props() {
        let widget = HighlightRect::new().with_offsets(Offsets::new(20.0, 30.0, 40.0, 10.0));
        assert_eq!(
            widget.clip_polygon(),
            [[10.0, 20.0], [70.0, 20.0], [70.0, 60.0], [10.0, 60.0]]
        );
    }

    #[test]
    fn test_dynamic_auto_start_and_finish() {
        let clock = ManualClock::new();
        let mut widget = HighlightRect::new()
            .with_dynamic(true)
            .with_regions(vec![region(10.0, 20.0, 30.0, 15.0, 1000)])
            .with_clock(Box::new(clock.clone()));

        // First frame activates playback and applies region 0.
        widget.prepare(clock.now());
        assert_eq!(widget.current_offsets(), Offsets::new(10.0, 20.0, 30.0, 15.0));
        assert!(widget.is_playing());
        assert!(!widget.take_finished());

        clock.advance(Duration::from_millis(1000));
        widget.prepare(clock.now());
        assert!(widget.take_finished());
        // The signal is observed exactly once and offsets stay put.
        assert!(!widget.take_finished());
        clock.advance(Duration::from_secs(1));
        widget.prepare(clock.now());
        assert_eq!(widget.current_offsets(), Offsets::new(10.0, 20.0, 30.0, 15.0));
        assert!(!widget.take_finished());
    }

    #[test]
    fn test_dynamic_with_empty_regions_never_finishes() {
        let clock = ManualClock::new();
        let mut widget = HighlightRect::new()
            .with_dynamic(true)
            .with_clock(Box::new(clock.clone()));

        widget.prepare(clock.now());
        clock.advance(Duration::from_secs(5));
        widget.prepare(clock.now());
        assert!(!widget.take_finished());
        assert_eq!(widget.playback_state(), SequencerState::Idle);
    }

    #[test]
    fn test_auto_start_happens_once() {
        let clock = ManualClock::new();
        let mut widget = HighlightRect::new()
            .with_dynamic(true)
            .with_regions(vec![region(1.0, 1.0, 1.0, 1.0, 100)])
            .with_clock(Box::new(clock.clone()));

        widget.prepare(clock.now());
        clock.advance(Duration::from_millis(100));
        widget.prepare(clock.now());
        assert!(widget.take_finished());

        // Later frames do not restart playback on their own.
        clock.advance(Duration::from_secs(1));
        widget.prepare(clock.now());
        assert_eq!(widget.playback_state(), SequencerState::Finished);
        assert!(!widget.take_finished());
    }

    #[test]
    fn test_manual_stop_never_signals_finish() {
        let clock = ManualClock::new();
        let mut widget = HighlightRect::new()
            .with_regions(vec![region(5.0, 5.0, 5.0, 5.0, 1000)])
            .with_clock(Box::new(clock.clone()));

        widget.start();
        widget.stop();
        widget.stop();
        clock.advance(Duration::from_secs(2));
        widget.prepare(clock.now());
        assert!(!widget.take_finished());
        // Last applied region stays visible after stop.
        assert_eq!(widget.current_offsets(), Offsets::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_update_regions_roundtrip() {
        let mut widget = HighlightRect::new();
        let script = vec![region(5.0, 10.0, 15.0, 20.0, 2000)];
        widget.update_regions(script.clone());
        assert_eq!(widget.regions(), script.as_slice());
    }

    #[test]
    fn test_restart_signals_finish_per_run() {
        let clock = ManualClock::new();
        let mut widget = HighlightRect::new()
            .with_regions(vec![region(1.0, 1.0, 1.0, 1.0, 100)])
            .with_clock(Box::new(clock.clone()));

        widget.start();
        clock.advance(Duration::from_millis(100));
        widget.prepare(clock.now());
        assert!(widget.take_finished());

        widget.start();
        clock.advance(Duration::from_millis(100));
        widget.prepare(clock.now());
        assert!(widget.take_finished());
    }
}
