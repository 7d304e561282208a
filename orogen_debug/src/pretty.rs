// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use orogen_core::trace::{
    ActivateEvent, AnimateEvent, CommitEvent, PageScaleAnimationEvent, PinchUpdateEvent,
    ScrollBeginEvent, ScrollEndEvent, ScrollUpdateEvent, TopControlsEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_scroll_begin(&mut self, e: &ScrollBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll:begin] {:?}/{:?} device={:?} at=({:.1}, {:.1})",
            e.result.status, e.result.reason, e.device, e.point.x, e.point.y,
        );
    }

    fn on_scroll_update(&mut self, e: &ScrollUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll:update] requested=({:.1}, {:.1}) unused=({:.1}, {:.1}) overscroll=({:.1}, {:.1})",
            e.requested.x,
            e.requested.y,
            e.unused.x,
            e.unused.y,
            e.accumulated_overscroll.x,
            e.accumulated_overscroll.y,
        );
    }

    fn on_scroll_end(&mut self, e: &ScrollEndEvent) {
        let _ = writeln!(self.writer, "[scroll:end] did_scroll={}", e.did_scroll);
    }

    fn on_pinch_begin(&mut self) {
        let _ = writeln!(self.writer, "[pinch:begin]");
    }

    fn on_pinch_update(&mut self, e: &PinchUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[pinch:update] factor={:.3} anchor=({:.1}, {:.1})",
            e.factor, e.anchor.x, e.anchor.y,
        );
    }

    fn on_pinch_end(&mut self) {
        let _ = writeln!(self.writer, "[pinch:end]");
    }

    fn on_page_scale_animation_started(&mut self, e: &PageScaleAnimationEvent) {
        let _ = writeln!(
            self.writer,
            "[page-scale:anim] target={:.3} over {}µs",
            e.target_scale,
            e.duration.micros(),
        );
    }

    fn on_page_scale_animation_finished(&mut self) {
        let _ = writeln!(self.writer, "[page-scale:anim] finished");
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let _ = writeln!(
            self.writer,
            "[commit] generation={} layers={}",
            e.generation, e.layer_count,
        );
    }

    fn on_activate(&mut self, e: &ActivateEvent) {
        let _ = writeln!(self.writer, "[activate] generation={}", e.generation);
    }

    fn on_animate(&mut self, e: &AnimateEvent) {
        let _ = writeln!(
            self.writer,
            "[animate] frame_time={}µs",
            e.frame_time.micros(),
        );
    }

    fn on_top_controls(&mut self, e: &TopControlsEvent) {
        let _ = writeln!(
            self.writer,
            "[top-controls] shown_ratio={:.3}",
            e.shown_ratio,
        );
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};
    use orogen_core::scroll::{DeviceClass, ScrollBeginResult, ScrollReason, ScrollStatus};

    use super::*;

    #[test]
    fn events_render_one_line_each() {
        let mut buf = Vec::new();
        {
            let mut sink = PrettyPrintSink::with_writer(&mut buf);
            sink.on_scroll_begin(&ScrollBeginEvent {
                result: ScrollBeginResult {
                    status: ScrollStatus::OnImplThread,
                    reason: ScrollReason::NotScrollingOnMain,
                },
                device: DeviceClass::Wheel,
                point: Point::new(10.0, 20.0),
            });
            sink.on_scroll_update(&ScrollUpdateEvent {
                requested: Vec2::new(0.0, 10.0),
                unused: Vec2::ZERO,
                accumulated_overscroll: Vec2::ZERO,
            });
            sink.on_scroll_end(&ScrollEndEvent { did_scroll: true });
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[scroll:begin]"));
        assert!(lines[1].contains("requested=(0.0, 10.0)"));
        assert!(lines[2].contains("did_scroll=true"));
    }
}
