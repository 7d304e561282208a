// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording and Chrome Trace Event Format export.
//!
//! [`RecordingSink`] implements [`TraceSink`] and keeps every event as a
//! [`RecordedEvent`]. [`export`] writes the recording as [Chrome Trace
//! Event Format][spec] JSON, suitable for `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! The engine does not read a clock, so most events carry no timestamp.
//! The recorder stamps each event with the most recent animate-tick frame
//! time, bumped by one microsecond per event so ordering survives the
//! export; between frames the timeline is therefore event order, not wall
//! time.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use orogen_core::trace::{
    ActivateEvent, AnimateEvent, CommitEvent, PageScaleAnimationEvent, PinchUpdateEvent,
    ScrollBeginEvent, ScrollEndEvent, ScrollUpdateEvent, TopControlsEvent, TraceSink,
};

/// One recorded engine event with its synthesized timestamp.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// Scroll dispatch.
    ScrollBegin(u64, ScrollBeginEvent),
    /// Applied scroll delta.
    ScrollUpdate(u64, ScrollUpdateEvent),
    /// Gesture end.
    ScrollEnd(u64, ScrollEndEvent),
    /// Pinch start.
    PinchBegin(u64),
    /// Pinch step.
    PinchUpdate(u64, PinchUpdateEvent),
    /// Pinch end.
    PinchEnd(u64),
    /// Page-scale animation start.
    PageScaleAnimationStarted(u64, PageScaleAnimationEvent),
    /// Page-scale animation completion.
    PageScaleAnimationFinished(u64),
    /// Tree commit.
    Commit(u64, CommitEvent),
    /// Tree activation.
    Activate(u64, ActivateEvent),
    /// Animate tick.
    Animate(u64, AnimateEvent),
    /// Top-controls ratio change.
    TopControls(u64, TopControlsEvent),
}

/// A [`TraceSink`] that records events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<RecordedEvent>,
    clock: u64,
}

impl RecordingSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, in order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    fn stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl TraceSink for RecordingSink {
    fn on_scroll_begin(&mut self, e: &ScrollBeginEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::ScrollBegin(ts, *e));
    }

    fn on_scroll_update(&mut self, e: &ScrollUpdateEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::ScrollUpdate(ts, *e));
    }

    fn on_scroll_end(&mut self, e: &ScrollEndEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::ScrollEnd(ts, *e));
    }

    fn on_pinch_begin(&mut self) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::PinchBegin(ts));
    }

    fn on_pinch_update(&mut self, e: &PinchUpdateEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::PinchUpdate(ts, *e));
    }

    fn on_pinch_end(&mut self) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::PinchEnd(ts));
    }

    fn on_page_scale_animation_started(&mut self, e: &PageScaleAnimationEvent) {
        let ts = self.stamp();
        self.events
            .push(RecordedEvent::PageScaleAnimationStarted(ts, *e));
    }

    fn on_page_scale_animation_finished(&mut self) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::PageScaleAnimationFinished(ts));
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::Commit(ts, *e));
    }

    fn on_activate(&mut self, e: &ActivateEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::Activate(ts, *e));
    }

    fn on_animate(&mut self, e: &AnimateEvent) {
        // Animate ticks re-anchor the synthetic clock to real frame time.
        self.clock = self.clock.max(e.frame_time.micros());
        let ts = self.stamp();
        self.events.push(RecordedEvent::Animate(ts, *e));
    }

    fn on_top_controls(&mut self, e: &TopControlsEvent) {
        let ts = self.stamp();
        self.events.push(RecordedEvent::TopControls(ts, *e));
    }
}

/// Exports recorded events as Chrome Trace Event Format JSON (a complete
/// JSON array of instant events).
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();
    for event in events {
        out.push(match *event {
            RecordedEvent::ScrollBegin(ts, e) => instant(
                "ScrollBegin",
                "Input",
                ts,
                json!({
                    "status": format!("{:?}", e.result.status),
                    "reason": format!("{:?}", e.result.reason),
                    "device": format!("{:?}", e.device),
                    "x": e.point.x,
                    "y": e.point.y,
                }),
            ),
            RecordedEvent::ScrollUpdate(ts, e) => instant(
                "ScrollUpdate",
                "Input",
                ts,
                json!({
                    "dx": e.requested.x,
                    "dy": e.requested.y,
                    "unused_x": e.unused.x,
                    "unused_y": e.unused.y,
                    "overscroll_x": e.accumulated_overscroll.x,
                    "overscroll_y": e.accumulated_overscroll.y,
                }),
            ),
            RecordedEvent::ScrollEnd(ts, e) => instant(
                "ScrollEnd",
                "Input",
                ts,
                json!({ "did_scroll": e.did_scroll }),
            ),
            RecordedEvent::PinchBegin(ts) => instant("PinchBegin", "Input", ts, json!({})),
            RecordedEvent::PinchUpdate(ts, e) => instant(
                "PinchUpdate",
                "Input",
                ts,
                json!({
                    "factor": e.factor,
                    "anchor_x": e.anchor.x,
                    "anchor_y": e.anchor.y,
                }),
            ),
            RecordedEvent::PinchEnd(ts) => instant("PinchEnd", "Input", ts, json!({})),
            RecordedEvent::PageScaleAnimationStarted(ts, e) => instant(
                "PageScaleAnimation",
                "Animation",
                ts,
                json!({
                    "target_scale": e.target_scale,
                    "duration_us": e.duration.micros(),
                }),
            ),
            RecordedEvent::PageScaleAnimationFinished(ts) => {
                instant("PageScaleAnimationFinished", "Animation", ts, json!({}))
            }
            RecordedEvent::Commit(ts, e) => instant(
                "Commit",
                "Tree",
                ts,
                json!({
                    "generation": e.generation,
                    "layers": e.layer_count,
                }),
            ),
            RecordedEvent::Activate(ts, e) => instant(
                "Activate",
                "Tree",
                ts,
                json!({ "generation": e.generation }),
            ),
            RecordedEvent::Animate(ts, e) => instant(
                "Animate",
                "Frame",
                ts,
                json!({ "frame_time_us": e.frame_time.micros() }),
            ),
            RecordedEvent::TopControls(ts, e) => instant(
                "TopControls",
                "Animation",
                ts,
                json!({ "shown_ratio": e.shown_ratio }),
            ),
        });
    }
    serde_json::to_writer(&mut *writer, &out)?;
    writer.flush()
}

fn instant(name: &str, category: &str, ts: u64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": category,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "g",
        "args": args,
    })
}
