// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the input pipeline.
//!
//! [`TraceSink`] receives one call per engine event — gesture dispatch,
//! applied deltas, pinch updates, page-scale animation lifecycle, tree
//! commits and activations. All methods default to no-ops, so a sink
//! implements only the events it cares about. The compositor holds an
//! optional boxed sink ([`Compositor::set_trace_sink`]); without the `trace`
//! feature every emission site compiles to nothing.
//!
//! # Crate features
//!
//! - `trace` — enables event emission (one branch per site).
//! - `trace-rich` (implies `trace`) — gates the per-frame events
//!   ([`AnimateEvent`], [`TopControlsEvent`]) that fire on every tick of a
//!   running animation.
//!
//! [`Compositor::set_trace_sink`]: crate::compositor::Compositor::set_trace_sink

use kurbo::{Point, Vec2};

use crate::scroll::{DeviceClass, ScrollBeginResult};
use crate::time::Duration;
#[cfg(feature = "trace-rich")]
use crate::time::Timestamp;

/// Emitted for every scroll-begin dispatch, started or not.
#[derive(Clone, Copy, Debug)]
pub struct ScrollBeginEvent {
    /// Dispatch outcome.
    pub result: ScrollBeginResult,
    /// Input device class.
    pub device: DeviceClass,
    /// Gesture start point in device pixels.
    pub point: Point,
}

/// Emitted for every applied scroll delta.
#[derive(Clone, Copy, Debug)]
pub struct ScrollUpdateEvent {
    /// Requested screen-space delta.
    pub requested: Vec2,
    /// Portion no scroller consumed.
    pub unused: Vec2,
    /// Accumulated viewport overscroll after this step.
    pub accumulated_overscroll: Vec2,
}

/// Emitted when a gesture ends.
#[derive(Clone, Copy, Debug)]
pub struct ScrollEndEvent {
    /// Whether the gesture moved anything over its lifetime.
    pub did_scroll: bool,
}

/// Emitted on pinch updates.
#[derive(Clone, Copy, Debug)]
pub struct PinchUpdateEvent {
    /// Effective page-scale factor after the update.
    pub factor: f64,
    /// Anchor point in device pixels.
    pub anchor: Point,
}

/// Emitted when a staged page-scale animation starts interpolating.
#[derive(Clone, Copy, Debug)]
pub struct PageScaleAnimationEvent {
    /// Target effective factor.
    pub target_scale: f64,
    /// Animation duration.
    pub duration: Duration,
}

/// Emitted when a tree is committed to the pending slot.
#[derive(Clone, Copy, Debug)]
pub struct CommitEvent {
    /// Generation assigned to the pending tree.
    pub generation: u64,
    /// Number of committed layers.
    pub layer_count: u32,
}

/// Emitted when the pending tree activates.
#[derive(Clone, Copy, Debug)]
pub struct ActivateEvent {
    /// Generation of the newly active tree.
    pub generation: u64,
}

/// Emitted every animate tick (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct AnimateEvent {
    /// The frame time driving this tick.
    pub frame_time: Timestamp,
}

/// Emitted whenever the top-controls ratio changes (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct TopControlsEvent {
    /// New shown ratio.
    pub shown_ratio: f64,
}

/// Receives engine trace events.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called for every scroll-begin dispatch.
    fn on_scroll_begin(&mut self, e: &ScrollBeginEvent) {
        _ = e;
    }

    /// Called for every applied scroll delta.
    fn on_scroll_update(&mut self, e: &ScrollUpdateEvent) {
        _ = e;
    }

    /// Called when a gesture ends.
    fn on_scroll_end(&mut self, e: &ScrollEndEvent) {
        _ = e;
    }

    /// Called when a pinch gesture begins.
    fn on_pinch_begin(&mut self) {}

    /// Called on every pinch update.
    fn on_pinch_update(&mut self, e: &PinchUpdateEvent) {
        _ = e;
    }

    /// Called when a pinch gesture ends.
    fn on_pinch_end(&mut self) {}

    /// Called when a page-scale animation starts.
    fn on_page_scale_animation_started(&mut self, e: &PageScaleAnimationEvent) {
        _ = e;
    }

    /// Called exactly once when a page-scale animation completes.
    fn on_page_scale_animation_finished(&mut self) {}

    /// Called when a tree is committed.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when the pending tree activates.
    fn on_activate(&mut self, e: &ActivateEvent) {
        _ = e;
    }

    /// Called every animate tick (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_animate(&mut self, e: &AnimateEvent) {
        _ = e;
    }

    /// Called when the top-controls ratio changes (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_top_controls(&mut self, e: &TopControlsEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_events() {
        let mut sink = NoopSink;
        sink.on_scroll_update(&ScrollUpdateEvent {
            requested: Vec2::new(0.0, 10.0),
            unused: Vec2::ZERO,
            accumulated_overscroll: Vec2::ZERO,
        });
        sink.on_pinch_begin();
        sink.on_commit(&CommitEvent {
            generation: 1,
            layer_count: 3,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn sink_dispatch_is_overridable() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Recording {
            ends: Vec<bool>,
        }
        impl TraceSink for Recording {
            fn on_scroll_end(&mut self, e: &ScrollEndEvent) {
                self.ends.push(e.did_scroll);
            }
        }

        let mut sink = Recording::default();
        sink.on_scroll_end(&ScrollEndEvent { did_scroll: true });
        assert_eq!(sink.ends, alloc::vec![true]);
    }
}
