// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-scale factor state and timed page-scale animation.
//!
//! The page-scale factor is the pinch-zoom multiplier, distinct from the
//! device pixel ratio. Like scroll offsets it splits into a producer-pushed
//! `base` and a locally accumulated `delta`; the effective factor is
//! `base · delta` clamped into `[min, max]`, and clamping happens at the
//! point of every update so the invariant holds continuously.
//!
//! A [`PendingPageScaleAnimation`] is staged by the producer on the pending
//! tree and becomes a live [`PageScaleAnimation`] when that tree activates
//! (last request wins, taken at most once). The live animation captures its
//! start time on the first animate tick, interpolates geometrically in scale
//! (equal time steps zoom by equal factors) and linearly in offset under the
//! shared ease, and snaps exactly to its target on the final tick.

use kurbo::Vec2;

use crate::ease::ease_in_out;
use crate::time::{Duration, Timestamp};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// The page-scale factor triple: producer base, local delta, and bounds.
#[derive(Clone, Copy, Debug)]
pub struct PageScaleState {
    base: f64,
    delta: f64,
    sent_delta: f64,
    min: f64,
    max: f64,
}

impl Default for PageScaleState {
    fn default() -> Self {
        Self {
            base: 1.0,
            delta: 1.0,
            sent_delta: 1.0,
            min: 1.0,
            max: 1.0,
        }
    }
}

impl PageScaleState {
    /// The effective factor: `base · delta` (kept in `[min, max]` by
    /// construction).
    #[inline]
    #[must_use]
    pub fn current(&self) -> f64 {
        self.base * self.delta
    }

    /// The minimum allowed factor.
    #[inline]
    #[must_use]
    pub const fn min_factor(&self) -> f64 {
        self.min
    }

    /// The maximum allowed factor.
    #[inline]
    #[must_use]
    pub const fn max_factor(&self) -> f64 {
        self.max
    }

    /// Replaces the producer-pushed base and bounds. The local delta resets:
    /// a push supersedes everything applied locally.
    pub fn push_from_main(&mut self, factor: f64, min: f64, max: f64) {
        let max = max.max(min);
        self.min = min;
        self.max = max;
        self.base = factor.clamp(min, max);
        self.delta = 1.0;
        self.sent_delta = 1.0;
    }

    /// Multiplies the local delta by `factor`, clamping the effective scale
    /// into `[min, max]`. Returns the effective factor afterwards.
    pub fn apply_delta(&mut self, factor: f64) -> f64 {
        let target = (self.base * self.delta * factor).clamp(self.min, self.max);
        if self.base > 0.0 {
            self.delta = target / self.base;
        }
        self.current()
    }

    /// Sets the effective factor directly (animation steps), clamped.
    pub fn set_current(&mut self, factor: f64) -> f64 {
        let target = factor.clamp(self.min, self.max);
        if self.base > 0.0 {
            self.delta = target / self.base;
        }
        self.current()
    }

    /// The multiplicative delta not yet reported to the producer.
    #[must_use]
    pub fn unsent_delta(&self) -> f64 {
        if self.sent_delta == 0.0 {
            1.0
        } else {
            self.delta / self.sent_delta
        }
    }

    /// Marks the current delta as reported.
    pub const fn mark_sent(&mut self) {
        self.sent_delta = self.delta;
    }
}

/// A page-scale animation request staged on the pending tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPageScaleAnimation {
    /// Target scroll offset (content space), or the anchor point when
    /// [`use_anchor`](Self::use_anchor) is set.
    pub target_offset: Vec2,
    /// Interpret [`target_offset`](Self::target_offset) as an anchor to keep
    /// fixed on screen instead of a literal destination.
    pub use_anchor: bool,
    /// Target effective page-scale factor.
    pub scale: f64,
    /// Animation duration; zero completes on the first tick.
    pub duration: Duration,
}

/// A live page-scale animation on the active tree.
#[derive(Clone, Copy, Debug)]
pub struct PageScaleAnimation {
    pub(crate) start_scale: f64,
    pub(crate) target_scale: f64,
    pub(crate) start_offset: Vec2,
    pub(crate) target_offset: Vec2,
    pub(crate) duration: Duration,
    pub(crate) start_time: Option<Timestamp>,
}

/// One interpolation step of a [`PageScaleAnimation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageScaleSample {
    /// The effective scale at this step.
    pub scale: f64,
    /// The total viewport offset at this step (content space).
    pub offset: Vec2,
    /// Whether the animation reached its target this step.
    pub finished: bool,
}

impl PageScaleAnimation {
    /// Samples the animation at `now`, capturing the start time on the first
    /// call. The final sample is exactly the target.
    pub fn sample(&mut self, now: Timestamp) -> PageScaleSample {
        let start_time = *self.start_time.get_or_insert(now);
        let t = now
            .saturating_duration_since(start_time)
            .fraction_of(self.duration);
        if t >= 1.0 {
            return PageScaleSample {
                scale: self.target_scale,
                offset: self.target_offset,
                finished: true,
            };
        }
        let e = ease_in_out(t);
        // Geometric in scale: equal time steps zoom by equal factors.
        let scale = self.start_scale * (self.target_scale / self.start_scale).powf(e);
        let offset = Vec2::new(
            crate::ease::lerp(self.start_offset.x, self.target_offset.x, e),
            crate::ease::lerp(self.start_offset.y, self.target_offset.y, e),
        );
        PageScaleSample {
            scale,
            offset,
            finished: false,
        }
    }
}
