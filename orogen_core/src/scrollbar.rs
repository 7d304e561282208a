// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay scrollbar fade driven by the scroll-delta stream.
//!
//! Scrollbars appear at full opacity the moment anything scrolls and stay
//! up for the rest of the gesture. When the gesture ends a fade-out is
//! scheduled after a delay and advanced by animate ticks; any new scroll
//! cancels it. Only opacity is modeled here — thickness easing is a visual
//! refinement that belongs to the embedder's scrollbar painting.

use crate::time::{Duration, Timestamp};

/// Fades overlay scrollbars out after scrolling stops.
#[derive(Debug)]
pub struct ScrollbarAnimationController {
    opacity: f64,
    fade_delay: Duration,
    fade_duration: Duration,
    /// Scheduled start of the fade, set when a gesture ends.
    fade_start: Option<Timestamp>,
}

impl ScrollbarAnimationController {
    /// Creates a controller with the given post-gesture delay and fade
    /// duration. Scrollbars start hidden.
    #[must_use]
    pub const fn new(fade_delay: Duration, fade_duration: Duration) -> Self {
        Self {
            opacity: 0.0,
            fade_delay,
            fade_duration,
            fade_start: None,
        }
    }

    /// Current scrollbar opacity in `[0, 1]`.
    #[inline]
    #[must_use]
    pub const fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Called for every applied scroll delta: show immediately, cancel any
    /// scheduled fade.
    pub const fn did_scroll_update(&mut self) {
        self.opacity = 1.0;
        self.fade_start = None;
    }

    /// Called when the gesture ends: schedule the fade.
    pub fn did_scroll_end(&mut self, now: Timestamp) {
        if self.opacity > 0.0 {
            self.fade_start = Some(now + self.fade_delay);
        }
    }

    /// Advances the fade. Returns `true` when the opacity changed.
    pub fn animate(&mut self, now: Timestamp) -> bool {
        let Some(start) = self.fade_start else {
            return false;
        };
        if now < start {
            return false;
        }
        let t = now
            .saturating_duration_since(start)
            .fraction_of(self.fade_duration);
        let new_opacity = 1.0 - t;
        let changed = new_opacity != self.opacity;
        self.opacity = new_opacity;
        if t >= 1.0 {
            self.opacity = 0.0;
            self.fade_start = None;
        }
        changed
    }

    /// When the controller next needs an animate tick: the scheduled fade
    /// start, or `None` when idle. A value in the past means "next frame".
    #[must_use]
    pub const fn wake_at(&self) -> Option<Timestamp> {
        self.fade_start
    }
}
