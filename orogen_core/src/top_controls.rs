// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top browser-chrome strip tracking.
//!
//! The top controls (URL bar and friends) occupy `height` device pixels and
//! slide off-screen as the user scrolls down. State is the continuous
//! `shown_ratio ∈ [0, 1]`; `content_top_offset = height · shown_ratio` is
//! the visible extent. Vertical scroll deltas headed for the inner viewport
//! are offered here first: positive (downward) delta hides the controls,
//! negative shows them, and only the unconsumed remainder reaches the scroll
//! tree.
//!
//! When a gesture ends mid-way, the controls settle to the nearer boundary
//! over a fixed eased duration, interrupted by any new scroll. The visible
//! extent feeds the inner viewport's clip bounds delta — committed clip
//! bounds assume fully-shown controls, and the clip grows by
//! `height − content_top_offset` as they hide.

use crate::ease::{ease_in_out, lerp};
use crate::time::{Duration, Timestamp};

/// External constraint on the controls' position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TopControlsConstraint {
    /// Pinned fully visible.
    Shown,
    /// Pinned fully hidden.
    Hidden,
    /// Free to move with scrolling.
    #[default]
    Both,
}

#[derive(Clone, Copy, Debug)]
struct SettleAnimation {
    start_ratio: f64,
    target_ratio: f64,
    /// Captured on the first animate tick after scheduling.
    start_time: Option<Timestamp>,
}

/// Tracks the show/hide ratio of the top controls.
#[derive(Debug)]
pub struct TopControlsManager {
    height: f64,
    shown_ratio: f64,
    sent_ratio: f64,
    constraint: TopControlsConstraint,
    settle_duration: Duration,
    animation: Option<SettleAnimation>,
}

impl TopControlsManager {
    /// Creates a manager for controls of the given height, initially fully
    /// shown.
    #[must_use]
    pub fn new(height: f64, settle_duration: Duration) -> Self {
        Self {
            height: height.max(0.0),
            shown_ratio: 1.0,
            sent_ratio: 1.0,
            constraint: TopControlsConstraint::Both,
            settle_duration,
            animation: None,
        }
    }

    /// The controls' full height in device pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The current shown ratio in `[0, 1]`.
    #[inline]
    #[must_use]
    pub const fn shown_ratio(&self) -> f64 {
        self.shown_ratio
    }

    /// The visible extent: `height · shown_ratio`.
    #[inline]
    #[must_use]
    pub fn content_top_offset(&self) -> f64 {
        self.height * self.shown_ratio
    }

    /// Whether the controls can absorb scroll delta at all.
    #[inline]
    #[must_use]
    pub fn affects_scroll(&self) -> bool {
        self.height > 0.0
    }

    /// Whether a settle animation is scheduled or running.
    #[inline]
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Externally sets the shown ratio (e.g. restored from the producer).
    pub fn set_shown_ratio(&mut self, ratio: f64) {
        self.shown_ratio = self.clamp_to_constraint(ratio);
        self.animation = None;
    }

    /// Changes the controls height, preserving the absolute visible extent
    /// where possible rather than the ratio. Shrinking the height to zero
    /// leaves the controls fully "shown" at zero extent, never negative.
    pub fn set_height(&mut self, height: f64) {
        let height = height.max(0.0);
        let offset = self.content_top_offset().clamp(0.0, height);
        self.height = height;
        self.shown_ratio = if height > 0.0 { offset / height } else { 1.0 };
    }

    /// Offers a vertical scroll delta (positive = scrolling down = hiding)
    /// and returns the unconsumed remainder.
    ///
    /// Interrupts any settle animation.
    pub fn scroll_by(&mut self, delta_y: f64) -> f64 {
        self.animation = None;
        if !self.affects_scroll() {
            return delta_y;
        }
        let (lo, hi) = self.permitted_offsets();
        let old = self.content_top_offset();
        let new = (old - delta_y).clamp(lo, hi);
        self.shown_ratio = new / self.height;
        delta_y - (old - new)
    }

    /// Called when the driving gesture ends: schedules a settle to the
    /// nearer boundary if the controls are partway.
    pub fn scroll_end(&mut self) {
        if self.shown_ratio > 0.0 && self.shown_ratio < 1.0 {
            let target = if self.shown_ratio >= 0.5 { 1.0 } else { 0.0 };
            self.start_settle(self.clamp_to_constraint(target));
        }
    }

    /// Applies an external constraint. With `animate` the controls ease to
    /// the constrained position; otherwise they snap.
    pub fn update_state(&mut self, constraint: TopControlsConstraint, animate: bool) {
        self.constraint = constraint;
        let target = match constraint {
            TopControlsConstraint::Shown => 1.0,
            TopControlsConstraint::Hidden => 0.0,
            TopControlsConstraint::Both => return,
        };
        if (self.shown_ratio - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        if animate {
            self.start_settle(target);
        } else {
            self.shown_ratio = target;
            self.animation = None;
        }
    }

    /// Advances the settle animation. Returns `true` when the ratio changed
    /// this tick.
    pub fn animate(&mut self, now: Timestamp) -> bool {
        let Some(anim) = &mut self.animation else {
            return false;
        };
        let start_time = *anim.start_time.get_or_insert(now);
        let t = now
            .saturating_duration_since(start_time)
            .fraction_of(self.settle_duration);
        let eased = ease_in_out(t);
        let new_ratio = lerp(anim.start_ratio, anim.target_ratio, eased);
        let changed = (new_ratio - self.shown_ratio).abs() > 0.0;
        self.shown_ratio = new_ratio;
        if t >= 1.0 {
            self.shown_ratio = anim.target_ratio;
            self.animation = None;
        }
        changed
    }

    /// The ratio change not yet reported to the producer.
    #[must_use]
    pub fn unsent_ratio_delta(&self) -> f64 {
        self.shown_ratio - self.sent_ratio
    }

    /// Marks the current ratio as reported.
    pub const fn mark_sent(&mut self) {
        self.sent_ratio = self.shown_ratio;
    }

    fn start_settle(&mut self, target: f64) {
        self.animation = Some(SettleAnimation {
            start_ratio: self.shown_ratio,
            target_ratio: target,
            start_time: None,
        });
    }

    fn permitted_offsets(&self) -> (f64, f64) {
        match self.constraint {
            TopControlsConstraint::Shown => (self.height, self.height),
            TopControlsConstraint::Hidden => (0.0, 0.0),
            TopControlsConstraint::Both => (0.0, self.height),
        }
    }

    fn clamp_to_constraint(&self, ratio: f64) -> f64 {
        match self.constraint {
            TopControlsConstraint::Shown => 1.0,
            TopControlsConstraint::Hidden => 0.0,
            TopControlsConstraint::Both => ratio.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TopControlsManager {
        TopControlsManager::new(50.0, Duration::from_millis(200))
    }

    #[test]
    fn downward_scroll_hides_before_passing_remainder() {
        let mut tc = manager();
        // 30 of 50 px absorbed leaves the controls at 20 px visible.
        assert_eq!(tc.scroll_by(30.0), 0.0);
        assert_eq!(tc.content_top_offset(), 20.0);
        // 20 more fully hides; 15 passes through.
        assert_eq!(tc.scroll_by(35.0), 15.0);
        assert_eq!(tc.shown_ratio(), 0.0);
        // Hidden controls consume nothing further downward.
        assert_eq!(tc.scroll_by(10.0), 10.0);
    }

    #[test]
    fn upward_scroll_shows_before_passing_remainder() {
        let mut tc = manager();
        let _ = tc.scroll_by(50.0);
        assert_eq!(tc.shown_ratio(), 0.0);
        assert_eq!(tc.scroll_by(-20.0), 0.0);
        assert_eq!(tc.content_top_offset(), 20.0);
        assert_eq!(tc.scroll_by(-40.0), -10.0);
        assert_eq!(tc.shown_ratio(), 1.0);
    }

    #[test]
    fn height_change_preserves_absolute_offset() {
        let mut tc = manager();
        let _ = tc.scroll_by(30.0); // offset 20
        tc.set_height(100.0);
        assert_eq!(tc.content_top_offset(), 20.0);
        assert_eq!(tc.shown_ratio(), 0.2);

        tc.set_height(10.0); // offset clamps to the new height
        assert_eq!(tc.content_top_offset(), 10.0);

        tc.set_height(0.0);
        assert_eq!(tc.content_top_offset(), 0.0);
        assert!(!tc.affects_scroll());
    }

    #[test]
    fn settle_snaps_to_nearer_boundary() {
        let mut tc = manager();
        let _ = tc.scroll_by(10.0); // ratio 0.8, nearer to shown
        tc.scroll_end();
        assert!(tc.is_animating());
        let _ = tc.animate(Timestamp(0));
        let changed = tc.animate(Timestamp(100_000));
        assert!(changed);
        let _ = tc.animate(Timestamp(250_000));
        assert_eq!(tc.shown_ratio(), 1.0);
        assert!(!tc.is_animating());
    }

    #[test]
    fn settle_toward_hidden_from_below_half() {
        let mut tc = manager();
        let _ = tc.scroll_by(40.0); // ratio 0.2
        tc.scroll_end();
        let _ = tc.animate(Timestamp(0));
        let _ = tc.animate(Timestamp(250_000));
        assert_eq!(tc.shown_ratio(), 0.0);
    }

    #[test]
    fn new_scroll_interrupts_settle() {
        let mut tc = manager();
        let _ = tc.scroll_by(10.0);
        tc.scroll_end();
        assert!(tc.is_animating());
        let _ = tc.scroll_by(5.0);
        assert!(!tc.is_animating(), "scrolling cancels the settle");
    }

    #[test]
    fn boundary_positions_do_not_settle() {
        let mut tc = manager();
        tc.scroll_end();
        assert!(!tc.is_animating());
        let _ = tc.scroll_by(100.0);
        tc.scroll_end();
        assert!(!tc.is_animating(), "fully hidden needs no settle");
    }

    #[test]
    fn shown_constraint_pins_and_snaps() {
        let mut tc = manager();
        let _ = tc.scroll_by(30.0);
        tc.update_state(TopControlsConstraint::Shown, false);
        assert_eq!(tc.shown_ratio(), 1.0);
        // Pinned: downward scroll consumes nothing.
        assert_eq!(tc.scroll_by(20.0), 20.0);
        assert_eq!(tc.shown_ratio(), 1.0);
    }

    #[test]
    fn hidden_constraint_animates_to_zero() {
        let mut tc = manager();
        tc.update_state(TopControlsConstraint::Hidden, true);
        assert!(tc.is_animating());
        let _ = tc.animate(Timestamp(0));
        let _ = tc.animate(Timestamp(300_000));
        assert_eq!(tc.shown_ratio(), 0.0);
    }

    #[test]
    fn ratio_delta_reporting_advances_baseline() {
        let mut tc = manager();
        let _ = tc.scroll_by(25.0); // ratio 0.5
        assert!((tc.unsent_ratio_delta() + 0.5).abs() < 1e-12);
        tc.mark_sent();
        assert_eq!(tc.unsent_ratio_delta(), 0.0);
    }
}
