// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-driving contract with the external scheduler.
//!
//! The engine never sleeps or polls a clock: an external scheduler delivers
//! begin-frame ticks as [`BeginFrameArgs`] and the engine answers with
//! [`FrameRequests`] — "redraw", "commit", "tick me again next frame", or
//! "wake me at time T". Each frame follows the fixed call sequence on
//! [`Compositor`](crate::compositor::Compositor):
//!
//! 1. [`will_begin_frame`](crate::compositor::Compositor::will_begin_frame)
//! 2. [`animate`](crate::compositor::Compositor::animate)
//! 3. [`update_animation_state`](crate::compositor::Compositor::update_animation_state)
//! 4. [`did_finish_frame`](crate::compositor::Compositor::did_finish_frame)
//!
//! and the scheduler drains [`take_requests`](crate::compositor::Compositor::take_requests)
//! afterwards to decide what to do next.

use crate::time::{Duration, Timestamp};

/// One begin-frame tick from the external scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeginFrameArgs {
    /// The time this frame represents; all animation sampling uses it.
    pub frame_time: Timestamp,
    /// Expected interval to the next frame.
    pub interval: Duration,
    /// Latest time by which the frame should be produced.
    pub deadline: Timestamp,
}

impl BeginFrameArgs {
    /// Creates args for a frame at `frame_time` with a 60 Hz interval.
    #[must_use]
    pub const fn at(frame_time: Timestamp) -> Self {
        let interval = Duration(16_667);
        Self {
            frame_time,
            interval,
            deadline: Timestamp(frame_time.0 + interval.0),
        }
    }
}

/// What the engine wants from the external scheduler.
///
/// Produced by [`take_requests`](crate::compositor::Compositor::take_requests),
/// which drains the accumulated flags. `wake_at` in the past (or `animate`
/// set) means "tick me next frame".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRequests {
    /// The current frame's presentation is stale; redraw.
    pub redraw: bool,
    /// State must be pushed back to the producer (a commit round-trip).
    pub commit: bool,
    /// An animation is running; deliver a begin-frame tick next frame.
    pub animate: bool,
    /// A timer-like wake is wanted at this time (scrollbar fade start).
    pub wake_at: Option<Timestamp>,
}

impl FrameRequests {
    /// True when nothing is requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.redraw && !self.commit && !self.animate && self.wake_at.is_none()
    }

    /// Folds another request set into this one, keeping the earliest wake.
    pub fn merge(&mut self, other: Self) {
        self.redraw |= other.redraw;
        self.commit |= other.commit;
        self.animate |= other.animate;
        self.wake_at = match (self.wake_at, other.wake_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(FrameRequests::default().is_empty());
    }

    #[test]
    fn merge_keeps_earliest_wake() {
        let mut a = FrameRequests {
            redraw: true,
            wake_at: Some(Timestamp(500)),
            ..FrameRequests::default()
        };
        a.merge(FrameRequests {
            commit: true,
            wake_at: Some(Timestamp(200)),
            ..FrameRequests::default()
        });
        assert!(a.redraw && a.commit);
        assert_eq!(a.wake_at, Some(Timestamp(200)));
    }

    #[test]
    fn begin_frame_args_at_fills_deadline() {
        let args = BeginFrameArgs::at(Timestamp(1_000));
        assert_eq!(args.deadline, Timestamp(17_667));
    }
}
