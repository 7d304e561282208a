// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll dispatch statuses and gesture bookkeeping.

use kurbo::Vec2;

/// The input device class driving a gesture.
///
/// Bubbling behavior differs by class: wheel and touch scrolls hand
/// unconsumed delta to ancestor scrollers, while a non-bubbling gesture
/// (e.g. an autoscroll captured by one element) never leaves the node it
/// started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    /// Mouse wheel or trackpad.
    Wheel,
    /// Touch pan.
    Touch,
    /// A gesture bound to its start target; never bubbles.
    NonBubblingGesture,
}

/// Where a scroll gesture will be handled.
///
/// These are returned values, not errors: every variant is a legitimate
/// dispatch outcome the caller routes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollStatus {
    /// Nothing scrollable at the point; the gesture is dropped.
    Ignored,
    /// This engine handles the gesture.
    OnImplThread,
    /// The gesture must be re-dispatched on the producer thread.
    OnMainThread,
    /// Hit testing was ambiguous; the producer must re-resolve with full
    /// stacking knowledge.
    Unknown,
}

/// Why a [`ScrollStatus`] was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollReason {
    /// No scrollable layer anywhere above the hit point.
    NoScrollingLayer,
    /// Handled here; nothing forces the producer thread.
    NotScrollingOnMain,
    /// An occluding scroller made the hit ambiguous.
    FailedHitTest,
    /// The start point falls in a non-fast-scrollable region.
    NonFastScrollableRegion,
    /// A layer declared main-thread scrolling reasons (the
    /// [`reason`](crate::layer::reason) bitmask).
    MainThreadReasons(u8),
}

/// The outcome of a scroll-begin dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollBeginResult {
    /// Where the gesture will be handled.
    pub status: ScrollStatus,
    /// Why.
    pub reason: ScrollReason,
}

impl ScrollBeginResult {
    pub(crate) const IGNORED: Self = Self {
        status: ScrollStatus::Ignored,
        reason: ScrollReason::NoScrollingLayer,
    };

    pub(crate) const STARTED: Self = Self {
        status: ScrollStatus::OnImplThread,
        reason: ScrollReason::NotScrollingOnMain,
    };

    pub(crate) const UNKNOWN: Self = Self {
        status: ScrollStatus::Unknown,
        reason: ScrollReason::FailedHitTest,
    };

    pub(crate) const fn main_thread(reason: ScrollReason) -> Self {
        Self {
            status: ScrollStatus::OnMainThread,
            reason,
        }
    }

    /// True when this engine took the gesture.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.status == ScrollStatus::OnImplThread
    }
}

/// The outcome of one scroll-delta application.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollResult {
    /// Some layer moved.
    pub did_scroll: bool,
    /// Unconsumed delta reached the viewport this step.
    pub did_overscroll_root: bool,
    /// The screen-space delta no scroller consumed.
    pub unused_delta: Vec2,
    /// Running per-axis overscroll at the viewport since the gesture began.
    pub accumulated_root_overscroll: Vec2,
}

/// The single in-flight gesture.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScrollGesture {
    /// Slot of the currently scrolling layer in the active tree.
    pub(crate) target: u32,
    pub(crate) device: DeviceClass,
    pub(crate) accumulated_overscroll: Vec2,
    pub(crate) pinching: bool,
    /// Whether any delta was actually applied during this gesture.
    pub(crate) scrolled: bool,
}

impl ScrollGesture {
    pub(crate) const fn new(target: u32, device: DeviceClass) -> Self {
        Self {
            target,
            device,
            accumulated_overscroll: Vec2::ZERO,
            pinching: false,
            scrolled: false,
        }
    }
}
