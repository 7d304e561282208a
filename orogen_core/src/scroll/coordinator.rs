// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture dispatch and delta bubbling.
//!
//! `scroll_begin` resolves which layer a gesture targets: hit-test the drawn
//! layers front to back, then walk the precomputed scroll chain outward to
//! the nearest ancestor that can actually move (or that moves drawn
//! descendants). Resolution failures are statuses, not errors — the caller
//! re-dispatches to the producer thread for `OnMainThread`/`Unknown` and
//! drops the gesture for `Ignored`.
//!
//! `scroll_by` converts the screen-space delta into each scroller's local
//! space through the inverse of its screen transform (rotation and
//! perspective included; the page-scale division falls out of the transform
//! for layers inside the scaled subtree), applies what fits, and bubbles the
//! exact remainder outward. The viewport pair terminates every chain it
//! appears on: top controls first, then inner, then outer. Whatever the pair
//! rejects is overscroll, accumulated per axis with a reset on real
//! movement.

use kurbo::{Point, Vec2};

use crate::compositor::Compositor;
use crate::layer::{INVALID, LayerId, LayerTree};
use crate::trace::{ScrollBeginEvent, ScrollEndEvent, ScrollUpdateEvent};

use super::types::{DeviceClass, ScrollBeginResult, ScrollGesture, ScrollReason, ScrollResult};

/// Deltas below this many device pixels are dust from inverse-transform
/// round trips and are dropped rather than bubbled.
const SCROLL_EPSILON: f64 = 0.01;

fn trim(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.abs() < SCROLL_EPSILON { 0.0 } else { v.x },
        if v.y.abs() < SCROLL_EPSILON { 0.0 } else { v.y },
    )
}

impl Compositor {
    /// Starts a scroll gesture at `point`. Any previous gesture is
    /// implicitly ended and any smooth scroll aborted. While a pinch is in
    /// flight the existing target is kept — pinching locks the viewport pair
    /// and re-targeting mid-gesture would make the anchor math lie.
    pub fn scroll_begin(&mut self, point: Point, device: DeviceClass) -> ScrollBeginResult {
        if self.gesture.is_some_and(|g| g.pinching) {
            return ScrollBeginResult::STARTED;
        }
        self.gesture = None;
        self.abort_scroll_animation(false);
        let result = match self.resolve_scroll_target(point) {
            Ok(slot) => {
                self.gesture = Some(ScrollGesture::new(slot, device));
                ScrollBeginResult::STARTED
            }
            Err(result) => result,
        };
        self.emit(|s| {
            s.on_scroll_begin(&ScrollBeginEvent {
                result,
                device,
                point,
            });
        });
        result
    }

    /// Starts a gesture targeting the inner viewport directly, skipping hit
    /// testing (synthetic and programmatic scrolls).
    pub fn root_scroll_begin(&mut self, device: DeviceClass) -> ScrollBeginResult {
        if self.gesture.is_some_and(|g| g.pinching) {
            return ScrollBeginResult::STARTED;
        }
        self.gesture = None;
        self.abort_scroll_animation(false);
        let result = match self.active_tree.as_ref().and_then(LayerTree::viewport) {
            Some(vp) => {
                self.gesture = Some(ScrollGesture::new(vp.inner, device));
                ScrollBeginResult::STARTED
            }
            None => ScrollBeginResult::IGNORED,
        };
        self.emit(|s| {
            s.on_scroll_begin(&ScrollBeginEvent {
                result,
                device,
                point: Point::ZERO,
            });
        });
        result
    }

    /// Continues the current gesture as a fling. Requires a target to
    /// already be scrolling.
    pub fn fling_scroll_begin(&mut self) -> ScrollBeginResult {
        if self.gesture.is_some() {
            ScrollBeginResult::STARTED
        } else {
            ScrollBeginResult::IGNORED
        }
    }

    /// Applies a screen-space delta for the in-flight gesture.
    pub fn scroll_by(&mut self, point: Point, delta: Vec2) -> ScrollResult {
        let mut result = ScrollResult::default();
        let Some(gesture) = self.gesture else {
            return result;
        };
        let (viewport, len) = match &self.active_tree {
            Some(tree) => (tree.viewport(), tree.len()),
            None => return result,
        };

        let mut remaining = delta;
        let mut slot = gesture.target;
        let mut reached_viewport = false;
        let mut did_scroll = false;
        let mut steps = 0;
        while slot != INVALID && steps <= len {
            steps += 1;
            let is_viewport = viewport.is_some_and(|vp| slot == vp.inner || slot == vp.outer);
            if is_viewport {
                // The pair (plus top controls) terminates the chain.
                reached_viewport = true;
                let consumed = self.viewport_scroll_physical(remaining);
                if consumed != Vec2::ZERO {
                    did_scroll = true;
                }
                remaining = trim(remaining - consumed);
                break;
            }
            let applied = self.apply_screen_delta_at(slot, point, remaining);
            if applied != Vec2::ZERO {
                did_scroll = true;
            }
            remaining = trim(remaining - applied);
            if remaining == Vec2::ZERO {
                break;
            }
            if gesture.device == DeviceClass::NonBubblingGesture {
                break;
            }
            slot = match &self.active_tree {
                Some(tree) => tree.bubble_parent[slot as usize],
                None => INVALID,
            };
        }

        let mut gesture = self.gesture.expect("gesture checked above");
        gesture.scrolled |= did_scroll;

        if reached_viewport {
            // Overscroll is a viewport-level concept: an interior scroller
            // hitting its limit without bubbling here reports nothing.
            let applied_total = delta - remaining;
            let mut unused = remaining;
            if applied_total.x != 0.0 {
                let old = gesture.accumulated_overscroll.x;
                gesture.accumulated_overscroll.x = 0.0;
                if unused.x * old < 0.0 {
                    unused.x = 0.0;
                }
            }
            if applied_total.y != 0.0 {
                let old = gesture.accumulated_overscroll.y;
                gesture.accumulated_overscroll.y = 0.0;
                if unused.y * old < 0.0 {
                    unused.y = 0.0;
                }
            }
            gesture.accumulated_overscroll += unused;
            result.did_overscroll_root = unused != Vec2::ZERO;
            result.accumulated_root_overscroll = gesture.accumulated_overscroll;
        }
        self.gesture = Some(gesture);

        result.did_scroll = did_scroll;
        result.unused_delta = remaining;
        if did_scroll {
            self.requests.redraw = true;
            self.scrollbars.did_scroll_update();
        }
        self.emit(|s| {
            s.on_scroll_update(&ScrollUpdateEvent {
                requested: delta,
                unused: result.unused_delta,
                accumulated_overscroll: result.accumulated_root_overscroll,
            });
        });
        result
    }

    /// Ends the in-flight gesture: requests a commit if anything scrolled
    /// and kicks the top-controls settle and scrollbar fade.
    pub fn scroll_end(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if gesture.scrolled {
            self.requests.commit = true;
        }
        self.top_controls.scroll_end();
        if self.top_controls.is_animating() {
            self.requests.animate = true;
        }
        self.scrollbars.did_scroll_end(self.last_frame_time);
        self.emit(|s| {
            s.on_scroll_end(&ScrollEndEvent {
                did_scroll: gesture.scrolled,
            });
        });
    }

    // -- Queries ------------------------------------------------------------

    /// The stable id of the currently scrolling layer, if a gesture is in
    /// flight.
    #[must_use]
    pub fn currently_scrolling_layer(&self) -> Option<LayerId> {
        let gesture = self.gesture?;
        Some(self.active_tree.as_ref()?.id_at(gesture.target))
    }

    /// Whether a gesture at `point` would target the layer that is already
    /// scrolling. The viewport pair counts as one target for bubbling
    /// devices; a non-bubbling gesture must match the exact layer.
    #[must_use]
    pub fn is_currently_scrolling_layer_at(&self, point: Point, device: DeviceClass) -> bool {
        let Some(gesture) = self.gesture else {
            return false;
        };
        let Ok(slot) = self.resolve_scroll_target(point) else {
            return false;
        };
        if slot == gesture.target {
            return true;
        }
        if device == DeviceClass::NonBubblingGesture {
            return false;
        }
        match self.active_tree.as_ref().and_then(LayerTree::viewport) {
            Some(vp) => {
                let in_pair = |s: u32| s == vp.inner || s == vp.outer;
                in_pair(slot) && in_pair(gesture.target)
            }
            None => false,
        }
    }

    /// Whether touch events at `point` must be consulted before scrolling.
    #[must_use]
    pub fn do_touch_events_block_scroll_at(&self, point: Point) -> bool {
        self.active_tree
            .as_ref()
            .is_some_and(|tree| tree.touch_blocks_scroll_at(point))
    }

    // -- Resolution ---------------------------------------------------------

    /// Resolves the scroller a gesture at `point` should target, or the
    /// dispatch failure to report.
    fn resolve_scroll_target(&self, point: Point) -> Result<u32, ScrollBeginResult> {
        let (Some(tree), Some(scroll)) = (&self.active_tree, &self.active_scroll) else {
            return Err(ScrollBeginResult::IGNORED);
        };
        let Some(hit) = tree.hit_test(point) else {
            return Err(ScrollBeginResult::IGNORED);
        };

        // Nearest ancestor (hit node included) that a user gesture can move
        // and whose movement is visible: it draws itself or moves drawn
        // descendants.
        let mut candidate = if tree.is_scroller(hit) {
            hit
        } else {
            tree.scroll_ancestor[hit as usize]
        };
        let mut found = INVALID;
        let mut steps = 0;
        while candidate != INVALID && steps <= tree.len() {
            steps += 1;
            if scroll.is_user_scrollable(tree, candidate)
                && (tree.draws_content[candidate as usize]
                    || tree.has_drawn_scroll_descendant[candidate as usize])
            {
                found = candidate;
                break;
            }
            candidate = tree.bubble_parent[candidate as usize];
        }
        if found == INVALID {
            return Err(ScrollBeginResult::IGNORED);
        }

        // Another scroller painted over the hit point that is not on the hit
        // node's own chain makes the resolution ambiguous: stacking order
        // must be consulted with knowledge this engine does not have.
        if let Some(occluder) = tree.first_scroller_at(point)
            && occluder != found
            && !tree.scroll_chain_contains(hit, occluder)
        {
            return Err(ScrollBeginResult::UNKNOWN);
        }

        // Declared main-thread reasons anywhere from the hit node up to and
        // including the resolved scroller force the producer thread.
        let mut cur = hit;
        let mut steps = 0;
        loop {
            let mask = tree.main_thread_reasons[cur as usize];
            if mask != 0 {
                return Err(ScrollBeginResult::main_thread(
                    ScrollReason::MainThreadReasons(mask),
                ));
            }
            if cur == found {
                break;
            }
            cur = tree.effective_parent(cur);
            steps += 1;
            if cur == INVALID || steps > tree.len() {
                break;
            }
        }

        if tree.in_non_fast_region(found, point) {
            return Err(ScrollBeginResult::main_thread(
                ScrollReason::NonFastScrollableRegion,
            ));
        }

        Ok(found)
    }

    /// Converts `delta` into `slot`'s local space, applies it, and returns
    /// the applied portion mapped back to screen space.
    fn apply_screen_delta_at(&mut self, slot: u32, point: Point, delta: Vec2) -> Vec2 {
        let (Some(tree), Some(scroll)) = (&mut self.active_tree, &mut self.active_scroll) else {
            return Vec2::ZERO;
        };
        let screen = tree.screen_transform_at(slot);
        let Some(inverse) = screen.inverse() else {
            return Vec2::ZERO;
        };
        let Some(local_point) = inverse.project_point(point) else {
            return Vec2::ZERO;
        };
        let Some(local_delta) = inverse.project_delta(point, delta) else {
            return Vec2::ZERO;
        };
        let applied_local = scroll.scroll_by(tree, slot, local_delta);
        if applied_local == Vec2::ZERO {
            return Vec2::ZERO;
        }
        tree.mark_scrolled(slot);
        screen
            .project_delta(local_point, applied_local)
            .unwrap_or(applied_local)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Point, Rect, Size};

    use crate::compositor::Compositor;
    use crate::config::CompositorConfig;
    use crate::layer::{LayerId, LayerInfo, TreeCommit, ViewportRoles, reason};
    use crate::scroll::{ScrollReason, ScrollStatus};
    use crate::time::Duration;
    use crate::timing::{BeginFrameArgs, FrameRequests};
    use crate::transform::Transform3d;

    use super::*;

    fn viewport_commit(content: Size) -> TreeCommit {
        let mut clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        clip.draws_content = false;
        let mut scroller = LayerInfo::new(LayerId(2), Point::ZERO, content);
        scroller.parent = Some(LayerId(1));
        scroller.scroll_clip = Some(LayerId(1));
        TreeCommit {
            layers: vec![clip, scroller],
            viewport: Some(ViewportRoles {
                inner: LayerId(2),
                outer: None,
                page_scale: Some(LayerId(2)),
            }),
        }
    }

    fn activated(commit: &TreeCommit) -> Compositor {
        let mut c = Compositor::new(CompositorConfig::desktop());
        c.set_viewport_size(Size::new(50.0, 50.0));
        c.commit(commit);
        assert!(c.activate_pending());
        let _ = c.take_requests();
        c
    }

    fn offset_of(c: &Compositor, id: u32) -> Vec2 {
        let tree = c.active_tree().unwrap();
        let slot = tree.slot_of(LayerId(id)).unwrap();
        c.active_scroll_tree().unwrap().current_offset(slot)
    }

    // -- Dispatch statuses --------------------------------------------------

    #[test]
    fn scroll_begin_misses_empty_space() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let r = c.scroll_begin(Point::new(500.0, 500.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::Ignored);
        assert_eq!(r.reason, ScrollReason::NoScrollingLayer);
    }

    #[test]
    fn scroll_begin_without_tree_is_ignored() {
        let mut c = Compositor::new(CompositorConfig::desktop());
        let r = c.scroll_begin(Point::new(1.0, 1.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::Ignored);
    }

    #[test]
    fn unscrollable_content_is_ignored() {
        // Content no larger than the clip: zero range everywhere.
        let mut c = activated(&viewport_commit(Size::new(50.0, 50.0)));
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::Ignored);
    }

    #[test]
    fn main_thread_reason_on_hit_layer_redirects() {
        let mut commit = viewport_commit(Size::new(100.0, 100.0));
        commit.layers[1].main_thread_scrolling_reasons = reason::BACKGROUND_ATTACHMENT_FIXED;
        let mut c = activated(&commit);
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::OnMainThread);
        assert_eq!(
            r.reason,
            ScrollReason::MainThreadReasons(reason::BACKGROUND_ATTACHMENT_FIXED)
        );
        assert_eq!(c.currently_scrolling_layer(), None);
    }

    #[test]
    fn non_fast_region_redirects_only_inside() {
        let mut commit = viewport_commit(Size::new(100.0, 100.0));
        commit.layers[1].non_fast_scrollable_region = vec![Rect::new(0.0, 0.0, 20.0, 20.0)];
        let mut c = activated(&commit);

        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::OnMainThread);
        assert_eq!(r.reason, ScrollReason::NonFastScrollableRegion);

        let r = c.scroll_begin(Point::new(40.0, 40.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::OnImplThread);
    }

    #[test]
    fn occluding_sibling_scroller_is_ambiguous() {
        // A drawn scroller, with an invisible sibling scroller stacked on
        // top of the same point but on an unrelated scroll chain.
        let mut clip_a = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        clip_a.draws_content = false;
        let mut scroller_a = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(100.0, 100.0));
        scroller_a.parent = Some(LayerId(1));
        scroller_a.scroll_clip = Some(LayerId(1));
        let mut clip_b = LayerInfo::new(LayerId(3), Point::ZERO, Size::new(40.0, 40.0));
        clip_b.draws_content = false;
        let mut scroller_b = LayerInfo::new(LayerId(4), Point::ZERO, Size::new(90.0, 90.0));
        scroller_b.parent = Some(LayerId(3));
        scroller_b.scroll_clip = Some(LayerId(3));
        scroller_b.draws_content = false;
        let commit = TreeCommit {
            layers: vec![clip_a, scroller_a, clip_b, scroller_b],
            viewport: None,
        };
        let mut c = activated(&commit);
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::Unknown);
        assert_eq!(r.reason, ScrollReason::FailedHitTest);
    }

    #[test]
    fn invisible_scroller_with_drawn_child_accepts_gestures() {
        let mut clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        clip.draws_content = false;
        let mut scroller = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(100.0, 100.0));
        scroller.parent = Some(LayerId(1));
        scroller.scroll_clip = Some(LayerId(1));
        scroller.draws_content = false;
        let mut child = LayerInfo::new(LayerId(3), Point::ZERO, Size::new(100.0, 100.0));
        child.parent = Some(LayerId(2));
        let commit = TreeCommit {
            layers: vec![clip, scroller, child],
            viewport: None,
        };
        let mut c = activated(&commit);
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        assert!(r.is_started());
        assert_eq!(c.currently_scrolling_layer(), Some(LayerId(2)));
    }

    #[test]
    fn root_scroll_begin_skips_hit_testing() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let r = c.root_scroll_begin(DeviceClass::Wheel);
        assert!(r.is_started());
        assert_eq!(c.currently_scrolling_layer(), Some(LayerId(2)));

        let mut empty = Compositor::new(CompositorConfig::desktop());
        assert_eq!(
            empty.root_scroll_begin(DeviceClass::Wheel).status,
            ScrollStatus::Ignored
        );
    }

    #[test]
    fn fling_requires_active_target() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        assert_eq!(c.fling_scroll_begin().status, ScrollStatus::Ignored);
        let _ = c.root_scroll_begin(DeviceClass::Touch);
        assert!(c.fling_scroll_begin().is_started());
        c.scroll_end();
        assert_eq!(c.fling_scroll_begin().status, ScrollStatus::Ignored);
    }

    // -- P1/P2: clamping and bubbling conservation --------------------------

    #[test]
    fn bubbling_distributes_exactly_and_overscrolls_the_rest() {
        // Viewport (capacity 50) ← mid (capacity 30) ← leaf (capacity 20).
        let mut vp_clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        vp_clip.draws_content = false;
        let mut vp = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(100.0, 100.0));
        vp.parent = Some(LayerId(1));
        vp.scroll_clip = Some(LayerId(1));
        let mut mid_clip = LayerInfo::new(LayerId(3), Point::ZERO, Size::new(50.0, 50.0));
        mid_clip.parent = Some(LayerId(2));
        mid_clip.draws_content = false;
        let mut mid = LayerInfo::new(LayerId(4), Point::ZERO, Size::new(80.0, 80.0));
        mid.parent = Some(LayerId(3));
        mid.scroll_clip = Some(LayerId(3));
        let mut leaf_clip = LayerInfo::new(LayerId(5), Point::ZERO, Size::new(50.0, 50.0));
        leaf_clip.parent = Some(LayerId(4));
        leaf_clip.draws_content = false;
        let mut leaf = LayerInfo::new(LayerId(6), Point::ZERO, Size::new(70.0, 70.0));
        leaf.parent = Some(LayerId(5));
        leaf.scroll_clip = Some(LayerId(5));
        let commit = TreeCommit {
            layers: vec![vp_clip, vp, mid_clip, mid, leaf_clip, leaf],
            viewport: Some(ViewportRoles {
                inner: LayerId(2),
                outer: None,
                page_scale: None,
            }),
        };
        let mut c = activated(&commit);

        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Wheel);
        assert!(r.is_started());
        assert_eq!(c.currently_scrolling_layer(), Some(LayerId(6)));

        // 20 + 30 + 50 capacity, 25 extra.
        let result = c.scroll_by(Point::new(10.0, 10.0), Vec2::new(0.0, 125.0));
        assert!(result.did_scroll);
        assert_eq!(offset_of(&c, 6).y, 20.0);
        assert_eq!(offset_of(&c, 4).y, 30.0);
        assert_eq!(offset_of(&c, 2).y, 50.0);
        assert_eq!(result.unused_delta.y, 25.0, "distributed + unused == requested");
        assert!(result.did_overscroll_root);
        assert_eq!(result.accumulated_root_overscroll.y, 25.0);
    }

    #[test]
    fn interior_scroller_at_limit_reports_no_root_overscroll() {
        // Leaf chain that never reaches a viewport: no overscroll reported.
        let mut clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        clip.draws_content = false;
        let mut scroller = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(70.0, 70.0));
        scroller.parent = Some(LayerId(1));
        scroller.scroll_clip = Some(LayerId(1));
        let commit = TreeCommit {
            layers: vec![clip, scroller],
            viewport: None,
        };
        let mut c = activated(&commit);
        let _ = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        let result = c.scroll_by(Point::new(10.0, 10.0), Vec2::new(0.0, 100.0));
        assert!(result.did_scroll);
        assert_eq!(result.unused_delta.y, 80.0);
        assert!(!result.did_overscroll_root);
        assert_eq!(result.accumulated_root_overscroll, Vec2::ZERO);
    }

    // -- P3: overscroll reset -----------------------------------------------

    #[test]
    fn in_bounds_scroll_resets_overscroll_axis() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let _ = c.root_scroll_begin(DeviceClass::Touch);

        // Fill to the bottom, then push past it.
        let _ = c.scroll_by(Point::ZERO, Vec2::new(0.0, 50.0));
        let r = c.scroll_by(Point::ZERO, Vec2::new(0.0, 10.0));
        assert!(r.did_overscroll_root);
        assert_eq!(r.accumulated_root_overscroll, Vec2::new(0.0, 10.0));

        // Scrolling back up moves content and fully clears the axis, even
        // though the request exceeds the available travel.
        let r = c.scroll_by(Point::ZERO, Vec2::new(0.0, -60.0));
        assert!(r.did_scroll);
        assert_eq!(offset_of(&c, 2).y, 0.0);
        assert_eq!(
            r.accumulated_root_overscroll,
            Vec2::ZERO,
            "movement clears the axis; the opposite-direction residue is dropped"
        );
    }

    #[test]
    fn overscroll_axes_are_independent() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let _ = c.root_scroll_begin(DeviceClass::Touch);
        let _ = c.scroll_by(Point::ZERO, Vec2::new(0.0, 50.0));
        let r = c.scroll_by(Point::ZERO, Vec2::new(0.0, 10.0));
        assert_eq!(r.accumulated_root_overscroll, Vec2::new(0.0, 10.0));

        // In-bounds x movement leaves the y accumulation alone.
        let r = c.scroll_by(Point::ZERO, Vec2::new(20.0, 0.0));
        assert!(r.did_scroll);
        assert_eq!(r.accumulated_root_overscroll, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn same_direction_overscroll_keeps_accumulating() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let _ = c.root_scroll_begin(DeviceClass::Touch);
        let _ = c.scroll_by(Point::ZERO, Vec2::new(0.0, 50.0));
        let _ = c.scroll_by(Point::ZERO, Vec2::new(0.0, 10.0));
        let r = c.scroll_by(Point::ZERO, Vec2::new(0.0, 15.0));
        assert_eq!(r.accumulated_root_overscroll, Vec2::new(0.0, 25.0));
        assert!(r.did_overscroll_root);
    }

    // -- P4: non-bubbling isolation ------------------------------------------

    #[test]
    fn non_bubbling_gesture_never_moves_ancestors() {
        // Child scroller with 2px of travel inside the viewport.
        let mut vp_clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        vp_clip.draws_content = false;
        let mut vp = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(100.0, 100.0));
        vp.parent = Some(LayerId(1));
        vp.scroll_clip = Some(LayerId(1));
        let mut child_clip = LayerInfo::new(LayerId(3), Point::ZERO, Size::new(50.0, 50.0));
        child_clip.parent = Some(LayerId(2));
        child_clip.draws_content = false;
        let mut child = LayerInfo::new(LayerId(4), Point::ZERO, Size::new(50.0, 52.0));
        child.parent = Some(LayerId(3));
        child.scroll_clip = Some(LayerId(3));
        let commit = TreeCommit {
            layers: vec![vp_clip, vp, child_clip, child],
            viewport: Some(ViewportRoles {
                inner: LayerId(2),
                outer: None,
                page_scale: None,
            }),
        };
        let mut c = activated(&commit);

        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::NonBubblingGesture);
        assert!(r.is_started());
        let result = c.scroll_by(Point::new(10.0, 10.0), Vec2::new(0.0, 10.0));
        assert!(result.did_scroll);
        assert_eq!(offset_of(&c, 4).y, 2.0, "child exhausts its 2px of travel");
        assert_eq!(offset_of(&c, 2).y, 0.0, "the viewport must not move");
        assert_eq!(result.unused_delta.y, 8.0);
        assert!(!result.did_overscroll_root);
        c.scroll_end();

        // A bubbling gesture from the same point now reaches the viewport.
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        assert!(r.is_started());
        let result = c.scroll_by(Point::new(10.0, 10.0), Vec2::new(0.0, 10.0));
        assert!(result.did_scroll);
        assert_eq!(offset_of(&c, 4).y, 2.0, "child is already at its limit");
        assert_eq!(offset_of(&c, 2).y, 10.0, "delta bubbles to the viewport");
    }

    // -- P7: viewport pair hand-off at scale ---------------------------------

    #[test]
    fn viewport_pair_hand_off_with_page_scale() {
        let mut c = crate::viewport::tests::dual_viewport_compositor();
        c.push_page_scale_from_main(2.0, 0.5, 4.0);
        let _ = c.take_requests();

        let r = c.root_scroll_begin(DeviceClass::Touch);
        assert!(r.is_started());

        let result = c.scroll_by(Point::ZERO, Vec2::new(10.0, 20.0));
        assert!(result.did_scroll);
        assert_eq!(offset_of(&c, 2), Vec2::new(5.0, 10.0), "page-scale adjusted");
        assert_eq!(offset_of(&c, 4), Vec2::ZERO, "outer untouched");

        // A big follow-up fills the inner viewport (max 75 at 2×) and hands
        // the exact remainder to the outer.
        let result = c.scroll_by(Point::ZERO, Vec2::new(300.0, 300.0));
        assert!(result.did_scroll);
        assert_eq!(offset_of(&c, 2), Vec2::new(75.0, 75.0));
        assert_eq!(offset_of(&c, 4), Vec2::new(80.0, 85.0));
        assert!(!result.did_overscroll_root, "the pair absorbed everything");

        // Topping up the outer's remaining 15 (30 screen px at 2×) leaves
        // the rest as overscroll.
        let result = c.scroll_by(Point::ZERO, Vec2::new(0.0, 100.0));
        assert!(result.did_scroll);
        assert!(result.did_overscroll_root);
        assert_eq!(offset_of(&c, 4), Vec2::new(80.0, 100.0));
        assert_eq!(result.unused_delta, Vec2::new(0.0, 70.0));
    }

    // -- P8: top controls coupling -------------------------------------------

    #[test]
    fn top_controls_consume_before_content() {
        let config = CompositorConfig {
            top_controls_height: 50.0,
            ..CompositorConfig::mobile()
        };
        let mut c = Compositor::new(config);
        c.set_viewport_size(Size::new(50.0, 50.0));
        c.commit(&viewport_commit(Size::new(200.0, 200.0)));
        assert!(c.activate_pending());
        let _ = c.take_requests();

        let _ = c.root_scroll_begin(DeviceClass::Touch);

        // 30 of the 50px controls height: content stays put.
        let result = c.scroll_by(Point::ZERO, Vec2::new(0.0, 30.0));
        assert!(result.did_scroll);
        assert_eq!(c.top_controls().content_top_offset(), 20.0);
        assert_eq!(offset_of(&c, 2), Vec2::ZERO);

        // The residue hides the controls; the rest moves content exactly.
        let result = c.scroll_by(Point::ZERO, Vec2::new(0.0, 60.0));
        assert!(result.did_scroll);
        assert_eq!(c.top_controls().shown_ratio(), 0.0);
        assert_eq!(offset_of(&c, 2), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn hiding_controls_grows_the_viewport_clip() {
        let config = CompositorConfig {
            top_controls_height: 50.0,
            ..CompositorConfig::mobile()
        };
        let mut c = Compositor::new(config);
        c.set_viewport_size(Size::new(50.0, 50.0));
        c.commit(&viewport_commit(Size::new(200.0, 200.0)));
        assert!(c.activate_pending());

        let tree = c.active_tree().unwrap();
        let scroll = c.active_scroll_tree().unwrap();
        let inner = tree.slot_of(LayerId(2)).unwrap();
        assert_eq!(scroll.max_scroll_offset(tree, inner).y, 150.0);

        let _ = c.root_scroll_begin(DeviceClass::Touch);
        let _ = c.scroll_by(Point::ZERO, Vec2::new(0.0, 50.0));
        let tree = c.active_tree().unwrap();
        let scroll = c.active_scroll_tree().unwrap();
        assert_eq!(
            scroll.max_scroll_offset(tree, inner).y,
            100.0,
            "hidden controls grow the clip by their height"
        );
    }

    // -- P10: end-to-end request accounting ----------------------------------

    #[test]
    fn scroll_root_requests_redraw_and_commit_once() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));

        let r = c.scroll_begin(Point::ZERO, DeviceClass::Wheel);
        assert_eq!(r.status, ScrollStatus::OnImplThread);
        assert_eq!(r.reason, ScrollReason::NotScrollingOnMain);

        let result = c.scroll_by(Point::ZERO, Vec2::new(0.0, 10.0));
        assert!(result.did_scroll);
        c.scroll_end();

        let requests = c.take_requests();
        assert!(requests.redraw, "scrolling requests a redraw");
        assert!(requests.commit, "ending a scrolled gesture requests a commit");
        assert_eq!(c.take_requests(), FrameRequests::default());
    }

    #[test]
    fn unscrolled_gesture_requests_nothing() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        let _ = c.root_scroll_begin(DeviceClass::Wheel);
        let result = c.scroll_by(Point::ZERO, Vec2::new(0.0, -10.0));
        assert!(!result.did_scroll, "already at the top");
        c.scroll_end();
        let requests = c.take_requests();
        assert!(!requests.commit);
    }

    // -- Transformed scrollers ----------------------------------------------

    #[test]
    fn rotated_scroller_scrolls_along_local_axes() {
        // Scroller rotated 90°: a vertical screen drag maps to the layer's
        // x axis.
        let mut clip = LayerInfo::new(LayerId(1), Point::new(0.0, 0.0), Size::new(50.0, 50.0));
        clip.draws_content = false;
        let mut scroller = LayerInfo::new(LayerId(2), Point::new(50.0, 0.0), Size::new(100.0, 50.0));
        scroller.parent = Some(LayerId(1));
        scroller.scroll_clip = Some(LayerId(1));
        scroller.transform = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2);
        let commit = TreeCommit {
            layers: vec![clip, scroller],
            viewport: None,
        };
        let mut c = activated(&commit);

        let point = Point::new(25.0, 25.0);
        let r = c.scroll_begin(point, DeviceClass::Touch);
        assert!(r.is_started());
        let result = c.scroll_by(point, Vec2::new(0.0, 10.0));
        assert!(result.did_scroll);
        let offset = offset_of(&c, 2);
        assert!((offset.x - 10.0).abs() < 1e-9, "got {offset:?}");
        assert!(offset.y.abs() < 1e-9);
    }

    // -- Query surface -------------------------------------------------------

    #[test]
    fn currently_scrolling_queries_track_the_gesture() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        assert_eq!(c.currently_scrolling_layer(), None);
        let _ = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        assert_eq!(c.currently_scrolling_layer(), Some(LayerId(2)));
        assert!(c.is_currently_scrolling_layer_at(Point::new(20.0, 20.0), DeviceClass::Touch));
        assert!(!c.is_currently_scrolling_layer_at(Point::new(500.0, 500.0), DeviceClass::Touch));
        c.scroll_end();
        assert_eq!(c.currently_scrolling_layer(), None);
    }

    #[test]
    fn touch_regions_answer_block_queries() {
        let mut commit = viewport_commit(Size::new(100.0, 100.0));
        commit.layers[1].touch_handler_region = vec![Rect::new(0.0, 0.0, 25.0, 25.0)];
        let c = activated(&commit);
        assert!(c.do_touch_events_block_scroll_at(Point::new(10.0, 10.0)));
        assert!(!c.do_touch_events_block_scroll_at(Point::new(40.0, 40.0)));
    }

    #[test]
    fn scroll_begin_aborts_smooth_scroll() {
        let mut c = activated(&viewport_commit(Size::new(100.0, 100.0)));
        assert!(c.scroll_animated(Vec2::new(0.0, 30.0), Duration::from_millis(100)));
        c.will_begin_frame(BeginFrameArgs::at(crate::time::Timestamp(0)));
        c.animate();
        c.did_finish_frame();

        let _ = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        assert!(!c.has_scroll_animation(), "user input aborts the animation");
    }
}
