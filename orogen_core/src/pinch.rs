// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch-zoom gesture handling.
//!
//! A pinch multiplies the page-scale factor (clamped into the producer's
//! bounds) and simultaneously adjusts the viewport offset so the content
//! point under the gesture anchor stays put on screen. The adjustment is
//! solved in content space and distributed through the viewport pair like
//! any other viewport scroll, so overflow past the inner viewport lands on
//! the outer one.
//!
//! Anchors close to a viewport edge snap the offset hard to that edge
//! instead: pinching at the edge of the screen locks the content edge to
//! the screen edge, which reads as intentional on touch devices where the
//! anchor cannot comfortably reach the outermost pixels.
//!
//! Pinching rides on the regular gesture state: starting a pinch outside an
//! active scroll targets the inner viewport, and the pinch flag suppresses
//! both top-controls consumption and scroll-target switching until the
//! pinch ends. Page-scale changes always force a commit — the producer must
//! relayout for the new scale.

use kurbo::Point;

use crate::compositor::Compositor;
use crate::layer::LayerTree;
use crate::scroll::{DeviceClass, ScrollGesture};
use crate::trace::PinchUpdateEvent;

impl Compositor {
    /// Starts a pinch. Captures the current gesture target, or the inner
    /// viewport when nothing is scrolling. No-op without a viewport.
    pub fn pinch_begin(&mut self) {
        let Some(vp) = self.active_tree.as_ref().and_then(LayerTree::viewport) else {
            return;
        };
        match &mut self.gesture {
            Some(gesture) => gesture.pinching = true,
            None => {
                let mut gesture = ScrollGesture::new(vp.inner, DeviceClass::Touch);
                gesture.pinching = true;
                self.gesture = Some(gesture);
            }
        }
        self.emit(|s| s.on_pinch_begin());
    }

    /// Applies one pinch step: multiply the scale by `magnify`, keep the
    /// content under `anchor` fixed, and snap to edges inside the margin.
    pub fn pinch_update(&mut self, magnify: f64, anchor: Point) {
        if !self.gesture.is_some_and(|g| g.pinching) {
            return;
        }
        if self.active_tree.as_ref().and_then(LayerTree::viewport).is_none() {
            return;
        }

        let old_scale = self.page_scale.current();
        let new_scale = self.page_scale.apply_delta(magnify);
        if new_scale != old_scale {
            self.apply_page_scale_to_trees();
        }

        // Solve for the offset that keeps the anchor's content point fixed:
        // screen = (content − offset) · scale, so the offset moves by
        // anchor · (1/old − 1/new).
        if old_scale > 0.0 && new_scale > 0.0 && new_scale != old_scale {
            let adjust = anchor.to_vec2() * (1.0 / old_scale - 1.0 / new_scale);
            let _ = self.viewport_scroll_content(adjust);
        }

        self.snap_pinch_anchor_to_edges(anchor);
        self.requests.redraw = true;
        self.emit(|s| {
            s.on_pinch_update(&PinchUpdateEvent {
                factor: new_scale,
                anchor,
            });
        });
    }

    /// Ends the pinch, releasing the capture. The scale change is pushed
    /// back to the producer with a forced commit.
    pub fn pinch_end(&mut self) {
        let Some(gesture) = &mut self.gesture else {
            return;
        };
        if !gesture.pinching {
            return;
        }
        gesture.pinching = false;
        self.requests.commit = true;
        self.emit(|s| s.on_pinch_end());
    }

    fn snap_pinch_anchor_to_edges(&mut self, anchor: Point) {
        let margin = self.config.pinch_snap_margin;
        let viewport = self.device_viewport;
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let max = self.viewport_max_total_offset();
        let mut total = self.viewport_total_offset();
        let mut snapped = false;
        if anchor.x <= margin {
            total.x = 0.0;
            snapped = true;
        } else if anchor.x >= viewport.width - margin {
            total.x = max.x;
            snapped = true;
        }
        if anchor.y <= margin {
            total.y = 0.0;
            snapped = true;
        } else if anchor.y >= viewport.height - margin {
            total.y = max.y;
            snapped = true;
        }
        if snapped {
            self.set_viewport_total_offset(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Size, Vec2};

    use crate::config::CompositorConfig;
    use crate::layer::{LayerId, LayerInfo, TreeCommit, ViewportRoles};
    use crate::scroll::DeviceClass;

    use super::*;

    fn pinch_commit() -> TreeCommit {
        let mut clip = LayerInfo::new(LayerId(1), Point::ZERO, Size::new(50.0, 50.0));
        clip.draws_content = false;
        let mut scroller = LayerInfo::new(LayerId(2), Point::ZERO, Size::new(100.0, 100.0));
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

    fn compositor_with_margin(margin: f64) -> Compositor {
        let config = CompositorConfig {
            pinch_snap_margin: margin,
            ..CompositorConfig::desktop()
        };
        let mut c = Compositor::new(config);
        c.set_viewport_size(Size::new(50.0, 50.0));
        c.push_page_scale_from_main(1.0, 1.0, 4.0);
        c.commit(&pinch_commit());
        assert!(c.activate_pending());
        let _ = c.take_requests();
        c
    }

    fn inner_offset(c: &Compositor) -> Vec2 {
        let tree = c.active_tree().unwrap();
        let slot = tree.slot_of(LayerId(2)).unwrap();
        c.active_scroll_tree().unwrap().current_offset(slot)
    }

    #[test]
    fn pinch_anchor_stays_fixed_on_screen() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        c.pinch_update(2.0, Point::new(25.0, 25.0));

        assert_eq!(c.page_scale_factor(), 2.0);
        // offset = anchor · (1/1 − 1/2) = (12.5, 12.5); the content point
        // (25, 25) stays under the anchor: offset + anchor/scale = 25.
        assert_eq!(inner_offset(&c), Vec2::new(12.5, 12.5));
        let tree = c.active_tree().unwrap();
        let scroll = c.active_scroll_tree().unwrap();
        let slot = tree.slot_of(LayerId(2)).unwrap();
        assert_eq!(
            scroll.max_scroll_offset(tree, slot),
            Vec2::new(75.0, 75.0),
            "zoomed viewport covers less content"
        );
        c.pinch_end();
        assert!(c.take_requests().commit, "scale changes force a commit");
    }

    #[test]
    fn pinch_scale_clamps_at_bounds() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        c.pinch_update(10.0, Point::new(25.0, 25.0));
        assert_eq!(c.page_scale_factor(), 4.0, "clamped at max, not 10");
        c.pinch_end();

        c.pinch_begin();
        c.pinch_update(0.001, Point::new(25.0, 25.0));
        assert_eq!(c.page_scale_factor(), 1.0, "clamped at min");
        c.pinch_end();
    }

    #[test]
    fn pinch_at_min_produces_no_residual_scroll() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        c.pinch_update(0.1, Point::new(25.0, 25.0));
        assert_eq!(c.page_scale_factor(), 1.0);
        assert_eq!(inner_offset(&c), Vec2::ZERO, "no scale change, no scroll");
    }

    #[test]
    fn pinch_reports_multiplicative_delta() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        c.pinch_update(2.0, Point::new(25.0, 25.0));
        c.pinch_end();
        let deltas = c.process_scroll_deltas();
        assert!((deltas.page_scale_delta - 2.0).abs() < 1e-12);
        assert!((c.process_scroll_deltas().page_scale_delta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn anchor_near_edge_snaps_offset_to_edge() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        // Anchor hugs the left edge: x locks to 0 while y anchors normally.
        c.pinch_update(2.0, Point::new(2.0, 25.0));
        let offset = inner_offset(&c);
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.y, 12.5);
        c.pinch_end();

        c.pinch_begin();
        // Anchor hugs the bottom-right corner: both axes lock to max.
        c.pinch_update(2.0, Point::new(48.0, 48.0));
        let offset = inner_offset(&c);
        let max = c.viewport_max_total_offset();
        assert_eq!(offset, max);
    }

    #[test]
    fn pinch_without_begin_is_ignored() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_update(2.0, Point::new(25.0, 25.0));
        assert_eq!(c.page_scale_factor(), 1.0);
    }

    #[test]
    fn pinch_mid_scroll_keeps_the_gesture_target() {
        let mut c = compositor_with_margin(5.0);
        let _ = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        let target = c.currently_scrolling_layer();
        c.pinch_begin();
        c.pinch_update(1.5, Point::new(25.0, 25.0));
        c.pinch_end();
        assert_eq!(c.currently_scrolling_layer(), target);
        c.scroll_end();
        assert_eq!(c.currently_scrolling_layer(), None);
    }

    #[test]
    fn scroll_begin_mid_pinch_keeps_the_target() {
        let mut c = compositor_with_margin(5.0);
        c.pinch_begin();
        let target = c.currently_scrolling_layer();
        let r = c.scroll_begin(Point::new(10.0, 10.0), DeviceClass::Touch);
        assert!(r.is_started());
        assert_eq!(c.currently_scrolling_layer(), target);
    }

    #[test]
    fn pinch_without_viewport_is_noop() {
        let mut c = Compositor::new(CompositorConfig::desktop());
        c.pinch_begin();
        c.pinch_update(2.0, Point::new(10.0, 10.0));
        c.pinch_end();
        assert_eq!(c.page_scale_factor(), 1.0);
    }
}
