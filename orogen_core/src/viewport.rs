// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dual-viewport delta distribution.
//!
//! The inner (visual) and outer (layout) viewports act as a single scroller
//! with a perfect hand-off: content-space delta applies to the inner
//! viewport first and the exact remainder flows to the outer viewport, in
//! both directions. Physical (screen-space) deltas headed for the pair are
//! offered to the top controls first, then divided by the page-scale factor
//! — when zoomed in, a finger movement covers proportionally less content.
//!
//! Everything here takes and returns exact remainders; the conservation
//! property (applied + unused == requested) is what scroll bubbling and
//! overscroll accounting are built on.

use kurbo::Vec2;

use crate::compositor::Compositor;
use crate::layer::{INVALID, LayerTree, ViewportSlots};
use crate::scroll::ScrollTree;

/// Applies a content-space delta to the viewport pair, inner first, and
/// returns the unconsumed remainder.
pub(crate) fn scroll_content(
    tree: &mut LayerTree,
    scroll: &mut ScrollTree,
    vp: ViewportSlots,
    delta: Vec2,
) -> Vec2 {
    let mut remaining = delta;
    let applied = scroll.scroll_by(tree, vp.inner, remaining);
    if applied != Vec2::ZERO {
        tree.mark_scrolled(vp.inner);
    }
    remaining -= applied;
    if vp.outer != INVALID {
        let applied = scroll.scroll_by(tree, vp.outer, remaining);
        if applied != Vec2::ZERO {
            tree.mark_scrolled(vp.outer);
        }
        remaining -= applied;
    }
    remaining
}

impl Compositor {
    /// Combined inner+outer offset in content space. Zero without a
    /// viewport.
    #[must_use]
    pub fn viewport_total_offset(&self) -> Vec2 {
        let Some((_, scroll, vp)) = self.viewport_parts() else {
            return Vec2::ZERO;
        };
        let mut total = scroll.current_offset(vp.inner);
        if vp.outer != INVALID {
            total += scroll.current_offset(vp.outer);
        }
        total
    }

    /// Combined scrollable range of the pair at the current page scale.
    #[must_use]
    pub fn viewport_max_total_offset(&self) -> Vec2 {
        self.viewport_max_total_offset_at_scale(self.page_scale_factor())
    }

    /// Combined scrollable range of the pair as it would be at `scale`.
    pub(crate) fn viewport_max_total_offset_at_scale(&self, scale: f64) -> Vec2 {
        let Some((tree, scroll, vp)) = self.viewport_parts() else {
            return Vec2::ZERO;
        };
        let mut max = scroll.max_scroll_offset_at_scale(tree, vp.inner, scale);
        if vp.outer != INVALID {
            max += scroll.max_scroll_offset_at_scale(tree, vp.outer, scale);
        }
        max
    }

    /// Applies a content-space delta to the pair (inner first). Returns the
    /// unconsumed remainder; the full delta when there is no viewport.
    pub(crate) fn viewport_scroll_content(&mut self, delta: Vec2) -> Vec2 {
        let (Some(tree), Some(scroll)) = (&mut self.active_tree, &mut self.active_scroll) else {
            return delta;
        };
        let Some(vp) = tree.viewport() else {
            return delta;
        };
        scroll_content(tree, scroll, vp, delta)
    }

    /// Moves the pair to an absolute combined offset (clamped by
    /// construction, since it is applied as a delta through the pair).
    pub(crate) fn set_viewport_total_offset(&mut self, target: Vec2) {
        let current = self.viewport_total_offset();
        let _ = self.viewport_scroll_content(target - current);
    }

    /// Applies a physical (screen-space) delta to the pair: top controls
    /// consume vertical delta first (outside pinch), the rest converts by
    /// the page-scale factor and distributes inner-first. Returns the
    /// consumed portion in screen space.
    pub(crate) fn viewport_scroll_physical(&mut self, delta: Vec2) -> Vec2 {
        if self
            .active_tree
            .as_ref()
            .and_then(LayerTree::viewport)
            .is_none()
        {
            return Vec2::ZERO;
        }

        let mut pending = delta;
        let pinching = self.gesture.is_some_and(|g| g.pinching);
        if self.top_controls.affects_scroll() && !pinching && pending.y != 0.0 {
            let unconsumed = self.top_controls.scroll_by(pending.y);
            if unconsumed != pending.y {
                self.sync_top_controls_bounds_delta();
                self.requests.redraw = true;
            }
            pending.y = unconsumed;
        }

        let scale = self.page_scale_factor().max(f64::MIN_POSITIVE);
        let unused_content = self.viewport_scroll_content(pending / scale);
        let unused_screen = unused_content * scale;
        delta - unused_screen
    }

    fn viewport_parts(&self) -> Option<(&LayerTree, &ScrollTree, ViewportSlots)> {
        let tree = self.active_tree.as_ref()?;
        let scroll = self.active_scroll.as_ref()?;
        let vp = tree.viewport()?;
        Some((tree, scroll, vp))
    }
}
