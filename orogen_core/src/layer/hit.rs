// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing against the evaluated tree.
//!
//! Slot order is paint order, so walking slots in descending order visits
//! layers front to back. A layer is hit when the gesture point, projected
//! through the inverse of its screen transform onto the layer plane, lands
//! inside its bounds; perspective-transformed layers use the full projective
//! inverse, and points that map behind the eye miss.

use kurbo::Point;

use super::id::INVALID;
use super::tree::LayerTree;

impl LayerTree {
    /// Maps a screen-space point into `slot`'s local coordinates.
    ///
    /// Returns `None` for non-invertible transforms or points that project
    /// behind the eye plane.
    #[must_use]
    pub fn local_point(&self, slot: u32, point: Point) -> Option<Point> {
        self.screen_transform[slot as usize]
            .inverse()?
            .project_point(point)
    }

    /// Whether the screen-space point falls inside `slot`'s content bounds.
    #[must_use]
    pub fn slot_contains(&self, slot: u32, point: Point) -> bool {
        let Some(local) = self.local_point(slot, point) else {
            return false;
        };
        let bounds = self.bounds[slot as usize];
        local.x >= 0.0 && local.x <= bounds.width && local.y >= 0.0 && local.y <= bounds.height
    }

    /// The topmost drawing layer at `point`, if any.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<u32> {
        for slot in (0..self.len()).rev() {
            if self.draws_content[slot as usize] && self.slot_contains(slot, point) {
                return Some(slot);
            }
        }
        None
    }

    /// The topmost *scroller* whose content contains `point`, regardless of
    /// whether it draws. Feeds the occlusion-ambiguity check in scroll
    /// dispatch.
    #[must_use]
    pub(crate) fn first_scroller_at(&self, point: Point) -> Option<u32> {
        for slot in (0..self.len()).rev() {
            if self.is_scroller(slot) && self.slot_contains(slot, point) {
                return Some(slot);
            }
        }
        None
    }

    /// Whether any layer's touch-handler region covers `point`.
    ///
    /// Touch handlers are honored regardless of `draws_content`; an invisible
    /// layer can still capture touches.
    #[must_use]
    pub fn touch_blocks_scroll_at(&self, point: Point) -> bool {
        for slot in (0..self.len()).rev() {
            let rects = &self.touch_region[slot as usize];
            if rects.is_empty() {
                continue;
            }
            if let Some(local) = self.local_point(slot, point)
                && rects.iter().any(|r| r.contains(local))
            {
                return true;
            }
        }
        false
    }

    /// Whether `point` falls in a non-fast-scrollable region of `slot`.
    #[must_use]
    pub(crate) fn in_non_fast_region(&self, slot: u32, point: Point) -> bool {
        let rects = &self.non_fast_region[slot as usize];
        if rects.is_empty() {
            return false;
        }
        match self.local_point(slot, point) {
            Some(local) => rects.iter().any(|r| r.contains(local)),
            None => false,
        }
    }

    /// Whether `ancestor` appears on the scroll chain at or above `slot`.
    pub(crate) fn scroll_chain_contains(&self, slot: u32, ancestor: u32) -> bool {
        let mut cur = if self.is_scroller(slot) {
            slot
        } else {
            self.scroll_ancestor[slot as usize]
        };
        let mut steps = 0;
        while cur != INVALID && steps <= self.len() {
            if cur == ancestor {
                return true;
            }
            cur = self.bubble_parent[cur as usize];
            steps += 1;
        }
        false
    }
}
