// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tree scroll offset storage and clamped application.
//!
//! The [`ScrollTree`] holds one [`ScrollOffset`] per layer slot plus the
//! runtime bounds deltas that top-controls movement applies to clip layers.
//! It lives beside a [`LayerTree`] (same slot indexing) and survives tree
//! swaps by [`adopt`](ScrollTree::adopt)ing local state onto the freshly
//! committed bases by stable layer id.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::layer::{INVALID, LayerId, LayerTree, TreeCommit};

use super::offset::ScrollOffset;

/// Scroll state for every layer of one committed tree.
#[derive(Debug)]
pub struct ScrollTree {
    offsets: Vec<ScrollOffset>,
    bounds_delta: Vec<Vec2>,
    page_scale: f64,
}

impl ScrollTree {
    /// Builds scroll state for a freshly committed tree, with bases taken
    /// from the committed scroll offsets.
    #[must_use]
    pub fn from_commit(commit: &TreeCommit) -> Self {
        Self {
            offsets: commit
                .layers
                .iter()
                .map(|info| ScrollOffset::with_base(info.scroll_offset))
                .collect(),
            bounds_delta: alloc::vec![Vec2::ZERO; commit.layers.len()],
            page_scale: 1.0,
        }
    }

    /// Carries unsent local deltas and bounds deltas over from the previous
    /// tree's scroll state, matching layers by stable id.
    ///
    /// Bases keep their freshly committed values; derived state (clamping)
    /// must be rebuilt by the caller *after* adopting, once bounds deltas are
    /// re-established (clamping against stale bounds would destroy deltas).
    pub fn adopt(&mut self, old: &Self, old_tree: &LayerTree, tree: &LayerTree) {
        for slot in 0..tree.len() {
            let id = tree.id_at(slot);
            if let Some(old_slot) = old_tree.slot_of(id) {
                self.offsets[slot as usize].carry_from(&old.offsets[old_slot as usize]);
                self.bounds_delta[slot as usize] = old.bounds_delta[old_slot as usize];
            }
        }
        self.page_scale = old.page_scale;
    }

    /// The page-scale factor used when sizing the inner viewport's clip.
    #[inline]
    #[must_use]
    pub const fn page_scale(&self) -> f64 {
        self.page_scale
    }

    /// Updates the page-scale factor consumed by
    /// [`max_scroll_offset`](Self::max_scroll_offset).
    pub const fn set_page_scale(&mut self, factor: f64) {
        self.page_scale = factor;
    }

    /// The effective scroll position of the layer at `slot`.
    #[inline]
    #[must_use]
    pub fn current_offset(&self, slot: u32) -> Vec2 {
        self.offsets[slot as usize].current()
    }

    /// Direct access to a slot's offset record.
    #[inline]
    #[must_use]
    pub fn offset_at(&self, slot: u32) -> &ScrollOffset {
        &self.offsets[slot as usize]
    }

    /// The runtime bounds delta of the clip layer at `slot`.
    #[inline]
    #[must_use]
    pub fn bounds_delta_at(&self, slot: u32) -> Vec2 {
        self.bounds_delta[slot as usize]
    }

    /// Sets the runtime bounds delta of the clip layer at `slot`.
    pub fn set_bounds_delta(&mut self, slot: u32, delta: Vec2) {
        self.bounds_delta[slot as usize] = delta;
    }

    /// Replaces the committed base offset for `id`, leaving local deltas
    /// untouched. Unknown ids are a silent no-op.
    ///
    /// Returns `true` when a base was updated.
    pub fn update_base(&mut self, tree: &LayerTree, id: LayerId, offset: Vec2) -> bool {
        let Some(slot) = tree.slot_of(id) else {
            return false;
        };
        self.offsets[slot as usize].set_base(offset);
        let max = self.max_scroll_offset(tree, slot);
        self.offsets[slot as usize].clamp_current(max);
        true
    }

    /// The scrollable range of the scroller at `slot`: content bounds minus
    /// effective clip bounds, never negative.
    ///
    /// The effective clip is the clip layer's committed bounds plus its
    /// runtime bounds delta; for the inner viewport the clip additionally
    /// shrinks by the page-scale factor, since the visual viewport covers
    /// less content when zoomed in. Recomputed on every call — a resize or
    /// bounds-delta change mid-gesture is picked up immediately and a
    /// transiently negative range clamps to zero.
    #[must_use]
    pub fn max_scroll_offset(&self, tree: &LayerTree, slot: u32) -> Vec2 {
        self.max_scroll_offset_at_scale(tree, slot, self.page_scale)
    }

    /// Like [`max_scroll_offset`](Self::max_scroll_offset), but as it would
    /// be at an explicit page-scale factor (used to resolve animation
    /// targets against their final ranges).
    #[must_use]
    pub fn max_scroll_offset_at_scale(&self, tree: &LayerTree, slot: u32, scale: f64) -> Vec2 {
        let clip = tree.scroll_clip[slot as usize];
        if clip == INVALID {
            return Vec2::ZERO;
        }
        let bd = self.bounds_delta[clip as usize];
        let mut clip_size = Size::new(
            tree.bounds[clip as usize].width + bd.x,
            tree.bounds[clip as usize].height + bd.y,
        );
        let is_inner = tree.viewport().is_some_and(|vp| vp.inner == slot);
        if is_inner && scale > 0.0 {
            clip_size.width /= scale;
            clip_size.height /= scale;
        }
        let bounds = tree.bounds[slot as usize];
        Vec2::new(
            (bounds.width - clip_size.width).max(0.0),
            (bounds.height - clip_size.height).max(0.0),
        )
    }

    /// Whether a user gesture can move the scroller at `slot` on at least
    /// one permitted axis.
    #[must_use]
    pub fn is_user_scrollable(&self, tree: &LayerTree, slot: u32) -> bool {
        if !tree.is_scroller(slot) {
            return false;
        }
        let max = self.max_scroll_offset(tree, slot);
        (tree.user_scrollable_x[slot as usize] && max.x > 0.0)
            || (tree.user_scrollable_y[slot as usize] && max.y > 0.0)
    }

    /// Applies `delta` to the scroller at `slot`, clamping the resulting
    /// offset into `[0, max]` per axis, and returns the portion actually
    /// applied. Axes without user permission apply nothing; non-scrollers
    /// apply nothing.
    ///
    /// The unapplied remainder (`delta - applied`) is what bubbles to the
    /// next scroller in the chain.
    pub fn scroll_by(&mut self, tree: &LayerTree, slot: u32, delta: Vec2) -> Vec2 {
        if !tree.is_scroller(slot) {
            return Vec2::ZERO;
        }
        let max = self.max_scroll_offset(tree, slot);
        let cur = self.offsets[slot as usize].current();
        let target = Vec2::new(
            if tree.user_scrollable_x[slot as usize] {
                (cur.x + delta.x).clamp(0.0, max.x)
            } else {
                cur.x
            },
            if tree.user_scrollable_y[slot as usize] {
                (cur.y + delta.y).clamp(0.0, max.y)
            } else {
                cur.y
            },
        );
        let applied = target - cur;
        self.offsets[slot as usize].apply(applied);
        applied
    }

    /// Re-clamps every scroller's offset into its current range.
    ///
    /// Called after activation and after bounds-delta changes, in that order
    /// (offsets first, derived state second) so nothing clamps against stale
    /// bounds.
    pub fn clamp_all(&mut self, tree: &LayerTree) {
        for slot in 0..tree.len() {
            if tree.is_scroller(slot) {
                let max = self.max_scroll_offset(tree, slot);
                self.offsets[slot as usize].clamp_current(max);
            }
        }
    }

    /// Drains the unsent scroll deltas: every layer with a non-zero unsent
    /// delta is reported once and its sent baseline advances. Offsets and
    /// deltas themselves are untouched, so repeated collection with no
    /// intervening scrolling yields nothing.
    #[must_use]
    pub fn collect_deltas(&mut self, tree: &LayerTree) -> Vec<(LayerId, Vec2)> {
        let mut out = Vec::new();
        for slot in 0..tree.len() {
            let unsent = self.offsets[slot as usize].unsent();
            if unsent != Vec2::ZERO {
                out.push((tree.id_at(slot), unsent));
                self.offsets[slot as usize].mark_sent();
            }
        }
        out
    }
}
