// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-transform evaluation and change tracking.
//!
//! Evaluation drains the dirty channels and recomputes screen transforms for
//! affected layers in ascending slot order (parents precede children, so one
//! pass suffices). The result is a [`FrameChanges`] that tells the renderer
//! which layers moved and why:
//!
//! 1. **TRANSFORM** — local transforms or the page-scale factor changed;
//!    the subtree may need re-rasterization.
//! 2. **SCROLL** — a scroll offset moved the subtree; presentation can
//!    usually translate existing rasterization.
//! 3. **GEOMETRY** — a clip layer's bounds delta changed (top-controls
//!    movement); scrollable ranges shifted but transforms did not.
//!
//! [`FrameChanges`] carries raw slot indices so renderers index the tree's
//! arrays directly via the `*_at()` accessors.

use alloc::vec::Vec;

use crate::dirty;
use crate::scroll::ScrollTree;
use crate::transform::Transform3d;

use super::id::INVALID;
use super::tree::LayerTree;

/// The set of changes produced by a single [`LayerTree::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Slots whose screen transform changed for non-scroll reasons.
    pub transforms: Vec<u32>,
    /// Slots moved by scroll-offset changes.
    pub scrolled: Vec<u32>,
    /// Clip slots whose bounds delta changed.
    pub geometry: Vec<u32>,
    /// Whether this is the first evaluation of a freshly activated tree
    /// (renderers should rebuild rather than patch).
    pub tree_replaced: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.scrolled.clear();
        self.geometry.clear();
        self.tree_replaced = false;
    }

    /// True when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.scrolled.is_empty()
            && self.geometry.is_empty()
            && !self.tree_replaced
    }
}

impl LayerTree {
    /// Recomputes every screen transform from scratch.
    ///
    /// Used once after commit/activation so hit testing works before the
    /// first incremental evaluation; does not touch dirty state, which still
    /// reports the whole tree on the first [`evaluate`](Self::evaluate).
    pub fn prime_transforms(&mut self, scroll: &ScrollTree, page_scale: f64) {
        for slot in 0..self.len() {
            self.recompute_screen_transform(slot, scroll, page_scale);
        }
    }

    /// Drains dirty channels, recomputes affected screen transforms, and
    /// returns the change set.
    pub fn evaluate(&mut self, scroll: &ScrollTree, page_scale: f64) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(scroll, page_scale, &mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(
        &mut self,
        scroll: &ScrollTree,
        page_scale: f64,
        changes: &mut FrameChanges,
    ) {
        changes.clear();
        changes.tree_replaced = !self.evaluated_once;
        self.evaluated_once = true;

        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        let dirty_scrolls: Vec<u32> = self
            .dirty
            .drain(dirty::SCROLL)
            .affected()
            .deterministic()
            .run()
            .collect();

        // Union of both channels, parent-before-child.
        let mut recompute: Vec<u32> = dirty_transforms
            .iter()
            .chain(dirty_scrolls.iter())
            .copied()
            .collect();
        recompute.sort_unstable();
        recompute.dedup();
        for &slot in &recompute {
            self.recompute_screen_transform(slot, scroll, page_scale);
        }

        changes.transforms = dirty_transforms;
        changes.scrolled = dirty_scrolls;
        changes.geometry = self
            .dirty
            .drain(dirty::GEOMETRY)
            .deterministic()
            .run()
            .collect();
    }

    /// Recomputes one slot's screen transform from its parent's.
    ///
    /// The layer-local chunk is `T(position − scroll_offset) · T(origin) ·
    /// local · T(−origin)`, with the page-scale factor appended on the
    /// designated page-scale layer so the whole subtree (the scrollable
    /// content) inherits the zoom.
    fn recompute_screen_transform(&mut self, slot: u32, scroll: &ScrollTree, page_scale: f64) {
        let parent = self.parent[slot as usize];
        let parent_screen = if parent == INVALID {
            Transform3d::IDENTITY
        } else {
            self.screen_transform[parent as usize]
        };

        let pos = self.position[slot as usize];
        let offset = scroll.current_offset(slot);
        let mut t = parent_screen
            * Transform3d::from_translation(pos.x - offset.x, pos.y - offset.y, 0.0);

        let local = self.local_transform[slot as usize];
        if local != Transform3d::IDENTITY {
            let origin = self.transform_origin[slot as usize];
            if origin == kurbo::Point::ZERO {
                t = t * local;
            } else {
                t = t * Transform3d::from_translation(origin.x, origin.y, 0.0)
                    * local
                    * Transform3d::from_translation(-origin.x, -origin.y, 0.0);
            }
        }

        if let Some(vp) = self.viewport()
            && vp.page_scale == slot
        {
            t = t * Transform3d::from_scale(page_scale, page_scale, 1.0);
        }

        self.screen_transform[slot as usize] = t;
    }
}
