// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for one committed layer tree.
//!
//! A [`LayerTree`] is built whole from a [`TreeCommit`] and is immutable in
//! topology afterwards; the only runtime mutations are the evaluated screen
//! transforms and the dirty marks that drive them. Slot order is commit
//! order, which is paint order (back to front) with parents before children,
//! so ascending-slot iteration is always parent-before-child and descending
//! iteration is front-to-back hit-test order.
//!
//! Scroll linkage is precomputed at build time: each slot knows its nearest
//! scrolling ancestor and each scroller knows the next scroller outward (the
//! bubble chain), with `scroll_parent` overrides already folded in and cycles
//! broken. Scroll-time bubbling is a plain index walk.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::transform::Transform3d;

use super::id::{INVALID, LayerId, SurfaceId};
use super::info::{TreeCommit, ViewportRoles};

/// The viewport roles of a tree, resolved to slot indices.
///
/// `outer` and `page_scale` are [`INVALID`] when the commit did not register
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSlots {
    /// Inner (visual) viewport scroller slot.
    pub inner: u32,
    /// Outer (layout) viewport scroller slot, or [`INVALID`].
    pub outer: u32,
    /// Page-scale layer slot, or [`INVALID`].
    pub page_scale: u32,
}

/// One committed layer tree in struct-of-arrays layout.
#[derive(Debug)]
pub struct LayerTree {
    pub(crate) generation: u64,

    // -- Committed properties (parallel by slot) --
    pub(crate) ids: Vec<LayerId>,
    pub(crate) parent: Vec<u32>,
    pub(crate) position: Vec<Point>,
    pub(crate) bounds: Vec<Size>,
    pub(crate) local_transform: Vec<Transform3d>,
    pub(crate) transform_origin: Vec<Point>,
    pub(crate) scroll_clip: Vec<u32>,
    pub(crate) scroll_parent: Vec<u32>,
    pub(crate) draws_content: Vec<bool>,
    pub(crate) content: Vec<Option<SurfaceId>>,
    pub(crate) user_scrollable_x: Vec<bool>,
    pub(crate) user_scrollable_y: Vec<bool>,
    pub(crate) main_thread_reasons: Vec<u8>,
    pub(crate) non_fast_region: Vec<Vec<Rect>>,
    pub(crate) touch_region: Vec<Vec<Rect>>,

    // -- Derived at build --
    index: BTreeMap<u32, u32>,
    pub(crate) scroll_ancestor: Vec<u32>,
    pub(crate) bubble_parent: Vec<u32>,
    pub(crate) has_drawn_scroll_descendant: Vec<bool>,
    pub(crate) in_page_scale_subtree: Vec<bool>,
    viewport: Option<ViewportSlots>,

    // -- Evaluated --
    pub(crate) screen_transform: Vec<Transform3d>,
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) evaluated_once: bool,
}

impl LayerTree {
    /// Builds a tree from a commit payload.
    ///
    /// Parent references must point at earlier records; unknown or forward
    /// parent ids degrade to "no parent" rather than failing the commit.
    /// `generation` distinguishes successive commits for renderers and
    /// diagnostics.
    #[must_use]
    pub fn from_commit(commit: &TreeCommit, generation: u64) -> Self {
        let n = commit.layers.len();
        let mut tree = Self {
            generation,
            ids: Vec::with_capacity(n),
            parent: Vec::with_capacity(n),
            position: Vec::with_capacity(n),
            bounds: Vec::with_capacity(n),
            local_transform: Vec::with_capacity(n),
            transform_origin: Vec::with_capacity(n),
            scroll_clip: Vec::with_capacity(n),
            scroll_parent: Vec::with_capacity(n),
            draws_content: Vec::with_capacity(n),
            content: Vec::with_capacity(n),
            user_scrollable_x: Vec::with_capacity(n),
            user_scrollable_y: Vec::with_capacity(n),
            main_thread_reasons: Vec::with_capacity(n),
            non_fast_region: Vec::with_capacity(n),
            touch_region: Vec::with_capacity(n),
            index: BTreeMap::new(),
            scroll_ancestor: Vec::new(),
            bubble_parent: Vec::new(),
            has_drawn_scroll_descendant: Vec::new(),
            in_page_scale_subtree: Vec::new(),
            viewport: None,
            screen_transform: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            evaluated_once: false,
        };

        // Pass 1: committed fields and the id index.
        for (slot, info) in commit.layers.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "layer counts fit in u32; slots index parallel arrays"
            )]
            let slot = slot as u32;
            tree.ids.push(info.id);
            tree.index.entry(info.id.0).or_insert(slot);
            tree.position.push(info.position);
            tree.bounds.push(info.bounds);
            tree.local_transform.push(info.transform);
            tree.transform_origin.push(info.transform_origin);
            tree.draws_content.push(info.draws_content);
            tree.content.push(info.content);
            tree.user_scrollable_x.push(info.user_scrollable_horizontal);
            tree.user_scrollable_y.push(info.user_scrollable_vertical);
            tree.main_thread_reasons
                .push(info.main_thread_scrolling_reasons);
            tree.non_fast_region
                .push(info.non_fast_scrollable_region.clone());
            tree.touch_region.push(info.touch_handler_region.clone());
        }

        // Pass 2: resolve id references to slots. Parents must be earlier
        // records; scroll_parent may legitimately point at a sibling
        // committed later, so it resolves against the full index.
        for (slot, info) in commit.layers.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "layer counts fit in u32"
            )]
            let slot = slot as u32;
            let parent = info
                .parent
                .and_then(|id| tree.slot_of(id))
                .filter(|&p| p < slot)
                .unwrap_or(INVALID);
            tree.parent.push(parent);
            tree.scroll_clip
                .push(info.scroll_clip.and_then(|id| tree.slot_of(id)).unwrap_or(INVALID));
            tree.scroll_parent.push(
                info.scroll_parent
                    .and_then(|id| tree.slot_of(id))
                    .filter(|&s| s != slot)
                    .unwrap_or(INVALID),
            );
        }

        tree.viewport = commit.viewport.and_then(|roles| tree.resolve_viewport(roles));
        tree.build_scroll_linkage();

        // Dirty plumbing: inherited channels follow the visual parent, and
        // everything starts dirty so the first evaluation reports the whole
        // tree to the renderer.
        for slot in 0..tree.len() {
            let p = tree.parent[slot as usize];
            if p != INVALID {
                let _ = tree.dirty.add_dependency(slot, p, dirty::TRANSFORM);
                let _ = tree.dirty.add_dependency(slot, p, dirty::SCROLL);
            }
            tree.dirty.mark(slot, dirty::TRANSFORM);
        }

        tree.screen_transform = alloc::vec![Transform3d::IDENTITY; n];
        tree
    }

    fn resolve_viewport(&self, roles: ViewportRoles) -> Option<ViewportSlots> {
        let inner = self.slot_of(roles.inner)?;
        Some(ViewportSlots {
            inner,
            outer: roles
                .outer
                .and_then(|id| self.slot_of(id))
                .unwrap_or(INVALID),
            page_scale: roles
                .page_scale
                .and_then(|id| self.slot_of(id))
                .unwrap_or(INVALID),
        })
    }

    /// Precomputes scroll ancestors, bubble parents, the drawn-descendant
    /// flags, and page-scale subtree membership.
    fn build_scroll_linkage(&mut self) {
        let n = self.len();
        self.scroll_ancestor = alloc::vec![INVALID; n as usize];
        self.bubble_parent = alloc::vec![INVALID; n as usize];
        self.has_drawn_scroll_descendant = alloc::vec![false; n as usize];
        self.in_page_scale_subtree = alloc::vec![false; n as usize];

        for slot in 0..n {
            let ancestor = self.nearest_scroller_above(slot);
            self.scroll_ancestor[slot as usize] = ancestor;
        }
        for slot in 0..n {
            if self.is_scroller(slot) {
                self.bubble_parent[slot as usize] = self.scroll_ancestor[slot as usize];
            }
        }

        // A scroller "has a drawn descendant" when some drawing layer moves
        // with it; this is what lets an invisible scroller accept gestures.
        for slot in 0..n {
            if !self.draws_content[slot as usize] {
                continue;
            }
            let mut scroller = if self.is_scroller(slot) {
                slot
            } else {
                self.scroll_ancestor[slot as usize]
            };
            let mut steps = 0;
            while scroller != INVALID && steps <= n {
                self.has_drawn_scroll_descendant[scroller as usize] = true;
                scroller = self.bubble_parent[scroller as usize];
                steps += 1;
            }
        }

        if let Some(vp) = self.viewport
            && vp.page_scale != INVALID
        {
            for slot in 0..n {
                let p = self.parent[slot as usize];
                self.in_page_scale_subtree[slot as usize] = slot == vp.page_scale
                    || (p != INVALID && self.in_page_scale_subtree[p as usize]);
            }
        }
    }

    /// Nearest scroller strictly above `slot`, following `scroll_parent`
    /// overrides in place of the visual parent. Bounded by tree size, so
    /// override cycles terminate as "no ancestor".
    fn nearest_scroller_above(&self, slot: u32) -> u32 {
        let mut cur = self.effective_parent(slot);
        let mut steps = 0;
        while cur != INVALID && steps <= self.len() {
            if self.is_scroller(cur) {
                return cur;
            }
            cur = self.effective_parent(cur);
            steps += 1;
        }
        INVALID
    }

    /// The parent used for scroll chaining: the `scroll_parent` override when
    /// present, the visual parent otherwise.
    #[inline]
    pub(crate) fn effective_parent(&self, slot: u32) -> u32 {
        let override_slot = self.scroll_parent[slot as usize];
        if override_slot != INVALID {
            override_slot
        } else {
            self.parent[slot as usize]
        }
    }

    // -- Queries --

    /// Number of layers in the tree.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "layer counts fit in u32")]
    pub fn len(&self) -> u32 {
        self.ids.len() as u32
    }

    /// Returns `true` for a tree with no layers.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The commit generation this tree was built from.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves a stable layer id to its slot in this tree.
    #[inline]
    #[must_use]
    pub fn slot_of(&self, id: LayerId) -> Option<u32> {
        self.index.get(&id.0).copied()
    }

    /// The stable id of the layer at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    #[inline]
    #[must_use]
    pub fn id_at(&self, slot: u32) -> LayerId {
        self.ids[slot as usize]
    }

    /// The viewport roles resolved to slots, if this tree registered any.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Option<ViewportSlots> {
        self.viewport
    }

    /// Whether the layer at `slot` is a scroller (has a scroll clip).
    #[inline]
    #[must_use]
    pub fn is_scroller(&self, slot: u32) -> bool {
        self.scroll_clip[slot as usize] != INVALID
    }

    /// The content bounds of the layer at `slot`.
    #[inline]
    #[must_use]
    pub fn bounds_at(&self, slot: u32) -> Size {
        self.bounds[slot as usize]
    }

    /// The surface presented by the layer at `slot`, if any.
    #[inline]
    #[must_use]
    pub fn content_at(&self, slot: u32) -> Option<SurfaceId> {
        self.content[slot as usize]
    }

    /// Whether the layer at `slot` draws content.
    #[inline]
    #[must_use]
    pub fn draws_content_at(&self, slot: u32) -> bool {
        self.draws_content[slot as usize]
    }

    /// The evaluated screen transform of the layer at `slot`.
    ///
    /// Only meaningful after [`evaluate`](Self::evaluate) (or the initial
    /// transform priming done by the compositor on activation).
    #[inline]
    #[must_use]
    pub fn screen_transform_at(&self, slot: u32) -> Transform3d {
        self.screen_transform[slot as usize]
    }

    // -- Dirty marking --

    /// Marks `slot` and its subtree as moved by scrolling.
    pub fn mark_scrolled(&mut self, slot: u32) {
        self.dirty.mark_with(slot, dirty::SCROLL, &EagerPolicy);
    }

    /// Marks `slot` and its subtree as needing transform recomputation.
    pub(crate) fn mark_transform(&mut self, slot: u32) {
        self.dirty.mark_with(slot, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Marks a clip layer's geometry (bounds delta) as changed.
    pub(crate) fn mark_geometry(&mut self, slot: u32) {
        self.dirty.mark(slot, dirty::GEOMETRY);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use kurbo::Vec2;

    use crate::layer::{LayerId, LayerInfo, TreeCommit};

    use super::*;

    fn layer(id: u32) -> LayerInfo {
        LayerInfo::new(LayerId(id), Point::ZERO, Size::new(100.0, 100.0))
    }

    fn child_of(id: u32, parent: u32) -> LayerInfo {
        let mut info = layer(id);
        info.parent = Some(LayerId(parent));
        info
    }

    fn scroller_of(id: u32, parent: u32, clip: u32) -> LayerInfo {
        let mut info = child_of(id, parent);
        info.scroll_clip = Some(LayerId(clip));
        info
    }

    #[test]
    fn slots_follow_commit_order() {
        let commit = TreeCommit {
            layers: vec![layer(7), child_of(3, 7), child_of(9, 3)],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 1);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.id_at(0), LayerId(7));
        assert_eq!(tree.slot_of(LayerId(9)), Some(2));
        assert_eq!(tree.parent, vec![INVALID, 0, 1]);
    }

    #[test]
    fn forward_parent_reference_degrades_to_root() {
        let mut bad = layer(1);
        bad.parent = Some(LayerId(2)); // committed later
        let commit = TreeCommit {
            layers: vec![bad, layer(2)],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert_eq!(tree.parent[0], INVALID);
    }

    #[test]
    fn scroll_linkage_walks_nested_scrollers() {
        // root clip
        //   outer scroller (clip = root)
        //     inner clip
        //       inner scroller (clip = inner clip)
        //         content
        let commit = TreeCommit {
            layers: vec![
                layer(1),
                scroller_of(2, 1, 1),
                child_of(3, 2),
                scroller_of(4, 3, 3),
                child_of(5, 4),
            ],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert!(tree.is_scroller(1));
        assert!(tree.is_scroller(3));
        assert_eq!(tree.scroll_ancestor[4], 3, "content bubbles to inner");
        assert_eq!(tree.bubble_parent[3], 1, "inner bubbles to outer");
        assert_eq!(tree.bubble_parent[1], INVALID);
    }

    #[test]
    fn scroll_parent_override_redirects_chain() {
        // Sibling scrollers: node 4 visually nests under 3 but scrolls with 2.
        let commit = TreeCommit {
            layers: vec![
                layer(1),
                scroller_of(2, 1, 1),
                scroller_of(3, 1, 1),
                {
                    let mut info = child_of(4, 3);
                    info.scroll_parent = Some(LayerId(2));
                    info
                },
            ],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert_eq!(tree.scroll_ancestor[3], 1, "override wins over nesting");
    }

    #[test]
    fn scroll_parent_cycle_terminates() {
        let commit = TreeCommit {
            layers: vec![
                {
                    let mut info = layer(1);
                    info.scroll_parent = Some(LayerId(2));
                    info
                },
                {
                    let mut info = layer(2);
                    info.scroll_parent = Some(LayerId(1));
                    info
                },
            ],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert_eq!(tree.scroll_ancestor[0], INVALID);
        assert_eq!(tree.scroll_ancestor[1], INVALID);
    }

    #[test]
    fn drawn_descendants_mark_invisible_scrollers() {
        let commit = TreeCommit {
            layers: vec![
                layer(1),
                {
                    let mut info = scroller_of(2, 1, 1);
                    info.draws_content = false;
                    info
                },
                child_of(3, 2),
            ],
            viewport: None,
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert!(
            tree.has_drawn_scroll_descendant[1],
            "drawing child marks the invisible scroller"
        );
    }

    #[test]
    fn page_scale_subtree_membership() {
        use crate::layer::ViewportRoles;
        let commit = TreeCommit {
            layers: vec![
                layer(1),
                child_of(2, 1), // page scale
                scroller_of(3, 2, 1),
                child_of(4, 3),
                child_of(5, 1), // outside the page-scale subtree
            ],
            viewport: Some(ViewportRoles {
                inner: LayerId(3),
                outer: None,
                page_scale: Some(LayerId(2)),
            }),
        };
        let tree = LayerTree::from_commit(&commit, 0);
        assert!(tree.in_page_scale_subtree[1]);
        assert!(tree.in_page_scale_subtree[3]);
        assert!(!tree.in_page_scale_subtree[0]);
        assert!(!tree.in_page_scale_subtree[4]);
    }

    #[test]
    fn viewport_roles_resolve_to_slots() {
        use crate::layer::ViewportRoles;
        let commit = TreeCommit {
            layers: vec![layer(1), scroller_of(2, 1, 1)],
            viewport: Some(ViewportRoles {
                inner: LayerId(2),
                outer: None,
                page_scale: None,
            }),
        };
        let tree = LayerTree::from_commit(&commit, 0);
        let vp = tree.viewport().unwrap();
        assert_eq!(vp.inner, 1);
        assert_eq!(vp.outer, INVALID);
    }

    #[test]
    fn committed_scroll_offsets_are_reachable_via_info() {
        let mut info = scroller_of(2, 1, 1);
        info.scroll_offset = Vec2::new(5.0, 6.0);
        let commit = TreeCommit {
            layers: vec![layer(1), info],
            viewport: None,
        };
        // The tree itself does not store offsets; the scroll tree reads them
        // from the commit. This just pins the commit shape.
        assert_eq!(commit.layers[1].scroll_offset, Vec2::new(5.0, 6.0));
        let tree = LayerTree::from_commit(&commit, 0);
        assert!(tree.is_scroller(1));
    }
}
