// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::vec::Vec;

use kurbo::Point;
use orogen_core::layer::{FrameChanges, LayerTree};

/// A region of the output that needs re-rendering.
///
/// Backends use this to minimize GPU work by only redrawing areas that
/// changed since the last frame.
#[derive(Clone, Debug, Default)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// A list of axis-aligned rectangles that need redrawing.
    ///
    /// Each rectangle is `[x, y, width, height]` in output-space pixels.
    Rects(Vec<[f32; 4]>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }
}

/// Derives a damage region from one evaluation's changes.
///
/// A replaced tree damages everything. Otherwise each moved layer (scrolled
/// or re-transformed) contributes its screen-space bounding rectangle; a
/// layer whose corners cannot be projected (degenerate or extreme
/// perspective) falls back to full damage.
#[must_use]
pub fn damage_for_changes(tree: &LayerTree, changes: &FrameChanges) -> DamageRegion {
    if changes.tree_replaced {
        return DamageRegion::Full;
    }
    if changes.transforms.is_empty() && changes.scrolled.is_empty() {
        return DamageRegion::None;
    }
    let mut rects = Vec::new();
    for &slot in changes.transforms.iter().chain(changes.scrolled.iter()) {
        if !tree.draws_content_at(slot) {
            continue;
        }
        match screen_bounds(tree, slot) {
            Some(rect) => rects.push(rect),
            None => return DamageRegion::Full,
        }
    }
    if rects.is_empty() {
        DamageRegion::None
    } else {
        DamageRegion::Rects(rects)
    }
}

/// Screen-space axis-aligned bounding box of a layer's content.
#[expect(
    clippy::cast_possible_truncation,
    reason = "f64 damage geometry narrows to f32 for backend consumption"
)]
fn screen_bounds(tree: &LayerTree, slot: u32) -> Option<[f32; 4]> {
    let bounds = tree.bounds_at(slot);
    let transform = tree.screen_transform_at(slot);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(bounds.width, 0.0),
        Point::new(0.0, bounds.height),
        Point::new(bounds.width, bounds.height),
    ];
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in corners {
        let p = transform.project_point(corner)?;
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some([
        min.x as f32,
        min.y as f32,
        (max.x - min.x) as f32,
        (max.y - min.y) as f32,
    ])
}
