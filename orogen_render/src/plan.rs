// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plan: an ordered sequence of drawable layers for one frame.

use alloc::vec::Vec;

use orogen_core::layer::{LayerId, LayerTree, SurfaceId};
use orogen_core::transform::Transform3d;

/// A single drawable layer in the draw plan.
///
/// Items are produced in back-to-front order, matching the tree's paint
/// order. Transforms are the evaluated screen transforms — scroll offsets
/// and the page-scale factor are already folded in.
#[derive(Clone, Debug)]
pub struct DrawItem {
    /// The layer this item originates from.
    pub layer: LayerId,
    /// The surface to draw (`None` for drawable layers whose content the
    /// backend resolves by id).
    pub surface: Option<SurfaceId>,
    /// Screen transform (column-major 4×4).
    pub transform: [f32; 16],
    /// Layer content bounds `[width, height]`.
    pub bounds: [f32; 2],
}

/// The back-to-front list of draw items for a single frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    /// Generation of the tree this list was built from.
    pub generation: u64,
    /// Draw items in back-to-front order.
    pub items: Vec<DrawItem>,
}

impl DrawList {
    /// Clears the list for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Builds a draw list by walking the tree's paint order, keeping only
/// layers that draw content.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "f64 layer geometry narrows to f32 for GPU consumption"
)]
pub fn build_draw_list(tree: &LayerTree) -> DrawList {
    let mut list = DrawList {
        generation: tree.generation(),
        items: Vec::new(),
    };
    for slot in 0..tree.len() {
        if !tree.draws_content_at(slot) {
            continue;
        }
        let bounds = tree.bounds_at(slot);
        list.items.push(DrawItem {
            layer: tree.id_at(slot),
            surface: tree.content_at(slot),
            transform: flatten(tree.screen_transform_at(slot)),
            bounds: [bounds.width as f32, bounds.height as f32],
        });
    }
    list
}

/// Flattens a column-major transform into the `[f32; 16]` layout GPU APIs
/// expect.
#[expect(
    clippy::cast_possible_truncation,
    reason = "f64 transforms narrow to f32 for GPU consumption"
)]
fn flatten(t: Transform3d) -> [f32; 16] {
    let mut out = [0.0_f32; 16];
    for (j, col) in t.cols.iter().enumerate() {
        for (i, v) in col.iter().enumerate() {
            out[j * 4 + i] = *v as f32;
        }
    }
    out
}
