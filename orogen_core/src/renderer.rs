// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer contract.
//!
//! Rendering is a collaborator, not part of this engine: after each
//! evaluation the engine hands the renderer the active tree and the set of
//! changes, and the renderer turns drawable layers into whatever its
//! pipeline needs (draw lists, native layer mutations, GPU work). The
//! `orogen_render` crate provides a ready-made draw-plan IR on top of this
//! boundary.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_begin_frame(args: BeginFrameArgs) {
//!     compositor.will_begin_frame(args);
//!     compositor.animate();
//!     compositor.update_animation_state();
//!
//!     let changes = compositor.draw_changes();
//!     renderer.draw(compositor.active_tree().unwrap(), &changes);
//!
//!     compositor.did_finish_frame();
//!     schedule(compositor.take_requests());
//! }
//! ```

use crate::layer::{FrameChanges, LayerTree};

/// Consumes evaluated frame changes and presents drawable layers.
pub trait Renderer {
    /// Applies the given changes, reading current screen transforms and
    /// content from `tree`. When
    /// [`tree_replaced`](FrameChanges::tree_replaced) is set the previous
    /// tree's state is gone and presentation must be rebuilt.
    fn draw(&mut self, tree: &LayerTree, changes: &FrameChanges);
}
