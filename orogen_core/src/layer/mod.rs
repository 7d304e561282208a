// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in a compositing tree, committed whole-tree at a time
//! by the producer (see [`TreeCommit`]). Each layer has:
//!
//! - An identity ([`LayerId`]) — a stable, producer-assigned id used to
//!   merge scroll state across tree swaps.
//! - Geometry — position, bounds, a local [`Transform3d`] about an origin.
//! - Scroll linkage — an optional scroll clip (making the layer a
//!   scroller), an optional `scroll_parent` override redirecting bubbling,
//!   and per-axis user-scroll permissions.
//! - Input metadata — main-thread scrolling reasons, non-fast-scrollable
//!   regions, and touch-handler regions.
//!
//! [`LayerTree`] stores a committed tree in struct-of-arrays layout with
//! precomputed scroll chains; [`evaluate`](LayerTree::evaluate) recomputes
//! screen transforms incrementally via dirty channels and reports
//! [`FrameChanges`] to the renderer boundary.
//!
//! [`Transform3d`]: crate::transform::Transform3d

mod evaluate;
mod hit;
mod id;
mod info;
mod tree;

pub use evaluate::FrameChanges;
pub use id::{INVALID, LayerId, SurfaceId};
pub use info::{LayerInfo, TreeCommit, ViewportRoles, reason};
pub use tree::{LayerTree, ViewportSlots};
