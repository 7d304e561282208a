// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Orogen uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! keep screen transforms and renderer-facing change lists incremental. Each
//! channel is an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`TRANSFORM`] and [`SCROLL`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent: a layer's screen transform composes its
//!   ancestors' transforms and scroll offsets, so marking an ancestor marks
//!   the whole subtree. The two channels exist separately because renderers
//!   and scrollbar controllers want to know *why* a layer moved — a scroll
//!   can be presented by translating an already-rastered subtree, while a
//!   transform change may require re-rasterization.
//!
//! - **Local-only** — [`GEOMETRY`] marks bounds-delta changes on clip
//!   layers (top-controls resizing the inner viewport). Scrollable-range
//!   queries read the current value lazily, so no recomputation propagates.
//!
//! # Consumption
//!
//! [`LayerTree::evaluate`](crate::layer::LayerTree::evaluate) drains all
//! channels, recomputes screen transforms for affected layers, and surfaces
//! the results as [`FrameChanges`](crate::layer::FrameChanges) for the
//! [`Renderer`](crate::renderer::Renderer) boundary.

use understory_dirty::Channel;

/// A local or ancestor transform (including the page-scale factor) changed —
/// the subtree's screen transforms need recomputation.
pub const TRANSFORM: Channel = Channel::new(0);

/// A scroll offset changed — the scroller and its subtree move.
pub const SCROLL: Channel = Channel::new(1);

/// A clip layer's bounds delta changed — scrollable ranges shift, no
/// transform recomputation needed.
pub const GEOMETRY: Channel = Channel::new(2);
