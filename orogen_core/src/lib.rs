// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree and scroll/pinch/viewport coordination for compositor input
//! handling.
//!
//! `orogen_core` is the input-side core of a compositor: it owns a committed
//! tree of layers and turns user scroll and pinch gestures into clamped
//! scroll offsets, page-scale changes, top-controls movement, and overscroll
//! reports — everything a renderer needs to present and a producer needs to
//! reconcile. It is `no_std` compatible (with `alloc`) and uses
//! struct-of-arrays storage with slot indices for cache-friendly traversal.
//!
//! # Architecture
//!
//! The engine sits between three collaborators:
//!
//! ```text
//!   Producer (layout/paint thread)
//!       │ TreeCommit                   ▲ ScrollDeltaSet
//!       ▼                             │
//!   Compositor ──► commit / activate ──► process_scroll_deltas()
//!       ▲                             │
//!       │ scroll_begin/by/end,        ▼
//!       │ pinch_begin/update/end   LayerTree::evaluate() ──► FrameChanges
//!   Input pipeline                    │
//!                                     ▼
//!   External scheduler ──► BeginFrameArgs ──► animate() ──► FrameRequests
//!                                     │
//!                                     ▼
//!                                 Renderer::draw()
//! ```
//!
//! **[`layer`]** — Struct-of-arrays layer tree with stable producer ids,
//! precomputed scroll chains, dirty-channel evaluation, and hit testing.
//!
//! **[`scroll`]** — Scroll offsets (base + delta + sent), clamped
//! application, dispatch statuses, bubbling, and overscroll accounting.
//!
//! **[`viewport`]** — The inner/outer pair acting as one scroller with an
//! exact hand-off, page-scale conversion, and top-controls coupling.
//!
//! **[`pinch`]** — Anchored pinch zoom with clamping and edge snapping.
//!
//! **[`page_scale`]** — The scale factor triple and the staged page-scale
//! animation consumed at tree activation.
//!
//! **[`top_controls`]** — The browser-chrome show/hide ratio, its scroll
//! coupling, and the post-gesture settle animation.
//!
//! **[`scrollbar`]** — Overlay scrollbar fade driven by the same delta
//! stream.
//!
//! **[`compositor`]** — The host tying it all together: pending/active tree
//! swap with by-id state merge, the per-frame animate sequence, delta
//! reporting, and frame metadata.
//!
//! **[`timing`]** — The begin-frame/requests contract with the external
//! scheduler; the engine never sleeps or reads a clock.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) instrumentation for the
//! input pipeline, compiled out without the `trace` feature.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables trace-event emission (one branch
//!   per site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-frame
//!   events (animate ticks, top-controls ratio changes).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod compositor;
pub mod config;
pub mod dirty;
pub mod ease;
pub mod layer;
pub mod page_scale;
pub mod pinch;
pub mod renderer;
pub mod scroll;
pub mod scrollbar;
pub mod time;
pub mod timing;
pub mod top_controls;
pub mod trace;
pub mod transform;
pub mod viewport;
