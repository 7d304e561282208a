// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Committed layer descriptions and tree-commit payloads.
//!
//! The producer side (layout / paint) describes each frame's layer tree as a
//! flat list of [`LayerInfo`] records in paint order, bundled into a
//! [`TreeCommit`]. The hand-off is copy-based: the engine builds its own
//! [`LayerTree`](super::LayerTree) from the records and never shares mutable
//! state with the producer.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::transform::Transform3d;

use super::id::{LayerId, SurfaceId};

/// Reasons a scroll must be handled by the producer (main) thread.
///
/// Stored per layer as a bitmask of the `reason` constants below; `NONE`
/// means the layer is freely scrollable on the compositor thread. A non-zero
/// mask on the hit layer or any ancestor up to the resolved scroller forces
/// [`ScrollStatus::OnMainThread`](crate::scroll::ScrollStatus::OnMainThread).
pub mod reason {
    /// No main-thread requirement.
    pub const NONE: u8 = 0;
    /// The layer composites a `background-attachment: fixed` background.
    pub const BACKGROUND_ATTACHMENT_FIXED: u8 = 1 << 0;
    /// The subtree has event handlers that must observe every scroll.
    pub const EVENT_HANDLERS: u8 = 1 << 1;
    /// Painting depends on scroll position in a way the producer must see.
    pub const SCROLL_DEPENDENT_PAINT: u8 = 1 << 2;
}

/// One committed layer, in the producer's terms.
///
/// Records are committed in paint order (back to front) with parents before
/// children; hit testing walks the same order front to back.
#[derive(Clone, Debug)]
pub struct LayerInfo {
    /// Stable producer-assigned id, unique within one commit.
    pub id: LayerId,
    /// Tree parent. Must reference an earlier record; unknown or forward
    /// references are treated as "no parent".
    pub parent: Option<LayerId>,
    /// Offset of the layer origin from the parent origin.
    pub position: Point,
    /// Content bounds.
    pub bounds: Size,
    /// Local transform, applied about [`transform_origin`](Self::transform_origin).
    pub transform: Transform3d,
    /// Fixed point for [`transform`](Self::transform).
    pub transform_origin: Point,
    /// Ancestor layer whose bounds clip this layer's scrolling. Presence
    /// makes this layer a scroller; the scrollable range is the clip bounds
    /// (plus any runtime bounds delta) subtracted from this layer's bounds.
    pub scroll_clip: Option<LayerId>,
    /// Explicit scroll-chain override: unconsumed deltas bubble to this
    /// layer instead of the visual parent.
    pub scroll_parent: Option<LayerId>,
    /// Committed scroll offset (the "base"; gesture deltas accumulate on
    /// top of it locally).
    pub scroll_offset: Vec2,
    /// Whether the layer contributes pixels (and is hit-testable).
    pub draws_content: bool,
    /// Surface presented when drawing; `None` for pure grouping nodes.
    pub content: Option<SurfaceId>,
    /// Per-axis user scroll permission.
    pub user_scrollable_horizontal: bool,
    /// Per-axis user scroll permission.
    pub user_scrollable_vertical: bool,
    /// Bitmask of [`reason`] constants forcing main-thread scrolling.
    pub main_thread_scrolling_reasons: u8,
    /// Layer-local rectangles where compositor-thread scrolls may not start.
    pub non_fast_scrollable_region: Vec<Rect>,
    /// Layer-local rectangles with blocking touch handlers.
    pub touch_handler_region: Vec<Rect>,
}

impl LayerInfo {
    /// Creates a layer record with the given id and geometry and neutral
    /// defaults everywhere else: identity transform, no scrolling, drawing
    /// content, both axes user-scrollable.
    #[must_use]
    pub fn new(id: LayerId, position: Point, bounds: Size) -> Self {
        Self {
            id,
            parent: None,
            position,
            bounds,
            transform: Transform3d::IDENTITY,
            transform_origin: Point::ZERO,
            scroll_clip: None,
            scroll_parent: None,
            scroll_offset: Vec2::ZERO,
            draws_content: true,
            content: None,
            user_scrollable_horizontal: true,
            user_scrollable_vertical: true,
            main_thread_scrolling_reasons: reason::NONE,
            non_fast_scrollable_region: Vec::new(),
            touch_handler_region: Vec::new(),
        }
    }
}

/// The designated viewport roles in a committed tree.
///
/// These are explicit registrations, not structural inferences: the inner
/// viewport is the visual viewport scroller, the outer viewport the layout
/// viewport scroller, and the page-scale layer the node whose transform
/// carries the pinch-zoom factor. The outer viewport and page-scale roles
/// are optional (a tree without pinch-zoom support commits only an inner
/// viewport).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportRoles {
    /// The visual-viewport scroll layer.
    pub inner: LayerId,
    /// The layout-viewport scroll layer, if any.
    pub outer: Option<LayerId>,
    /// The layer whose transform carries the page-scale factor, if any.
    pub page_scale: Option<LayerId>,
}

/// A full pending-tree payload from the producer.
#[derive(Clone, Debug, Default)]
pub struct TreeCommit {
    /// Layer records in paint order, parents before children.
    pub layers: Vec<LayerInfo>,
    /// Viewport role registrations, if this tree has a scrollable viewport.
    pub viewport: Option<ViewportRoles>,
}
