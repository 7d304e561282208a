// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and surface identity types.

use core::fmt;

/// Sentinel value indicating "no layer" in slot-index fields.
pub const INVALID: u32 = u32::MAX;

/// A stable, producer-assigned layer identifier.
///
/// Ids survive tree commits: when a pending tree activates, scroll state is
/// merged onto the new tree by matching ids, never by pointer or slot
/// identity. Within one committed tree every id is unique; across commits
/// the same id denotes "the same layer".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u32);

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// An opaque reference to a content surface.
///
/// Surfaces are produced and managed externally (by the rasterization
/// pipeline). A layer with `Some(SurfaceId)` presents that surface; `None`
/// indicates a non-drawing grouping or clip node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}
