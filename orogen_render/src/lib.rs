// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-plan definitions and damage tracking for orogen.
//!
//! This crate is the intermediate representation between
//! [`orogen_core`]'s tree evaluation and backend-specific rendering. It
//! defines:
//!
//! - [`DrawItem`] — one drawable layer with its evaluated screen transform
//! - [`DrawList`] — the back-to-front list of draw items for one frame
//! - [`DamageRegion`] — spatial damage derived from frame changes

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod plan;

pub use damage::{DamageRegion, damage_for_changes};
pub use plan::{DrawItem, DrawList, build_draw_list};
