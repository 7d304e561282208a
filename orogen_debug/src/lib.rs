// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and Chrome trace export for orogen diagnostics.
//!
//! This crate provides [`TraceSink`](orogen_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`chrome::RecordingSink`] — in-memory event recording with
//!   [`chrome::export`] for Chrome Trace Event Format JSON.

pub mod chrome;
pub mod pretty;
