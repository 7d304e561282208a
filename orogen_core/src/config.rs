// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use crate::time::Duration;

/// Tunables for the compositor engine.
///
/// Durations shape the qualitative behavior (controls settle, scrollbars
/// fade) without being contractual; the presets capture the two common
/// embeddings.
#[derive(Clone, Copy, Debug)]
pub struct CompositorConfig {
    /// Height of the hideable top-controls strip, in device pixels. Zero
    /// disables top-controls coupling entirely.
    pub top_controls_height: f64,
    /// How long the controls take to settle to a boundary after a gesture
    /// ends partway.
    pub top_controls_settle_duration: Duration,
    /// Pause between the end of a gesture and the scrollbar fade.
    pub scrollbar_fade_delay: Duration,
    /// Length of the scrollbar fade itself.
    pub scrollbar_fade_duration: Duration,
    /// Pinch anchors within this many device pixels of a viewport edge lock
    /// the scroll offset to that edge.
    pub pinch_snap_margin: f64,
}

impl CompositorConfig {
    /// Mobile-style embedding: hideable top controls, edge-snapped pinch.
    #[must_use]
    pub const fn mobile() -> Self {
        Self {
            top_controls_height: 56.0,
            top_controls_settle_duration: Duration::from_millis(200),
            scrollbar_fade_delay: Duration::from_millis(300),
            scrollbar_fade_duration: Duration::from_millis(300),
            pinch_snap_margin: 32.0,
        }
    }

    /// Desktop-style embedding: no top controls.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            top_controls_height: 0.0,
            top_controls_settle_duration: Duration::from_millis(200),
            scrollbar_fade_delay: Duration::from_millis(300),
            scrollbar_fade_duration: Duration::from_millis(300),
            pinch_snap_margin: 32.0,
        }
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
