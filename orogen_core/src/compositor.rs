// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compositor host: owns the active and pending trees and coordinates
//! every input-side subsystem.
//!
//! A [`Compositor`] is driven from exactly one thread. The producer hands it
//! whole [`TreeCommit`]s ([`commit`](Compositor::commit) →
//! [`activate_pending`](Compositor::activate_pending)); the input pipeline
//! calls the scroll/pinch entry points (see the `scroll` and `pinch`
//! modules); the external frame scheduler drives the per-frame sequence
//! [`will_begin_frame`](Compositor::will_begin_frame) →
//! [`animate`](Compositor::animate) →
//! [`update_animation_state`](Compositor::update_animation_state) →
//! [`did_finish_frame`](Compositor::did_finish_frame) and drains
//! [`take_requests`](Compositor::take_requests).
//!
//! Activation is an atomic swap: the pending tree replaces the active tree
//! and scroll state is merged by stable layer id, rebuilding derived state
//! (bounds deltas, clamps, screen transforms) only after offsets have
//! landed, so an in-flight gesture survives the swap without visible jumps.
//!
//! Every mutating entry point checks tree validity first; with no active
//! tree the operations are no-ops returning failure statuses rather than
//! panicking.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Size, Vec2};

use crate::config::CompositorConfig;
use crate::ease::{ease_in_out, lerp};
use crate::layer::{FrameChanges, INVALID, LayerId, LayerTree, TreeCommit};
use crate::page_scale::{
    PageScaleAnimation, PageScaleSample, PageScaleState, PendingPageScaleAnimation,
};
use crate::scroll::{ScrollGesture, ScrollTree};
use crate::scrollbar::ScrollbarAnimationController;
use crate::time::{Duration, Timestamp};
use crate::timing::{BeginFrameArgs, FrameRequests};
use crate::top_controls::{TopControlsConstraint, TopControlsManager};
use crate::trace::{ActivateEvent, CommitEvent, PageScaleAnimationEvent, TraceSink};

/// A smooth (programmatic) scroll of the viewport.
#[derive(Clone, Copy, Debug)]
struct ScrollOffsetAnimation {
    target: Vec2,
    duration: Duration,
    start_offset: Option<Vec2>,
    start_time: Option<Timestamp>,
}

/// The delta bundle reported back to the producer for one commit round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollDeltaSet {
    /// Per-layer unsent scroll deltas.
    pub scrolls: Vec<(LayerId, Vec2)>,
    /// Multiplicative page-scale delta since the last report.
    pub page_scale_delta: f64,
    /// Top-controls shown-ratio delta since the last report.
    pub top_controls_delta: f64,
    /// Opaque completion tokens queued during the reported activity.
    pub swap_promises: Vec<u64>,
}

/// Frame state reported upstream (e.g. for synchronous-input reconciliation).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    /// Combined inner+outer viewport offset, in content space.
    pub root_scroll_offset: Vec2,
    /// Effective page-scale factor.
    pub page_scale_factor: f64,
    /// Lower page-scale bound.
    pub min_page_scale_factor: f64,
    /// Upper page-scale bound.
    pub max_page_scale_factor: f64,
    /// Device viewport divided by the page scale: how much content is
    /// visible.
    pub scrollable_viewport_size: Size,
    /// Bounds of the layout (outer) viewport scroller, or the inner one
    /// when no outer is registered.
    pub root_layer_size: Size,
    /// Whether user scrolling is disabled per axis on the root scroller.
    pub root_overflow_x_hidden: bool,
    /// Whether user scrolling is disabled per axis on the root scroller.
    pub root_overflow_y_hidden: bool,
}

/// The compositor input-coordination engine.
pub struct Compositor {
    pub(crate) config: CompositorConfig,
    pub(crate) device_viewport: Size,

    pub(crate) active_tree: Option<LayerTree>,
    pub(crate) active_scroll: Option<ScrollTree>,
    pending: Option<(LayerTree, ScrollTree)>,
    next_generation: u64,

    pub(crate) page_scale: PageScaleState,
    pub(crate) top_controls: TopControlsManager,
    pub(crate) scrollbars: ScrollbarAnimationController,
    pub(crate) gesture: Option<ScrollGesture>,

    /// Staged on the pending tree; replaced wholesale by a newer request.
    pending_page_scale_animation: Option<PendingPageScaleAnimation>,
    /// Transferred at activation, consumed by the first animate tick.
    queued_page_scale_animation: Option<PendingPageScaleAnimation>,
    page_scale_animation: Option<PageScaleAnimation>,
    page_scale_animation_completed: bool,
    scroll_animation: Option<ScrollOffsetAnimation>,

    pub(crate) requests: FrameRequests,
    frame_args: Option<BeginFrameArgs>,
    in_frame: bool,
    pub(crate) last_frame_time: Timestamp,

    swap_promises: Vec<u64>,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("device_viewport", &self.device_viewport)
            .field("generation", &self.next_generation)
            .field("gesture", &self.gesture)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Creates an engine with the given configuration and an empty tree.
    #[must_use]
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            config,
            device_viewport: Size::ZERO,
            active_tree: None,
            active_scroll: None,
            pending: None,
            next_generation: 0,
            page_scale: PageScaleState::default(),
            top_controls: TopControlsManager::new(
                config.top_controls_height,
                config.top_controls_settle_duration,
            ),
            scrollbars: ScrollbarAnimationController::new(
                config.scrollbar_fade_delay,
                config.scrollbar_fade_duration,
            ),
            gesture: None,
            pending_page_scale_animation: None,
            queued_page_scale_animation: None,
            page_scale_animation: None,
            page_scale_animation_completed: false,
            scroll_animation: None,
            requests: FrameRequests::default(),
            frame_args: None,
            in_frame: false,
            last_frame_time: Timestamp(0),
            swap_promises: Vec::new(),
            trace_sink: None,
        }
    }

    /// Installs a trace sink. Emission is compiled out without the `trace`
    /// feature.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    pub(crate) fn emit(&mut self, _f: impl FnOnce(&mut dyn TraceSink)) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.trace_sink.as_deref_mut() {
            _f(sink);
        }
    }

    // -- Tree accessors ----------------------------------------------------

    /// The active tree, if one has been activated.
    #[inline]
    #[must_use]
    pub const fn active_tree(&self) -> Option<&LayerTree> {
        self.active_tree.as_ref()
    }

    /// The active tree's scroll state.
    #[inline]
    #[must_use]
    pub const fn active_scroll_tree(&self) -> Option<&ScrollTree> {
        self.active_scroll.as_ref()
    }

    /// Whether a commit is waiting for activation.
    #[inline]
    #[must_use]
    pub const fn has_pending_tree(&self) -> bool {
        self.pending.is_some()
    }

    /// The effective page-scale factor.
    #[inline]
    #[must_use]
    pub fn page_scale_factor(&self) -> f64 {
        self.page_scale.current()
    }

    /// The top-controls manager (read-only).
    #[inline]
    #[must_use]
    pub const fn top_controls(&self) -> &TopControlsManager {
        &self.top_controls
    }

    /// Current overlay scrollbar opacity.
    #[inline]
    #[must_use]
    pub const fn scrollbar_opacity(&self) -> f64 {
        self.scrollbars.opacity()
    }

    // -- Commit pipeline ---------------------------------------------------

    /// Builds a pending tree from a producer commit. The previous pending
    /// tree, if any, is discarded unactivated.
    pub fn commit(&mut self, commit: &TreeCommit) {
        let generation = self.next_generation;
        self.next_generation += 1;
        let tree = LayerTree::from_commit(commit, generation);
        let scroll = ScrollTree::from_commit(commit);
        self.emit(|s| {
            s.on_commit(&CommitEvent {
                generation,
                layer_count: tree.len(),
            });
        });
        self.pending = Some((tree, scroll));
    }

    /// Stages a page-scale animation on the pending tree. A second request
    /// before activation discards the first.
    pub fn set_pending_page_scale_animation(&mut self, animation: PendingPageScaleAnimation) {
        self.pending_page_scale_animation = Some(animation);
    }

    /// Activates the pending tree: swaps it in, merges scroll state by
    /// stable id, rebuilds derived state, and re-targets any in-flight
    /// gesture. Returns `false` when nothing was pending.
    pub fn activate_pending(&mut self) -> bool {
        let Some((mut tree, mut scroll)) = self.pending.take() else {
            return false;
        };

        // Remember the gesture's target by id so it can survive the swap.
        let gesture_target_id = self.gesture.and_then(|g| {
            self.active_tree
                .as_ref()
                .map(|old| old.id_at(g.target))
        });

        if let (Some(old_tree), Some(old_scroll)) = (&self.active_tree, &self.active_scroll) {
            scroll.adopt(old_scroll, old_tree, &tree);
        }
        scroll.set_page_scale(self.page_scale.current());

        let generation = tree.generation();
        self.active_tree = Some(tree);
        self.active_scroll = Some(scroll);

        // Derived state strictly after offsets: bounds deltas first, then
        // clamping, then transforms.
        self.sync_top_controls_bounds_delta();
        if let (Some(tree), Some(scroll)) = (&self.active_tree, &mut self.active_scroll) {
            scroll.clamp_all(tree);
        }
        if let (Some(tree), Some(scroll)) = (&mut self.active_tree, &self.active_scroll) {
            tree.prime_transforms(scroll, self.page_scale.current());
        }

        // Re-target or drop the in-flight gesture.
        if self.gesture.is_some() {
            let new_target = gesture_target_id
                .and_then(|id| self.active_tree.as_ref().and_then(|t| t.slot_of(id)));
            match new_target {
                Some(slot) => {
                    if let Some(gesture) = &mut self.gesture {
                        gesture.target = slot;
                    }
                }
                None => self.gesture = None,
            }
        }

        self.queued_page_scale_animation = self.pending_page_scale_animation.take();
        self.requests.redraw = true;
        self.emit(|s| s.on_activate(&ActivateEvent { generation }));
        true
    }

    /// Evaluates the active tree and returns the change set for the
    /// renderer. Empty when no tree is active.
    #[must_use]
    pub fn draw_changes(&mut self) -> FrameChanges {
        let (Some(tree), Some(scroll)) = (&mut self.active_tree, &self.active_scroll) else {
            return FrameChanges::default();
        };
        tree.evaluate(scroll, self.page_scale.current())
    }

    // -- State injections (null-root safe) ---------------------------------

    /// Updates the device viewport size.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.device_viewport = size;
        self.requests.redraw = true;
    }

    /// Replaces the committed scroll base for `id` on the active tree,
    /// leaving gesture deltas untouched. Unknown ids (and absent trees) are
    /// silent no-ops.
    pub fn update_scroll_offset_base(&mut self, id: LayerId, offset: Vec2) {
        let (Some(tree), Some(scroll)) = (&mut self.active_tree, &mut self.active_scroll) else {
            return;
        };
        if scroll.update_base(tree, id, offset)
            && let Some(slot) = tree.slot_of(id)
        {
            tree.mark_scrolled(slot);
            self.requests.redraw = true;
        }
    }

    /// Accepts a page-scale push from the producer.
    pub fn push_page_scale_from_main(&mut self, factor: f64, min: f64, max: f64) {
        self.page_scale.push_from_main(factor, min, max);
        self.apply_page_scale_to_trees();
    }

    /// Externally sets the top-controls shown ratio.
    pub fn set_top_controls_shown_ratio(&mut self, ratio: f64) {
        self.top_controls.set_shown_ratio(ratio);
        self.sync_top_controls_bounds_delta();
        self.requests.redraw = true;
    }

    /// Changes the top-controls height, preserving the visible extent.
    pub fn set_top_controls_height(&mut self, height: f64) {
        self.top_controls.set_height(height);
        self.sync_top_controls_bounds_delta();
        self.requests.redraw = true;
    }

    /// Applies a top-controls constraint, optionally animated.
    pub fn update_top_controls_state(&mut self, constraint: TopControlsConstraint, animate: bool) {
        self.top_controls.update_state(constraint, animate);
        if self.top_controls.is_animating() {
            self.requests.animate = true;
        } else {
            self.sync_top_controls_bounds_delta();
        }
        self.requests.redraw = true;
    }

    /// Starts a smooth scroll of the viewport by `delta` (screen space).
    /// Returns `false` when there is nothing to move.
    pub fn scroll_animated(&mut self, delta: Vec2, duration: Duration) -> bool {
        if self.active_tree.as_ref().and_then(LayerTree::viewport).is_none() {
            return false;
        }
        let total = self.viewport_total_offset();
        let max = self.viewport_max_total_offset();
        let content_delta = delta / self.page_scale.current().max(f64::MIN_POSITIVE);
        let target = Vec2::new(
            (total.x + content_delta.x).clamp(0.0, max.x),
            (total.y + content_delta.y).clamp(0.0, max.y),
        );
        if target == total {
            return false;
        }
        self.scroll_animation = Some(ScrollOffsetAnimation {
            target,
            duration,
            start_offset: None,
            start_time: None,
        });
        self.requests.animate = true;
        true
    }

    /// Cancels a running smooth scroll. With `complete` the offset snaps to
    /// the animation target (for callers that need synchronous finality);
    /// without it the offset stays wherever the animation left it.
    pub fn abort_scroll_animation(&mut self, complete: bool) {
        let Some(anim) = self.scroll_animation.take() else {
            return;
        };
        if complete {
            self.set_viewport_total_offset(anim.target);
            self.requests.redraw = true;
            self.requests.commit = true;
        }
    }

    /// Whether a smooth scroll is in flight.
    #[must_use]
    pub const fn has_scroll_animation(&self) -> bool {
        self.scroll_animation.is_some()
    }

    /// Queues an opaque completion token, reported with the next
    /// [`process_scroll_deltas`](Self::process_scroll_deltas).
    pub fn queue_swap_promise(&mut self, token: u64) {
        self.swap_promises.push(token);
    }

    // -- Frame driving ------------------------------------------------------

    /// First call of the per-frame sequence.
    pub fn will_begin_frame(&mut self, args: BeginFrameArgs) {
        debug_assert!(!self.in_frame, "begin-frame re-entered");
        self.in_frame = true;
        self.frame_args = Some(args);
        self.last_frame_time = args.frame_time;
    }

    /// Advances all running animations to the current frame time.
    pub fn animate(&mut self) {
        let Some(args) = self.frame_args else {
            return;
        };
        let now = args.frame_time;

        #[cfg(feature = "trace-rich")]
        self.emit(|s| s.on_animate(&crate::trace::AnimateEvent { frame_time: now }));

        self.start_queued_page_scale_animation();
        self.tick_page_scale_animation(now);
        self.tick_scroll_animation(now);

        if self.top_controls.animate(now) {
            self.sync_top_controls_bounds_delta();
            self.requests.redraw = true;
            #[cfg(feature = "trace-rich")]
            {
                let ratio = self.top_controls.shown_ratio();
                self.emit(|s| {
                    s.on_top_controls(&crate::trace::TopControlsEvent { shown_ratio: ratio });
                });
            }
        }

        if self.scrollbars.animate(now) {
            self.requests.redraw = true;
        }
    }

    /// Recomputes the "tick me again" request from live animation state.
    pub fn update_animation_state(&mut self) {
        if self.page_scale_animation.is_some()
            || self.queued_page_scale_animation.is_some()
            || self.scroll_animation.is_some()
            || self.top_controls.is_animating()
        {
            self.requests.animate = true;
        }
        if let Some(wake) = self.scrollbars.wake_at() {
            if wake <= self.last_frame_time {
                self.requests.animate = true;
            } else {
                self.requests.merge(FrameRequests {
                    wake_at: Some(wake),
                    ..FrameRequests::default()
                });
            }
        }
    }

    /// Last call of the per-frame sequence.
    pub fn did_finish_frame(&mut self) {
        self.in_frame = false;
        self.frame_args = None;
    }

    /// Drains the accumulated scheduler requests.
    #[must_use]
    pub fn take_requests(&mut self) -> FrameRequests {
        core::mem::take(&mut self.requests)
    }

    /// True exactly once after each page-scale animation completes.
    #[must_use]
    pub const fn take_page_scale_animation_completed(&mut self) -> bool {
        let completed = self.page_scale_animation_completed;
        self.page_scale_animation_completed = false;
        completed
    }

    // -- Reporting ----------------------------------------------------------

    /// Collects everything the producer needs to reconcile: per-layer scroll
    /// deltas, the page-scale delta, the top-controls delta, and queued swap
    /// promises. Idempotent between scrolls.
    #[must_use]
    pub fn process_scroll_deltas(&mut self) -> ScrollDeltaSet {
        let scrolls = match (&self.active_tree, &mut self.active_scroll) {
            (Some(tree), Some(scroll)) => scroll.collect_deltas(tree),
            _ => Vec::new(),
        };
        let page_scale_delta = self.page_scale.unsent_delta();
        self.page_scale.mark_sent();
        let top_controls_delta = self.top_controls.unsent_ratio_delta();
        self.top_controls.mark_sent();
        ScrollDeltaSet {
            scrolls,
            page_scale_delta,
            top_controls_delta,
            swap_promises: core::mem::take(&mut self.swap_promises),
        }
    }

    /// Snapshot of the frame state reported upstream.
    #[must_use]
    pub fn frame_metadata(&self) -> FrameMetadata {
        let scale = self.page_scale.current();
        let mut meta = FrameMetadata {
            root_scroll_offset: self.viewport_total_offset(),
            page_scale_factor: scale,
            min_page_scale_factor: self.page_scale.min_factor(),
            max_page_scale_factor: self.page_scale.max_factor(),
            scrollable_viewport_size: Size::new(
                self.device_viewport.width / scale,
                self.device_viewport.height / scale,
            ),
            ..FrameMetadata::default()
        };
        if let Some(tree) = &self.active_tree
            && let Some(vp) = tree.viewport()
        {
            let root = if vp.outer != INVALID { vp.outer } else { vp.inner };
            meta.root_layer_size = tree.bounds_at(root);
            meta.root_overflow_x_hidden = !tree.user_scrollable_x[root as usize];
            meta.root_overflow_y_hidden = !tree.user_scrollable_y[root as usize];
        }
        meta
    }

    // -- Internal helpers ---------------------------------------------------

    /// Recomputes the inner viewport clip's bounds delta from the
    /// top-controls position: committed clip bounds assume fully-shown
    /// controls, so hiding them grows the clip by the hidden extent.
    pub(crate) fn sync_top_controls_bounds_delta(&mut self) {
        let (Some(tree), Some(scroll)) = (&mut self.active_tree, &mut self.active_scroll) else {
            return;
        };
        let Some(vp) = tree.viewport() else {
            return;
        };
        let clip = tree.scroll_clip[vp.inner as usize];
        if clip == INVALID {
            return;
        }
        let delta = Vec2::new(
            0.0,
            self.top_controls.height() - self.top_controls.content_top_offset(),
        );
        if scroll.bounds_delta_at(clip) != delta {
            scroll.set_bounds_delta(clip, delta);
            tree.mark_geometry(clip);
        }
    }

    /// Pushes the current effective page scale into the scroll tree and the
    /// page-scale layer's transform, then re-clamps offsets against the new
    /// ranges.
    pub(crate) fn apply_page_scale_to_trees(&mut self) {
        let factor = self.page_scale.current();
        if let (Some(tree), Some(scroll)) = (&mut self.active_tree, &mut self.active_scroll) {
            scroll.set_page_scale(factor);
            if let Some(vp) = tree.viewport()
                && vp.page_scale != INVALID
            {
                tree.mark_transform(vp.page_scale);
            }
            scroll.clamp_all(tree);
        }
        self.requests.redraw = true;
    }

    fn start_queued_page_scale_animation(&mut self) {
        let Some(p) = self.queued_page_scale_animation else {
            return;
        };
        if self.active_tree.as_ref().and_then(LayerTree::viewport).is_none() {
            return;
        }
        self.queued_page_scale_animation = None;

        let start_scale = self.page_scale.current();
        let start_offset = self.viewport_total_offset();
        let target_scale = p
            .scale
            .clamp(self.page_scale.min_factor(), self.page_scale.max_factor());
        let raw_target = if p.use_anchor {
            start_offset + p.target_offset * (1.0 / start_scale - 1.0 / target_scale)
        } else {
            p.target_offset
        };
        let max = self.viewport_max_total_offset_at_scale(target_scale);
        let target_offset = Vec2::new(
            raw_target.x.clamp(0.0, max.x),
            raw_target.y.clamp(0.0, max.y),
        );

        self.page_scale_animation = Some(PageScaleAnimation {
            start_scale,
            target_scale,
            start_offset,
            target_offset,
            duration: p.duration,
            start_time: None,
        });
        self.emit(|s| {
            s.on_page_scale_animation_started(&PageScaleAnimationEvent {
                target_scale,
                duration: p.duration,
            });
        });
    }

    fn tick_page_scale_animation(&mut self, now: Timestamp) {
        let Some(mut anim) = self.page_scale_animation.take() else {
            return;
        };
        let PageScaleSample {
            scale,
            offset,
            finished,
        } = anim.sample(now);

        let _ = self.page_scale.set_current(scale);
        self.apply_page_scale_to_trees();
        self.set_viewport_total_offset(offset);
        self.requests.redraw = true;

        if finished {
            self.page_scale_animation_completed = true;
            self.requests.commit = true;
            self.emit(|s| s.on_page_scale_animation_finished());
        } else {
            self.page_scale_animation = Some(anim);
            self.requests.animate = true;
        }
    }

    fn tick_scroll_animation(&mut self, now: Timestamp) {
        let Some(mut anim) = self.scroll_animation.take() else {
            return;
        };
        let start_offset = *anim.start_offset.get_or_insert(self.viewport_total_offset());
        let start_time = *anim.start_time.get_or_insert(now);
        let t = now
            .saturating_duration_since(start_time)
            .fraction_of(anim.duration);
        let e = ease_in_out(t);
        let offset = Vec2::new(
            lerp(start_offset.x, anim.target.x, e),
            lerp(start_offset.y, anim.target.y, e),
        );
        self.set_viewport_total_offset(offset);
        self.requests.redraw = true;

        if t >= 1.0 {
            self.set_viewport_total_offset(anim.target);
            self.requests.commit = true;
        } else {
            self.scroll_animation = Some(anim);
            self.requests.animate = true;
        }
    }
}
