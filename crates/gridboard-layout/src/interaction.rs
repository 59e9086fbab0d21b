#![forbid(unsafe_code)]

//! Drag/resize interaction controller.
//!
//! [`InteractionController`] owns at most one in-flight session and turns
//! pointer samples into registry commits. Every entry point returns an
//! [`InteractionTransition`] with a monotonically increasing id, so a host
//! (or a replayed trace) can audit exactly what each event did.
//!
//! ```text
//! Idle --begin_drag--> Dragging{item} --pointer_up / capture_lost--> Idle
//! Idle --begin_resize--> Resizing{item, edge} --pointer_up / capture_lost--> Idle
//! ```
//!
//! # Pointer-move resolution
//!
//! 1. The pixel delta since session start is corrected for page scroll.
//! 2. The delta is quantized against the live cell width and the configured
//!    row height into a candidate placement (drag: shift; resize: per-edge
//!    rules), clamped onto the grid.
//! 3. If the candidate reaches below the last visible row the grid grows.
//! 4. The candidate is classified against the item's current placement. A
//!    single-axis change is gated by one whole-rectangle collision check. A
//!    two-axis change is resolved per axis and only free axes commit; when
//!    both axes are free on their own but the combined placement collides,
//!    only the vertical change commits.
//!
//! Collisions, stale geometry and unchanged candidates never raise errors;
//! they produce `Blocked` or `Noop` effects and the session continues.

use gridboard_core::event::{PixelDelta, PointerSample};
use gridboard_core::geometry::{
    CellMetrics, GRID_COLUMNS, Placement, clamp_col_start, clamp_row_start,
};
use serde::{Deserialize, Serialize};

use crate::collision::{collides, collides_on_axes, has_collision};
use crate::config::GridConfig;
use crate::focus::FocusTracker;
use crate::registry::{GridState, ItemId, RegistryError};
use crate::rows::{RowChange, RowExpansionPolicy};

// ---------------------------------------------------------------------------
// Session model
// ---------------------------------------------------------------------------

/// Resize affordance under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    #[must_use]
    pub const fn has_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    #[must_use]
    pub const fn has_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    #[must_use]
    pub const fn has_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[must_use]
    pub const fn has_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

/// Kind of interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Drag,
    Resize,
}

/// Pixel size of the item when the session started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

/// Item geometry frozen at session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartSnapshot {
    pub placement: Placement,
    /// `None` when the container was not measured at pointer-down; the size
    /// is then derived from the start spans on the first measured move.
    pub size: Option<PixelSize>,
}

impl StartSnapshot {
    fn capture(placement: Placement, sample: &PointerSample, row_height: f64) -> Self {
        let size = CellMetrics::from_grid_width(sample.grid_width, row_height).map(|metrics| {
            PixelSize {
                width: metrics.width_of(placement.col_span),
                height: metrics.height_of(placement.row_span),
            }
        });
        Self { placement, size }
    }

    fn size_or(&self, metrics: &CellMetrics) -> PixelSize {
        self.size.unwrap_or(PixelSize {
            width: metrics.width_of(self.placement.col_span),
            height: metrics.height_of(self.placement.row_span),
        })
    }
}

/// One pointer-held interaction.
///
/// Immutable once created; the controller replaces it on every state change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionSession {
    item: ItemId,
    edge: Option<ResizeEdge>,
    start: StartSnapshot,
    pointer_start: PointerSample,
}

impl InteractionSession {
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        match self.edge {
            Some(_) => SessionKind::Resize,
            None => SessionKind::Drag,
        }
    }

    /// Resize edge; `None` for drags.
    #[must_use]
    pub const fn edge(&self) -> Option<ResizeEdge> {
        self.edge
    }

    #[must_use]
    pub const fn start(&self) -> &StartSnapshot {
        &self.start
    }

    #[must_use]
    pub const fn pointer_start(&self) -> &PointerSample {
        &self.pointer_start
    }

    #[must_use]
    pub const fn state(&self) -> InteractionState {
        match self.edge {
            Some(edge) => InteractionState::Resizing {
                item: self.item,
                edge,
            },
            None => InteractionState::Dragging { item: self.item },
        }
    }
}

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    Idle,
    Dragging { item: ItemId },
    Resizing { item: ItemId, edge: ResizeEdge },
}

impl InteractionState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { item } | Self::Resizing { item, .. } => Some(*item),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition telemetry
// ---------------------------------------------------------------------------

/// Which axes a commit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisChange {
    Horizontal,
    Vertical,
    Both,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    PointerUp,
    CaptureLost,
    /// The item was unregistered while the session was active.
    ItemMissing,
}

/// Explicit diagnostics for events that change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    IdleWithoutSession,
    SessionAlreadyActive,
    UnknownItem,
    GeometryUnavailable,
    Unchanged,
}

/// Effect of one controller event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    /// The host should install global pointer-move/up listeners.
    Started { item: ItemId, kind: SessionKind },
    Committed {
        item: ItemId,
        from: Placement,
        to: Placement,
        change: AxisChange,
    },
    /// The candidate collided; the registry is untouched.
    Blocked {
        item: ItemId,
        candidate: Placement,
        collisions: Vec<ItemId>,
    },
    /// The host should remove its global listeners.
    Ended {
        item: ItemId,
        kind: SessionKind,
        reason: EndReason,
    },
    Noop { reason: NoopReason },
}

/// One controller transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTransition {
    pub transition_id: u64,
    pub from: InteractionState,
    pub to: InteractionState,
    pub effect: InteractionEffect,
    /// Grid row count after the event.
    pub row_count: u32,
}

/// What the grid-line overlay renders against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySignal {
    pub is_active: bool,
    pub row_count: u32,
}

/// Spans of the item under resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDimensions {
    pub col_span: u32,
    pub row_span: u32,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Single-session drag/resize state machine.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: GridConfig,
    rows: RowExpansionPolicy,
    session: Option<InteractionSession>,
    transition_counter: u64,
    active_dimensions: Option<ActiveDimensions>,
    focus: FocusTracker,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl InteractionController {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        let rows = config.row_policy();
        Self {
            config,
            rows,
            session: None,
            transition_counter: 0,
            active_dimensions: None,
            focus: FocusTracker::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.session
            .as_ref()
            .map_or(InteractionState::Idle, InteractionSession::state)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Item under interaction, if any.
    #[must_use]
    pub fn active_item(&self) -> Option<ItemId> {
        self.session.as_ref().map(InteractionSession::item)
    }

    /// Spans of the item under resize, updated on every commit.
    #[must_use]
    pub const fn active_dimensions(&self) -> Option<ActiveDimensions> {
        self.active_dimensions
    }

    #[must_use]
    pub fn overlay_signal(&self, state: &GridState) -> OverlaySignal {
        OverlaySignal {
            is_active: self.is_active(),
            row_count: state.row_count(),
        }
    }

    #[must_use]
    pub const fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusTracker {
        &mut self.focus
    }

    /// Refit the row count to a resized container. Only grows mid-session.
    pub fn fit_rows_to_container(
        &self,
        state: &mut GridState,
        container_height: f64,
    ) -> Option<RowChange> {
        let change = self.rows.fit_rows_to_container(
            state,
            container_height,
            self.config.row_height,
            self.is_active(),
        );
        debug_assert!(!self.is_active() || change.is_none_or(|c| c.is_growth()));
        change
    }

    /// Pointer-down on an item's drag handle.
    pub fn begin_drag(
        &mut self,
        state: &GridState,
        item: ItemId,
        sample: PointerSample,
    ) -> InteractionTransition {
        self.begin(state, item, None, sample)
    }

    /// Pointer-down on one of an item's resize affordances.
    pub fn begin_resize(
        &mut self,
        state: &GridState,
        item: ItemId,
        edge: ResizeEdge,
        sample: PointerSample,
    ) -> InteractionTransition {
        self.begin(state, item, Some(edge), sample)
    }

    fn begin(
        &mut self,
        state: &GridState,
        item: ItemId,
        edge: Option<ResizeEdge>,
        sample: PointerSample,
    ) -> InteractionTransition {
        let from = self.state();
        if self.session.is_some() {
            return self.noop(from, state, NoopReason::SessionAlreadyActive);
        }
        let Some(placement) = state.get(item).map(|entry| entry.placement) else {
            return self.noop(from, state, NoopReason::UnknownItem);
        };

        let session = InteractionSession {
            item,
            edge,
            start: StartSnapshot::capture(placement, &sample, self.config.row_height),
            pointer_start: sample,
        };
        let kind = session.kind();
        self.session = Some(session);
        self.focus.focus_session_item(item);
        if edge.is_some() {
            self.active_dimensions = Some(ActiveDimensions {
                col_span: placement.col_span,
                row_span: placement.row_span,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            item = item.get(),
            kind = ?kind,
            edge = ?edge,
            %placement,
            "interaction session started"
        );
        self.transition(from, state, InteractionEffect::Started { item, kind })
    }

    /// Pointer-up anywhere in the document.
    pub fn pointer_up(&mut self, state: &GridState) -> InteractionTransition {
        self.end(state, EndReason::PointerUp)
    }

    /// The host lost pointer capture; handled exactly like pointer-up.
    pub fn pointer_capture_lost(&mut self, state: &GridState) -> InteractionTransition {
        self.end(state, EndReason::CaptureLost)
    }

    fn end(&mut self, state: &GridState, reason: EndReason) -> InteractionTransition {
        let from = self.state();
        let Some(session) = self.session.take() else {
            return self.noop(from, state, NoopReason::IdleWithoutSession);
        };
        self.active_dimensions = None;

        #[cfg(feature = "tracing")]
        if reason == EndReason::ItemMissing {
            tracing::warn!(
                item = session.item.get(),
                "item vanished mid-session; session ended"
            );
        } else {
            tracing::info!(
                item = session.item.get(),
                reason = ?reason,
                "interaction session ended"
            );
        }
        self.transition(
            from,
            state,
            InteractionEffect::Ended {
                item: session.item,
                kind: session.kind(),
                reason,
            },
        )
    }

    /// Pointer-move while a session is active.
    ///
    /// Commits at most one placement change.
    pub fn pointer_move(
        &mut self,
        state: &mut GridState,
        sample: PointerSample,
    ) -> InteractionTransition {
        let from = self.state();
        let Some(session) = self.session else {
            return self.noop(from, state, NoopReason::IdleWithoutSession);
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "gridboard.pointer_move",
            item = session.item.get(),
            kind = ?session.kind()
        )
        .entered();

        let Some(current) = state.get(session.item).map(|entry| entry.placement) else {
            return self.end(state, EndReason::ItemMissing);
        };
        let Some(metrics) = CellMetrics::from_grid_width(sample.grid_width, self.config.row_height)
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(grid_width = sample.grid_width, "grid not measured; move ignored");
            return self.noop(from, state, NoopReason::GeometryUnavailable);
        };

        let delta = sample.adjusted_delta(&session.pointer_start);
        let candidate = match session.edge {
            None => drag_candidate(&session.start, current, &metrics, delta),
            Some(edge) => resize_candidate(edge, &session.start, &metrics, delta),
        };

        if candidate.last_row() > state.row_count() {
            self.rows.expand_rows_if_needed(state, candidate.last_row());
        }

        let effect = match resolve(state, session.item, current, candidate) {
            Resolution::Effect(effect) => effect,
            Resolution::ItemMissing => return self.end(state, EndReason::ItemMissing),
        };
        if let (InteractionEffect::Committed { to, .. }, Some(_)) = (&effect, session.edge) {
            self.active_dimensions = Some(ActiveDimensions {
                col_span: to.col_span,
                row_span: to.row_span,
            });
        }
        self.transition(from, state, effect)
    }

    fn noop(
        &mut self,
        from: InteractionState,
        state: &GridState,
        reason: NoopReason,
    ) -> InteractionTransition {
        self.transition(from, state, InteractionEffect::Noop { reason })
    }

    fn transition(
        &mut self,
        from: InteractionState,
        state: &GridState,
        effect: InteractionEffect,
    ) -> InteractionTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        InteractionTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state(),
            effect,
            row_count: state.row_count(),
        }
    }
}

enum Resolution {
    Effect(InteractionEffect),
    ItemMissing,
}

/// Classify a candidate against the current placement and commit what is free.
fn resolve(
    state: &mut GridState,
    item: ItemId,
    current: Placement,
    candidate: Placement,
) -> Resolution {
    let horizontal = candidate.columns_differ(&current);
    let vertical = candidate.rows_differ(&current);

    let (target, change) = match (horizontal, vertical) {
        (false, false) => {
            return Resolution::Effect(InteractionEffect::Noop {
                reason: NoopReason::Unchanged,
            });
        }
        (true, true) => {
            let axes =
                collides_on_axes(item, Some(&candidate), Some(&candidate), &current, state);
            let horizontal_only = current.with_columns(candidate.col_start, candidate.col_span);
            let vertical_only = current.with_rows(candidate.row_start, candidate.row_span);
            if axes.is_clear() {
                if has_collision(&candidate, item, state) {
                    // The diagonal corner is occupied; keep the vertical move.
                    (vertical_only, AxisChange::Vertical)
                } else {
                    (candidate, AxisChange::Both)
                }
            } else if !axes.vertical {
                (vertical_only, AxisChange::Vertical)
            } else if !axes.horizontal {
                (horizontal_only, AxisChange::Horizontal)
            } else {
                let mut collisions = collides(&horizontal_only, item, state);
                collisions.extend(collides(&vertical_only, item, state));
                return Resolution::Effect(blocked(item, candidate, collisions));
            }
        }
        (true, false) | (false, true) => {
            let collisions = collides(&candidate, item, state);
            if !collisions.is_empty() {
                return Resolution::Effect(blocked(item, candidate, collisions));
            }
            let change = if horizontal {
                AxisChange::Horizontal
            } else {
                AxisChange::Vertical
            };
            (candidate, change)
        }
    };

    match state.update_placement(item, target) {
        Ok(true) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                item = item.get(),
                from = %current,
                to = %target,
                change = ?change,
                "placement committed"
            );
            Resolution::Effect(InteractionEffect::Committed {
                item,
                from: current,
                to: target,
                change,
            })
        }
        Ok(false) => Resolution::Effect(InteractionEffect::Noop {
            reason: NoopReason::Unchanged,
        }),
        Err(RegistryError::UnknownItem { .. }) => Resolution::ItemMissing,
        Err(RegistryError::Overlap { colliding, .. }) => {
            Resolution::Effect(blocked(item, target, colliding))
        }
        Err(_error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(item = item.get(), %target, error = %_error, "commit rejected");
            Resolution::Effect(blocked(item, target, Vec::<ItemId>::new()))
        }
    }
}

fn blocked(
    item: ItemId,
    candidate: Placement,
    collisions: impl IntoIterator<Item = ItemId>,
) -> InteractionEffect {
    let collisions: Vec<ItemId> = collisions.into_iter().collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        item = item.get(),
        %candidate,
        collisions = collisions.len(),
        "placement blocked"
    );
    InteractionEffect::Blocked {
        item,
        candidate,
        collisions,
    }
}

// ---------------------------------------------------------------------------
// Candidate placement
// ---------------------------------------------------------------------------

/// Shift the start placement by the quantized delta; spans are unchanged.
fn drag_candidate(
    start: &StartSnapshot,
    current: Placement,
    metrics: &CellMetrics,
    delta: PixelDelta,
) -> Placement {
    let col = i64::from(start.placement.col_start).saturating_add(metrics.columns_for(delta.dx));
    let row = i64::from(start.placement.row_start).saturating_add(metrics.rows_for(delta.dy));
    Placement::new(
        clamp_col_start(col, current.col_span),
        clamp_row_start(row),
        current.col_span,
        current.row_span,
    )
}

/// Apply the edge's horizontal and vertical rules to the start geometry.
///
/// Left/Top edges move the start coordinate in whole cells and never pass the
/// item's original opposite edge; Right/Bottom edges grow the pixel size.
/// Where both bounds apply to a Left/Top move, the original-edge limit is
/// applied first and the grid bound second.
fn resize_candidate(
    edge: ResizeEdge,
    start: &StartSnapshot,
    metrics: &CellMetrics,
    delta: PixelDelta,
) -> Placement {
    let origin = start.placement;
    let size = start.size_or(metrics);
    let cell_width = metrics.cell_width();
    let row_height = metrics.row_height();

    let mut col_start = origin.col_start;
    let mut width = size.width;
    if edge.has_right() {
        let max_width = f64::from(GRID_COLUMNS + 1 - col_start) * cell_width;
        width = (width + delta.dx).min(max_width);
    } else if edge.has_left() {
        let requested =
            i64::from(origin.col_start).saturating_add(metrics.columns_for(delta.dx));
        let limited = requested.min(i64::from(origin.last_col()));
        col_start = limited.clamp(1, i64::from(GRID_COLUMNS)) as u32;
        let moved = i64::from(col_start) - i64::from(origin.col_start);
        width = size.width - moved as f64 * cell_width;
    }

    let mut row_start = origin.row_start;
    let mut height = size.height;
    if edge.has_bottom() {
        height = (height + delta.dy).max(row_height);
    } else if edge.has_top() {
        let requested =
            i64::from(origin.row_start).saturating_add(metrics.rows_for(delta.dy));
        let limited = requested.min(i64::from(origin.last_row()));
        row_start = clamp_row_start(limited);
        let moved = i64::from(row_start) - i64::from(origin.row_start);
        height = size.height - moved as f64 * row_height;
    }

    width = width.max(cell_width);
    height = height.max(row_height);

    let mut col_span = metrics.col_span_for_width(width);
    let row_span = metrics.row_span_for_height(height);
    if col_start + col_span > GRID_COLUMNS + 1 {
        col_span = GRID_COLUMNS + 1 - col_start;
    }
    Placement::new(col_start, row_start, col_span, row_span)
}
