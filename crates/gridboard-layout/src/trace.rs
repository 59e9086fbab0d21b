#![forbid(unsafe_code)]

//! Recorded interaction traces.
//!
//! An [`InteractionTrace`] is a baseline registry plus the exact sequence of
//! host events fed to the controller. Replaying it on a fresh registry is
//! deterministic, so a trace captured from a host reproduces a layout bug
//! without any UI attached.
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "items": [{ "id": 1, "label": "Counter",
//!               "placement": { "col_start": 1, "row_start": 1, "col_span": 2, "row_span": 2 } }],
//!   "events": [
//!     { "event": "begin_drag", "item": 1,
//!       "sample": { "position": { "x": 0.0, "y": 0.0 }, "grid_width": 1200.0 } },
//!     { "event": "move",
//!       "sample": { "position": { "x": 200.0, "y": 0.0 }, "grid_width": 1200.0 } },
//!     { "event": "up" }
//!   ]
//! }
//! ```

use std::fmt;

use gridboard_core::event::PointerSample;
use gridboard_core::geometry::Placement;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::interaction::{InteractionController, InteractionTransition, ResizeEdge};
use crate::registry::{GridState, ItemId, RegistryError};
use crate::rows::RowChange;

/// Current trace schema version.
pub const INTERACTION_TRACE_SCHEMA_VERSION: u16 = 1;

fn default_schema_version() -> u16 {
    INTERACTION_TRACE_SCHEMA_VERSION
}

/// One baseline item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceItem {
    pub id: ItemId,
    pub placement: Placement,
    pub label: String,
}

/// One recorded host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    BeginDrag {
        item: ItemId,
        sample: PointerSample,
    },
    BeginResize {
        item: ItemId,
        edge: ResizeEdge,
        sample: PointerSample,
    },
    Move {
        sample: PointerSample,
    },
    Up,
    CaptureLost,
    /// The host unmounted an item.
    Unregister {
        item: ItemId,
    },
    /// The grid container changed height.
    ContainerResized {
        height: f64,
    },
}

/// Baseline plus event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTrace {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// Overrides the configured row height when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_height: Option<f64>,
    #[serde(default)]
    pub items: Vec<TraceItem>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl InteractionTrace {
    /// Empty trace at the current schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_version: INTERACTION_TRACE_SCHEMA_VERSION,
            row_height: None,
            items: Vec::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_item(mut self, id: ItemId, placement: Placement, label: impl Into<String>) -> Self {
        self.items.push(TraceItem {
            id,
            placement,
            label: label.into(),
        });
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: TraceEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Parse a JSON trace.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, TraceError> {
        serde_json::from_str(s).map_err(TraceError::Json)
    }

    /// Replay on a fresh registry.
    ///
    /// Baseline items are registered in order; any registration failure
    /// aborts the replay. Events never fail: the controller reports each one
    /// as a transition.
    pub fn replay(&self, config: &GridConfig) -> Result<ReplayOutcome, TraceError> {
        if self.schema_version != INTERACTION_TRACE_SCHEMA_VERSION {
            return Err(TraceError::UnsupportedSchemaVersion {
                version: self.schema_version,
            });
        }
        let mut config = config.clone();
        if let Some(row_height) = self.row_height {
            config.row_height = row_height;
        }
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(TraceError::InvalidConfig(errors));
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "gridboard.trace_replay",
            items = self.items.len(),
            events = self.events.len()
        )
        .entered();

        let mut state = GridState::new(config.min_rows);
        for item in &self.items {
            state
                .register(item.id, item.placement, item.label.clone())
                .map_err(|source| TraceError::Baseline { source })?;
        }

        let mut controller = InteractionController::new(config);
        let mut transitions = Vec::with_capacity(self.events.len());
        let mut row_changes = Vec::new();
        for event in &self.events {
            let transition = match event {
                TraceEvent::BeginDrag { item, sample } => {
                    controller.begin_drag(&state, *item, *sample)
                }
                TraceEvent::BeginResize { item, edge, sample } => {
                    controller.begin_resize(&state, *item, *edge, *sample)
                }
                TraceEvent::Move { sample } => controller.pointer_move(&mut state, *sample),
                TraceEvent::Up => controller.pointer_up(&state),
                TraceEvent::CaptureLost => controller.pointer_capture_lost(&state),
                TraceEvent::Unregister { item } => {
                    state.unregister(*item);
                    controller.focus_mut().clear_if_unregistered(&state);
                    continue;
                }
                TraceEvent::ContainerResized { height } => {
                    row_changes.extend(controller.fit_rows_to_container(&mut state, *height));
                    continue;
                }
            };
            transitions.push(transition);
        }

        Ok(ReplayOutcome {
            state,
            transitions,
            row_changes,
            session_open: controller.is_active(),
        })
    }
}

impl Default for InteractionTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a replay.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub state: GridState,
    /// One transition per controller event, in order.
    pub transitions: Vec<InteractionTransition>,
    /// Row count changes caused by container resizes.
    pub row_changes: Vec<RowChange>,
    /// Whether the trace ended with a session still held.
    pub session_open: bool,
}

/// Trace loading and replay errors.
#[derive(Debug)]
pub enum TraceError {
    UnsupportedSchemaVersion { version: u16 },
    InvalidConfig(Vec<String>),
    Baseline { source: RegistryError },
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported trace schema version {version} (expected {INTERACTION_TRACE_SCHEMA_VERSION})"
            ),
            Self::InvalidConfig(errors) => {
                write!(f, "invalid replay config: {}", errors.join("; "))
            }
            Self::Baseline { source } => write!(f, "trace baseline rejected: {source}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "trace JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Baseline { source } => Some(source),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}
