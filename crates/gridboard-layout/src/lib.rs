#![forbid(unsafe_code)]

//! Collision-aware drag and resize engine for 12-column card grids.
//!
//! The crate is split along the data flow of one pointer event:
//!
//! - [`registry`]: [`GridState`], the authoritative item placements.
//! - [`collision`]: pure overlap queries, whole-rectangle and per axis.
//! - [`interaction`]: [`InteractionController`], the drag/resize state
//!   machine that turns pointer samples into commits.
//! - [`rows`]: monotonic row growth while items are dragged downward.
//! - [`focus`]: which item may show hover/focus state.
//! - [`serialize`]: position-ordered layout output.
//! - [`trace`]: deterministic replay of recorded event streams.
//! - [`config`]: tunables, optionally loaded from TOML/JSON.
//!
//! # Example
//!
//! ```
//! use gridboard_core::{Placement, PointerSample};
//! use gridboard_layout::{GridState, InteractionController, ItemId};
//!
//! let mut grid = GridState::default();
//! let counter = ItemId::new(1).unwrap();
//! grid.register(counter, Placement::new(1, 1, 2, 2), "Counter").unwrap();
//!
//! let mut controller = InteractionController::default();
//! controller.begin_drag(&grid, counter, PointerSample::at(0.0, 0.0, 1200.0));
//! controller.pointer_move(&mut grid, PointerSample::at(200.0, 0.0, 1200.0));
//! controller.pointer_up(&grid);
//!
//! assert_eq!(grid.get(counter).unwrap().placement, Placement::new(3, 1, 2, 2));
//! ```
//!
//! # Feature flags
//!
//! - `tracing`: structured spans and events for sessions, commits and row
//!   growth.
//! - `config-file`: [`GridConfig`] and [`InteractionTrace`] loading from
//!   TOML/JSON.

pub mod collision;
pub mod config;
pub mod focus;
pub mod interaction;
pub mod registry;
pub mod rows;
pub mod serialize;
pub mod trace;

pub use collision::{AxisCollisions, collides, collides_on_axes, has_collision};
pub use config::{GridConfig, GridConfigError};
pub use focus::{ActivationKey, FocusTracker};
pub use interaction::{
    ActiveDimensions, AxisChange, EndReason, InteractionController, InteractionEffect,
    InteractionSession, InteractionState, InteractionTransition, NoopReason, OverlaySignal,
    ResizeEdge, SessionKind, StartSnapshot,
};
pub use registry::{GridItem, GridState, ItemId, RegistryError};
pub use rows::{RowChange, RowExpansionPolicy};
pub use serialize::{LayoutSnapshot, layout_source, sorted_items};
pub use trace::{
    INTERACTION_TRACE_SCHEMA_VERSION, InteractionTrace, ReplayOutcome, TraceError, TraceEvent,
    TraceItem,
};
