#![forbid(unsafe_code)]

//! Core: grid geometry and pointer samples.
//!
//! # Role in gridboard
//! `gridboard-core` is the measurement layer. It owns the fixed 12-column
//! grid model, cell/pixel conversion, and the pointer sample type that the
//! interaction controller consumes on every pointer-move.
//!
//! # Primary responsibilities
//! - **Placement**: a 1-based cell rectangle with its occupied-cell set.
//! - **CellMetrics**: live pixel-to-cell conversion from the container width.
//! - **PointerSample**: pointer position, page scroll, and container width
//!   captured at one instant.
//!
//! # How it fits in the system
//! `gridboard-layout` builds the item registry, collision detector, and
//! drag/resize state machine on top of these types. Nothing in this crate
//! holds state.

pub mod event;
pub mod geometry;

pub use event::{PixelDelta, PointerPosition, PointerSample, ScrollOffset};
pub use geometry::{
    Cell, CellMetrics, GRID_COLUMNS, Placement, PlacementError, clamp_col_start, clamp_row_start,
    round_half_up,
};
