#![forbid(unsafe_code)]

//! Grid geometry primitives.
//!
//! The grid is a fixed [`GRID_COLUMNS`]-wide, unbounded-height lattice of
//! cells addressed 1-based by `(column, row)`. Placements are stored in cell
//! units; pixel values only appear at the pointer boundary and are converted
//! through [`CellMetrics`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of columns in every grid.
pub const GRID_COLUMNS: u32 = 12;

/// Round to the nearest integer, sending half-way values toward `+inf`.
///
/// `2.5 -> 3`, `-2.5 -> -2`. Pointer deltas are quantized with this rule so
/// that dragging left and right by the same half cell is not symmetric.
#[inline]
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Clamp a candidate column start so an item of `col_span` stays on the grid.
///
/// The valid range is `1..=GRID_COLUMNS + 1 - col_span`.
#[must_use]
pub fn clamp_col_start(candidate: i64, col_span: u32) -> u32 {
    let max_start = i64::from(GRID_COLUMNS + 1).saturating_sub(i64::from(col_span.max(1)));
    candidate.clamp(1, max_start.max(1)) as u32
}

/// Clamp a candidate row start to the top of the grid (rows are unbounded below).
#[must_use]
pub fn clamp_row_start(candidate: i64) -> u32 {
    candidate.clamp(1, i64::from(u32::MAX)) as u32
}

/// One grid cell, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

impl Cell {
    #[inline]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// A rectangle of grid cells.
///
/// Occupies `{(c, r) : col_start <= c < col_start + col_span,
/// row_start <= r < row_start + row_span}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Leftmost occupied column (1-based).
    pub col_start: u32,
    /// Topmost occupied row (1-based).
    pub row_start: u32,
    /// Number of columns occupied.
    pub col_span: u32,
    /// Number of rows occupied.
    pub row_span: u32,
}

impl Placement {
    /// Create a new placement. No validation is performed; see [`Placement::validate`].
    #[inline]
    pub const fn new(col_start: u32, row_start: u32, col_span: u32, row_span: u32) -> Self {
        Self {
            col_start,
            row_start,
            col_span,
            row_span,
        }
    }

    /// Rightmost occupied column (inclusive).
    #[inline]
    pub const fn last_col(&self) -> u32 {
        self.col_start
            .saturating_add(self.col_span)
            .saturating_sub(1)
    }

    /// Bottommost occupied row (inclusive).
    #[inline]
    pub const fn last_row(&self) -> u32 {
        self.row_start
            .saturating_add(self.row_span)
            .saturating_sub(1)
    }

    /// Copy with the horizontal placement replaced.
    #[inline]
    #[must_use]
    pub const fn with_columns(self, col_start: u32, col_span: u32) -> Self {
        Self {
            col_start,
            col_span,
            ..self
        }
    }

    /// Copy with the vertical placement replaced.
    #[inline]
    #[must_use]
    pub const fn with_rows(self, row_start: u32, row_span: u32) -> Self {
        Self {
            row_start,
            row_span,
            ..self
        }
    }

    /// Whether the horizontal placement differs from `other`.
    #[inline]
    pub const fn columns_differ(&self, other: &Self) -> bool {
        self.col_start != other.col_start || self.col_span != other.col_span
    }

    /// Whether the vertical placement differs from `other`.
    #[inline]
    pub const fn rows_differ(&self, other: &Self) -> bool {
        self.row_start != other.row_start || self.row_span != other.row_span
    }

    /// Number of occupied cells.
    #[inline]
    pub const fn cell_count(&self) -> u64 {
        self.col_span as u64 * self.row_span as u64
    }

    /// Check whether a cell is occupied by this placement.
    #[inline]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.col_start
            && cell.col <= self.last_col()
            && cell.row >= self.row_start
            && cell.row <= self.last_row()
            && self.col_span > 0
            && self.row_span > 0
    }

    /// Iterate the occupied-cell set, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.col_start..self.col_start.saturating_add(self.col_span);
        (self.row_start..self.row_start.saturating_add(self.row_span))
            .flat_map(move |row| cols.clone().map(move |col| Cell::new(col, row)))
    }

    /// Check whether the occupied-cell sets of two placements intersect.
    #[inline]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.col_span == 0 || self.row_span == 0 || other.col_span == 0 || other.row_span == 0
        {
            return false;
        }
        self.col_start <= other.last_col()
            && other.col_start <= self.last_col()
            && self.row_start <= other.last_row()
            && other.row_start <= self.last_row()
    }

    /// Validate against the grid bounds.
    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.col_start == 0 || self.col_start > GRID_COLUMNS {
            return Err(PlacementError::ColumnOutOfRange {
                col_start: self.col_start,
            });
        }
        if self.row_start == 0 {
            return Err(PlacementError::RowOutOfRange);
        }
        if self.col_span == 0 {
            return Err(PlacementError::ZeroColumnSpan);
        }
        if self.row_span == 0 {
            return Err(PlacementError::ZeroRowSpan);
        }
        if self.col_start.saturating_add(self.col_span) > GRID_COLUMNS + 1 {
            return Err(PlacementError::ColumnOverflow {
                col_start: self.col_start,
                col_span: self.col_span,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "col {}+{} row {}+{}",
            self.col_start, self.col_span, self.row_start, self.row_span
        )
    }
}

/// Reasons a placement does not fit the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    ColumnOutOfRange { col_start: u32 },
    RowOutOfRange,
    ZeroColumnSpan,
    ZeroRowSpan,
    ColumnOverflow { col_start: u32, col_span: u32 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnOutOfRange { col_start } => {
                write!(f, "column start {col_start} outside 1..={GRID_COLUMNS}")
            }
            Self::RowOutOfRange => write!(f, "row start must be >= 1"),
            Self::ZeroColumnSpan => write!(f, "column span must be >= 1"),
            Self::ZeroRowSpan => write!(f, "row span must be >= 1"),
            Self::ColumnOverflow { col_start, col_span } => write!(
                f,
                "columns {col_start}+{col_span} extend past column {GRID_COLUMNS}"
            ),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Pixel-to-cell conversion for one measurement of the grid container.
///
/// Cell width is derived live from the container's rendered width; row
/// height is fixed by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    cell_width: f64,
    row_height: f64,
}

impl CellMetrics {
    /// Build metrics from the container width.
    ///
    /// Returns `None` when the container has not been measured yet (width or
    /// row height non-finite or not positive).
    #[must_use]
    pub fn from_grid_width(grid_width: f64, row_height: f64) -> Option<Self> {
        if !grid_width.is_finite() || grid_width <= 0.0 {
            return None;
        }
        if !row_height.is_finite() || row_height <= 0.0 {
            return None;
        }
        Some(Self {
            cell_width: grid_width / f64::from(GRID_COLUMNS),
            row_height,
        })
    }

    #[inline]
    pub const fn cell_width(&self) -> f64 {
        self.cell_width
    }

    #[inline]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Whole columns covered by a horizontal pixel delta.
    #[inline]
    pub fn columns_for(&self, dx: f64) -> i64 {
        round_half_up(dx / self.cell_width)
    }

    /// Whole rows covered by a vertical pixel delta.
    #[inline]
    pub fn rows_for(&self, dy: f64) -> i64 {
        round_half_up(dy / self.row_height)
    }

    /// Pixel width of `col_span` columns.
    #[inline]
    pub fn width_of(&self, col_span: u32) -> f64 {
        f64::from(col_span) * self.cell_width
    }

    /// Pixel height of `row_span` rows.
    #[inline]
    pub fn height_of(&self, row_span: u32) -> f64 {
        f64::from(row_span) * self.row_height
    }

    /// Column span for a pixel width, clamped to `1..=GRID_COLUMNS`.
    pub fn col_span_for_width(&self, width: f64) -> u32 {
        self.columns_for(width)
            .clamp(1, i64::from(GRID_COLUMNS)) as u32
    }

    /// Row span for a pixel height, at least 1.
    pub fn row_span_for_height(&self, height: f64) -> u32 {
        self.rows_for(height).clamp(1, i64::from(u32::MAX)) as u32
    }
}
