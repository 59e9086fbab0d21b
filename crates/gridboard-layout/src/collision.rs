#![forbid(unsafe_code)]

//! Collision queries against the registry.
//!
//! Both queries are pure: they read [`GridState`] and return which items a
//! candidate placement would share a cell with. Placements are whole-cell
//! rectangles, so two of them share a cell exactly when their rectangles
//! overlap; no query walks individual cells.

use std::collections::BTreeSet;

use gridboard_core::geometry::Placement;

use crate::registry::{GridState, ItemId};

/// Items whose occupied cells intersect `candidate`, ignoring `excluding`.
///
/// Returned in id order so callers and diagnostics are deterministic.
#[must_use]
pub fn collides(candidate: &Placement, excluding: ItemId, state: &GridState) -> BTreeSet<ItemId> {
    state
        .items()
        .filter(|item| item.id != excluding && candidate.overlaps(&item.placement))
        .map(|item| item.id)
        .collect()
}

/// Whether `candidate` collides with any item other than `excluding`.
#[must_use]
pub fn has_collision(candidate: &Placement, excluding: ItemId, state: &GridState) -> bool {
    state
        .items()
        .any(|item| item.id != excluding && candidate.overlaps(&item.placement))
}

/// Per-axis collision outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisCollisions {
    /// The column change collides (rows held at the original placement).
    pub horizontal: bool,
    /// The row change collides (columns held at the original placement).
    pub vertical: bool,
}

impl AxisCollisions {
    /// Neither axis is blocked.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        !self.horizontal && !self.vertical
    }
}

/// Axis-decomposed collision test.
///
/// The horizontal test takes the columns of `horizontal` and the rows of
/// `original`; the vertical test takes the rows of `vertical` and the
/// columns of `original`. An axis with no candidate reports no collision.
#[must_use]
pub fn collides_on_axes(
    item: ItemId,
    horizontal: Option<&Placement>,
    vertical: Option<&Placement>,
    original: &Placement,
    state: &GridState,
) -> AxisCollisions {
    let horizontal = horizontal.is_some_and(|candidate| {
        let probe = original.with_columns(candidate.col_start, candidate.col_span);
        has_collision(&probe, item, state)
    });
    let vertical = vertical.is_some_and(|candidate| {
        let probe = original.with_rows(candidate.row_start, candidate.row_span);
        has_collision(&probe, item, state)
    });
    AxisCollisions {
        horizontal,
        vertical,
    }
}
