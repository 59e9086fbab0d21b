#![forbid(unsafe_code)]

//! Row expansion policy.
//!
//! The grid is unbounded below, but it only renders `row_count` rows. When a
//! candidate placement reaches past the last visible row the grid grows by
//! the requested row plus a buffer, so a slow drag does not expand on every
//! pixel of overshoot. Growth is monotonic while a session is active; only
//! [`RowExpansionPolicy::fit_rows_to_container`] outside a session can shrink
//! the grid, and never below the occupied area.

use crate::registry::GridState;

/// A change of the grid's row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChange {
    pub from: u32,
    pub to: u32,
}

impl RowChange {
    #[must_use]
    pub const fn is_growth(&self) -> bool {
        self.to > self.from
    }
}

/// Row growth parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowExpansionPolicy {
    /// Floor for the row count.
    pub min_rows: u32,
    /// Rows added past the requested row on expansion.
    pub buffer_rows: u32,
}

impl Default for RowExpansionPolicy {
    fn default() -> Self {
        Self {
            min_rows: crate::config::DEFAULT_MIN_ROWS,
            buffer_rows: crate::config::DEFAULT_BUFFER_ROWS,
        }
    }
}

impl RowExpansionPolicy {
    /// Grow to `max(row_count, requested_row + buffer_rows)`.
    ///
    /// Never shrinks. Returns the change when the row count grew.
    pub fn expand_rows_if_needed(
        &self,
        state: &mut GridState,
        requested_row: u32,
    ) -> Option<RowChange> {
        let from = state.row_count();
        let to = from.max(requested_row.saturating_add(self.buffer_rows));
        if to == from {
            return None;
        }
        state.set_row_count(to);

        #[cfg(feature = "tracing")]
        tracing::info!(from, to, requested_row, "grid rows expanded");
        Some(RowChange { from, to })
    }

    /// Rows needed to fill a container of `container_height` pixels.
    ///
    /// `max(min_rows, ceil(container_height / row_height))`; a container that
    /// has not been measured yields `min_rows`.
    #[must_use]
    pub fn rows_for_container(&self, container_height: f64, row_height: f64) -> u32 {
        let floor = self.min_rows.max(1);
        if !container_height.is_finite()
            || container_height <= 0.0
            || !row_height.is_finite()
            || row_height <= 0.0
        {
            return floor;
        }
        let fitted = (container_height / row_height).ceil();
        if fitted >= f64::from(u32::MAX) {
            return u32::MAX;
        }
        floor.max(fitted as u32)
    }

    /// Recompute the row count after the container was resized.
    ///
    /// The result never hides an occupied row. While `session_active` the
    /// fit may only grow the grid.
    pub fn fit_rows_to_container(
        &self,
        state: &mut GridState,
        container_height: f64,
        row_height: f64,
        session_active: bool,
    ) -> Option<RowChange> {
        let from = state.row_count();
        let mut to = self
            .rows_for_container(container_height, row_height)
            .max(state.occupied_bottom_row());
        if session_active {
            to = to.max(from);
        }
        if to == from {
            return None;
        }
        state.set_row_count(to);
        let change = RowChange { from, to };

        #[cfg(feature = "tracing")]
        if change.is_growth() {
            tracing::info!(from, to, container_height, "grid rows fitted to container");
        } else {
            tracing::debug!(from, to, container_height, "grid rows trimmed to container");
        }
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use gridboard_core::geometry::Placement;

    use super::*;
    use crate::registry::ItemId;

    #[test]
    fn expansion_adds_buffer_past_requested_row() {
        let policy = RowExpansionPolicy::default();
        let mut grid = GridState::new(20);
        let change = policy.expand_rows_if_needed(&mut grid, 25);
        assert_eq!(change, Some(RowChange { from: 20, to: 30 }));
        assert_eq!(grid.row_count(), 30);
    }

    #[test]
    fn expansion_never_shrinks() {
        let policy = RowExpansionPolicy::default();
        let mut grid = GridState::new(40);
        assert_eq!(policy.expand_rows_if_needed(&mut grid, 3), None);
        assert_eq!(grid.row_count(), 40);
    }

    #[test]
    fn container_rows_round_up_with_floor() {
        let policy = RowExpansionPolicy::default();
        assert_eq!(policy.rows_for_container(200.0, 40.0), 20);
        assert_eq!(policy.rows_for_container(1001.0, 40.0), 26);
        assert_eq!(policy.rows_for_container(0.0, 40.0), 20);
        assert_eq!(policy.rows_for_container(f64::NAN, 40.0), 20);
    }

    #[test]
    fn fit_shrinks_only_when_idle_and_never_past_items() {
        let policy = RowExpansionPolicy::default();
        let mut grid = GridState::new(20);
        let id = ItemId::new(1).expect("non-zero");
        grid.register(id, Placement::new(1, 30, 2, 4), "Tall")
            .expect("free placement");
        assert_eq!(grid.row_count(), 33);

        // Growing the container grows the grid.
        let grown = policy.fit_rows_to_container(&mut grid, 1600.0, 40.0, false);
        assert_eq!(grown, Some(RowChange { from: 33, to: 40 }));
        assert!(grown.is_some_and(|c| c.is_growth()));

        // A smaller container during a session leaves rows alone.
        assert_eq!(policy.fit_rows_to_container(&mut grid, 400.0, 40.0, true), None);
        assert_eq!(grid.row_count(), 40);

        // Idle shrink stops at the occupied bottom row.
        let shrunk = policy.fit_rows_to_container(&mut grid, 400.0, 40.0, false);
        assert_eq!(shrunk, Some(RowChange { from: 40, to: 33 }));
    }
}
