#![forbid(unsafe_code)]

//! Grid item registry.
//!
//! [`GridState`] is the single source of truth for where every card sits. It
//! is an explicit store: the interaction controller receives it by `&mut`
//! for commits, and renderers or the serializer read it by `&` between
//! events. There is no ambient/global registry.
//!
//! # Invariants
//!
//! 1. Every stored placement passes [`Placement::validate`].
//! 2. The occupied-cell sets of any two stored items are disjoint.
//! 3. `row_count >= 1`, and it only shrinks through an explicit container fit.
//!
//! Every mutating entry point checks (1) and (2) before writing, so no
//! sequence of register/update/unregister calls can reach a state that
//! violates them.

use std::collections::BTreeMap;
use std::fmt;

use gridboard_core::geometry::{Placement, PlacementError};
use serde::{Deserialize, Serialize};

use crate::collision::collides;

/// Stable identifier for grid items.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Lowest valid item ID.
    pub const MIN: Self = Self(1);

    /// Create a new item ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, RegistryError> {
        if raw == 0 {
            return Err(RegistryError::ZeroItemId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One placed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    pub id: ItemId,
    pub placement: Placement,
    /// Display name fixed at registration; diagnostics only.
    pub label: String,
    /// Incremented once per committed placement change.
    pub revision: u64,
}

/// The registry: item placements plus the grid's current row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    items: BTreeMap<ItemId, GridItem>,
    row_count: u32,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MIN_ROWS)
    }
}

impl GridState {
    /// Empty grid showing `initial_rows` rows (at least one).
    #[must_use]
    pub fn new(initial_rows: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            row_count: initial_rows.max(1),
        }
    }

    /// Add an item.
    ///
    /// Fails if the id is taken, the placement does not fit the grid, or it
    /// would overlap an existing item. Grows `row_count` to cover the item.
    pub fn register(
        &mut self,
        id: ItemId,
        placement: Placement,
        label: impl Into<String>,
    ) -> Result<(), RegistryError> {
        if self.items.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered { id });
        }
        self.check_placement(id, placement)?;

        self.items.insert(
            id,
            GridItem {
                id,
                placement,
                label: label.into(),
                revision: 0,
            },
        );
        self.row_count = self.row_count.max(placement.last_row());

        #[cfg(feature = "tracing")]
        tracing::debug!(item = id.get(), %placement, "grid item registered");
        Ok(())
    }

    /// Remove an item, returning its last state.
    pub fn unregister(&mut self, id: ItemId) -> Option<GridItem> {
        let removed = self.items.remove(&id);

        #[cfg(feature = "tracing")]
        if removed.is_some() {
            tracing::debug!(item = id.get(), "grid item unregistered");
        }
        removed
    }

    /// Move or resize an item.
    ///
    /// Returns `Ok(false)` when the placement is unchanged; the item's
    /// revision is bumped only on an actual change.
    pub fn update_placement(
        &mut self,
        id: ItemId,
        placement: Placement,
    ) -> Result<bool, RegistryError> {
        let current = self
            .items
            .get(&id)
            .map(|item| item.placement)
            .ok_or(RegistryError::UnknownItem { id })?;
        if current == placement {
            return Ok(false);
        }
        self.check_placement(id, placement)?;

        if let Some(item) = self.items.get_mut(&id) {
            item.placement = placement;
            item.revision = item.revision.saturating_add(1);
        }
        Ok(true)
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&GridItem> {
        self.items.get(&id)
    }

    /// Whether an item is registered.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Iterate items in id order.
    pub fn items(&self) -> impl Iterator<Item = &GridItem> {
        self.items.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rows the grid currently shows.
    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    pub(crate) fn set_row_count(&mut self, rows: u32) {
        self.row_count = rows.max(1);
    }

    /// Lowest row occupied by any item, or 0 for an empty grid.
    #[must_use]
    pub fn occupied_bottom_row(&self) -> u32 {
        self.items
            .values()
            .map(|item| item.placement.last_row())
            .max()
            .unwrap_or(0)
    }

    /// Report invariant violations, one message per problem.
    ///
    /// An empty list means the registry is consistent. Intended for tests and
    /// diagnostics.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for item in self.items.values() {
            if let Err(error) = item.placement.validate() {
                problems.push(format!("item {}: {error}", item.id));
            }
        }
        let items: Vec<&GridItem> = self.items.values().collect();
        for (idx, a) in items.iter().enumerate() {
            for b in &items[idx + 1..] {
                if a.placement.overlaps(&b.placement) {
                    problems.push(format!(
                        "items {} ({}) and {} ({}) overlap",
                        a.id, a.placement, b.id, b.placement
                    ));
                }
            }
        }
        problems
    }

    fn check_placement(&self, id: ItemId, placement: Placement) -> Result<(), RegistryError> {
        if let Err(error) = placement.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(item = id.get(), %placement, %error, "rejected invalid placement");
            return Err(RegistryError::InvalidPlacement { id, error });
        }
        let colliding = collides(&placement, id, self);
        if !colliding.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                item = id.get(),
                %placement,
                colliding = colliding.len(),
                "rejected overlapping placement"
            );
            return Err(RegistryError::Overlap {
                id,
                placement,
                colliding: colliding.into_iter().collect(),
            });
        }
        Ok(())
    }
}

/// Registry mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    ZeroItemId,
    AlreadyRegistered {
        id: ItemId,
    },
    UnknownItem {
        id: ItemId,
    },
    InvalidPlacement {
        id: ItemId,
        error: PlacementError,
    },
    Overlap {
        id: ItemId,
        placement: Placement,
        colliding: Vec<ItemId>,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroItemId => write!(f, "item id 0 is reserved"),
            Self::AlreadyRegistered { id } => write!(f, "item {id} is already registered"),
            Self::UnknownItem { id } => write!(f, "item {id} is not registered"),
            Self::InvalidPlacement { id, error } => {
                write!(f, "item {id} has an invalid placement: {error}")
            }
            Self::Overlap {
                id,
                placement,
                colliding,
            } => {
                write!(f, "item {id} at {placement} would overlap")?;
                for other in colliding {
                    write!(f, " {other}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::InvalidPlacement { error, .. } = self {
            return Some(error);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw).expect("test ID must be non-zero")
    }

    #[test]
    fn zero_item_id_is_rejected() {
        assert_eq!(ItemId::new(0), Err(RegistryError::ZeroItemId));
        assert_eq!(ItemId::MIN.get(), 1);
    }

    #[test]
    fn register_and_lookup() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 4, 3), "Counter")
            .expect("free placement");
        let item = grid.get(id(1)).expect("registered");
        assert_eq!(item.label, "Counter");
        assert_eq!(item.revision, 0);
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(id(1)));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 1, 1), "A")
            .expect("free placement");
        assert_eq!(
            grid.register(id(1), Placement::new(5, 5, 1, 1), "A"),
            Err(RegistryError::AlreadyRegistered { id: id(1) })
        );
    }

    #[test]
    fn overlapping_registration_is_rejected() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 2, 6), "Counter")
            .expect("free placement");
        let err = grid
            .register(id(2), Placement::new(2, 3, 2, 2), "Counter")
            .expect_err("overlaps item 1");
        assert_eq!(
            err,
            RegistryError::Overlap {
                id: id(2),
                placement: Placement::new(2, 3, 2, 2),
                colliding: vec![id(1)],
            }
        );
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn invalid_registration_is_rejected() {
        let mut grid = GridState::new(20);
        let err = grid
            .register(id(1), Placement::new(11, 1, 4, 1), "Wide")
            .expect_err("overflows column 12");
        assert!(matches!(err, RegistryError::InvalidPlacement { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn registration_grows_rows_to_cover_item() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 18, 1, 6), "Tall")
            .expect("free placement");
        assert_eq!(grid.row_count(), 23);
        assert_eq!(grid.occupied_bottom_row(), 23);
    }

    #[test]
    fn update_bumps_revision_only_on_change() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 2, 2), "A")
            .expect("free placement");

        assert_eq!(grid.update_placement(id(1), Placement::new(1, 1, 2, 2)), Ok(false));
        assert_eq!(grid.get(id(1)).map(|i| i.revision), Some(0));

        assert_eq!(grid.update_placement(id(1), Placement::new(3, 1, 2, 2)), Ok(true));
        assert_eq!(grid.get(id(1)).map(|i| i.revision), Some(1));
    }

    #[test]
    fn update_rejects_overlap_and_unknown() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 2, 2), "A")
            .expect("free placement");
        grid.register(id(2), Placement::new(3, 1, 2, 2), "B")
            .expect("free placement");

        assert!(matches!(
            grid.update_placement(id(1), Placement::new(2, 1, 2, 2)),
            Err(RegistryError::Overlap { .. })
        ));
        assert_eq!(
            grid.update_placement(id(9), Placement::new(1, 5, 1, 1)),
            Err(RegistryError::UnknownItem { id: id(9) })
        );
        assert_eq!(grid.get(id(1)).map(|i| i.placement), Some(Placement::new(1, 1, 2, 2)));
    }

    #[test]
    fn unregister_frees_cells() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 2, 2), "A")
            .expect("free placement");
        let removed = grid.unregister(id(1)).expect("was registered");
        assert_eq!(removed.label, "A");
        assert!(grid.unregister(id(1)).is_none());
        grid.register(id(2), Placement::new(1, 1, 2, 2), "B")
            .expect("cells are free again");
    }

    #[test]
    fn invariants_hold_after_mixed_operations() {
        let mut grid = GridState::new(20);
        for raw in 1..=6 {
            let col = (raw as u32 - 1) * 2 + 1;
            grid.register(id(raw), Placement::new(col, 1, 2, 3), format!("Card{raw}"))
                .expect("disjoint columns");
        }
        let _ = grid.update_placement(id(1), Placement::new(1, 4, 12, 1));
        let _ = grid.update_placement(id(2), Placement::new(1, 4, 2, 1));
        grid.unregister(id(3));
        assert!(grid.check_invariants().is_empty(), "{:?}", grid.check_invariants());
    }

    #[test]
    fn error_messages_name_the_items() {
        let err = RegistryError::Overlap {
            id: id(2),
            placement: Placement::new(1, 1, 1, 1),
            colliding: vec![id(1), id(3)],
        };
        assert_eq!(err.to_string(), "item #2 at col 1+1 row 1+1 would overlap #1 #3");
    }
}
