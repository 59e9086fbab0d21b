#![forbid(unsafe_code)]

//! Focus tracking for grid items.
//!
//! One item at a time may be focused (selected by click, Enter or Space, or
//! by starting a drag/resize on it). Focus outlives the session that set it
//! and is cleared by a click outside the item.
//!
//! While a session is active only the item under interaction may show hover
//! or focus state; every other item is drawn with a dotted border.

use crate::registry::{GridState, ItemId};

/// Keys that activate a focused item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKey {
    Enter,
    Space,
}

/// Tracks the focused grid item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusTracker {
    focused: Option<ItemId>,
}

impl FocusTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { focused: None }
    }

    /// Currently focused item.
    #[must_use]
    pub const fn focused(&self) -> Option<ItemId> {
        self.focused
    }

    /// Whether `item` may show hover/focus state given the active session.
    #[must_use]
    pub fn can_show_interactive_state(item: ItemId, session_item: Option<ItemId>) -> bool {
        session_item.is_none_or(|active| active == item)
    }

    /// Whether `item` is drawn with the dotted "not under interaction" border.
    #[must_use]
    pub fn show_dotted_border(item: ItemId, session_item: Option<ItemId>) -> bool {
        session_item.is_some_and(|active| active != item)
    }

    /// Focus as rendered: the item is focused and allowed to show it.
    #[must_use]
    pub fn is_focused(&self, item: ItemId, session_item: Option<ItemId>) -> bool {
        self.focused == Some(item) && Self::can_show_interactive_state(item, session_item)
    }

    /// Click on an item. Ignored for items that cannot show interactive state.
    pub fn activate(&mut self, item: ItemId, session_item: Option<ItemId>) -> bool {
        if !Self::can_show_interactive_state(item, session_item) {
            return false;
        }
        self.focused = Some(item);
        true
    }

    /// Key press on an item; only Enter and Space activate.
    pub fn key_activate(
        &mut self,
        item: ItemId,
        key: ActivationKey,
        session_item: Option<ItemId>,
    ) -> bool {
        match key {
            ActivationKey::Enter | ActivationKey::Space => self.activate(item, session_item),
        }
    }

    /// Starting a session focuses its item unconditionally.
    pub(crate) fn focus_session_item(&mut self, item: ItemId) {
        self.focused = Some(item);
    }

    /// Pointer-down outside the focused item.
    ///
    /// Ignored while a session is active. Returns the item that lost focus.
    pub fn click_outside(&mut self, session_item: Option<ItemId>) -> Option<ItemId> {
        if session_item.is_some() {
            return None;
        }
        self.focused.take()
    }

    /// Drop focus from an item that is no longer registered.
    pub fn clear_if_unregistered(&mut self, state: &GridState) -> bool {
        match self.focused {
            Some(item) if !state.contains(item) => {
                self.focused = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use gridboard_core::geometry::Placement;

    use super::*;

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw).expect("test ID must be non-zero")
    }

    #[test]
    fn idle_grid_lets_every_item_react() {
        assert!(FocusTracker::can_show_interactive_state(id(1), None));
        assert!(!FocusTracker::show_dotted_border(id(1), None));
    }

    #[test]
    fn session_isolates_the_active_item() {
        let session = Some(id(2));
        assert!(FocusTracker::can_show_interactive_state(id(2), session));
        assert!(!FocusTracker::can_show_interactive_state(id(1), session));
        assert!(FocusTracker::show_dotted_border(id(1), session));
        assert!(!FocusTracker::show_dotted_border(id(2), session));
    }

    #[test]
    fn activation_moves_focus() {
        let mut focus = FocusTracker::new();
        assert!(focus.activate(id(1), None));
        assert!(focus.key_activate(id(2), ActivationKey::Enter, None));
        assert_eq!(focus.focused(), Some(id(2)));
        assert!(focus.is_focused(id(2), None));
        assert!(!focus.is_focused(id(1), None));
    }

    #[test]
    fn activation_is_ignored_for_other_items_during_session() {
        let mut focus = FocusTracker::new();
        focus.focus_session_item(id(1));
        assert!(!focus.activate(id(2), Some(id(1))));
        assert!(!focus.key_activate(id(2), ActivationKey::Space, Some(id(1))));
        assert_eq!(focus.focused(), Some(id(1)));
    }

    #[test]
    fn click_outside_clears_only_when_idle() {
        let mut focus = FocusTracker::new();
        focus.activate(id(3), None);
        assert_eq!(focus.click_outside(Some(id(3))), None);
        assert_eq!(focus.focused(), Some(id(3)));
        assert_eq!(focus.click_outside(None), Some(id(3)));
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn unregistering_drops_focus() {
        let mut grid = GridState::new(20);
        grid.register(id(1), Placement::new(1, 1, 1, 1), "A")
            .expect("free placement");
        let mut focus = FocusTracker::new();
        focus.activate(id(1), None);
        assert!(!focus.clear_if_unregistered(&grid));
        grid.unregister(id(1));
        assert!(focus.clear_if_unregistered(&grid));
        assert_eq!(focus.focused(), None);
    }
}
