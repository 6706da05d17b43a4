//! Serializable home-screen state driven by discrete events.
//!
//! The UI shell renders from a `HomeViewState` value and reports user actions
//! as `HomeEvent`s; `apply` returns the next state without side effects.

use crate::model::document::{Document, DocumentId};
use crate::model::preferences::{DisplayMode, Preferences};
use crate::view::projection::{Category, SortOrder};
use serde::{Deserialize, Serialize};

/// Confirmation shown after a long-press delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePrompt {
    /// Document is active; confirming moves it to the archive.
    ConfirmArchive,
    /// Document is already archived; confirming removes it for good.
    ConfirmPermanentDelete,
}

impl DeletePrompt {
    pub fn for_document(document: &Document) -> Self {
        if document.is_archived {
            Self::ConfirmPermanentDelete
        } else {
            Self::ConfirmArchive
        }
    }
}

/// Delete confirmation awaiting the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelete {
    pub document_id: DocumentId,
    pub prompt: DeletePrompt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeViewState {
    pub category: Category,
    pub sort_order: SortOrder,
    pub display_mode: DisplayMode,
    pub pending_delete: Option<PendingDelete>,
}

/// User intent reported by the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum HomeEvent {
    SwitchCategory(Category),
    ChangeSortOrder(SortOrder),
    ChangeDisplayMode(DisplayMode),
    RequestDelete(PendingDelete),
    DismissDelete,
}

impl HomeViewState {
    /// Seeds the state from persisted preferences.
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            sort_order: preferences.sort_order,
            display_mode: preferences.display_mode,
            ..Self::default()
        }
    }

    /// Returns the state after `event`.
    ///
    /// Switching category drops any pending delete prompt, since the
    /// targeted row may no longer be on screen.
    pub fn apply(self, event: HomeEvent) -> Self {
        match event {
            HomeEvent::SwitchCategory(category) => Self {
                category,
                pending_delete: None,
                ..self
            },
            HomeEvent::ChangeSortOrder(sort_order) => Self { sort_order, ..self },
            HomeEvent::ChangeDisplayMode(display_mode) => Self {
                display_mode,
                ..self
            },
            HomeEvent::RequestDelete(pending) => Self {
                pending_delete: Some(pending),
                ..self
            },
            HomeEvent::DismissDelete => Self {
                pending_delete: None,
                ..self
            },
        }
    }

    /// Copies sort and display choices back into `preferences`.
    pub fn write_preferences(&self, preferences: &mut Preferences) {
        preferences.sort_order = self.sort_order;
        preferences.display_mode = self.display_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::{DeletePrompt, HomeEvent, HomeViewState, PendingDelete};
    use crate::model::preferences::{DisplayMode, Preferences};
    use crate::view::projection::{Category, SortOrder};

    #[test]
    fn switching_category_clears_pending_delete() {
        let state = HomeViewState::default()
            .apply(HomeEvent::RequestDelete(PendingDelete {
                document_id: 7,
                prompt: DeletePrompt::ConfirmArchive,
            }))
            .apply(HomeEvent::SwitchCategory(Category::Archived));
        assert_eq!(state.category, Category::Archived);
        assert!(state.pending_delete.is_none());
    }

    #[test]
    fn state_round_trips_through_preferences() {
        let mut preferences = Preferences::default();
        let state = HomeViewState::from_preferences(&preferences)
            .apply(HomeEvent::ChangeSortOrder(SortOrder::TitleAsc))
            .apply(HomeEvent::ChangeDisplayMode(DisplayMode::Grid));
        state.write_preferences(&mut preferences);
        assert_eq!(preferences.sort_order, SortOrder::TitleAsc);
        assert_eq!(preferences.display_mode, DisplayMode::Grid);
        assert_eq!(HomeViewState::from_preferences(&preferences).category, Category::Created);
    }
}
