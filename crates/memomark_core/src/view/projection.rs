//! Category filter + sort projection for document lists.
//!
//! # Invariants
//! - `project` is total and pure: no I/O, no errors.
//! - Sorting is stable; equal keys keep the input order.
//! - Title order is case-sensitive ordinal (`"Apple" < "banana" < "cherry"`,
//!   and every uppercase ASCII letter sorts before lowercase).
//! - Date order compares the fixed-width timestamp strings, which matches
//!   chronological order.

use crate::model::document::{Document, DocumentStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Named list filter shown by the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Internal and external documents that are not archived.
    #[default]
    Created,
    /// Recently opened documents; membership is decided by the caller.
    Viewed,
    /// Starred, non-archived documents.
    Starred,
    Archived,
}

impl Category {
    /// Returns whether `document` belongs to this category.
    ///
    /// `Viewed` accepts everything: the caller already supplies the subset.
    pub fn matches(self, document: &Document) -> bool {
        match self {
            Self::Created => matches!(
                document.status(),
                DocumentStatus::Internal | DocumentStatus::External
            ),
            Self::Viewed => true,
            Self::Starred => document.is_starred && document.status() != DocumentStatus::Archived,
            Self::Archived => document.status() == DocumentStatus::Archived,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Viewed => "viewed",
            Self::Starred => "starred",
            Self::Archived => "archived",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "viewed" => Some(Self::Viewed),
            "starred" => Some(Self::Starred),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Comparator selection for document lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    TitleAsc,
    TitleDesc,
    CreatedDateAsc,
    CreatedDateDesc,
    ModifiedDateAsc,
    #[default]
    ModifiedDateDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        Self::TitleAsc,
        Self::TitleDesc,
        Self::CreatedDateAsc,
        Self::CreatedDateDesc,
        Self::ModifiedDateAsc,
        Self::ModifiedDateDesc,
    ];

    /// Compares two documents according to this order.
    pub fn compare(self, left: &Document, right: &Document) -> Ordering {
        match self {
            Self::TitleAsc => left.title.cmp(&right.title),
            Self::TitleDesc => right.title.cmp(&left.title),
            Self::CreatedDateAsc => left.created_date.cmp(&right.created_date),
            Self::CreatedDateDesc => right.created_date.cmp(&left.created_date),
            Self::ModifiedDateAsc => left.modified_date.cmp(&right.modified_date),
            Self::ModifiedDateDesc => right.modified_date.cmp(&left.modified_date),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
            Self::CreatedDateAsc => "created_date_asc",
            Self::CreatedDateDesc => "created_date_desc",
            Self::ModifiedDateAsc => "modified_date_asc",
            Self::ModifiedDateDesc => "modified_date_desc",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.label() == value)
    }
}

/// Filters `documents` by `category` and orders them by `sort_order`.
pub fn project(
    documents: impl IntoIterator<Item = Document>,
    category: Category,
    sort_order: SortOrder,
) -> Vec<Document> {
    let mut visible: Vec<Document> = documents
        .into_iter()
        .filter(|document| category.matches(document))
        .collect();
    // `sort_by` is stable.
    visible.sort_by(|left, right| sort_order.compare(left, right));
    visible
}
