//! Markdown document domain model.
//!
//! # Responsibility
//! - Define the canonical record behind every document list and editor view.
//! - Provide lifecycle helpers for archive/restore/star transitions.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another document.
//! - An archived document is never starred.
//! - `created_date` never changes; `modified_date >= created_date`.
//! - Both timestamps use the fixed `yyyy-MM-dd HH:mm:ss` layout, so string
//!   order equals chronological order.

use crate::clock::{format_timestamp, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-generated surrogate key.
pub type DocumentId = i64;

/// Byte length of `yyyy-MM-dd HH:mm:ss`.
const TIMESTAMP_LEN: usize = 19;

/// Where the markdown body lives.
///
/// Replaces a nullable file reference paired with a status flag: a linked
/// document always carries its reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reference", rename_all = "snake_case")]
pub enum ContentSource {
    /// Content fully owned by the app store.
    Local,
    /// Content mirrors an externally stored file (opaque URI).
    Linked(String),
}

impl ContentSource {
    /// Returns the external reference for linked documents.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Local => None,
            Self::Linked(reference) => Some(reference.as_str()),
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked(_))
    }
}

/// Lifecycle stage as seen by list filters and persisted in `markdown.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Content owned and stored by the app.
    Internal,
    /// Content backed by an external file reference.
    External,
    /// Soft-deleted, pending permanent deletion.
    Archived,
}

/// Validation failures for document writes and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    StarredWhileArchived,
    EmptySourceReference,
    InvalidTimestamp {
        field: &'static str,
        value: String,
    },
    ModifiedBeforeCreated {
        created_date: String,
        modified_date: String,
    },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StarredWhileArchived => write!(f, "archived documents cannot be starred"),
            Self::EmptySourceReference => {
                write!(f, "linked documents require a non-empty source reference")
            }
            Self::InvalidTimestamp { field, value } => write!(
                f,
                "{field} `{value}` is not a valid yyyy-MM-dd HH:mm:ss timestamp"
            ),
            Self::ModifiedBeforeCreated {
                created_date,
                modified_date,
            } => write!(
                f,
                "modified_date `{modified_date}` is earlier than created_date `{created_date}`"
            ),
        }
    }
}

impl Error for DocumentValidationError {}

/// Input for creating a document; storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
    pub source: ContentSource,
    pub is_archived: bool,
    pub is_starred: bool,
}

impl DocumentDraft {
    /// Draft for a note written inside the app.
    pub fn local(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: ContentSource::Local,
            is_archived: false,
            is_starred: false,
        }
    }

    /// Draft for an imported file; `reference` is the opaque location handed
    /// over by the file picker.
    pub fn linked(
        title: impl Into<String>,
        content: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            source: ContentSource::Linked(reference.into()),
            ..Self::local(title, content)
        }
    }

    pub fn starred(mut self, is_starred: bool) -> Self {
        self.is_starred = is_starred;
        self
    }

    pub fn status(&self) -> DocumentStatus {
        derive_status(&self.source, self.is_archived)
    }

    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_flags(&self.source, self.is_archived, self.is_starred)
    }
}

/// Canonical persisted markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub source: ContentSource,
    /// Soft-delete flag; the original source is kept so restore is lossless.
    pub is_archived: bool,
    pub is_starred: bool,
    pub created_date: String,
    pub modified_date: String,
}

impl Document {
    pub fn status(&self) -> DocumentStatus {
        derive_status(&self.source, self.is_archived)
    }

    /// Moves the document to the archive. Archiving always clears the star.
    pub fn archive(&mut self) {
        self.is_archived = true;
        self.is_starred = false;
    }

    /// Brings an archived document back to its internal/external state.
    pub fn restore(&mut self) {
        self.is_archived = false;
    }

    pub fn toggle_star(&mut self) {
        self.is_starred = !self.is_starred;
    }

    /// Validates the caller-writable state: flags and source.
    ///
    /// Timestamps are owned by storage and not checked here.
    pub fn validate_state(&self) -> Result<(), DocumentValidationError> {
        validate_flags(&self.source, self.is_archived, self.is_starred)
    }

    /// Validates flag and timestamp invariants.
    ///
    /// # Errors
    /// - `StarredWhileArchived` when both flags are set.
    /// - `EmptySourceReference` for a blank linked reference.
    /// - `InvalidTimestamp` / `ModifiedBeforeCreated` for malformed dates.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        self.validate_state()?;
        validate_timestamp("created_date", &self.created_date)?;
        validate_timestamp("modified_date", &self.modified_date)?;
        if self.modified_date < self.created_date {
            return Err(DocumentValidationError::ModifiedBeforeCreated {
                created_date: self.created_date.clone(),
                modified_date: self.modified_date.clone(),
            });
        }
        Ok(())
    }
}

/// Checks that `value` is a real calendar time written in the fixed
/// persisted layout.
///
/// Values must re-format to themselves, which rules out non-ASCII digits,
/// missing zero padding and impossible dates.
pub fn validate_timestamp(field: &'static str, value: &str) -> Result<(), DocumentValidationError> {
    let canonical = value.len() == TIMESTAMP_LEN
        && NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .is_ok_and(|parsed| format_timestamp(parsed) == value);
    if canonical {
        Ok(())
    } else {
        Err(DocumentValidationError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
    }
}

fn derive_status(source: &ContentSource, is_archived: bool) -> DocumentStatus {
    if is_archived {
        return DocumentStatus::Archived;
    }
    match source {
        ContentSource::Local => DocumentStatus::Internal,
        ContentSource::Linked(_) => DocumentStatus::External,
    }
}

fn validate_flags(
    source: &ContentSource,
    is_archived: bool,
    is_starred: bool,
) -> Result<(), DocumentValidationError> {
    if is_archived && is_starred {
        return Err(DocumentValidationError::StarredWhileArchived);
    }
    if let ContentSource::Linked(reference) = source {
        if reference.trim().is_empty() {
            return Err(DocumentValidationError::EmptySourceReference);
        }
    }
    Ok(())
}
