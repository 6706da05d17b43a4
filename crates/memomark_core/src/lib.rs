//! Core domain logic for MemoMark, a markdown note store.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use clock::{format_timestamp, Clock, SystemClock, TIMESTAMP_FORMAT};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    ContentSource, Document, DocumentDraft, DocumentId, DocumentStatus, DocumentValidationError,
};
pub use model::preferences::{DisplayMode, Preferences, DEFAULT_THEME_COLOR};
pub use repo::document_repo::{
    DocumentRepository, RepoError, RepoResult, SqliteDocumentRepository,
};
pub use repo::preferences_repo::{PreferencesRepository, SqlitePreferencesRepository};
pub use service::document_service::{
    DeleteOutcome, DocumentService, DocumentServiceError, ServiceResult,
};
pub use view::home_state::{DeletePrompt, HomeEvent, HomeViewState, PendingDelete};
pub use view::projection::{project, Category, SortOrder};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
