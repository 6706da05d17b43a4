//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level document and preference functions to Dart.
//! - Convert core errors into response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Enum values cross the boundary as snake_case labels.

use log::warn;
use memomark_core::db::open_db;
use memomark_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, DeleteOutcome, DisplayMode, Document, DocumentService, DocumentStatus,
    Preferences, PreferencesRepository, SortOrder, SqliteDocumentRepository,
    SqlitePreferencesRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "memomark.sqlite3";
const DB_PATH_ENV: &str = "MEMOMARK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Document shape rendered by list and editor screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// `internal|external|archived`.
    pub status: String,
    /// External file reference, kept while archived.
    pub source_uri: Option<String>,
    pub is_starred: bool,
    pub created_date: String,
    pub modified_date: String,
}

/// Envelope for single-document mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentActionResponse {
    pub ok: bool,
    /// Stored document after the action; `None` on failure or deletion.
    pub document: Option<DocumentItem>,
    pub message: String,
}

impl DocumentActionResponse {
    fn success(message: impl Into<String>, document: Option<Document>) -> Self {
        Self {
            ok: true,
            document: document.map(to_document_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            document: None,
            message: message.into(),
        }
    }
}

/// Envelope for category list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListResponse {
    pub ok: bool,
    pub items: Vec<DocumentItem>,
    pub message: String,
}

/// Preference values as FFI-friendly primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesResponse {
    pub ok: bool,
    pub sort_order: String,
    /// `list|grid`.
    pub display_mode: String,
    pub auto_save_enabled: bool,
    pub theme_color: u32,
    pub message: String,
}

/// Creates an app-owned document.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_create(title: String, content: String) -> DocumentActionResponse {
    respond("doc_create", "Document created.", |service| {
        service.create_document(title, content).map(Some)
    })
}

/// Creates a document linked to an imported file reference.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_import(title: String, content: String, uri: String) -> DocumentActionResponse {
    respond("doc_import", "Document imported.", |service| {
        service.import_document(title, content, uri.trim()).map(Some)
    })
}

/// Replaces title and content of an existing document.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_update(id: i64, title: String, content: String) -> DocumentActionResponse {
    respond("doc_update", "Document saved.", |service| {
        service.edit_document(id, title, content).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn doc_toggle_star(id: i64) -> DocumentActionResponse {
    respond("doc_toggle_star", "Star toggled.", |service| {
        service.toggle_star(id).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn doc_archive(id: i64) -> DocumentActionResponse {
    respond("doc_archive", "Document archived.", |service| {
        service.archive(id).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn doc_restore(id: i64) -> DocumentActionResponse {
    respond("doc_restore", "Document restored.", |service| {
        service.restore(id).map(Some)
    })
}

/// Long-press delete: archives active documents, deletes archived ones.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_request_delete(id: i64) -> DocumentActionResponse {
    let result = with_document_service(|service| {
        service.request_delete(id).map_err(|err| err.to_string())
    });
    match result {
        Ok(DeleteOutcome::Archived(document)) => {
            DocumentActionResponse::success("Document archived.", Some(document))
        }
        Ok(DeleteOutcome::Deleted(_)) => {
            DocumentActionResponse::success("Document deleted permanently.", None)
        }
        Err(err) => failure("doc_request_delete", err),
    }
}

/// Deletes an archived document permanently.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_delete_permanently(id: i64) -> DocumentActionResponse {
    respond("doc_delete_permanently", "Document deleted permanently.", |service| {
        service.delete_permanently(id).map(|()| None)
    })
}

/// Lists one home category.
///
/// # FFI contract
/// - `category`: `created|viewed|starred|archived`.
/// - `sort_order`: `title_asc|title_desc|created_date_asc|created_date_desc|
///   modified_date_asc|modified_date_desc`.
/// - `viewed_ids`: recently opened ids, only read for `viewed`.
#[flutter_rust_bridge::frb(sync)]
pub fn doc_list(category: String, sort_order: String, viewed_ids: Vec<i64>) -> DocumentListResponse {
    let list_failure = |message: String| DocumentListResponse {
        ok: false,
        items: Vec::new(),
        message,
    };
    let Some(category) = Category::from_label(category.trim()) else {
        return list_failure(format!("doc_list failed: unknown category `{category}`"));
    };
    let Some(sort_order) = SortOrder::from_label(sort_order.trim()) else {
        return list_failure(format!("doc_list failed: unknown sort order `{sort_order}`"));
    };

    match with_document_service(|service| {
        service
            .list(category, sort_order, &viewed_ids)
            .map_err(|err| err.to_string())
    }) {
        Ok(documents) => {
            let items: Vec<_> = documents.into_iter().map(to_document_item).collect();
            DocumentListResponse {
                ok: true,
                message: format!("Found {} document(s).", items.len()),
                items,
            }
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=doc_list");
            list_failure(format!("doc_list failed: {err}"))
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn prefs_get() -> PreferencesResponse {
    let result = with_connection(|conn| {
        let repo = SqlitePreferencesRepository::try_new(conn).map_err(|err| err.to_string())?;
        repo.load().map_err(|err| err.to_string())
    });
    match result {
        Ok(preferences) => preferences_response(&preferences, String::new()),
        Err(err) => preferences_failure(format!("prefs_get failed: {err}")),
    }
}

/// Replaces all preferences. Invalid labels are rejected without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn prefs_set(
    sort_order: String,
    display_mode: String,
    auto_save_enabled: bool,
    theme_color: u32,
) -> PreferencesResponse {
    let Some(sort_order) = SortOrder::from_label(sort_order.trim()) else {
        return preferences_failure(format!("prefs_set failed: unknown sort order `{sort_order}`"));
    };
    let display_mode = match display_mode.trim() {
        "list" => DisplayMode::List,
        "grid" => DisplayMode::Grid,
        other => {
            return preferences_failure(format!(
                "prefs_set failed: unknown display mode `{other}`"
            ))
        }
    };
    let preferences = Preferences {
        sort_order,
        display_mode,
        auto_save_enabled,
        theme_color,
    };

    let result = with_connection(|conn| {
        let mut repo =
            SqlitePreferencesRepository::try_new(conn).map_err(|err| err.to_string())?;
        repo.save(&preferences).map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => preferences_response(&preferences, "Preferences saved.".to_string()),
        Err(err) => preferences_failure(format!("prefs_set failed: {err}")),
    }
}

fn respond(
    call: &'static str,
    message: &'static str,
    f: impl FnOnce(
        &DocumentService<SqliteDocumentRepository<'_>>,
    ) -> memomark_core::ServiceResult<Option<Document>>,
) -> DocumentActionResponse {
    match with_document_service(|service| f(service).map_err(|err| err.to_string())) {
        Ok(document) => DocumentActionResponse::success(message, document),
        Err(err) => failure(call, err),
    }
}

fn failure(call: &'static str, err: String) -> DocumentActionResponse {
    warn!("event=ffi_call module=ffi status=error call={call}");
    DocumentActionResponse::failure(format!("{call} failed: {err}"))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(
    f: impl FnOnce(&mut rusqlite::Connection) -> Result<T, String>,
) -> Result<T, String> {
    let mut conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    f(&mut conn)
}

fn with_document_service<T>(
    f: impl FnOnce(&DocumentService<SqliteDocumentRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let repo = SqliteDocumentRepository::try_new(conn)
            .map_err(|err| format!("repo init failed: {err}"))?;
        f(&DocumentService::new(repo))
    })
}

fn to_document_item(document: Document) -> DocumentItem {
    DocumentItem {
        id: document.id,
        status: status_label(document.status()).to_string(),
        source_uri: document.source.reference().map(str::to_string),
        title: document.title,
        content: document.content,
        is_starred: document.is_starred,
        created_date: document.created_date,
        modified_date: document.modified_date,
    }
}

fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Internal => "internal",
        DocumentStatus::External => "external",
        DocumentStatus::Archived => "archived",
    }
}

fn preferences_response(preferences: &Preferences, message: String) -> PreferencesResponse {
    PreferencesResponse {
        ok: true,
        sort_order: preferences.sort_order.label().to_string(),
        display_mode: match preferences.display_mode {
            DisplayMode::List => "list",
            DisplayMode::Grid => "grid",
        }
        .to_string(),
        auto_save_enabled: preferences.auto_save_enabled,
        theme_color: preferences.theme_color,
        message,
    }
}

fn preferences_failure(message: String) -> PreferencesResponse {
    PreferencesResponse {
        ok: false,
        message,
        ..preferences_response(&Preferences::default(), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, doc_create, doc_import, doc_list, doc_request_delete, doc_restore,
        doc_toggle_star, doc_update, init_logging, ping, prefs_get, prefs_set,
    };
    use memomark_core::db::open_db;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn created_document_shows_up_in_created_list() {
        let title = unique_token("ffi-created");
        let created = doc_create(title.clone(), "# body".to_string());
        assert!(created.ok, "{}", created.message);
        let item = created.document.expect("created document");
        assert_eq!(item.status, "internal");
        assert_eq!(item.created_date, item.modified_date);

        let listed = doc_list("created".to_string(), "title_asc".to_string(), Vec::new());
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|doc| doc.id == item.id && doc.title == title));
    }

    #[test]
    fn delete_flow_archives_then_removes_row() {
        let created = doc_create(unique_token("ffi-delete"), String::new());
        let id = created.document.expect("created document").id;
        let starred = doc_toggle_star(id);
        assert!(starred.document.expect("starred document").is_starred);

        let archived = doc_request_delete(id);
        assert!(archived.ok, "{}", archived.message);
        let archived_item = archived.document.expect("archived document");
        assert_eq!(archived_item.status, "archived");
        assert!(!archived_item.is_starred);

        let deleted = doc_request_delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.document.is_none());

        let conn = open_db(super::resolve_db_path()).expect("open db");
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM markdown WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .expect("count rows");
        assert_eq!(remaining, 0);
    }

    #[test]
    fn imported_document_restores_to_external() {
        let imported = doc_import(
            unique_token("ffi-import"),
            "text".to_string(),
            " content://docs/readme.md ".to_string(),
        );
        assert!(imported.ok, "{}", imported.message);
        let item = imported.document.expect("imported document");
        assert_eq!(item.source_uri.as_deref(), Some("content://docs/readme.md"));

        doc_request_delete(item.id);
        let restored = doc_restore(item.id);
        assert_eq!(restored.document.expect("restored").status, "external");
    }

    #[test]
    fn update_missing_document_fails_with_message() {
        let response = doc_update(i64::MAX, "t".to_string(), "c".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("not found"));
    }

    #[test]
    fn doc_list_rejects_unknown_labels() {
        let response = doc_list("recent".to_string(), "title_asc".to_string(), Vec::new());
        assert!(!response.ok);
        assert!(response.message.contains("recent"));
    }

    #[test]
    fn prefs_set_validates_and_persists() {
        let rejected = prefs_set("newest".to_string(), "list".to_string(), false, 0);
        assert!(!rejected.ok);

        let saved = prefs_set("title_desc".to_string(), "grid".to_string(), true, 0xFF11_2233);
        assert!(saved.ok, "{}", saved.message);
        let loaded = prefs_get();
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.sort_order, "title_desc");
        assert_eq!(loaded.display_mode, "grid");
        assert!(loaded.auto_save_enabled);
        assert_eq!(loaded.theme_color, 0xFF11_2233);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
