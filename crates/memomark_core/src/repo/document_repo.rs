//! Document repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered retrieval over the `markdown` table.
//! - Keep SQL and column encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate documents before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `created_date` is written once; `modified_date` only moves when title or
//!   content change, and never below `created_date`.

use crate::clock::{Clock, SystemClock};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::document::{
    ContentSource, Document, DocumentDraft, DocumentId, DocumentStatus, DocumentValidationError,
};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    uri,
    status,
    is_starred,
    created_date,
    modified_date
FROM markdown";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "uri",
    "status",
    "is_starred",
    "created_date",
    "modified_date",
];

const STATUS_INTERNAL: i64 = 0;
const STATUS_EXTERNAL: i64 = 1;
const STATUS_ARCHIVED: i64 = 2;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DocumentValidationError),
    /// Underlying storage failure.
    Db(DbError),
    NotFound(DocumentId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentValidationError> for RepoError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for markdown document storage.
pub trait DocumentRepository {
    /// Persists a new document, assigning id and both timestamps.
    fn create_document(&self, draft: &DocumentDraft) -> RepoResult<Document>;
    /// Replaces the stored record matching `document.id`.
    fn update_document(&self, document: &Document) -> RepoResult<()>;
    /// Removes a record permanently. Does not check the archive-first rule.
    fn delete_document(&self, id: DocumentId) -> RepoResult<()>;
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    fn find_all(&self) -> RepoResult<Vec<Document>>;
    fn find_by_status(&self, status: DocumentStatus) -> RepoResult<Vec<Document>>;
    /// Starred documents that are not archived.
    fn find_starred(&self) -> RepoResult<Vec<Document>>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn, C: Clock = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteDocumentRepository<'conn, C> {
    /// Same as [`SqliteDocumentRepository::try_new`] with a custom time source.
    pub fn with_clock(conn: &'conn Connection, clock: C) -> RepoResult<Self> {
        ensure_schema_ready(conn, "markdown", REQUIRED_COLUMNS)?;
        Ok(Self { conn, clock })
    }

    fn query_documents(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }
}

impl<C: Clock> DocumentRepository for SqliteDocumentRepository<'_, C> {
    fn create_document(&self, draft: &DocumentDraft) -> RepoResult<Document> {
        draft.validate()?;
        let now = self.clock.now_formatted();

        self.conn.execute(
            "INSERT INTO markdown (
                title,
                content,
                uri,
                status,
                is_starred,
                created_date,
                modified_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                draft.source.reference(),
                status_to_db(draft.status()),
                bool_to_int(draft.is_starred),
                now.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=document_insert module=repo status=ok id={id}");

        Ok(Document {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            source: draft.source.clone(),
            is_archived: draft.is_archived,
            is_starred: draft.is_starred,
            created_date: now.clone(),
            modified_date: now,
        })
    }

    fn update_document(&self, document: &Document) -> RepoResult<()> {
        // Dates on `document` are ignored by the write below.
        document.validate_state()?;
        let now = self.clock.now_formatted();

        // SET expressions see the pre-update row, so the CASE compares against
        // the stored title/content.
        let changed = self.conn.execute(
            "UPDATE markdown
             SET
                title = ?1,
                content = ?2,
                uri = ?3,
                status = ?4,
                is_starred = ?5,
                modified_date = CASE
                    WHEN title IS NOT ?1 OR content IS NOT ?2 THEN max(?6, created_date)
                    ELSE modified_date
                END
             WHERE id = ?7;",
            params![
                document.title.as_str(),
                document.content.as_str(),
                document.source.reference(),
                status_to_db(document.status()),
                bool_to_int(document.is_starred),
                now.as_str(),
                document.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(document.id));
        }
        debug!("event=document_update module=repo status=ok id={}", document.id);
        Ok(())
    }

    fn delete_document(&self, id: DocumentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM markdown WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        debug!("event=document_delete module=repo status=ok id={id}");
        Ok(())
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut documents =
            self.query_documents(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(documents.pop())
    }

    fn find_all(&self) -> RepoResult<Vec<Document>> {
        self.query_documents(&format!("{DOCUMENT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn find_by_status(&self, status: DocumentStatus) -> RepoResult<Vec<Document>> {
        self.query_documents(
            &format!("{DOCUMENT_SELECT_SQL} WHERE status = ?1 ORDER BY id ASC;"),
            [status_to_db(status)],
        )
    }

    fn find_starred(&self) -> RepoResult<Vec<Document>> {
        self.query_documents(
            &format!(
                "{DOCUMENT_SELECT_SQL}
                 WHERE is_starred = 1
                   AND status <> {STATUS_ARCHIVED}
                 ORDER BY id ASC;"
            ),
            [],
        )
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id: DocumentId = row.get("id")?;
    let uri: Option<String> = row.get("uri")?;
    let status: i64 = row.get("status")?;

    let (source, is_archived) = match (status, uri) {
        (STATUS_INTERNAL, None) => (ContentSource::Local, false),
        (STATUS_INTERNAL, Some(_)) => {
            return Err(RepoError::InvalidData(format!(
                "internal document {id} carries a uri in markdown.uri"
            )));
        }
        (STATUS_EXTERNAL, Some(reference)) => (ContentSource::Linked(reference), false),
        (STATUS_EXTERNAL, None) => {
            return Err(RepoError::InvalidData(format!(
                "external document {id} has no markdown.uri"
            )));
        }
        (STATUS_ARCHIVED, uri) => (uri.map_or(ContentSource::Local, ContentSource::Linked), true),
        (other, _) => {
            return Err(RepoError::InvalidData(format!(
                "invalid status value `{other}` in markdown.status"
            )));
        }
    };

    let is_starred = match row.get::<_, i64>("is_starred")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_starred value `{other}` in markdown.is_starred"
            )));
        }
    };

    let document = Document {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        source,
        is_archived,
        is_starred,
        created_date: row.get("created_date")?,
        modified_date: row.get("modified_date")?,
    };
    document.validate().map_err(|err| {
        RepoError::InvalidData(format!("document {id} failed validation: {err}"))
    })?;
    Ok(document)
}

fn status_to_db(status: DocumentStatus) -> i64 {
    match status {
        DocumentStatus::Internal => STATUS_INTERNAL,
        DocumentStatus::External => STATUS_EXTERNAL,
        DocumentStatus::Archived => STATUS_ARCHIVED,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Verifies that `conn` is migrated and exposes `table` with `columns`.
pub(crate) fn ensure_schema_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
