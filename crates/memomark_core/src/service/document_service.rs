//! Document use-case service.
//!
//! # Responsibility
//! - Provide create/import/edit/star/archive/restore/delete flows.
//! - Enforce the archive-first rule for permanent deletion.
//! - Serve category lists through the pure projection.
//!
//! # Invariants
//! - Every mutation returns the stored state read back from the repository.
//! - Log lines carry ids and status only, never titles or content.

use crate::model::document::{Document, DocumentDraft, DocumentId, DocumentStatus};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use crate::view::projection::{project, Category, SortOrder};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for document use-cases.
#[derive(Debug)]
pub enum DocumentServiceError {
    /// Target document does not exist.
    NotFound(DocumentId),
    /// Permanent deletion requested for a document outside the archive.
    NotArchived(DocumentId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::NotArchived(id) => {
                write!(f, "document {id} must be archived before permanent deletion")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent document state: {details}")
            }
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DocumentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, DocumentServiceError>;

/// Result of the long-press delete flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// An active document was moved to the archive.
    Archived(Document),
    /// An archived document was removed permanently.
    Deleted(DocumentId),
}

/// Document service facade over repository implementations.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an app-owned document.
    pub fn create_document(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<Document> {
        let created = self
            .repo
            .create_document(&DocumentDraft::local(title, content))?;
        info!(
            "event=document_create module=service status=ok id={} source=local",
            created.id
        );
        Ok(created)
    }

    /// Creates a document linked to an imported file.
    pub fn import_document(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        reference: impl Into<String>,
    ) -> ServiceResult<Document> {
        let created = self
            .repo
            .create_document(&DocumentDraft::linked(title, content, reference))?;
        info!(
            "event=document_create module=service status=ok id={} source=linked",
            created.id
        );
        Ok(created)
    }

    pub fn get_document(&self, id: DocumentId) -> ServiceResult<Option<Document>> {
        Ok(self.repo.get_document(id)?)
    }

    /// Replaces title and content; `modified_date` moves only if either changed.
    pub fn edit_document(
        &self,
        id: DocumentId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<Document> {
        let mut document = self.load(id)?;
        document.title = title.into();
        document.content = content.into();
        self.store(&document, "document_edit")
    }

    /// Flips the star flag. Archived documents cannot be starred.
    pub fn toggle_star(&self, id: DocumentId) -> ServiceResult<Document> {
        let mut document = self.load(id)?;
        document.toggle_star();
        self.store(&document, "document_star")
    }

    /// Moves a document to the archive, clearing its star.
    pub fn archive(&self, id: DocumentId) -> ServiceResult<Document> {
        let mut document = self.load(id)?;
        document.archive();
        self.store(&document, "document_archive")
    }

    /// Returns an archived document to its internal/external state.
    pub fn restore(&self, id: DocumentId) -> ServiceResult<Document> {
        let mut document = self.load(id)?;
        document.restore();
        self.store(&document, "document_restore")
    }

    /// Archives an active document, or deletes an archived one.
    pub fn request_delete(&self, id: DocumentId) -> ServiceResult<DeleteOutcome> {
        let document = self.load(id)?;
        if document.is_archived {
            self.delete_permanently(id)?;
            Ok(DeleteOutcome::Deleted(id))
        } else {
            self.archive(id).map(DeleteOutcome::Archived)
        }
    }

    /// Removes an archived document permanently.
    ///
    /// # Errors
    /// - `NotArchived` when the document has not been archived first.
    /// - `NotFound` when `id` has no record.
    pub fn delete_permanently(&self, id: DocumentId) -> ServiceResult<()> {
        let document = self.load(id)?;
        if !document.is_archived {
            warn!(
                "event=document_delete module=service status=rejected id={id} reason=not_archived"
            );
            return Err(DocumentServiceError::NotArchived(id));
        }
        self.repo.delete_document(id)?;
        info!("event=document_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Lists documents for one home category in the requested order.
    ///
    /// `viewed` supplies the recently-opened ids, most recent first; it is
    /// consulted only for `Category::Viewed`.
    pub fn list(
        &self,
        category: Category,
        sort_order: SortOrder,
        viewed: &[DocumentId],
    ) -> ServiceResult<Vec<Document>> {
        let documents = match category {
            Category::Created => {
                let mut documents = self.repo.find_by_status(DocumentStatus::Internal)?;
                documents.extend(self.repo.find_by_status(DocumentStatus::External)?);
                documents.sort_by_key(|document| document.id);
                documents
            }
            Category::Viewed => {
                let mut documents = Vec::with_capacity(viewed.len());
                for id in viewed {
                    // Ids deleted since they were opened are skipped.
                    if let Some(document) = self.repo.get_document(*id)? {
                        documents.push(document);
                    }
                }
                documents
            }
            Category::Starred => self.repo.find_starred()?,
            Category::Archived => self.repo.find_by_status(DocumentStatus::Archived)?,
        };
        Ok(project(documents, category, sort_order))
    }

    fn load(&self, id: DocumentId) -> ServiceResult<Document> {
        self.repo
            .get_document(id)?
            .ok_or(DocumentServiceError::NotFound(id))
    }

    fn store(&self, document: &Document, event: &'static str) -> ServiceResult<Document> {
        if let Err(err) = self.repo.update_document(document) {
            warn!(
                "event={event} module=service status=error id={} error={err}",
                document.id
            );
            return Err(err.into());
        }
        info!(
            "event={event} module=service status=ok id={} starred={} archived={}",
            document.id, document.is_starred, document.is_archived
        );
        self.repo
            .get_document(document.id)?
            .ok_or(DocumentServiceError::InconsistentState(
                "updated document not found in read-back",
            ))
    }
}
