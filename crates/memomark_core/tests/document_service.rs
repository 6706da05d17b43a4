use memomark_core::db::open_db_in_memory;
use memomark_core::{
    Category, DeleteOutcome, DocumentService, DocumentServiceError, DocumentStatus, RepoError,
    SortOrder, SqliteDocumentRepository,
};

#[test]
fn archiving_starred_document_clears_star() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());

    let doc = service.create_document("todo", "- [ ] call mom").unwrap();
    let starred = service.toggle_star(doc.id).unwrap();
    assert!(starred.is_starred);

    let archived = service.archive(doc.id).unwrap();
    assert_eq!(archived.status(), DocumentStatus::Archived);
    assert!(!archived.is_starred);
}

#[test]
fn starring_archived_document_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());

    let doc = service.create_document("old", "").unwrap();
    service.archive(doc.id).unwrap();

    let err = service.toggle_star(doc.id).unwrap_err();
    assert!(matches!(
        err,
        DocumentServiceError::Repo(RepoError::Validation(_))
    ));
}

#[test]
fn request_delete_archives_first_then_deletes() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let doc = service.create_document("gone soon", "").unwrap();

    match service.request_delete(doc.id).unwrap() {
        DeleteOutcome::Archived(archived) => assert!(archived.is_archived),
        other => panic!("expected archive, got {other:?}"),
    }
    assert_eq!(
        service.request_delete(doc.id).unwrap(),
        DeleteOutcome::Deleted(doc.id)
    );
    assert!(service.get_document(doc.id).unwrap().is_none());
}

#[test]
fn get_document_returns_none_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let doc = service.create_document("kept", "").unwrap();

    assert_eq!(service.get_document(doc.id).unwrap(), Some(doc.clone()));
    assert_eq!(service.get_document(doc.id + 1000).unwrap(), None);
}

#[test]
fn delete_permanently_requires_archive() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let doc = service.create_document("active", "").unwrap();

    let err = service.delete_permanently(doc.id).unwrap_err();
    assert!(matches!(err, DocumentServiceError::NotArchived(id) if id == doc.id));
    assert!(service.get_document(doc.id).unwrap().is_some());

    let err = service.delete_permanently(9999).unwrap_err();
    assert!(matches!(err, DocumentServiceError::NotFound(9999)));
}

#[test]
fn restore_returns_imported_document_to_external() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let doc = service
        .import_document("readme", "# Readme", "content://downloads/readme.md")
        .unwrap();
    assert_eq!(doc.status(), DocumentStatus::External);

    service.archive(doc.id).unwrap();
    let restored = service.restore(doc.id).unwrap();
    assert_eq!(restored.status(), DocumentStatus::External);
}

#[test]
fn edit_document_replaces_title_and_content() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    let doc = service.create_document("a", "b").unwrap();

    let edited = service.edit_document(doc.id, "title", "body").unwrap();
    assert_eq!(edited.id, doc.id);
    assert_eq!(edited.title, "title");
    assert_eq!(edited.content, "body");
    assert_eq!(edited.created_date, doc.created_date);
    assert!(edited.modified_date >= edited.created_date);

    assert!(matches!(
        service.edit_document(doc.id + 1, "x", "y"),
        Err(DocumentServiceError::NotFound(_))
    ));
}

#[test]
fn list_serves_each_category() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());

    let banana = service.create_document("banana", "").unwrap();
    let apple = service
        .import_document("Apple", "", "file:///apple.md")
        .unwrap();
    let cherry = service.create_document("cherry", "").unwrap();
    let archived = service.create_document("zebra", "").unwrap();
    service.toggle_star(cherry.id).unwrap();
    service.toggle_star(archived.id).unwrap();
    service.archive(archived.id).unwrap();

    let titles = |category, viewed: &[i64]| {
        service
            .list(category, SortOrder::TitleAsc, viewed)
            .unwrap()
            .into_iter()
            .map(|doc| doc.title)
            .collect::<Vec<_>>()
    };

    assert_eq!(titles(Category::Created, &[]), vec!["Apple", "banana", "cherry"]);
    assert_eq!(titles(Category::Starred, &[]), vec!["cherry"]);
    assert_eq!(titles(Category::Archived, &[]), vec!["zebra"]);
    assert_eq!(
        titles(Category::Viewed, &[banana.id, 777, apple.id]),
        vec!["Apple", "banana"]
    );
}
