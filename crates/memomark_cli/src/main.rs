//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `memomark_core` linkage without the mobile shell.
//! - Optionally dump every home category of an existing database.
//!
//! Usage: `memomark_cli [DB_PATH] [SORT_ORDER]`

use memomark_core::db::open_db;
use memomark_core::{Category, DocumentService, SortOrder, SqliteDocumentRepository};
use std::process::ExitCode;

const CATEGORIES: [Category; 3] = [Category::Created, Category::Starred, Category::Archived];

fn main() -> ExitCode {
    println!("memomark_core ping={}", memomark_core::ping());
    println!("memomark_core version={}", memomark_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let sort_order = match args.next() {
        Some(label) => match SortOrder::from_label(&label) {
            Some(order) => order,
            None => {
                eprintln!("unknown sort order `{label}`");
                return ExitCode::FAILURE;
            }
        },
        None => SortOrder::default(),
    };

    match dump(&db_path, sort_order) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dump(db_path: &str, sort_order: SortOrder) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn)?);

    for category in CATEGORIES {
        let documents = service.list(category, sort_order, &[])?;
        println!("[{}] {} document(s)", category.label(), documents.len());
        for document in documents {
            println!(
                "  #{} {:?}{} {} {}",
                document.id,
                document.status(),
                if document.is_starred { " *" } else { "" },
                document.modified_date,
                document.title
            );
        }
    }
    Ok(())
}
