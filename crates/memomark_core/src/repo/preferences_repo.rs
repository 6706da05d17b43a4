//! Preferences repository over the `preferences` key/value table.
//!
//! # Invariants
//! - Missing keys resolve to `Preferences::default()` values.
//! - Unparseable stored values surface as `RepoError::InvalidData`.
//! - `save` writes all keys in one transaction.

use crate::model::preferences::{DisplayMode, Preferences};
use crate::repo::document_repo::{ensure_schema_ready, RepoError, RepoResult};
use crate::view::projection::SortOrder;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

const KEY_SORT_ORDER: &str = "sort_order";
const KEY_DISPLAY_MODE: &str = "display_mode";
const KEY_AUTO_SAVE: &str = "auto_save_enabled";
const KEY_THEME_COLOR: &str = "theme_color";

/// Repository interface for user preferences.
pub trait PreferencesRepository {
    fn load(&self) -> RepoResult<Preferences>;
    fn save(&mut self, preferences: &Preferences) -> RepoResult<()>;
}

/// SQLite-backed preferences repository.
pub struct SqlitePreferencesRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePreferencesRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "preferences", &["key", "value"])?;
        Ok(Self { conn })
    }

    fn read_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl PreferencesRepository for SqlitePreferencesRepository<'_> {
    fn load(&self) -> RepoResult<Preferences> {
        let defaults = Preferences::default();

        let sort_order = match self.read_value(KEY_SORT_ORDER)? {
            Some(value) => SortOrder::from_label(&value)
                .ok_or_else(|| invalid_value(KEY_SORT_ORDER, &value))?,
            None => defaults.sort_order,
        };
        let display_mode = match self.read_value(KEY_DISPLAY_MODE)? {
            Some(value) => {
                parse_display_mode(&value).ok_or_else(|| invalid_value(KEY_DISPLAY_MODE, &value))?
            }
            None => defaults.display_mode,
        };
        let auto_save_enabled = match self.read_value(KEY_AUTO_SAVE)?.as_deref() {
            Some("1") => true,
            Some("0") => false,
            Some(other) => return Err(invalid_value(KEY_AUTO_SAVE, other)),
            None => defaults.auto_save_enabled,
        };
        let theme_color = match self.read_value(KEY_THEME_COLOR)? {
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| invalid_value(KEY_THEME_COLOR, &value))?,
            None => defaults.theme_color,
        };

        Ok(Preferences {
            sort_order,
            display_mode,
            auto_save_enabled,
            theme_color,
        })
    }

    fn save(&mut self, preferences: &Preferences) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let entries = [
            (KEY_SORT_ORDER, preferences.sort_order.label().to_string()),
            (
                KEY_DISPLAY_MODE,
                display_mode_label(preferences.display_mode).to_string(),
            ),
            (
                KEY_AUTO_SAVE,
                if preferences.auto_save_enabled { "1" } else { "0" }.to_string(),
            ),
            (KEY_THEME_COLOR, preferences.theme_color.to_string()),
        ];
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
                [key, value.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn display_mode_label(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::List => "list",
        DisplayMode::Grid => "grid",
    }
}

fn parse_display_mode(value: &str) -> Option<DisplayMode> {
    match value {
        "list" => Some(DisplayMode::List),
        "grid" => Some(DisplayMode::Grid),
        _ => None,
    }
}

fn invalid_value(key: &str, value: &str) -> RepoError {
    RepoError::InvalidData(format!("invalid value `{value}` for preferences.{key}"))
}
