//! User preferences backing the home and settings screens.

use crate::view::projection::SortOrder;
use serde::{Deserialize, Serialize};

/// Default accent color (ARGB).
pub const DEFAULT_THEME_COLOR: u32 = 0xFF67_50A4;

/// How the home list lays out document cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    List,
    Grid,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }
}

/// Persisted user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Sort order applied to the home list.
    pub sort_order: SortOrder,
    pub display_mode: DisplayMode,
    /// Export edited documents automatically on save.
    pub auto_save_enabled: bool,
    /// App accent color as ARGB.
    pub theme_color: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::ModifiedDateDesc,
            display_mode: DisplayMode::List,
            auto_save_enabled: false,
            theme_color: DEFAULT_THEME_COLOR,
        }
    }
}
