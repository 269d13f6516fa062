//! Configuration module for Lens.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, EditorSettings, Settings, SettingsError, StoreSettings,
    ValidationSettings,
};
