//! TOML-based configuration for Lens.
//!
//! Supports a config file (lens.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [editor]
//! allow_subquery = true
//! query_store = "Query Store"
//!
//! [validation]
//! strict_labels = true
//! max_filter_depth = 32
//!
//! [store]
//! path = "${HOME}/.lens/queries.db"
//!
//! [catalog]
//! path = "./catalog.json"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::spec::DEFAULT_MAX_FILTER_DEPTH;
use crate::validation::ValidationOptions;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub validation: ValidationSettings,
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
}

/// Editor behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorSettings {
    /// List query-backed tables alongside physical ones.
    pub allow_subquery: bool,

    /// Data source whose tables are saved queries.
    pub query_store: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            allow_subquery: false,
            query_store: "Query Store".to_string(),
        }
    }
}

/// Validation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Reject duplicate column labels.
    pub strict_labels: bool,

    /// Deepest filter nesting accepted.
    pub max_filter_depth: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            strict_labels: true,
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }
}

impl ValidationSettings {
    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            strict_labels: self.strict_labels,
            max_filter_depth: self.max_filter_depth,
        }
    }
}

/// Query document store.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database path (supports ${ENV_VAR} expansion). Defaults to `~/.lens/queries.db`.
    pub path: Option<String>,
}

/// Schema catalog file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON catalog path (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.check()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `LENS_CONFIG`
    /// 2. `./lens.toml`
    /// 3. `~/.config/lens/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("LENS_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("lens.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("lens").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn check(&self) -> Result<(), SettingsError> {
        if self.validation.max_filter_depth == 0 {
            return Err(SettingsError::InvalidConfig(
                "validation.max_filter_depth must be at least 1".to_string(),
            ));
        }
        if self.editor.query_store.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "editor.query_store must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Store path with environment variables expanded, if configured.
    pub fn store_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.store
            .path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    /// Catalog path with environment variables expanded, if configured.
    pub fn catalog_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.catalog
            .path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
