//! Configuration management for `issue_tracker`.
//!
//! Layers, lowest to highest precedence:
//! - Built-in defaults
//! - User config (`~/.config/issue-tracker/config.yaml`)
//! - Workspace config (`./.issue-tracker/config.yaml`)
//! - Environment (`ISSUE_TRACKER_*`)
//! - CLI overrides

use crate::error::{Result, TrackerError};
use crate::storage::{MemoryStore, ProjectStore, SqliteStore};
use crate::tracker::IssueStore;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Workspace directory holding config and the default database.
pub const WORKSPACE_DIR: &str = ".issue-tracker";

const DEFAULT_DB_FILENAME: &str = "issues.db";
const ENV_PREFIX: &str = "ISSUE_TRACKER_";

/// The store handle the CLI works with.
pub type DynIssueStore = IssueStore<Box<dyn ProjectStore>>;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

impl Backend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(TrackerError::Config(format!(
                "unknown backend '{other}' (expected sqlite or memory)"
            ))),
        }
    }
}

/// A flat configuration layer of normalized keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build a layer from `ISSUE_TRACKER_*` variables.
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub backend: Option<String>,
    pub lock_timeout: Option<u64>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.insert("db", path.to_string_lossy());
        }
        if let Some(backend) = &self.backend {
            layer.insert("backend", backend.clone());
        }
        if let Some(lock_timeout) = self.lock_timeout {
            layer.insert("lock-timeout", lock_timeout.to_string());
        }

        layer
    }
}

/// Resolved settings for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub backend: Backend,
    pub db_path: PathBuf,
    pub lock_timeout_ms: Option<u64>,
}

impl TrackerConfig {
    /// Resolve settings from a merged layer. Relative db paths resolve
    /// against `workspace_root`.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unknown backend or a non-numeric timeout.
    pub fn from_layer(layer: &ConfigLayer, workspace_root: &Path) -> Result<Self> {
        let backend = layer
            .get("backend")
            .map_or(Ok(Backend::default()), Backend::from_str)?;

        let db = layer
            .get("db")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(default_db_path, PathBuf::from);
        let db_path = if db.is_absolute() {
            db
        } else {
            workspace_root.join(db)
        };

        let lock_timeout_ms = layer
            .get("lock-timeout")
            .map(|value| {
                value.trim().parse::<u64>().map_err(|_| {
                    TrackerError::Config(format!("lock-timeout must be milliseconds, got '{value}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            backend,
            db_path,
            lock_timeout_ms,
        })
    }
}

/// Load workspace config (`<root>/.issue-tracker/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_workspace_config(workspace_root: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&workspace_root.join(WORKSPACE_DIR).join("config.yaml"))
}

/// Load user config (`~/.config/issue-tracker/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("issue-tracker")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("backend", Backend::default().as_str());
    layer
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(workspace_root: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    Ok(ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_workspace_config(workspace_root)?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Open the configured backend wrapped in an [`IssueStore`].
///
/// # Errors
///
/// Returns an error if the database directory cannot be created or the
/// database cannot be opened.
pub fn open_store(config: &TrackerConfig) -> Result<DynIssueStore> {
    let backend: Box<dyn ProjectStore> = match config.backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::Sqlite => {
            if let Some(parent) = config
                .db_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
            {
                fs::create_dir_all(parent)?;
            }
            Box::new(SqliteStore::open_with_timeout(
                &config.db_path,
                config.lock_timeout_ms,
            )?)
        }
    };
    tracing::debug!(
        backend = %config.backend,
        db = %config.db_path.display(),
        "Opened store"
    );
    Ok(IssueStore::new(backend))
}

fn default_db_path() -> PathBuf {
    Path::new(WORKSPACE_DIR).join(DEFAULT_DB_FILENAME)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
