use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for the `tome` binary.
///
/// Layered lowest to highest: built-in defaults, the TOML file, then environment
/// variables prefixed with `TOME__` (e.g. `TOME__STORE__ROOT=/srv/db`). The
/// `--root` flag is applied on top by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub store: StoreSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub root: PathBuf,
    pub purge_orphans: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Verbosity for both the console and the store's log sink.
    pub level: String,
    pub json: bool,
    /// Directory for rolling log files; console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self { root: PathBuf::from("./db"), purge_orphans: false }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, dir: None }
    }
}

/// Loads [`CliConfig`] from `path` (optional) plus `TOME__*` environment overrides.
///
/// # Errors
/// Fails if the file exists but is malformed, or a value has the wrong type.
pub fn load_config(path: &Path) -> Result<CliConfig, config::ConfigError> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix("TOME").prefix_separator("__").separator("__"))
        .build()?
        .try_deserialize()
}
