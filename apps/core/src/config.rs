use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "palette";
const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to encode toml: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid json5: {0}")]
    Json5(#[from] json5::Error),
    #[error("failed to encode json: {0}")]
    JsonEncode(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a directory lookup fires.
    pub debounce_ms: u64,
    /// Lookups only run for input strictly longer than this.
    pub lookup_min_input_len: usize,
    pub api_base_url: String,
    pub lookup_endpoint: String,
    pub analytics_enabled: bool,
    pub event_db_path: PathBuf,
    pub log_filter: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            debounce_ms: 300,
            lookup_min_input_len: 8,
            api_base_url: "http://localhost:8000".to_string(),
            lookup_endpoint: "api/person/".to_string(),
            analytics_enabled: true,
            event_db_path: base.join("events.sqlite3"),
            log_filter: "info".to_string(),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Per-user data directory; `PALETTE_HOME` overrides it.
pub fn stable_app_data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("PALETTE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    if let Some(appdata) = std::env::var_os("APPDATA").filter(|v| !v.is_empty()) {
        return PathBuf::from(appdata).join(APP_DIR_NAME);
    }
    if let Some(data_home) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(data_home).join(APP_DIR_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME);
    }
    std::env::temp_dir().join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(ConfigError::Invalid(format!(
            "debounce_ms must be at most {MAX_DEBOUNCE_MS}"
        )));
    }

    if cfg.lookup_min_input_len == 0 {
        return Err(ConfigError::Invalid(
            "lookup_min_input_len must be positive".into(),
        ));
    }

    if cfg.api_base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api_base_url is required".into()));
    }

    if cfg.event_db_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("event_db_path is required".into()));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".into()));
    }

    Ok(())
}

/// Reads the config at `path` (or the default location). A missing file
/// yields defaults. `.toml` files are parsed as TOML, anything else as JSON5.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => parse(&raw, &config_path)?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };
    cfg.config_path = config_path;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let encoded = if is_toml(&cfg.config_path) {
        toml::to_string_pretty(cfg)?
    } else {
        serde_json::to_string_pretty(cfg)?
    };
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    })
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    if is_toml(path) {
        Ok(toml::from_str(raw)?)
    } else {
        Ok(json5::from_str(raw)?)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::{is_toml, stable_app_data_dir};
    use std::path::Path;

    #[test]
    fn app_data_dir_names_the_app() {
        let dir = stable_app_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn detects_toml_by_extension() {
        assert!(is_toml(Path::new("a/config.TOML")));
        assert!(!is_toml(Path::new("a/config.json")));
        assert!(!is_toml(Path::new("a/config")));
    }
}
