use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RensoConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the word2vec text artifact (`.txt` or `.txt.gz`).
    pub path: String,
    /// chiVe release name, e.g. `v1.3-mc90`. Used by `renso model download`.
    pub name: String,
    pub cache_dir: String,
}

/// Surface metadata reported by the health route.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl Default for RensoConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            log_level: "info".into(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let cache_dir = default_renso_dir().join("models");
        let path = cache_dir
            .join("chive-1.3-mc90.txt.gz")
            .to_string_lossy()
            .into_owned();
        Self {
            path,
            name: "v1.3-mc90".into(),
            cache_dir: cache_dir.to_string_lossy().into_owned(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "renso word-association API".into(),
            description: "Semantic word association over chiVe (word2vec) Japanese \
                          embeddings: nearest neighbors, analogy, and pairwise similarity."
                .into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Returns `~/.renso/`
pub fn default_renso_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".renso")
}

/// Returns the default config file path: `~/.renso/config.toml`
pub fn default_config_path() -> PathBuf {
    default_renso_dir().join("config.toml")
}

impl RensoConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            RensoConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (RENSO_MODEL, RENSO_HOST,
    /// RENSO_PORT, RENSO_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RENSO_MODEL") {
            self.model.path = val;
        }
        if let Ok(val) = std::env::var("RENSO_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("RENSO_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => {
                    tracing::warn!(value = %val, "RENSO_PORT is not a valid port, ignoring")
                }
            }
        }
        if let Ok(val) = std::env::var("RENSO_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the model artifact path, expanding `~` if needed.
    pub fn resolved_model_path(&self) -> PathBuf {
        expand_tilde(&self.model.path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RensoConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.model.name, "v1.3-mc90");
        assert!(config.model.path.ends_with("chive-1.3-mc90.txt.gz"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9000
log_level = "debug"

[model]
path = "/data/chive-1.3-mc5.txt"
name = "v1.3-mc5"
"#;
        let config: RensoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.model.path, "/data/chive-1.3-mc5.txt");
        assert_eq!(config.model.name, "v1.3-mc5");
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.api.title.is_empty());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = RensoConfig::default();
        std::env::set_var("RENSO_MODEL", "/tmp/override.txt");
        std::env::set_var("RENSO_PORT", "8123");
        std::env::set_var("RENSO_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.model.path, "/tmp/override.txt");
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.log_level, "trace");

        // An unparsable port is ignored, keeping the previous value
        std::env::set_var("RENSO_PORT", "not-a-port");
        config.apply_env_overrides();
        assert_eq!(config.server.port, 8123);

        // Clean up
        std::env::remove_var("RENSO_MODEL");
        std::env::remove_var("RENSO_PORT");
        std::env::remove_var("RENSO_LOG_LEVEL");
    }
}
