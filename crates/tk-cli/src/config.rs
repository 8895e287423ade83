//! Layered configuration: defaults, then `tablekeeper.toml`, then
//! `TABLEKEEPER_*` environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tk_lookup::LookupConfig;
use tk_mechanics::SessionConfig;

/// Config file read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tablekeeper.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database file. Defaults to the platform data directory.
    pub database: Option<PathBuf>,
    /// Rolls kept in the session history.
    pub history_capacity: usize,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Language-model lookup settings.
    pub lookup: LookupConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: None,
            history_capacity: tk_mechanics::history::DEFAULT_CAPACITY,
            seed: None,
            lookup: LookupConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; the default file
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let file = match path {
            Some(path) if !path.is_file() => {
                return Err(format!("config file not found: {}", path.display()));
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        Self::figment(&file)
            .extract()
            .map_err(|e| format!("invalid configuration: {e}"))
    }

    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("TABLEKEEPER_").split("__"))
    }

    /// Resolved database path: `--db`, then config, then the data directory.
    pub fn database_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .map(|d| d.join("tablekeeper").join("tablekeeper.db"))
                    .unwrap_or_else(|| PathBuf::from("tablekeeper.db"))
            })
    }

    /// Session settings, with `seed` taking precedence over the config.
    pub fn session(&self, seed: Option<u64>) -> SessionConfig {
        let config = SessionConfig::default().with_history_capacity(self.history_capacity);
        match seed.or(self.seed) {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert!(config.lookup.api_key.is_none());
        assert!(config.database.is_none());
    }

    #[test]
    fn toml_file_and_env_layer() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "tk.toml",
                r#"
                database = "campaign.db"
                seed = 7

                [lookup]
                model = "local-model"
                "#,
            )?;
            jail.set_env("TABLEKEEPER_HISTORY_CAPACITY", "10");
            jail.set_env("TABLEKEEPER_LOOKUP__API_KEY", "secret");

            let config: AppConfig = AppConfig::figment(Path::new("tk.toml")).extract()?;
            assert_eq!(config.database, Some(PathBuf::from("campaign.db")));
            assert_eq!(config.seed, Some(7));
            assert_eq!(config.history_capacity, 10);
            assert_eq!(config.lookup.model, "local-model");
            assert_eq!(config.lookup.api_key.as_deref(), Some("secret"));
            assert_eq!(config.lookup.timeout_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/tk.toml"))).is_err());
    }

    #[test]
    fn database_path_precedence() {
        let mut config = AppConfig::default();
        config.database = Some(PathBuf::from("from-config.db"));
        assert_eq!(
            config.database_path(Some(Path::new("flag.db"))),
            PathBuf::from("flag.db")
        );
        assert_eq!(config.database_path(None), PathBuf::from("from-config.db"));
        config.database = None;
        assert!(config.database_path(None).ends_with("tablekeeper.db"));
    }

    #[test]
    fn cli_seed_wins() {
        let mut config = AppConfig::default();
        config.seed = Some(1);
        assert_eq!(config.session(Some(9)).seed, Some(9));
        assert_eq!(config.session(None).seed, Some(1));
    }
}
