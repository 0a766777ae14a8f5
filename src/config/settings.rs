use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

const CONFIG_FILE: &str = "gauntlet_tracker.json";

const ENV_GAUNTLET_URL: &str = "GAUNTLET_URL";
const ENV_DATABASE_PATH: &str = "GAUNTLET_DATABASE_PATH";
const ENV_EXPORT_DIR: &str = "GAUNTLET_EXPORT_DIR";

pub struct ScraperSettings {
    pub gauntlet_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub fetch_attempts: usize,
    pub retry_delay_secs: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            gauntlet_url: "https://support.fire-emblem-heroes.com/voting_gauntlet/current"
                .to_string(),
            user_agent: "GauntletTracker/1.0".to_string(),
            timeout_secs: 10,
            fetch_attempts: 5,
            retry_delay_secs: 5,
        }
    }
}

pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "gauntlet_tracker.db".to_string(),
        }
    }
}

pub struct ExportSettings {
    pub dir: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dir: "exports".to_string(),
        }
    }
}

/// Overrides read from the optional config file; absent keys keep the
/// layer below.
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    gauntlet_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    database_path: Option<String>,
    export_dir: Option<String>,
}

#[derive(Default)]
pub struct AppConfig {
    pub scraper: ScraperSettings,
    pub database: DatabaseSettings,
    pub export: ExportSettings,
}

impl AppConfig {
    /// Resolve the configuration once at process start:
    /// coded defaults, then the optional config file, then environment
    /// variables. Resolution problems are logged, never hidden.
    pub fn resolve() -> Self {
        let mut config = Self::default();
        config.apply_file(Path::new(CONFIG_FILE));
        config.apply_env();
        config
    }

    fn apply_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }

        let overrides = match Self::read_overrides(path) {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!("Ignoring config file {}: {:#}", path.display(), e);
                return;
            }
        };

        info!("Applying config file {}", path.display());
        self.apply_overrides(overrides);
    }

    fn read_overrides(path: &Path) -> anyhow::Result<FileOverrides> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn apply_overrides(&mut self, overrides: FileOverrides) {
        if let Some(url) = overrides.gauntlet_url {
            self.scraper.gauntlet_url = url;
        }
        if let Some(agent) = overrides.user_agent {
            self.scraper.user_agent = agent;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.scraper.timeout_secs = secs;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(dir) = overrides.export_dir {
            self.export.dir = dir;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_GAUNTLET_URL) {
            info!("Overriding gauntlet URL from {}", ENV_GAUNTLET_URL);
            self.scraper.gauntlet_url = url;
        }
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            info!("Overriding database path from {}", ENV_DATABASE_PATH);
            self.database.path = path;
        }
        if let Ok(dir) = std::env::var(ENV_EXPORT_DIR) {
            info!("Overriding export directory from {}", ENV_EXPORT_DIR);
            self.export.dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.scraper.fetch_attempts, 5);
        assert_eq!(config.scraper.retry_delay_secs, 5);
        assert_eq!(config.database.path, "gauntlet_tracker.db");
    }

    #[test]
    fn file_overrides_replace_only_present_keys() {
        let mut config = AppConfig::default();
        let overrides: FileOverrides =
            serde_json::from_str(r#"{"database_path": "/tmp/other.db"}"#).unwrap();
        config.apply_overrides(overrides);

        assert_eq!(config.database.path, "/tmp/other.db");
        assert_eq!(config.export.dir, "exports");
    }

    #[test]
    fn env_overrides_replace_defaults() {
        unsafe {
            std::env::set_var(ENV_GAUNTLET_URL, "https://example.com/gauntlet/current");
            std::env::set_var(ENV_DATABASE_PATH, "/tmp/env_override.db");
        }

        let mut config = AppConfig::default();
        config.apply_env();

        unsafe {
            std::env::remove_var(ENV_GAUNTLET_URL);
            std::env::remove_var(ENV_DATABASE_PATH);
        }

        assert_eq!(
            config.scraper.gauntlet_url,
            "https://example.com/gauntlet/current"
        );
        assert_eq!(config.database.path, "/tmp/env_override.db");
    }

    #[test]
    fn rejects_malformed_override_file() {
        let dir = std::env::temp_dir().join("gauntlet_settings_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let mut config = AppConfig::default();
        config.apply_file(&path);

        // Broken file is logged and ignored, defaults stay intact
        assert_eq!(config.database.path, "gauntlet_tracker.db");
    }
}
