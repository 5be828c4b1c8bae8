// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Startup configuration: pick a config file, load it, apply env overrides.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use formwerk_core::AppConfig;
use formwerk_core::error::{FormwerkError, Result};

use super::data_dir::default_config_path;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FORMWERK_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "FORMWERK_PORT";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly named (argv or env). Must exist.
    Explicit(PathBuf),
    /// The data-dir default. Optional.
    DataDir(PathBuf),
}

impl ConfigSource {
    /// Command-line path wins over the env var, which wins over the data dir.
    pub fn choose(arg: Option<String>, env: Option<String>, fallback: PathBuf) -> Self {
        match arg.or(env).filter(|p| !p.trim().is_empty()) {
            Some(path) => ConfigSource::Explicit(PathBuf::from(path)),
            None => ConfigSource::DataDir(fallback),
        }
    }

    /// Load the config. An explicit file that is missing or invalid is an
    /// error; a missing data-dir file falls back to defaults.
    pub fn load(&self) -> Result<AppConfig> {
        match self {
            ConfigSource::Explicit(path) => load_file(path),
            ConfigSource::DataDir(path) if path.exists() => load_file(path),
            ConfigSource::DataDir(path) => {
                info!(path = %path.display(), "no config file, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

fn load_file(path: &Path) -> Result<AppConfig> {
    let config = AppConfig::load(path)
        .map_err(|e| FormwerkError::Config(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Apply a `FORMWERK_PORT`-style override. Unparseable values are ignored.
pub fn apply_port_override(config: &mut AppConfig, value: Option<String>) {
    let Some(value) = value else { return };
    match value.trim().parse::<u16>() {
        Ok(port) => config.server.port = port,
        Err(e) => warn!(value = %value, error = %e, "ignoring invalid {PORT_ENV}"),
    }
}

/// Resolve the full startup configuration from argv and the environment.
pub fn load_from_env() -> Result<AppConfig> {
    let source = ConfigSource::choose(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV).ok(),
        default_config_path(),
    );
    let mut config = source.load()?;
    apply_port_override(&mut config, std::env::var(PORT_ENV).ok());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> PathBuf {
        PathBuf::from("/nonexistent/formwerk/config.json")
    }

    #[test]
    fn argument_beats_env() {
        let source = ConfigSource::choose(Some("a.json".into()), Some("b.json".into()), fallback());
        assert_eq!(source, ConfigSource::Explicit("a.json".into()));
    }

    #[test]
    fn env_beats_data_dir() {
        let source = ConfigSource::choose(None, Some("b.json".into()), fallback());
        assert_eq!(source, ConfigSource::Explicit("b.json".into()));
    }

    #[test]
    fn missing_data_dir_file_gives_defaults() {
        let source = ConfigSource::choose(None, None, fallback());
        assert_eq!(source, ConfigSource::DataDir(fallback()));
        let config = source.load().unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let source = ConfigSource::Explicit(fallback());
        assert!(matches!(source.load(), Err(FormwerkError::Config(_))));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server": {"port": 8080}, "download_name": "out.docx"}"#)
            .unwrap();

        let config = ConfigSource::Explicit(path).load().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.download_name, "out.docx");
    }

    #[test]
    fn port_override() {
        let mut config = AppConfig::default();
        apply_port_override(&mut config, Some(" 9090 ".into()));
        assert_eq!(config.server.port, 9090);

        apply_port_override(&mut config, Some("not-a-port".into()));
        assert_eq!(config.server.port, 9090);

        apply_port_override(&mut config, None);
        assert_eq!(config.server.port, 9090);
    }
}
