use std::path::PathBuf;

use clavis::{AdvancementPolicy, Configuration};
use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variables starting with this prefix override settings
const ENV_PREFIX: &str = "PASSAGE_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Engine behavior handed to every session
    pub engine: Configuration,
    /// `tracing` filter directive, e.g. `clavis=debug`
    pub log_filter: Option<String>,
    /// Print the normalized segments before replaying
    pub show_segments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: Configuration::default(),
            log_filter: None,
            show_segments: true,
        }
    }
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Invalid engine configuration: {0}")]
    InvalidEngine(clavis::ConfigError),
}

impl Settings {
    /// Load settings from defaults, `settings.toml` and the environment
    ///
    /// `policy` comes from the command line and wins over everything else.
    pub fn get(
        override_path: Option<PathBuf>,
        policy: Option<AdvancementPolicy>,
    ) -> Result<Self, ConfigError> {
        let config_dir = override_path
            .or_else(|| {
                ProjectDirs::from("com", "Passage", "Passage")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let mut settings: Self = Self::figment(&config_dir)
            .extract()
            .map_err(Box::new)?;

        if let Some(policy) = policy {
            settings.engine.advancement = policy;
        }

        settings.engine.validate()?;

        Ok(settings)
    }

    fn figment(config_dir: &std::path::Path) -> Figment {
        // Grab default configuration
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use tempfile::tempdir;

    use super::*;

    /// Run `test` with every ambient environment variable removed
    fn isolated(test: impl FnOnce(&mut Jail)) {
        Jail::expect_with(|jail| {
            jail.clear_env();
            test(jail);
            Ok(())
        });
    }

    #[test]
    fn test_defaults_without_file() {
        isolated(|_| {
            let root = tempdir().unwrap();
            let dir = root.path().join("passage");

            let settings = Settings::get(Some(dir.clone()), None).unwrap();

            assert_eq!(settings, Settings::default());
            assert!(dir.exists(), "config directory should be created");
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        isolated(|_| {
            let dir = tempdir().unwrap();
            std::fs::write(
                dir.path().join("settings.toml"),
                "show_segments = false\n\n[engine]\nadvancement = \"strict-match\"\n",
            )
            .unwrap();

            let settings = Settings::get(Some(dir.path().to_path_buf()), None).unwrap();

            assert!(!settings.show_segments);
            assert_eq!(settings.engine.advancement, AdvancementPolicy::StrictMatch);
            assert_eq!(settings.engine.tick_interval_ms, 1000);
        });
    }

    #[test]
    fn test_env_overrides_file() {
        isolated(|jail| {
            let dir = tempdir().unwrap();
            std::fs::write(
                dir.path().join("settings.toml"),
                "show_segments = true\n\n[engine]\ntick_interval_ms = 500\n",
            )
            .unwrap();
            jail.set_env("PASSAGE_SHOW_SEGMENTS", "false");
            jail.set_env("PASSAGE_ENGINE__ADVANCEMENT", "strict-match");

            let settings = Settings::get(Some(dir.path().to_path_buf()), None).unwrap();

            assert!(!settings.show_segments);
            assert_eq!(settings.engine.advancement, AdvancementPolicy::StrictMatch);
            assert_eq!(settings.engine.tick_interval_ms, 500);
        });
    }

    #[test]
    fn test_cli_policy_wins() {
        isolated(|jail| {
            let dir = tempdir().unwrap();
            std::fs::write(
                dir.path().join("settings.toml"),
                "[engine]\nadvancement = \"strict-match\"\n",
            )
            .unwrap();
            jail.set_env("PASSAGE_ENGINE__ADVANCEMENT", "strict-match");

            let settings = Settings::get(
                Some(dir.path().to_path_buf()),
                Some(AdvancementPolicy::LengthReached),
            )
            .unwrap();

            assert_eq!(
                settings.engine.advancement,
                AdvancementPolicy::LengthReached
            );
        });
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        isolated(|_| {
            let dir = tempdir().unwrap();
            std::fs::write(
                dir.path().join("settings.toml"),
                "[engine]\ntick_interval_ms = 0\n",
            )
            .unwrap();

            let error = Settings::get(Some(dir.path().to_path_buf()), None).unwrap_err();

            assert!(matches!(
                error,
                ConfigError::InvalidEngine(clavis::ConfigError::ZeroTickInterval)
            ));
        });
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        isolated(|_| {
            let dir = tempdir().unwrap();
            std::fs::write(
                dir.path().join("settings.toml"),
                "[engine]\nadvancement = \"sideways\"\n",
            )
            .unwrap();

            let error = Settings::get(Some(dir.path().to_path_buf()), None).unwrap_err();

            assert!(matches!(error, ConfigError::Parse(_)));
        });
    }
}
