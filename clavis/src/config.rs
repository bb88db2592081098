//! # Configuration Module - Runtime Behavior Settings
//!
//! This module provides configuration options for customizing how a practice session
//! advances between segments and how often hosts should refresh live metrics.
//!
//! ## Usage
//!
//! ```rust
//! use clavis::config::{AdvancementPolicy, Configuration};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.advancement, AdvancementPolicy::LengthReached);
//!
//! // Require an exact match before moving on
//! let config = Configuration {
//!     advancement: AdvancementPolicy::StrictMatch,
//!     ..Configuration::default()
//! };
//! assert!(config.validate().is_ok());
//!
//! // Policies parse from their kebab-case names
//! let policy: AdvancementPolicy = "strict-match".parse().unwrap();
//! assert_eq!(policy, AdvancementPolicy::StrictMatch);
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use web_time::Duration;

use crate::compare::{is_completed, is_reached};

/// Tick interval used when none (or zero) is configured
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Decides when the active segment is considered finished
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AdvancementPolicy {
    /// Advance only once the buffer matches the target exactly
    StrictMatch,
    /// Advance as soon as the buffer is as long as the target, right or wrong
    #[default]
    LengthReached,
}

impl AdvancementPolicy {
    /// Whether `input` lets the session move past `target`
    pub fn should_advance(self, target: &str, input: &str) -> bool {
        match self {
            Self::StrictMatch => is_completed(target, input),
            Self::LengthReached => is_reached(target, input),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Runtime configuration for a practice session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// When the active segment hands over to the next one
    ///
    /// **Default**: `length-reached`
    pub advancement: AdvancementPolicy,
    /// How often a host should refresh elapsed time and WPM while the session runs
    ///
    /// **Default**: 1000 milliseconds
    pub tick_interval_ms: u64,
}

impl Configuration {
    /// Check the configuration for values the engine can't work with
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// The tick interval as a duration
    ///
    /// A zero interval would spin the host's timer, so it falls back to the default.
    pub const fn tick_interval(&self) -> Duration {
        if self.tick_interval_ms == 0 {
            return Duration::from_millis(DEFAULT_TICK_INTERVAL_MS);
        }
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            advancement: AdvancementPolicy::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_policy_names_round_trip() {
        for policy in AdvancementPolicy::iter() {
            let parsed: AdvancementPolicy = policy.to_string().parse().unwrap();
            assert_eq!(parsed, policy);
        }
        assert_eq!(AdvancementPolicy::LengthReached.to_string(), "length-reached");
        assert!("sometimes".parse::<AdvancementPolicy>().is_err());
    }

    #[test]
    fn test_should_advance() {
        assert!(AdvancementPolicy::LengthReached.should_advance("cat", "cag"));
        assert!(!AdvancementPolicy::StrictMatch.should_advance("cat", "cag"));
        assert!(AdvancementPolicy::StrictMatch.should_advance("cat", "CAT"));
        assert!(!AdvancementPolicy::LengthReached.should_advance("cat", "ca"));
    }

    #[test]
    fn test_validate() {
        assert_eq!(Configuration::default().validate(), Ok(()));

        let config = Configuration {
            tick_interval_ms: 0,
            ..Configuration::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_tick_interval() {
        let config = Configuration {
            tick_interval_ms: 250,
            ..Configuration::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_tick_interval_falls_back_to_default() {
        let config = Configuration {
            tick_interval_ms: 0,
            ..Configuration::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }
}
