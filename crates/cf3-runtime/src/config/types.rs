//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers. Every
/// field is optional in the file.
///
/// # Example
///
/// ```
/// use cf3_runtime::config::Cf3Config;
///
/// let config = Cf3Config::default();
/// assert!(!config.debug);
/// assert_eq!(config.logging.level, "warn");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cf3Config {
    /// Enable debug mode (debug logging, error chains).
    pub debug: bool,

    pub logging: LoggingConfig,

    pub runtime: RuntimeConfig,

    pub ui: UiConfig,
}

impl Cf3Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.logging.merge(&other.logging);
        self.runtime.merge(&other.runtime);
        self.ui.merge(&other.ui);
    }

    /// Filter directive for the tracing subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.logging.level
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `cf3_component=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        if other.level != Self::default().level {
            self.level = other.level.clone();
        }
    }
}

/// Runtime behaviour switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Recursive configure fails instead of skipping components that
    /// do not declare the option.
    pub strict_recursive_configure: bool,
}

impl RuntimeConfig {
    fn merge(&mut self, other: &Self) {
        if other.strict_recursive_configure {
            self.strict_recursive_configure = true;
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Print replies and listings in full.
    pub verbose: bool,

    /// Colored output.
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

impl UiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.verbose != default.verbose {
            self.verbose = other.verbose;
        }
        if other.color != default.color {
            self.color = other.color;
        }
    }
}
