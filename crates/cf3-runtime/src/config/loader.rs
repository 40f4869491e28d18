//! Layered configuration loading.
//!
//! Layers are applied in [`Layer`] order, each overriding the fields the
//! previous ones left at their defaults:
//!
//! 1. compile-time defaults
//! 2. global file (`~/.cf3/config.toml`)
//! 3. project file (`<case>/.cf3/config.toml`)
//! 4. `CF3_*` environment variables
//!
//! CLI flags are applied afterwards through a
//! [`ConfigResolver`](super::ConfigResolver).

use super::error::FileOp;
use super::{default_config_path, Cf3Config, ConfigError, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE};
use cf3_types::parse_bool;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Reads a boolean `CF3_*` variable into a config field.
macro_rules! env_flag {
    ($var:literal => $field:expr) => {
        if let Ok(raw) = std::env::var($var) {
            $field = parse_bool(&raw).ok_or(ConfigError::InvalidEnv {
                var: $var,
                value: raw,
                expected: "a boolean",
            })?;
        }
    };
}

/// Configuration file layers, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Global,
    Project,
}

/// Builds a [`Cf3Config`] from its layers.
///
/// # Example
///
/// ```
/// use cf3_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .skip_global_config()
///     .skip_env_vars()
///     .load()
///     .unwrap();
/// assert!(!config.debug);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Overrides `~/.cf3/config.toml`.
    global_config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Case directory whose `.cf3/config.toml` is the project layer.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    fn layer_path(&self, layer: Layer) -> Option<PathBuf> {
        match layer {
            Layer::Global if !self.skip_global => Some(
                self.global_config_path
                    .clone()
                    .unwrap_or_else(default_config_path),
            ),
            Layer::Project if !self.skip_project => self
                .project_root
                .as_ref()
                .map(|root| root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE)),
            _ => None,
        }
    }

    /// Merges every enabled layer over the defaults.
    ///
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] or [`ConfigError::Parse`] for a file that exists
    /// but cannot be used, [`ConfigError::InvalidEnv`] for a malformed
    /// variable and [`ConfigError::UnknownLogLevel`] when the merged level
    /// is not a tracing level or filter directive.
    pub fn load(&self) -> Result<Cf3Config, ConfigError> {
        let mut config = Cf3Config::default();

        for layer in [Layer::Global, Layer::Project] {
            let Some(path) = self.layer_path(layer) else {
                continue;
            };
            if let Some(file) = read_file(&path)? {
                debug!(?layer, path = %path.display(), "config layer applied");
                config.merge(&file);
            }
        }

        if !self.skip_env {
            apply_env(&mut config)?;
        }

        check_log_level(&config.logging.level)?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<Option<Cf3Config>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(FileOp::Read, path, e))?;
    Cf3Config::from_toml(&text)
        .map(Some)
        .map_err(|e| ConfigError::parse(path, e))
}

fn apply_env(config: &mut Cf3Config) -> Result<(), ConfigError> {
    env_flag!("CF3_DEBUG" => config.debug);
    env_flag!("CF3_STRICT_CONFIGURE" => config.runtime.strict_recursive_configure);
    env_flag!("CF3_VERBOSE" => config.ui.verbose);
    env_flag!("CF3_COLOR" => config.ui.color);
    if let Ok(level) = std::env::var("CF3_LOG_LEVEL") {
        config.logging.level = level;
    }
    Ok(())
}

/// Accepts a bare level name or an `EnvFilter` directive list such as
/// `warn,cf3_runtime=debug`.
fn check_log_level(level: &str) -> Result<(), ConfigError> {
    let known = level
        .split(',')
        .all(|part| part.contains('=') || LOG_LEVELS.contains(&part.trim().to_ascii_lowercase().as_str()));
    if known {
        Ok(())
    } else {
        Err(ConfigError::UnknownLogLevel(level.to_string()))
    }
}

/// Writes `config` to `~/.cf3/config.toml`, creating the directory.
///
/// # Errors
///
/// [`ConfigError`] when serialisation or a file operation fails.
pub fn save_global_config(config: &Cf3Config) -> Result<(), ConfigError> {
    save_config(config, &default_config_path())
}

pub(crate) fn save_config(config: &Cf3Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.exists()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::io(FileOp::CreateDir, dir, e))?;
    }
    let text = config.to_toml()?;
    std::fs::write(path, text).map_err(|e| ConfigError::io(FileOp::Write, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf3_types::ErrorCode;
    use tempfile::TempDir;

    fn write(dir: &Path, text: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, text).unwrap();
        path
    }

    fn files_only() -> ConfigLoader {
        ConfigLoader::new().skip_env_vars()
    }

    #[test]
    fn nothing_enabled_gives_defaults() {
        let config = files_only()
            .skip_global_config()
            .skip_project_config()
            .load()
            .unwrap();
        assert_eq!(config, Cf3Config::default());
    }

    #[test]
    fn global_file_applies() {
        let home = TempDir::new().unwrap();
        let path = write(home.path(), "debug = true\n[logging]\nlevel = \"info\"\n");
        let config = files_only()
            .with_global_config(&path)
            .skip_project_config()
            .load()
            .unwrap();
        assert!(config.debug);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn project_layer_wins_over_global() {
        let home = TempDir::new().unwrap();
        let case = TempDir::new().unwrap();
        let global = write(home.path(), "debug = true\n[logging]\nlevel = \"info\"\n");
        write(
            &case.path().join(".cf3"),
            "[logging]\nlevel = \"trace\"\n[runtime]\nstrict_recursive_configure = true\n",
        );

        let config = files_only()
            .with_global_config(&global)
            .with_project_root(case.path())
            .load()
            .unwrap();
        assert!(config.debug);
        assert_eq!(config.logging.level, "trace");
        assert!(config.runtime.strict_recursive_configure);
    }

    #[test]
    fn absent_files_are_skipped() {
        let config = files_only()
            .with_global_config("/nonexistent/cf3/config.toml")
            .with_project_root("/nonexistent/case")
            .load()
            .unwrap();
        assert_eq!(config, Cf3Config::default());
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let home = TempDir::new().unwrap();
        let path = write(home.path(), "debug = \"maybe\"");
        let err = files_only().with_global_config(&path).load().unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn unknown_level_rejected() {
        let home = TempDir::new().unwrap();
        let path = write(home.path(), "[logging]\nlevel = \"loud\"\n");
        let err = files_only().with_global_config(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLogLevel(ref l) if l == "loud"));
    }

    #[test]
    fn level_directives_accepted() {
        assert!(check_log_level("WARN").is_ok());
        assert!(check_log_level("warn,cf3_runtime=debug").is_ok());
        assert!(check_log_level("warn,chatty").is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("nested").join("config.toml");
        let mut config = Cf3Config::default();
        config.ui.verbose = true;
        save_config(&config, &path).unwrap();

        let loaded = files_only().with_global_config(&path).load().unwrap();
        assert!(loaded.ui.verbose);
    }
}
