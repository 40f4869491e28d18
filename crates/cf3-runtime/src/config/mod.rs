//! Runtime settings for cf3.
//!
//! | Priority | Source | Scope |
//! |----------|--------|-------|
//! | 1 | CLI flags, via [`ConfigResolver`] | one invocation |
//! | 2 | `CF3_*` environment variables | shell session |
//! | 3 | `<case>/.cf3/config.toml` | one case directory |
//! | 4 | `~/.cf3/config.toml` | the user |
//! | 5 | [`Cf3Config::default`] | built in |
//!
//! A file only overrides the fields it sets to a non-default value.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CF3_DEBUG` | `debug` |
//! | `CF3_LOG_LEVEL` | `logging.level` |
//! | `CF3_STRICT_CONFIGURE` | `runtime.strict_recursive_configure` |
//! | `CF3_VERBOSE` | `ui.verbose` |
//! | `CF3_COLOR` | `ui.color` |
//!
//! ```toml
//! debug = false
//!
//! [logging]
//! level = "info"          # or a filter such as "warn,cf3_runtime=debug"
//!
//! [runtime]
//! strict_recursive_configure = true
//!
//! [ui]
//! color = false
//! ```
//!
//! ```no_run
//! use cf3_runtime::config::ConfigLoader;
//! use cf3_runtime::RuntimeContext;
//!
//! let config = ConfigLoader::new().with_project_root("cases/channel").load()?;
//! let runtime = RuntimeContext::with_builtins().unwrap().with_config(config);
//! # Ok::<(), cf3_runtime::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::{ConfigError, FileOp};
pub use loader::{save_global_config, ConfigLoader};
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{Cf3Config, LoggingConfig, RuntimeConfig, UiConfig};

use std::path::PathBuf;

/// Directory holding cf3 settings, both under `$HOME` and in a case.
pub const PROJECT_CONFIG_DIR: &str = ".cf3";

pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// `~/.cf3`, or `./.cf3` when no home directory is known.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
}

#[must_use]
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}
