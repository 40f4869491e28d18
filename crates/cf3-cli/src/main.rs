//! cf3 CLI - run component scripts.
//!
//! Builds a fresh runtime with the builtin library, runs a script file
//! and/or inline commands against it, and prints what the commands
//! produce.
//!
//! ```text
//! cf3 case.cf3
//! cf3 -e "create /time CTime" -e "options /time"
//! cf3 --snapshot case.cf3 > tree.json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`CF3_*`)
//! 3. Project config (`.cf3/config.toml` in the project directory)
//! 4. Global config (`~/.cf3/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `CF3_DEBUG`: Enable debug mode (`true`/`false`)
//! - `CF3_LOG_LEVEL`: Log filter directive
//! - `CF3_STRICT_CONFIGURE`: Refuse partial recursive configure
//! - `CF3_VERBOSE`: Echo each command before its output
//! - `CF3_COLOR`: Colored log output

use anyhow::{Context, Result};
use cf3_runtime::config::{Cf3Config, ConfigError, ConfigLoader, ConfigResolver};
use cf3_runtime::script::{ScriptError, ScriptRunner};
use cf3_runtime::RuntimeContext;
use cf3_types::ErrorCode;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// cf3 - component runtime for CFD cases
#[derive(Parser, Debug)]
#[command(name = "cf3")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Echo each command before its output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Log filter directive (also: CF3_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Refuse recursive configure when a component lacks the option
    #[arg(long)]
    strict: bool,

    /// Print a JSON snapshot of the tree after running
    #[arg(long)]
    snapshot: bool,

    /// Command to run after the script (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "CMD")]
    exec: Vec<String>,

    /// Script file to run
    script: Option<PathBuf>,
}

/// CLI-based configuration resolver.
///
/// Loads file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    verbose: bool,
    strict: bool,
    log_level: Option<String>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            verbose: args.verbose,
            strict: args.strict,
            log_level: args.log_level.clone(),
        }
    }

    fn resolve(&self) -> Result<Cf3Config, ConfigError> {
        let mut config = ConfigLoader::new()
            .with_project_root(&self.project_root)
            .load()?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut Cf3Config) {
        if self.debug {
            config.debug = true;
        }
        if self.verbose {
            config.ui.verbose = true;
        }
        if self.strict {
            config.runtime.strict_recursive_configure = true;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

/// Filter priority: --debug / --log-level > RUST_LOG > config.
fn init_tracing(config: &Cf3Config, cli_override: bool) {
    let filter = if cli_override {
        EnvFilter::new(config.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_ansi(config.ui.color)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ScriptError>() {
                Some(script) => eprintln!("error[{}]: {script}", script.code()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let resolver = CliConfigResolver::from_args(args);
    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error [{}]: {e}", e.code()))?;
    init_tracing(&config, args.debug || args.log_level.is_some());

    info!(path = %resolver.project_root.display(), "Project root");
    debug!(?config, "configuration resolved");

    let verbose = config.ui.verbose;
    let mut runtime = RuntimeContext::with_builtins()
        .context("failed to register builtin components")?
        .with_config(config);

    {
        let mut runner = ScriptRunner::new(&mut runtime);
        if let Some(ref script) = args.script {
            let result = runner.run_file(script);
            print_output(&mut runner, None);
            result?;
        }
        for (index, command) in args.exec.iter().enumerate() {
            let result = runner.run_line(index + 1, command);
            print_output(&mut runner, verbose.then_some(command.as_str()));
            result?;
        }
    }

    if args.snapshot {
        let json = runtime
            .snapshot()
            .to_json()
            .context("failed to serialize snapshot")?;
        println!("{json}");
    }

    Ok(())
}

fn print_output(runner: &mut ScriptRunner<'_>, echo: Option<&str>) {
    if let Some(command) = echo {
        println!("> {command}");
    }
    for line in runner.take_output() {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver_in(dir: &TempDir) -> CliConfigResolver {
        CliConfigResolver {
            project_root: dir.path().to_path_buf(),
            debug: false,
            verbose: false,
            strict: false,
            log_level: None,
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let mut resolver = resolver_in(&dir);
        resolver.strict = true;
        resolver.log_level = Some("trace".into());

        let mut config = Cf3Config::default();
        resolver.apply(&mut config);
        assert!(config.runtime.strict_recursive_configure);
        assert_eq!(config.logging.level, "trace");
        assert!(!config.debug);
    }

    #[test]
    fn unset_flags_keep_config() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_in(&dir);
        let mut config = Cf3Config::default();
        config.ui.verbose = true;
        resolver.apply(&mut config);
        assert!(config.ui.verbose);
    }

    #[test]
    fn args_parse() {
        let args = Args::parse_from(["cf3", "-e", "pwd", "--exec", "tree", "--strict", "case.cf3"]);
        assert_eq!(args.exec, ["pwd", "tree"]);
        assert!(args.strict);
        assert_eq!(args.script, Some(PathBuf::from("case.cf3")));
    }
}
