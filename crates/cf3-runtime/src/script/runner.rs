//! Script execution against a runtime.

use super::{ScriptCommand, ScriptError, ScriptParser};
use crate::RuntimeContext;
use cf3_component::{Component, ComponentError};
use cf3_signal::{parse_args, FrameError, RawArg, SignalArgs};
use cf3_types::{Uri, Value};
use std::path::Path;
use tracing::debug;

/// Runs script lines against a [`RuntimeContext`].
///
/// Keeps a working directory for relative paths and collects output
/// lines. The runtime stays usable after the runner is dropped.
///
/// # Example
///
/// ```
/// use cf3_runtime::script::ScriptRunner;
/// use cf3_runtime::RuntimeContext;
///
/// let mut runtime = RuntimeContext::with_builtins().unwrap();
/// let mut runner = ScriptRunner::new(&mut runtime);
/// runner.run_script("create /mesh Group\ncd /mesh\npwd").unwrap();
/// assert_eq!(runner.output().last().map(String::as_str), Some("cpath:/mesh"));
/// ```
pub struct ScriptRunner<'r> {
    runtime: &'r mut RuntimeContext,
    cwd: Uri,
    output: Vec<String>,
}

impl<'r> ScriptRunner<'r> {
    pub fn new(runtime: &'r mut RuntimeContext) -> Self {
        Self {
            runtime,
            cwd: Uri::root(),
            output: Vec::new(),
        }
    }

    /// Current working directory.
    #[must_use]
    pub fn cwd(&self) -> &Uri {
        &self.cwd
    }

    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Runs every line of `text`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// [`ScriptError`] naming the failing line.
    pub fn run_script(&mut self, text: &str) -> Result<(), ScriptError> {
        text.lines()
            .enumerate()
            .try_for_each(|(index, line)| self.run_line(index + 1, line))
    }

    /// Reads and runs a script file.
    ///
    /// # Errors
    ///
    /// [`ScriptError::ReadFile`], or as [`run_script`](Self::run_script).
    pub fn run_file(&mut self, path: &Path) -> Result<(), ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "running script");
        self.run_script(&text)
    }

    /// Parses and runs a single line.
    ///
    /// # Errors
    ///
    /// [`ScriptError::Syntax`] or [`ScriptError::Command`].
    pub fn run_line(&mut self, line: usize, text: &str) -> Result<(), ScriptError> {
        let command =
            ScriptParser::parse(text).map_err(|source| ScriptError::Syntax { line, source })?;
        if let ScriptCommand::Unknown { input } = &command {
            let word = input.split_whitespace().next().unwrap_or_default();
            return Err(ScriptError::Syntax {
                line,
                source: super::SyntaxError::UnknownCommand(word.to_string()),
            });
        }
        debug!(line, command = command.keyword(), "script line");
        self.run(command).map_err(|source| ScriptError::Command {
            line,
            command: text.trim().to_string(),
            source,
        })
    }

    /// Runs an already parsed command.
    ///
    /// # Errors
    ///
    /// The component error the command produced.
    pub fn run(&mut self, command: ScriptCommand) -> Result<(), ComponentError> {
        match command {
            ScriptCommand::Empty | ScriptCommand::Unknown { .. } => Ok(()),
            ScriptCommand::Create { path, builder } => self.create(&path, &builder),
            ScriptCommand::Remove { path } => {
                self.runtime.context_at(self.cwd.clone()).remove_component(&path)?;
                Ok(())
            }
            ScriptCommand::Move { path, parent } => {
                let mut ctx = self.runtime.context_at(self.cwd.clone());
                let parent = ctx.resolve(&parent)?;
                let reply = ctx.call_signal(
                    &path,
                    "move_component",
                    &SignalArgs::new().with("path", parent),
                )?;
                self.print_reply(&reply);
                Ok(())
            }
            ScriptCommand::Configure { path, args } => self.configure(&path, &args),
            ScriptCommand::ConfigureAll { path, args } => self.configure_all(&path, &args),
            ScriptCommand::Call { path, signal, args } => self.call(&path, &signal, &args),
            ScriptCommand::Execute { path } => {
                self.runtime.context_at(self.cwd.clone()).execute(&path)
            }
            ScriptCommand::Signature { path, signal } => {
                let signature = self
                    .runtime
                    .context_at(self.cwd.clone())
                    .signature(&path, &signal)?;
                self.print_lines(&signature.to_string());
                Ok(())
            }
            ScriptCommand::Tree { path } => {
                let tree = self.target(path.as_ref())?.tree_string();
                self.print_lines(&tree);
                Ok(())
            }
            ScriptCommand::Options { path } => {
                let lines: Vec<String> = self
                    .target(path.as_ref())?
                    .options()
                    .iter()
                    .map(|o| format!("{}:{} = {}", o.name(), o.value_type(), o.value()))
                    .collect();
                self.output.extend(lines);
                Ok(())
            }
            ScriptCommand::List { path } => {
                let lines: Vec<String> = self
                    .target(path.as_ref())?
                    .children()
                    .map(|c| format!("{} [{}]", c.name(), c.type_name()))
                    .collect();
                self.output.extend(lines);
                Ok(())
            }
            ScriptCommand::ChangeDir { path } => {
                let ctx = self.runtime.context_at(self.cwd.clone());
                let target = ctx.resolve(&path)?;
                ctx.access(&target)?;
                self.cwd = target;
                Ok(())
            }
            ScriptCommand::Pwd => {
                self.output.push(self.cwd.to_string());
                Ok(())
            }
        }
    }

    fn target(&mut self, path: Option<&Uri>) -> Result<&Component, ComponentError> {
        let path = path.cloned().unwrap_or_else(|| self.cwd.clone());
        let target = self.runtime.context_at(self.cwd.clone()).resolve(&path)?;
        self.runtime.access(&target)
    }

    fn create(&mut self, path: &Uri, builder: &str) -> Result<(), ComponentError> {
        let target = self.runtime.context_at(self.cwd.clone()).resolve(path)?;
        let (Some(parent), Some(name)) = (target.parent(), target.name()) else {
            return Err(ComponentError::setup(&target, "the root already exists"));
        };
        let uri = self.runtime.create_component(&parent, builder, name)?;
        self.output.push(uri.to_string());
        Ok(())
    }

    fn configure(&mut self, path: &Uri, tokens: &[String]) -> Result<(), ComponentError> {
        let mut ctx = self.runtime.context_at(self.cwd.clone());
        let target = ctx.resolve(path)?;
        let component = ctx.access(&target)?;
        let mut args = SignalArgs::new();
        for token in tokens {
            let (name, value) = typed_value(component, &target, token, "configure")?;
            args = args.with(name, value);
        }
        ctx.call_signal(&target, "configure", &args)?;
        Ok(())
    }

    fn configure_all(&mut self, path: &Uri, tokens: &[String]) -> Result<(), ComponentError> {
        let target = self.runtime.context_at(self.cwd.clone()).resolve(path)?;
        for token in tokens {
            let subtree = self.runtime.access(&target)?;
            let (name, value) = typed_value(subtree, &target, token, "configure_all")?;
            let report = self.runtime.configure_recursively(&target, &name, value)?;
            self.output.push(format!(
                "{name}: {} configured, {} skipped",
                report.configured.len(),
                report.skipped.len()
            ));
        }
        Ok(())
    }

    fn call(&mut self, path: &Uri, signal: &str, tokens: &[String]) -> Result<(), ComponentError> {
        let mut ctx = self.runtime.context_at(self.cwd.clone());
        let target = ctx.resolve(path)?;
        let signature = ctx.signature(&target, signal)?;
        let args = parse_args(tokens, signature.schema()).map_err(|source| {
            ComponentError::ArgumentError {
                component: target.to_string(),
                signal: signal.to_string(),
                source,
            }
        })?;
        let reply = ctx.call_signal(&target, signal, &args)?;
        self.print_reply(&reply);
        Ok(())
    }

    fn print_reply(&mut self, reply: &SignalArgs) {
        for (key, value) in reply.iter() {
            match value {
                Value::String(text) if text.contains('\n') => self.print_lines(text),
                _ => self.output.push(format!("{key}: {value}")),
            }
        }
    }

    fn print_lines(&mut self, text: &str) {
        self.output.extend(text.lines().map(str::to_string));
    }
}

/// Parses `name[:type]=value`, taking the type from the first component
/// in `subtree` that declares the option when none is written.
fn typed_value(
    subtree: &Component,
    target: &Uri,
    token: &str,
    signal: &str,
) -> Result<(String, Value), ComponentError> {
    let argument_error = |source: FrameError| ComponentError::ArgumentError {
        component: target.to_string(),
        signal: signal.to_string(),
        source,
    };
    let raw = RawArg::parse(token).map_err(argument_error)?;
    let hint = std::iter::once(subtree)
        .chain(subtree.find_components_recursively())
        .find_map(|c| c.options().get(&raw.name))
        .map(|o| o.value_type());
    let value = raw.resolve(hint).map_err(argument_error)?;
    Ok((raw.name, value))
}
