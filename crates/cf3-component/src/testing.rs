//! Testing harness for component trees.
//!
//! Drives signals, option changes and actions against an in-memory tree
//! without a runtime, recording every call so tests can assert on the
//! sequence as well as the outcome.
//!
//! # Features
//!
//! - Owns a root and a builder registry
//! - Signal, configure and execute calls with logging
//! - [`MockAction`] that counts executions and can be made to fail
//!
//! # Example
//!
//! ```
//! use cf3_component::testing::{ComponentTestHarness, MockAction};
//! use cf3_component::Component;
//! use cf3_signal::SignalArgs;
//! use cf3_types::Uri;
//!
//! let mut harness = ComponentTestHarness::new().unwrap();
//! let (step, counter) = MockAction::component("step");
//! harness.mount(&Uri::root(), step).unwrap();
//!
//! let step_uri = Uri::parse("/step").unwrap();
//! harness.execute(&step_uri).unwrap();
//! harness.call(&step_uri, "execute", SignalArgs::new()).unwrap();
//! assert_eq!(counter.count(), 2);
//! assert_eq!(harness.signal_log().len(), 1);
//! ```

use crate::{Action, Behavior, BuilderRegistry, Component, ComponentContext, ComponentError};
use cf3_signal::SignalArgs;
use cf3_types::{Uri, Value};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of a logged call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CallResult {
    /// Call succeeded; signal replies are kept.
    Ok(SignalArgs),
    /// Call failed with an error message.
    Err(String),
}

impl CallResult {
    fn from_result<T>(result: &Result<T, ComponentError>, reply: impl FnOnce(&T) -> SignalArgs) -> Self {
        match result {
            Ok(value) => Self::Ok(reply(value)),
            Err(e) => Self::Err(e.to_string()),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Record of a signal call or execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Target path.
    pub target: Uri,
    /// Signal name; `execute` for direct executions.
    pub signal: String,
    pub args: SignalArgs,
    pub result: CallResult,
}

/// Record of an option change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigureRecord {
    pub target: Uri,
    pub option: String,
    pub value: Value,
    pub result: CallResult,
}

/// Test harness for component trees.
pub struct ComponentTestHarness {
    root: Component,
    builders: BuilderRegistry,
    signal_log: Vec<SignalRecord>,
    configure_log: Vec<ConfigureRecord>,
}

impl ComponentTestHarness {
    /// A fresh root with the core builders.
    ///
    /// # Errors
    ///
    /// A core builder registration error.
    pub fn new() -> Result<Self, ComponentError> {
        BuilderRegistry::with_core().map(Self::with_builders)
    }

    #[must_use]
    pub fn with_builders(builders: BuilderRegistry) -> Self {
        Self {
            root: Component::root(),
            builders,
            signal_log: Vec::new(),
            configure_log: Vec::new(),
        }
    }

    /// Attaches `component` under `parent` and returns its path.
    ///
    /// # Errors
    ///
    /// Path or name errors from the tree.
    pub fn mount(&mut self, parent: &Uri, component: Component) -> Result<Uri, ComponentError> {
        self.context().add_component(parent, component)
    }

    #[must_use]
    pub fn root(&self) -> &Component {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Component {
        &mut self.root
    }

    #[must_use]
    pub fn builders(&self) -> &BuilderRegistry {
        &self.builders
    }

    pub fn builders_mut(&mut self) -> &mut BuilderRegistry {
        &mut self.builders
    }

    /// A context at the root. Calls made through it are not logged.
    pub fn context(&mut self) -> ComponentContext<'_> {
        ComponentContext::new(&mut self.root, &self.builders)
    }

    /// Resolves an absolute path.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn get(&self, path: &Uri) -> Result<&Component, ComponentError> {
        self.root.access_component(path)
    }

    /// Calls a signal and logs it.
    ///
    /// # Errors
    ///
    /// Whatever the call returns.
    pub fn call(&mut self, target: &Uri, signal: &str, args: SignalArgs) -> Result<SignalArgs, ComponentError> {
        let result = self.context().call_signal(target, signal, &args);
        self.signal_log.push(SignalRecord {
            target: target.clone(),
            signal: signal.to_string(),
            args,
            result: CallResult::from_result(&result, SignalArgs::clone),
        });
        result
    }

    /// Configures an option and logs it.
    ///
    /// # Errors
    ///
    /// Whatever [`Component::configure_option`] returns.
    pub fn configure(
        &mut self,
        target: &Uri,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<(), ComponentError> {
        let value = value.into();
        let result = self.context().configure(target, option, value.clone());
        self.configure_log.push(ConfigureRecord {
            target: target.clone(),
            option: option.to_string(),
            value,
            result: CallResult::from_result(&result, |_| SignalArgs::new()),
        });
        result
    }

    /// Executes an action. Direct executions are not logged as signals.
    ///
    /// # Errors
    ///
    /// Whatever the action returns.
    pub fn execute(&mut self, target: &Uri) -> Result<(), ComponentError> {
        self.context().execute(target)
    }

    #[must_use]
    pub fn signal_log(&self) -> &[SignalRecord] {
        &self.signal_log
    }

    #[must_use]
    pub fn configure_log(&self) -> &[ConfigureRecord] {
        &self.configure_log
    }

    pub fn clear_logs(&mut self) {
        self.signal_log.clear();
        self.configure_log.clear();
    }
}

/// Shared execution counter of a [`MockAction`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionCounter(Arc<AtomicUsize>);

impl ExecutionCounter {
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Action that counts its executions.
#[derive(Debug, Default)]
pub struct MockAction {
    counter: ExecutionCounter,
    fail_with: Option<String>,
}

impl MockAction {
    /// A mock component of type `MockAction` and its counter.
    #[must_use]
    pub fn component(name: &str) -> (Component, ExecutionCounter) {
        let action = Self::default();
        let counter = action.counter.clone();
        (Component::with_behavior(name, "MockAction", action), counter)
    }

    /// A mock whose executions fail with `reason` after counting.
    #[must_use]
    pub fn failing(name: &str, reason: &str) -> (Component, ExecutionCounter) {
        let action = Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        };
        let counter = action.counter.clone();
        (Component::with_behavior(name, "MockAction", action), counter)
    }
}

impl Behavior for MockAction {
    fn as_action(&self) -> Option<&dyn Action> {
        Some(self)
    }
}

impl Action for MockAction {
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        self.counter.0.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(ComponentError::failed(ctx.uri(), reason.clone())),
            None => Ok(()),
        }
    }
}
