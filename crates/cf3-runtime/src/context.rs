//! Runtime context: one tree, one registry, one configuration.
//!
//! [`RuntimeContext`] is the single owner of everything a session
//! touches. There are no process-wide registries; two contexts never
//! share state.
//!
//! Every tree operation here resolves paths against the root. Scripts
//! that track a working directory go through
//! [`context_at`](RuntimeContext::context_at) instead.

use crate::config::Cf3Config;
use crate::library;
use cf3_component::{
    BuilderRegistry, Component, ComponentContext, ComponentError, ComponentSnapshot,
    ConfigureReport, SnapshotError,
};
use cf3_signal::{SignalArgs, Signature};
use cf3_types::{Uri, Value};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// A runtime shared between threads behind a single lock.
///
/// Operations stay synchronous; the lock serialises them.
pub type SharedRuntime = Arc<RwLock<RuntimeContext>>;

/// Owner of a component tree and the builders that populate it.
pub struct RuntimeContext {
    root: Component,
    builders: BuilderRegistry,
    config: Cf3Config,
}

impl RuntimeContext {
    /// A fresh root served by `builders`.
    ///
    /// Registration is expected to be complete; the registry is only
    /// read from here on.
    #[must_use]
    pub fn new(builders: BuilderRegistry) -> Self {
        Self {
            root: Component::root(),
            builders,
            config: Cf3Config::default(),
        }
    }

    /// A fresh root with the core builders and the builtin library.
    ///
    /// # Errors
    ///
    /// A builder registration error.
    pub fn with_builtins() -> Result<Self, ComponentError> {
        library::builtin_registry().map(Self::new)
    }

    #[must_use]
    pub fn with_config(mut self, config: Cf3Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> SharedRuntime {
        Arc::new(RwLock::new(self))
    }

    #[must_use]
    pub fn config(&self) -> &Cf3Config {
        &self.config
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

    /// Context positioned at the root.
    pub fn context(&mut self) -> ComponentContext<'_> {
        ComponentContext::new(&mut self.root, &self.builders)
    }

    /// Context positioned at `this`; relative paths resolve against it.
    pub fn context_at(&mut self, this: Uri) -> ComponentContext<'_> {
        ComponentContext::at(&mut self.root, &self.builders, this)
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn access(&self, path: &Uri) -> Result<&Component, ComponentError> {
        self.root.access_component(path)
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn access_mut(&mut self, path: &Uri) -> Result<&mut Component, ComponentError> {
        self.root.access_component_mut(path)
    }

    /// Builds `type_name` and attaches it as `name` under `parent`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownBuilder`], path and name errors.
    pub fn create_component(
        &mut self,
        parent: &Uri,
        type_name: &str,
        name: &str,
    ) -> Result<Uri, ComponentError> {
        let component = self.builders.build(type_name, name)?;
        let uri = self.context().add_component(parent, component)?;
        debug!(uri = %uri, type_name = %type_name, "component created");
        Ok(uri)
    }

    /// Detaches the component at `path`.
    ///
    /// # Errors
    ///
    /// Path errors, or [`ComponentError::SetupError`] for the root.
    pub fn remove_component(&mut self, path: &Uri) -> Result<Component, ComponentError> {
        self.context().remove_component(path)
    }

    /// # Errors
    ///
    /// Path errors, or any
    /// [`Component::configure_option`] error.
    pub fn configure(
        &mut self,
        path: &Uri,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<(), ComponentError> {
        self.context().configure(path, option, value)
    }

    /// Configures `option` on the subtree at `path`.
    ///
    /// Lenient by default; with `runtime.strict_recursive_configure` set
    /// a subtree where some component lacks the option is refused.
    ///
    /// # Errors
    ///
    /// Path errors, the first configure error, or
    /// [`ComponentError::SetupError`] in strict mode.
    pub fn configure_recursively(
        &mut self,
        path: &Uri,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<ConfigureReport, ComponentError> {
        let strict = self.config.runtime.strict_recursive_configure;
        let component = self.root.access_component_mut(path)?;
        if strict {
            component.configure_option_recursively_strict(option, value)
        } else {
            component.configure_option_recursively(option, value)
        }
    }

    /// # Errors
    ///
    /// Path errors, [`ComponentError::UnknownSignal`],
    /// [`ComponentError::ArgumentError`], or the handler's error.
    pub fn call_signal(
        &mut self,
        path: &Uri,
        signal: &str,
        args: &SignalArgs,
    ) -> Result<SignalArgs, ComponentError> {
        self.context().call_signal(path, signal, args)
    }

    /// # Errors
    ///
    /// Path errors or [`ComponentError::UnknownSignal`].
    pub fn signature(&mut self, path: &Uri, signal: &str) -> Result<Signature, ComponentError> {
        self.context().signature(path, signal)
    }

    /// # Errors
    ///
    /// Path errors, [`ComponentError::TypeMismatch`] for a non-action,
    /// or the action's error.
    pub fn execute(&mut self, path: &Uri) -> Result<(), ComponentError> {
        self.context().execute(path)
    }

    /// Records the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> ComponentSnapshot {
        ComponentSnapshot::capture(&self.root)
    }

    /// Rebuilds from `snapshot`.
    ///
    /// A root snapshot replaces the tree. Any other snapshot is rebuilt
    /// under the parent its recorded path names.
    ///
    /// # Errors
    ///
    /// [`SnapshotError`] on version, builder or option failures. The
    /// current tree is untouched when rebuilding fails.
    pub fn restore(&mut self, snapshot: &ComponentSnapshot) -> Result<(), SnapshotError> {
        if snapshot.uri.is_root() {
            self.root = snapshot.restore(&self.builders)?;
            info!(components = self.root.find_components_recursively().count(), "tree restored");
            return Ok(());
        }
        let parent = snapshot
            .uri
            .parent()
            .filter(Uri::is_absolute)
            .unwrap_or_else(Uri::root);
        let target = self.root.access_component_mut(&parent)?;
        snapshot.restore_into(target, &self.builders)?;
        Ok(())
    }
}
