//! Execution context for signals and actions.
//!
//! The tree is owned by its root, so a component cannot reach its
//! parent or siblings on its own. Handlers and actions receive a
//! [`ComponentContext`] instead: the mutable root, the builder registry,
//! and the path of the component currently being served.
//!
//! ```text
//! ┌───────────────────────────── ComponentContext ─────────────────────────┐
//! │  root: &mut Component      whole tree, cpath:/                         │
//! │  builders: &BuilderRegistry                                           │
//! │  this: Uri                 component the handler/action belongs to     │
//! │                                                                        │
//! │  resolve(path)   relative paths are resolved against `this`            │
//! │  call_signal()   validate args ──► handler(scoped ctx)                 │
//! │  execute()       action.execute(scoped ctx)                            │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `scoped` re-borrows the same tree for a nested call, so one action
//! can execute another or call a signal while keeping its own context.
//!
//! # Example
//!
//! ```
//! use cf3_component::{BuilderRegistry, Component, ComponentContext};
//! use cf3_signal::SignalArgs;
//! use cf3_types::Uri;
//!
//! let mut root = Component::root();
//! let builders = BuilderRegistry::with_core().unwrap();
//! let mut ctx = ComponentContext::new(&mut root, &builders);
//!
//! let args = SignalArgs::new().with("name", "mesh").with("type", "Group");
//! ctx.call_signal(&Uri::root(), "create_component", &args).unwrap();
//! assert!(ctx.access(&Uri::parse("/mesh").unwrap()).is_ok());
//! ```

use crate::link::Link;
use crate::{ActionKind, BuilderRegistry, Component, ComponentError, ComponentKind};
use cf3_signal::{ArgSchema, SignalArgs, Signature};
use cf3_types::{ComponentRef, Scheme, Uri, Value};
use tracing::{debug, trace};

/// Tree access for one handler or action invocation.
pub struct ComponentContext<'a> {
    root: &'a mut Component,
    builders: &'a BuilderRegistry,
    this: Uri,
}

impl<'a> ComponentContext<'a> {
    /// Context positioned at the root.
    pub fn new(root: &'a mut Component, builders: &'a BuilderRegistry) -> Self {
        let this = root.uri().clone();
        Self {
            root,
            builders,
            this,
        }
    }

    /// Context positioned at `this`.
    pub fn at(root: &'a mut Component, builders: &'a BuilderRegistry, this: Uri) -> Self {
        Self {
            root,
            builders,
            this,
        }
    }

    /// Re-borrows the tree positioned at `this`.
    pub fn scoped(&mut self, this: Uri) -> ComponentContext<'_> {
        ComponentContext {
            root: &mut *self.root,
            builders: self.builders,
            this,
        }
    }

    /// Path of the component being served.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.this
    }

    #[must_use]
    pub fn builders(&self) -> &'a BuilderRegistry {
        self.builders
    }

    #[must_use]
    pub fn root(&self) -> &Component {
        &*self.root
    }

    pub fn root_mut(&mut self) -> &mut Component {
        &mut *self.root
    }

    /// Absolute form of `path`, relative paths taken from `this`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] for a non-`cpath` URI or a path
    /// that climbs above the root.
    pub fn resolve(&self, path: &Uri) -> Result<Uri, ComponentError> {
        if path.scheme() != Scheme::Cpath {
            return Err(ComponentError::InvalidPath {
                component: self.this.to_string(),
                path: path.to_string(),
                reason: "not a component path".to_string(),
            });
        }
        path.resolve_against(&self.this)
            .map_err(|err| ComponentError::invalid_path(&self.this, path, &err))
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] when the served component was
    /// removed.
    pub fn this(&self) -> Result<&Component, ComponentError> {
        self.root.access_component(&self.this)
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] when the served component was
    /// removed.
    pub fn this_mut(&mut self) -> Result<&mut Component, ComponentError> {
        self.root.access_component_mut(&self.this)
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn access(&self, path: &Uri) -> Result<&Component, ComponentError> {
        let target = self.resolve(path)?;
        self.root.access_component(&target)
    }

    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn access_mut(&mut self, path: &Uri) -> Result<&mut Component, ComponentError> {
        let target = self.resolve(path)?;
        self.root.access_component_mut(&target)
    }

    /// Target of the [`Link`] component at `path`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] when `path` is not a link,
    /// [`ComponentError::SetupError`] for an unset link,
    /// [`ComponentError::Expired`] when the target is gone.
    pub fn follow(&self, path: &Uri) -> Result<&Component, ComponentError> {
        let link = self.access(path)?;
        Link::follow(&*self.root, link)
    }

    /// Absolute path stored in the component-reference option `option`
    /// of the served component, checked to still resolve.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`],
    /// [`ComponentError::SetupError`] when the option is unset,
    /// [`ComponentError::Expired`] when the target is gone.
    pub fn follow_option_uri(&self, option: &str) -> Result<Uri, ComponentError> {
        let this = self.this()?;
        let reference: ComponentRef = this.option(option)?;
        if reference.is_unset() {
            return Err(ComponentError::setup(
                &self.this,
                format!("option '{option}' does not reference a component"),
            ));
        }
        let target = self.resolve(reference.uri())?;
        if self.root.access_component(&target).is_err() {
            return Err(ComponentError::Expired {
                component: self.this.to_string(),
                target: target.to_string(),
            });
        }
        Ok(target)
    }

    /// Component referenced by option `option`.
    ///
    /// # Errors
    ///
    /// As [`follow_option_uri`](Self::follow_option_uri).
    pub fn follow_option(&self, option: &str) -> Result<&Component, ComponentError> {
        let target = self.follow_option_uri(option)?;
        self.root.access_component(&target)
    }

    /// Mutable component referenced by option `option`.
    ///
    /// # Errors
    ///
    /// As [`follow_option_uri`](Self::follow_option_uri).
    pub fn follow_option_mut(&mut self, option: &str) -> Result<&mut Component, ComponentError> {
        let target = self.follow_option_uri(option)?;
        self.root.access_component_mut(&target)
    }

    /// Configures an option on the component at `path`.
    ///
    /// # Errors
    ///
    /// Path errors, or any
    /// [`Component::configure_option`](crate::Component::configure_option) error.
    pub fn configure(
        &mut self,
        path: &Uri,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<(), ComponentError> {
        self.access_mut(path)?.configure_option(option, value)
    }

    /// Current signature of `signal` on the component at `path`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] or [`ComponentError::UnknownSignal`].
    pub fn signature(&self, path: &Uri, signal: &str) -> Result<Signature, ComponentError> {
        let component = self.access(path)?;
        let def = component.signals().signal(signal)?;
        Ok(match def.signature_handler() {
            Some(handler) => Signature::Described(handler(component, self.builders)),
            None => Signature::Unspecified,
        })
    }

    /// Calls `signal` on the component at `path`.
    ///
    /// When the signal has a signature, `args` are validated against it
    /// first and the handler receives the normalised frame. A rejected
    /// frame never reaches the handler.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`], [`ComponentError::UnknownSignal`],
    /// [`ComponentError::ArgumentError`], or the handler's error.
    pub fn call_signal(
        &mut self,
        path: &Uri,
        signal: &str,
        args: &SignalArgs,
    ) -> Result<SignalArgs, ComponentError> {
        let target = self.resolve(path)?;
        let component = self.root.access_component(&target)?;
        let def = component.signals().signal(signal)?;
        let handler = def.handler();
        let args = match def.signature_handler() {
            Some(signature) => {
                let schema: ArgSchema = signature(component, self.builders);
                schema
                    .validate(args)
                    .map_err(|source| ComponentError::ArgumentError {
                        component: target.to_string(),
                        signal: signal.to_string(),
                        source,
                    })?
            }
            None => args.clone(),
        };
        debug!(component = %target, signal = %signal, args = %args, "signal");
        let mut scoped = self.scoped(target);
        handler(&mut scoped, &args)
    }

    /// Executes the action at `path`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`], [`ComponentError::TypeMismatch`]
    /// when the component is not an action, or the action's error.
    pub fn execute(&mut self, path: &Uri) -> Result<(), ComponentError> {
        let target = self.resolve(path)?;
        let component = self.root.access_component(&target)?;
        let behavior = component
            .action_handle()
            .ok_or_else(|| component.type_mismatch(ActionKind::KIND))?;
        let action = behavior
            .as_action()
            .ok_or_else(|| ComponentError::setup(&target, "behaviour lost its action interface"))?;
        trace!(component = %target, "execute");
        let mut scoped = self.scoped(target);
        action.execute(&mut scoped)
    }

    /// Builds an unattached component through the registry.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownBuilder`] or a factory error.
    pub fn build(&self, type_name: &str, name: &str) -> Result<Component, ComponentError> {
        self.builders.build(type_name, name)
    }

    /// Attaches `component` under `parent` and returns its path.
    ///
    /// # Errors
    ///
    /// Path errors, [`ComponentError::NameConflict`] or
    /// [`ComponentError::InvalidName`].
    pub fn add_component(&mut self, parent: &Uri, component: Component) -> Result<Uri, ComponentError> {
        let added = self.access_mut(parent)?.add_component(component)?;
        Ok(added.uri().clone())
    }

    /// Detaches the component at `path`.
    ///
    /// # Errors
    ///
    /// Path errors, or [`ComponentError::SetupError`] for the root.
    pub fn remove_component(&mut self, path: &Uri) -> Result<Component, ComponentError> {
        let target = self.resolve(path)?;
        let (Some(parent), Some(name)) = (target.parent(), target.name()) else {
            return Err(ComponentError::setup(&target, "the root cannot be removed"));
        };
        self.root.access_component_mut(&parent)?.remove_component(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Behavior};
    use cf3_types::ValueType;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).unwrap()
    }

    struct Bump;

    impl Behavior for Bump {
        fn as_action(&self) -> Option<&dyn Action> {
            Some(self)
        }
    }

    impl Action for Bump {
        fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
            let this = ctx.this_mut()?;
            let n = this.properties().get_as::<u64>("count").unwrap_or(0);
            this.properties_mut().set("count", n + 1);
            Ok(())
        }
    }

    fn tree() -> Component {
        let mut root = Component::root();
        let solver = root.add_component(Component::new("solver")).unwrap();
        solver.add_component(Component::with_behavior("step", "Bump", Bump)).unwrap();
        solver
            .options_mut()
            .add_typed("time", ValueType::Component, uri("../time"))
            .unwrap();
        root.add_component(Component::new("time")).unwrap();
        root
    }

    #[test]
    fn resolve_relative_to_this() {
        let mut root = tree();
        let builders = BuilderRegistry::new();
        let ctx = ComponentContext::at(&mut root, &builders, uri("/solver/step"));
        assert_eq!(ctx.resolve(&uri("../../time")).unwrap(), uri("/time"));
        assert!(ctx.resolve(&uri("../../../x")).is_err());
        assert!(ctx.resolve(&uri("file:/tmp")).is_err());
    }

    #[test]
    fn execute_runs_action_in_scope() {
        let mut root = tree();
        let builders = BuilderRegistry::new();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        ctx.execute(&uri("/solver/step")).unwrap();
        ctx.execute(&uri("/solver/step")).unwrap();
        let step = ctx.access(&uri("/solver/step")).unwrap();
        assert_eq!(step.properties().get_as::<u64>("count"), Some(2));
    }

    #[test]
    fn execute_non_action_is_type_mismatch() {
        let mut root = tree();
        let builders = BuilderRegistry::new();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        assert!(matches!(
            ctx.execute(&uri("/solver")),
            Err(ComponentError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn follow_option_resolves_relative_reference() {
        let mut root = tree();
        let builders = BuilderRegistry::new();
        let mut ctx = ComponentContext::at(&mut root, &builders, uri("/solver"));
        assert_eq!(ctx.follow_option_uri("time").unwrap(), uri("/time"));

        ctx.remove_component(&uri("/time")).unwrap();
        assert!(matches!(
            ctx.follow_option("time"),
            Err(ComponentError::Expired { .. })
        ));
    }

    #[test]
    fn remove_root_rejected() {
        let mut root = tree();
        let builders = BuilderRegistry::new();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        assert!(matches!(
            ctx.remove_component(&Uri::root()),
            Err(ComponentError::SetupError { .. })
        ));
    }
}
