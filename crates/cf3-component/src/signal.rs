//! Signal tables.
//!
//! Each component owns a [`SignalTable`]: named handlers that can be
//! invoked from outside with a [`SignalArgs`] frame. A signal may also
//! publish a signature, computed on demand from the component's current
//! state, against which incoming frames are validated before the handler
//! runs.
//!
//! Dispatch is performed by
//! [`ComponentContext::call_signal`](crate::ComponentContext::call_signal).

use crate::{BuilderRegistry, Component, ComponentContext, ComponentError};
use cf3_signal::{ArgSchema, SignalArgs};
use cf3_types::Uri;
use std::fmt;
use std::sync::Arc;

/// Signal handler. May mutate the tree through the context.
pub type SignalHandler = Arc<
    dyn Fn(&mut ComponentContext<'_>, &SignalArgs) -> Result<SignalArgs, ComponentError>
        + Send
        + Sync,
>;

/// Signature handler. Describes the arguments given the component's
/// current state and the registered builders.
pub type SignatureHandler = Arc<dyn Fn(&Component, &BuilderRegistry) -> ArgSchema + Send + Sync>;

/// One registered signal.
#[derive(Clone)]
pub struct SignalDef {
    name: String,
    description: String,
    pretty_name: String,
    hidden: bool,
    handler: SignalHandler,
    signature: Option<SignatureHandler>,
}

impl SignalDef {
    pub(crate) fn new(name: impl Into<String>, handler: SignalHandler) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pretty_name: String::new(),
            hidden: false,
            handler,
            signature: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn pretty_name(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.name
        } else {
            &self.pretty_name
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.signature.is_some()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_pretty_name(&mut self, pretty_name: impl Into<String>) -> &mut Self {
        self.pretty_name = pretty_name.into();
        self
    }

    /// Hides the signal from listings. It stays callable.
    pub fn hide(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub fn set_signature<F>(&mut self, signature: F) -> &mut Self
    where
        F: Fn(&Component, &BuilderRegistry) -> ArgSchema + Send + Sync + 'static,
    {
        self.signature = Some(Arc::new(signature));
        self
    }

    pub(crate) fn handler(&self) -> SignalHandler {
        Arc::clone(&self.handler)
    }

    pub(crate) fn signature_handler(&self) -> Option<SignatureHandler> {
        self.signature.clone()
    }
}

impl fmt::Debug for SignalDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalDef")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("has_signature", &self.signature.is_some())
            .finish()
    }
}

/// Signals of one component, in registration order.
#[derive(Debug, Default)]
pub struct SignalTable {
    owner: Uri,
    signals: Vec<SignalDef>,
}

impl SignalTable {
    pub(crate) fn with_defs(defs: Vec<SignalDef>) -> Self {
        Self {
            owner: Uri::default(),
            signals: defs,
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Uri) {
        self.owner = owner;
    }

    /// Registers a handler.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateSignal`] when the name is taken.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&mut SignalDef, ComponentError>
    where
        F: Fn(&mut ComponentContext<'_>, &SignalArgs) -> Result<SignalArgs, ComponentError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(ComponentError::DuplicateSignal {
                component: self.owner.to_string(),
                signal: name,
            });
        }
        self.signals.push(SignalDef::new(name, Arc::new(handler)));
        let index = self.signals.len() - 1;
        Ok(&mut self.signals[index])
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SignalDef> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SignalDef> {
        self.signals.iter_mut().find(|s| s.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// # Errors
    ///
    /// [`ComponentError::UnknownSignal`].
    pub fn signal(&self, name: &str) -> Result<&SignalDef, ComponentError> {
        self.get(name).ok_or_else(|| ComponentError::UnknownSignal {
            component: self.owner.to_string(),
            signal: name.to_string(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<SignalDef> {
        let index = self.signals.iter().position(|s| s.name == name)?;
        Some(self.signals.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalDef> {
        self.signals.iter()
    }

    /// Names of signals that are not hidden.
    pub fn visible_names(&self) -> impl Iterator<Item = &str> {
        self.signals
            .iter()
            .filter(|s| !s.hidden)
            .map(SignalDef::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
        Ok(SignalArgs::new())
    }

    #[test]
    fn register_and_lookup() {
        let mut table = SignalTable::default();
        table.set_owner(Uri::parse("/solver").unwrap());
        table
            .register("solve", noop)
            .unwrap()
            .set_description("run the solver")
            .set_pretty_name("Solve");
        let def = table.signal("solve").unwrap();
        assert_eq!(def.description(), "run the solver");
        assert_eq!(def.pretty_name(), "Solve");
        assert!(!def.has_signature());
    }

    #[test]
    fn duplicate_signal_rejected() {
        let mut table = SignalTable::default();
        table.set_owner(Uri::parse("/solver").unwrap());
        table.register("solve", noop).unwrap();
        let err = table.register("solve", noop).unwrap_err();
        assert_eq!(
            err,
            ComponentError::DuplicateSignal {
                component: "cpath:/solver".into(),
                signal: "solve".into()
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_signal_names_owner() {
        let mut table = SignalTable::default();
        table.set_owner(Uri::parse("/mesh").unwrap());
        let err = table.signal("refine").unwrap_err();
        assert_eq!(
            err,
            ComponentError::UnknownSignal {
                component: "cpath:/mesh".into(),
                signal: "refine".into()
            }
        );
    }

    #[test]
    fn hidden_signals_not_listed() {
        let mut table = SignalTable::default();
        table.register("a", noop).unwrap();
        table.register("b", noop).unwrap().hide();
        assert_eq!(table.visible_names().collect::<Vec<_>>(), ["a"]);
        assert!(table.contains("b"));
        assert!(table.remove("b").is_some());
        assert!(!table.contains("b"));
    }
}
