//! The component tree node.
//!
//! A [`Component`] owns its children, so the tree is a plain recursive
//! value: removing a child moves the whole subtree out, dropping it
//! destroys it. Parents are never referenced from children; operations
//! that need to look up or across the tree (relative paths, links,
//! signals) go through a [`ComponentContext`](crate::ComponentContext)
//! that carries the root.
//!
//! # Paths
//!
//! ```text
//! Root               cpath:/
//! ├── solver         cpath:/solver
//! │   └── bc         cpath:/solver/bc
//! └── time           cpath:/time
//!
//! detached "inlet"   cpath:inlet       (relative: empty prefix)
//! └── values         cpath:inlet/values
//! ```
//!
//! Attaching a subtree recomputes every path inside it.
//!
//! # Example
//!
//! ```
//! use cf3_component::Component;
//! use cf3_types::Uri;
//!
//! let mut root = Component::root();
//! let solver = root.add_component(Component::new("solver")).unwrap();
//! solver.add_component(Component::new("bc")).unwrap();
//!
//! let bc = root.access_component(&Uri::parse("/solver/bc").unwrap()).unwrap();
//! assert_eq!(bc.uri().to_string(), "cpath:/solver/bc");
//!
//! let removed = root.get_child_mut("solver").unwrap().remove_component("bc").unwrap();
//! assert_eq!(removed.uri().to_string(), "cpath:bc");
//! ```

use crate::behavior::{short_type_name, AsAny};
use crate::core_signals;
use crate::find::{Descendants, Predicate};
use crate::{
    Behavior, ComponentError, ComponentKind, Group, OptionList, PropertyList, SignalTable,
};
use cf3_types::{validate_name, Scheme, TypedValue, Uri, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a recursive configure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureReport {
    /// Components whose option was set.
    pub configured: Vec<Uri>,
    /// Visited components that do not declare the option.
    pub skipped: Vec<Uri>,
}

/// A node of the component tree.
pub struct Component {
    name: String,
    type_name: String,
    uri: Uri,
    tags: BTreeSet<String>,
    options: OptionList,
    properties: PropertyList,
    signals: SignalTable,
    behavior: Arc<dyn Behavior>,
    children: Vec<Component>,
}

impl Component {
    /// A detached [`Group`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_behavior(name, "Group", Group)
    }

    /// A detached component with a specific behaviour. Actions get an
    /// `execute` signal.
    #[must_use]
    pub fn with_behavior(
        name: impl Into<String>,
        type_name: impl Into<String>,
        behavior: impl Behavior,
    ) -> Self {
        let name = name.into();
        let mut defs = core_signals::definitions();
        if behavior.as_action().is_some() {
            defs.push(core_signals::execute_definition());
        }
        let mut component = Self {
            uri: Uri::default(),
            name,
            type_name: type_name.into(),
            tags: BTreeSet::new(),
            options: OptionList::default(),
            properties: PropertyList::default(),
            signals: SignalTable::with_defs(defs),
            behavior: Arc::new(behavior),
            children: Vec::new(),
        };
        let uri = Uri::relative(&component.name);
        component.set_uri(uri);
        component
    }

    /// The tree root, named `Root`, at `cpath:/`.
    #[must_use]
    pub fn root() -> Self {
        let mut root = Self::new("Root");
        root.set_uri(Uri::root());
        root
    }

    // === Identity ===

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path. Relative while detached.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Registered builder name, or the name given at construction.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if !self.uri.is_root() {
            let uri = match self.uri.parent() {
                Some(parent) if self.uri.is_absolute() => parent.join(&self.name),
                _ => Uri::relative(&self.name),
            };
            self.set_uri(uri);
        }
    }

    /// True when attached under an absolute root, or the root itself.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.uri.is_absolute()
    }

    fn set_uri(&mut self, uri: Uri) {
        self.options.set_owner(uri.clone());
        self.signals.set_owner(uri.clone());
        for child in &mut self.children {
            child.set_uri(uri.join(&child.name));
        }
        self.uri = uri;
    }

    // === Behaviour ===

    #[must_use]
    pub fn behavior(&self) -> &Arc<dyn Behavior> {
        &self.behavior
    }

    /// Downcasts the behaviour.
    #[must_use]
    pub fn behavior_as<B: Behavior>(&self) -> Option<&B> {
        AsAny::as_any(&*self.behavior).downcast_ref::<B>()
    }

    #[must_use]
    pub fn is<B: Behavior>(&self) -> bool {
        self.behavior_as::<B>().is_some()
    }

    #[must_use]
    pub fn is_action(&self) -> bool {
        self.behavior.as_action().is_some()
    }

    /// The action interface, kept alive by the returned `Arc`.
    pub(crate) fn action_handle(&self) -> Option<Arc<dyn Behavior>> {
        self.is_action().then(|| Arc::clone(&self.behavior))
    }

    // === Tags ===

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    // === Children ===

    /// Attaches `child` and returns it.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidName`] for an invalid child name,
    /// [`ComponentError::NameConflict`] when a sibling has the same name.
    pub fn add_component(&mut self, mut child: Component) -> Result<&mut Component, ComponentError> {
        validate_name(&child.name)?;
        if self.child(&child.name).is_some() {
            return Err(ComponentError::NameConflict {
                component: self.uri.to_string(),
                name: child.name,
            });
        }
        child.set_uri(self.uri.join(&child.name));
        debug!(parent = %self.uri, child = %child.name, type_name = %child.type_name, "component added");
        self.children.push(child);
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    /// Detaches and returns the child subtree.
    ///
    /// # Errors
    ///
    /// [`ComponentError::ChildNotFound`].
    pub fn remove_component(&mut self, name: &str) -> Result<Component, ComponentError> {
        let index = self
            .children
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| self.child_not_found(name))?;
        let mut child = self.children.remove(index);
        child.set_uri(Uri::relative(&child.name));
        debug!(parent = %self.uri, child = %name, "component removed");
        Ok(child)
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Component> {
        self.children.iter().find(|c| c.name == name)
    }

    /// # Errors
    ///
    /// [`ComponentError::ChildNotFound`].
    pub fn get_child(&self, name: &str) -> Result<&Component, ComponentError> {
        self.child(name).ok_or_else(|| self.child_not_found(name))
    }

    /// # Errors
    ///
    /// [`ComponentError::ChildNotFound`].
    pub fn get_child_mut(&mut self, name: &str) -> Result<&mut Component, ComponentError> {
        let uri = &self.uri;
        self.children
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ComponentError::ChildNotFound {
                component: uri.to_string(),
                name: name.to_string(),
            })
    }

    pub fn children(&self) -> impl Iterator<Item = &Component> {
        self.children.iter()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.children.iter_mut()
    }

    pub(crate) fn children_slice(&self) -> &[Component] {
        &self.children
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_not_found(&self, name: &str) -> ComponentError {
        ComponentError::ChildNotFound {
            component: self.uri.to_string(),
            name: name.to_string(),
        }
    }

    /// Renames a root or detached component.
    ///
    /// Attached components must be renamed through their parent with
    /// [`rename_child`](Self::rename_child), which checks siblings.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidName`], or
    /// [`ComponentError::SetupError`] when called on an attached child.
    pub fn rename(&mut self, new_name: &str) -> Result<(), ComponentError> {
        validate_name(new_name)?;
        if self.is_attached() && !self.uri.is_root() {
            return Err(ComponentError::setup(
                &self.uri,
                "attached components are renamed through their parent",
            ));
        }
        self.set_name(new_name);
        Ok(())
    }

    /// Renames the child `old` to `new_name`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidName`], [`ComponentError::ChildNotFound`]
    /// or [`ComponentError::NameConflict`].
    pub fn rename_child(&mut self, old: &str, new_name: &str) -> Result<(), ComponentError> {
        validate_name(new_name)?;
        if old != new_name && self.child(new_name).is_some() {
            return Err(ComponentError::NameConflict {
                component: self.uri.to_string(),
                name: new_name.to_string(),
            });
        }
        let parent = self.uri.clone();
        let child = self.get_child_mut(old)?;
        child.name = new_name.to_string();
        child.set_uri(parent.join(new_name));
        debug!(parent = %parent, from = %old, to = %new_name, "component renamed");
        Ok(())
    }

    // === Path resolution ===

    /// Segments to walk from `self` to reach `path`.
    fn walk_segments(&self, path: &Uri) -> Result<Vec<String>, ComponentError> {
        let invalid = |reason: &str| ComponentError::InvalidPath {
            component: self.uri.to_string(),
            path: path.to_string(),
            reason: reason.to_string(),
        };
        if path.scheme() != Scheme::Cpath {
            return Err(invalid("not a component path"));
        }
        let relative = if path.is_absolute() {
            if !self.uri.is_absolute() {
                return Err(invalid("a detached subtree has no absolute root"));
            }
            path.strip_prefix(&self.uri)
                .ok_or_else(|| invalid("path lies outside this subtree"))?
        } else {
            path.clone()
        };
        if relative.segments().first().is_some_and(|s| s == "..") {
            return Err(invalid("path climbs above this component"));
        }
        Ok(relative.segments().to_vec())
    }

    /// Resolves `path` inside this subtree.
    ///
    /// Relative paths walk down from `self`; absolute paths must lie
    /// inside the subtree, so from the root any absolute path works.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] naming the deepest component
    /// reached.
    pub fn access_component(&self, path: &Uri) -> Result<&Component, ComponentError> {
        let mut current = self;
        for segment in self.walk_segments(path)? {
            current = current.child(&segment).ok_or_else(|| ComponentError::InvalidPath {
                component: current.uri.to_string(),
                path: path.to_string(),
                reason: format!("no component named '{segment}'"),
            })?;
        }
        Ok(current)
    }

    /// Mutable [`access_component`](Self::access_component).
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`].
    pub fn access_component_mut(&mut self, path: &Uri) -> Result<&mut Component, ComponentError> {
        let segments = self.walk_segments(path)?;
        let mut walked = self.uri.clone();
        let mut current = self;
        for segment in segments {
            current = match current.children.iter_mut().find(|c| c.name == segment) {
                Some(child) => child,
                None => {
                    return Err(ComponentError::InvalidPath {
                        component: walked.to_string(),
                        path: path.to_string(),
                        reason: format!("no component named '{segment}'"),
                    })
                }
            };
            walked = walked.join(&segment);
        }
        Ok(current)
    }

    /// Resolves `path` and checks the concrete behaviour.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] or [`ComponentError::TypeMismatch`].
    pub fn access_component_as<B: Behavior>(&self, path: &Uri) -> Result<&Component, ComponentError> {
        let component = self.access_component(path)?;
        if component.is::<B>() {
            Ok(component)
        } else {
            Err(component.type_mismatch(short_type_name::<B>()))
        }
    }

    /// Resolves `path` and checks a capability.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidPath`] or [`ComponentError::TypeMismatch`].
    pub fn access_component_kind<K: ComponentKind>(
        &self,
        path: &Uri,
    ) -> Result<&Component, ComponentError> {
        let component = self.access_component(path)?;
        if K::matches(component) {
            Ok(component)
        } else {
            Err(component.type_mismatch(K::KIND))
        }
    }

    pub(crate) fn type_mismatch(&self, expected: &str) -> ComponentError {
        ComponentError::TypeMismatch {
            component: self.uri.to_string(),
            expected: expected.to_string(),
            found: self.type_name.clone(),
        }
    }

    // === Search ===

    /// Lazy depth-first (pre-order) walk over all descendants, excluding
    /// `self`. Call again to restart.
    #[must_use]
    pub fn find_components_recursively(&self) -> Descendants<'_> {
        Descendants::new(self)
    }

    /// Descendants matching `predicate`, in the same order.
    pub fn find_components_recursively_with<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = &'a Component> + 'a
    where
        P: Predicate + 'a,
    {
        Descendants::new(self).filter(move |c| predicate.matches(c))
    }

    /// First descendant matching `predicate`.
    pub fn find_component_recursively_with<P: Predicate>(&self, predicate: P) -> Option<&Component> {
        Descendants::new(self).find(|c| predicate.matches(c))
    }

    // === Options ===

    #[must_use]
    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    #[must_use]
    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyList {
        &mut self.properties
    }

    /// Current value of an option.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`].
    pub fn option_value(&self, name: &str) -> Result<&Value, ComponentError> {
        self.options.value(name)
    }

    /// Current value of an option as `T`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`] or [`ComponentError::TypeError`].
    pub fn option<T: TypedValue>(&self, name: &str) -> Result<T, ComponentError> {
        self.options.value_as(name)
    }

    /// Type-checks, commits, writes through and fires triggers.
    ///
    /// On a type or restricted-list error the previous value is kept.
    /// A failing trigger is reported after the value was committed.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`], [`ComponentError::TypeError`],
    /// [`ComponentError::RestrictedValue`], any trigger error, or
    /// [`ComponentError::SetupError`] when a trigger re-enters the same
    /// option.
    pub fn configure_option(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ComponentError> {
        let uri = self.uri.clone();
        let option = self
            .options
            .get_mut(name)
            .ok_or_else(|| ComponentError::OptionNotFound {
                component: uri.to_string(),
                option: name.to_string(),
            })?;
        if option.firing {
            return Err(ComponentError::setup(
                &uri,
                format!("a trigger of option '{name}' re-entered configure_option"),
            ));
        }
        let value = option.check(&uri, value.into())?;
        option.commit(value.clone());
        let triggers = option.triggers();
        debug!(component = %uri, option = %name, value = %value, "option configured");

        if triggers.is_empty() {
            return Ok(());
        }
        self.set_firing(name, true);
        let result = triggers.iter().try_for_each(|trigger| trigger(self, &value));
        self.set_firing(name, false);
        result
    }

    fn set_firing(&mut self, name: &str, firing: bool) {
        if let Some(option) = self.options.get_mut(name) {
            option.firing = firing;
        }
    }

    /// Configures `name` on this component and every descendant that
    /// declares it. Components without the option are skipped and
    /// listed in the report. Stops at the first error.
    ///
    /// # Errors
    ///
    /// The first [`configure_option`](Self::configure_option) error.
    pub fn configure_option_recursively(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<ConfigureReport, ComponentError> {
        let value = value.into();
        let mut report = ConfigureReport::default();
        self.configure_walk(name, &value, &mut report)?;
        if !report.skipped.is_empty() {
            debug!(
                component = %self.uri,
                option = %name,
                skipped = report.skipped.len(),
                "recursive configure skipped components without the option"
            );
        }
        Ok(report)
    }

    /// Like [`configure_option_recursively`](Self::configure_option_recursively)
    /// but refuses to run when any visited component lacks the option.
    ///
    /// # Errors
    ///
    /// [`ComponentError::SetupError`] listing the components that would
    /// be skipped; nothing is configured in that case.
    pub fn configure_option_recursively_strict(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<ConfigureReport, ComponentError> {
        let missing: Vec<String> = std::iter::once(&*self)
            .chain(self.find_components_recursively())
            .filter(|c| !c.options.contains(name))
            .map(|c| c.uri.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ComponentError::setup(
                &self.uri,
                format!("option '{name}' is not declared by: {}", missing.join(", ")),
            ));
        }
        self.configure_option_recursively(name, value)
    }

    fn configure_walk(
        &mut self,
        name: &str,
        value: &Value,
        report: &mut ConfigureReport,
    ) -> Result<(), ComponentError> {
        if self.options.contains(name) {
            self.configure_option(name, value.clone())?;
            report.configured.push(self.uri.clone());
        } else {
            report.skipped.push(self.uri.clone());
        }
        for child in &mut self.children {
            child.configure_walk(name, value, report)?;
        }
        Ok(())
    }

    // === Signals ===

    #[must_use]
    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalTable {
        &mut self.signals
    }

    // === Introspection ===

    /// Indented listing of this subtree, one `name [type]` per line.
    #[must_use]
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.name);
        out.push_str(" [");
        out.push_str(&self.type_name);
        out.push_str("]\n");
        for child in &self.children {
            child.write_tree(out, depth + 1);
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("uri", &self.uri.to_string())
            .field("type_name", &self.type_name)
            .field("options", &self.options.len())
            .field("signals", &self.signals.len())
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::{HasName, HasTag};
    use parking_lot::Mutex;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).expect("valid uri")
    }

    fn sample_tree() -> Component {
        let mut root = Component::root();
        let solver = root.add_component(Component::new("solver")).unwrap();
        solver.add_component(Component::new("bc")).unwrap();
        solver.add_component(Component::new("time")).unwrap();
        let mesh = root.add_component(Component::new("mesh")).unwrap();
        mesh.add_component(Component::new("topology")).unwrap();
        root
    }

    #[test]
    fn add_component_sets_paths() {
        let root = sample_tree();
        let bc = root.access_component(&uri("/solver/bc")).unwrap();
        assert_eq!(bc.uri(), &uri("cpath:/solver/bc"));
        assert!(bc.is_attached());
    }

    #[test]
    fn add_component_name_conflict() {
        let mut root = sample_tree();
        let err = root.add_component(Component::new("solver")).unwrap_err();
        assert_eq!(
            err,
            ComponentError::NameConflict {
                component: "cpath:/".into(),
                name: "solver".into()
            }
        );
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn add_component_invalid_name() {
        let mut root = Component::root();
        assert!(matches!(
            root.add_component(Component::new("a/b")),
            Err(ComponentError::InvalidName(_))
        ));
    }

    #[test]
    fn remove_component_moves_subtree_out() {
        let mut root = sample_tree();
        let solver = root.remove_component("solver").unwrap();
        assert_eq!(solver.uri(), &uri("cpath:solver"));
        assert_eq!(solver.get_child("bc").unwrap().uri(), &uri("cpath:solver/bc"));
        assert!(root.access_component(&uri("/solver")).is_err());
        assert!(matches!(
            root.remove_component("solver"),
            Err(ComponentError::ChildNotFound { .. })
        ));
    }

    #[test]
    fn reattach_recomputes_paths() {
        let mut root = sample_tree();
        let bc = root.get_child_mut("solver").unwrap().remove_component("bc").unwrap();
        root.get_child_mut("mesh").unwrap().add_component(bc).unwrap();
        assert!(root.access_component(&uri("/mesh/bc")).is_ok());
    }

    #[test]
    fn path_round_trip_for_every_component() {
        let root = sample_tree();
        for component in root.find_components_recursively() {
            let found = root.access_component(component.uri()).unwrap();
            assert!(std::ptr::eq(found, component), "{}", component.uri());
        }
        assert!(std::ptr::eq(root.access_component(&Uri::root()).unwrap(), &root));
    }

    #[test]
    fn relative_access_walks_down() {
        let root = sample_tree();
        let solver = root.get_child("solver").unwrap();
        let time = solver.access_component(&uri("cpath:./time")).unwrap();
        assert_eq!(time.uri(), &uri("/solver/time"));
        assert!(solver.access_component(&uri("../mesh")).is_err());
        assert!(solver.access_component(&uri("/mesh")).is_err());
        assert!(solver.access_component(&uri("/solver/bc")).is_ok());
    }

    #[test]
    fn invalid_path_names_deepest_component() {
        let root = sample_tree();
        let err = root.access_component(&uri("/solver/nope/deeper")).unwrap_err();
        match err {
            ComponentError::InvalidPath { component, reason, .. } => {
                assert_eq!(component, "cpath:/solver");
                assert!(reason.contains("nope"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(root.access_component(&uri("file:/tmp")).is_err());
    }

    #[test]
    fn access_component_mut_reaches_nested() {
        let mut root = sample_tree();
        root.access_component_mut(&uri("/mesh/topology"))
            .unwrap()
            .add_tag("region");
        assert!(root.access_component(&uri("/mesh/topology")).unwrap().has_tag("region"));
        assert!(matches!(
            root.access_component_mut(&uri("/mesh/absent")),
            Err(ComponentError::InvalidPath { ref component, .. }) if component == "cpath:/mesh"
        ));
    }

    #[test]
    fn typed_access() {
        let root = sample_tree();
        assert!(root.access_component_as::<Group>(&uri("/solver")).is_ok());
        let err = root
            .access_component_kind::<crate::ActionKind>(&uri("/solver"))
            .unwrap_err();
        assert!(matches!(err, ComponentError::TypeMismatch { ref expected, .. } if expected == "cf3.common.Action"));
    }

    #[test]
    fn find_is_preorder_and_restartable() {
        let root = sample_tree();
        let names: Vec<&str> = root.find_components_recursively().map(Component::name).collect();
        assert_eq!(names, ["solver", "bc", "time", "mesh", "topology"]);
        let again: Vec<&str> = root.find_components_recursively().map(Component::name).collect();
        assert_eq!(names, again);
    }

    #[test]
    fn find_with_predicates() {
        let mut root = sample_tree();
        root.access_component_mut(&uri("/solver/bc")).unwrap().add_tag("bc");
        let tagged: Vec<&str> = root
            .find_components_recursively_with(HasTag::new("bc"))
            .map(Component::name)
            .collect();
        assert_eq!(tagged, ["bc"]);
        assert!(root.find_component_recursively_with(HasName::new("topology")).is_some());
        let leaves = root
            .find_components_recursively_with(|c: &Component| c.child_count() == 0)
            .count();
        assert_eq!(leaves, 3);
    }

    #[test]
    fn rename_rules() {
        let mut root = sample_tree();
        root.rename_child("solver", "flow").unwrap();
        assert_eq!(
            root.access_component(&uri("/flow/bc")).unwrap().uri(),
            &uri("/flow/bc")
        );
        assert!(matches!(
            root.rename_child("flow", "mesh"),
            Err(ComponentError::NameConflict { .. })
        ));
        let flow = root.get_child_mut("flow").unwrap();
        assert!(matches!(flow.rename("x"), Err(ComponentError::SetupError { .. })));

        let mut detached = Component::new("a");
        detached.add_component(Component::new("b")).unwrap();
        detached.rename("c").unwrap();
        assert_eq!(detached.get_child("b").unwrap().uri(), &uri("cpath:c/b"));
    }

    #[test]
    fn configure_option_type_error_keeps_value() {
        let mut time = Component::new("time");
        time.options_mut().add("time_step", 0.5_f64).unwrap();
        let err = time.configure_option("time_step", "not_a_number").unwrap_err();
        assert!(matches!(err, ComponentError::TypeError { .. }));
        assert_eq!(time.option::<f64>("time_step").unwrap(), 0.5);
    }

    #[test]
    fn configure_option_restricted() {
        let mut scheme = Component::new("scheme");
        scheme
            .options_mut()
            .add("flux", "roe")
            .unwrap()
            .set_restricted_list(["hllc"]);
        scheme.configure_option("flux", "hllc").unwrap();
        let err = scheme.configure_option("flux", "upwind").unwrap_err();
        assert!(matches!(err, ComponentError::RestrictedValue { .. }));
        assert_eq!(scheme.option::<String>("flux").unwrap(), "hllc");
    }

    #[test]
    fn triggers_fire_in_order_after_commit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = Component::new("c");
        let (a, b) = (Arc::clone(&log), Arc::clone(&log));
        c.options_mut()
            .add("n", 0_i64)
            .unwrap()
            .attach_trigger(move |comp, v| {
                a.lock().push(format!("first:{v}:{}", comp.option::<i64>("n")?));
                Ok(())
            })
            .attach_trigger(move |_, v| {
                b.lock().push(format!("second:{v}"));
                Ok(())
            });
        c.configure_option("n", 4_i64).unwrap();
        assert_eq!(*log.lock(), ["first:4:4", "second:4"]);
    }

    #[test]
    fn trigger_error_propagates_without_rollback() {
        let mut c = Component::new("c");
        c.options_mut()
            .add("cfl", 1.0_f64)
            .unwrap()
            .attach_trigger(|comp, _| Err(ComponentError::failed(comp.uri(), "unstable")));
        let err = c.configure_option("cfl", 9.0_f64).unwrap_err();
        assert!(matches!(err, ComponentError::ExecutionFailed { .. }));
        assert_eq!(c.option::<f64>("cfl").unwrap(), 9.0);
    }

    #[test]
    fn trigger_may_configure_other_options() {
        let mut c = Component::new("c");
        c.options_mut().add("doubled", 0_i64).unwrap();
        c.options_mut()
            .add("n", 0_i64)
            .unwrap()
            .attach_trigger(|comp, v| {
                let n = v.as_int().unwrap_or_default();
                comp.configure_option("doubled", n * 2)
            });
        c.configure_option("n", 21_i64).unwrap();
        assert_eq!(c.option::<i64>("doubled").unwrap(), 42);
    }

    #[test]
    fn reentrant_trigger_rejected() {
        let mut c = Component::new("c");
        c.options_mut()
            .add("n", 0_i64)
            .unwrap()
            .attach_trigger(|comp, _| comp.configure_option("n", 1_i64));
        let err = c.configure_option("n", 5_i64).unwrap_err();
        assert!(matches!(err, ComponentError::SetupError { .. }));
        assert_eq!(c.option::<i64>("n").unwrap(), 5);
        assert!(!c.options().get("n").unwrap().firing);
    }

    #[test]
    fn recursive_configure_skips_and_reports() {
        let mut root = sample_tree();
        for path in ["/solver/bc", "/mesh/topology"] {
            root.access_component_mut(&uri(path))
                .unwrap()
                .options_mut()
                .add("order", 1_u64)
                .unwrap();
        }
        let report = root.configure_option_recursively("order", 2_u64).unwrap();
        assert_eq!(report.configured, [uri("/solver/bc"), uri("/mesh/topology")]);
        assert_eq!(report.skipped.len(), 4);
        assert_eq!(
            root.access_component(&uri("/mesh/topology"))
                .unwrap()
                .option::<u64>("order")
                .unwrap(),
            2
        );
    }

    #[test]
    fn strict_recursive_configure_refuses_partial() {
        let mut root = sample_tree();
        root.access_component_mut(&uri("/solver/bc"))
            .unwrap()
            .options_mut()
            .add("order", 1_u64)
            .unwrap();
        let err = root
            .get_child_mut("solver")
            .unwrap()
            .configure_option_recursively_strict("order", 2_u64)
            .unwrap_err();
        assert!(err.to_string().contains("cpath:/solver/time"));
        assert_eq!(
            root.access_component(&uri("/solver/bc"))
                .unwrap()
                .option::<u64>("order")
                .unwrap(),
            1
        );
    }

    #[test]
    fn tree_string_lists_types() {
        let root = sample_tree();
        let tree = root.tree_string();
        assert!(tree.starts_with("Root [Group]\n"));
        assert!(tree.contains("    bc [Group]\n"));
    }
}
