//! Component behaviours and capability kinds.
//!
//! A [`Component`] node holds the generic machinery (name, children,
//! options, signals). What makes a `CTime` different from a `Group` is
//! its [`Behavior`]: a trait object the node owns and which can be
//! downcast to the concrete type.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Behavior  (as_any, as_action)
//!   └── may expose Action (execute)
//!
//! ComponentKind  (KIND, matches)   capability used by builders and typed lookups
//!   ├── AnyComponent
//!   └── ActionKind
//! ```
//!
//! Behaviours hold no per-instance mutable state: state lives in
//! options and properties so that it is visible to introspection and
//! survives snapshots.

use crate::{Component, ComponentContext, ComponentError};
use std::any::Any;

/// Upcast helper implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-specific behaviour of a component.
///
/// # Example
///
/// ```
/// use cf3_component::{Behavior, Component};
///
/// struct Mesh;
/// impl Behavior for Mesh {}
///
/// let mesh = Component::with_behavior("mesh", "Mesh", Mesh);
/// assert!(mesh.is::<Mesh>());
/// assert!(!mesh.is_action());
/// ```
pub trait Behavior: AsAny + Send + Sync {
    /// The action interface, for behaviours that can be executed.
    fn as_action(&self) -> Option<&dyn Action> {
        None
    }
}

/// An executable component.
///
/// `execute` returns nothing on success; its effects go through options,
/// properties and the tree reachable from `ctx`.
///
/// # Example
///
/// ```
/// use cf3_component::{Action, Behavior, Component, ComponentContext, ComponentError};
///
/// struct Touch;
///
/// impl Behavior for Touch {
///     fn as_action(&self) -> Option<&dyn Action> {
///         Some(self)
///     }
/// }
///
/// impl Action for Touch {
///     fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
///         ctx.this_mut()?.properties_mut().set("touched", true);
///         Ok(())
///     }
/// }
///
/// let touch = Component::with_behavior("touch", "Touch", Touch);
/// assert!(touch.is_action());
/// assert!(touch.signals().contains("execute"));
/// ```
pub trait Action: Send + Sync {
    /// Runs the action.
    ///
    /// # Errors
    ///
    /// Any [`ComponentError`]; the caller sees it unchanged.
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError>;
}

/// A capability a built component may satisfy.
///
/// `KIND` doubles as the builder namespace for types of this kind.
pub trait ComponentKind {
    const KIND: &'static str;

    fn matches(component: &Component) -> bool;
}

/// Every component.
pub struct AnyComponent;

impl ComponentKind for AnyComponent {
    const KIND: &'static str = "cf3.common.Component";

    fn matches(_: &Component) -> bool {
        true
    }
}

/// Components whose behaviour is an [`Action`].
pub struct ActionKind;

impl ComponentKind for ActionKind {
    const KIND: &'static str = "cf3.common.Action";

    fn matches(component: &Component) -> bool {
        component.is_action()
    }
}

/// Plain structural component.
#[derive(Debug, Default)]
pub struct Group;

impl Behavior for Group {}

/// Short type name of `T` for messages.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;
    impl Behavior for Probe {}

    #[test]
    fn as_any_downcasts_concrete_type() {
        let behavior: Box<dyn Behavior> = Box::new(Probe);
        let any = AsAny::as_any(&*behavior);
        assert!(any.downcast_ref::<Probe>().is_some());
        assert!(any.downcast_ref::<Group>().is_none());
    }

    #[test]
    fn kinds_match() {
        let group = Component::new("g");
        assert!(AnyComponent::matches(&group));
        assert!(!ActionKind::matches(&group));
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name::<Group>(), "Group");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
