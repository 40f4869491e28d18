//! Recursive search over a component subtree.
//!
//! [`Descendants`] is a lazy pre-order iterator; [`Predicate`]s filter
//! it. Any `Fn(&Component) -> bool` closure is a predicate.
//!
//! ```
//! use cf3_component::{find::HasTag, Component};
//!
//! let mut root = Component::root();
//! root.add_component(Component::new("inlet")).unwrap().add_tag("bc");
//! root.add_component(Component::new("outlet")).unwrap().add_tag("bc");
//! root.add_component(Component::new("mesh")).unwrap();
//!
//! let bcs: Vec<&str> = root
//!     .find_components_recursively_with(HasTag::new("bc"))
//!     .map(|c| c.name())
//!     .collect();
//! assert_eq!(bcs, ["inlet", "outlet"]);
//! ```

use crate::{Behavior, Component, ComponentKind};
use std::marker::PhantomData;
use std::slice;

/// Pre-order iterator over the descendants of a component.
#[derive(Clone)]
pub struct Descendants<'a> {
    stack: Vec<slice::Iter<'a, Component>>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(root: &'a Component) -> Self {
        Self {
            stack: vec![root.children_slice().iter()],
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(component) => {
                    self.stack.push(component.children_slice().iter());
                    return Some(component);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A condition on a component.
pub trait Predicate {
    fn matches(&self, component: &Component) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Component) -> bool,
{
    fn matches(&self, component: &Component) -> bool {
        self(component)
    }
}

/// Components carrying a tag.
#[derive(Debug, Clone)]
pub struct HasTag(String);

impl HasTag {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl Predicate for HasTag {
    fn matches(&self, component: &Component) -> bool {
        component.has_tag(&self.0)
    }
}

/// Components with a given name.
#[derive(Debug, Clone)]
pub struct HasName(String);

impl HasName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Predicate for HasName {
    fn matches(&self, component: &Component) -> bool {
        component.name() == self.0
    }
}

/// Components built under a given type name.
#[derive(Debug, Clone)]
pub struct HasTypeName(String);

impl HasTypeName {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(type_name.into())
    }
}

impl Predicate for HasTypeName {
    fn matches(&self, component: &Component) -> bool {
        component.type_name() == self.0
    }
}

/// Components whose behaviour is `B`.
pub struct IsBehavior<B>(PhantomData<fn() -> B>);

impl<B> IsBehavior<B> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<B> Default for IsBehavior<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Behavior> Predicate for IsBehavior<B> {
    fn matches(&self, component: &Component) -> bool {
        component.is::<B>()
    }
}

/// Components satisfying the capability `K`.
pub struct IsKind<K>(PhantomData<fn() -> K>);

impl<K> IsKind<K> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for IsKind<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ComponentKind> Predicate for IsKind<K> {
    fn matches(&self, component: &Component) -> bool {
        K::matches(component)
    }
}
