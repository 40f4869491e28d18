//! Non-owning references between components.
//!
//! A [`Link`] component stores the path of another component in its
//! `target` option. The target is not owned: removing it leaves the link
//! in place but [`Expired`](LinkState::Expired).
//!
//! | State | Stored path | Resolves |
//! |-------|-------------|----------|
//! | `Unset` | no | - |
//! | `Linked` | yes | yes |
//! | `Expired` | yes | no |
//!
//! ```
//! use cf3_component::{Component, Link, LinkState};
//! use cf3_types::Uri;
//!
//! let mut root = Component::root();
//! root.add_component(Component::new("mesh")).unwrap();
//! let mut link = Link::create("current_mesh").unwrap();
//! Link::link_to(&mut link, &Uri::parse("/mesh").unwrap()).unwrap();
//! root.add_component(link).unwrap();
//!
//! let link = root.get_child("current_mesh").unwrap();
//! assert_eq!(Link::state(&root, link).unwrap(), LinkState::Linked);
//! assert_eq!(Link::follow(&root, link).unwrap().name(), "mesh");
//! ```

use crate::{Behavior, Component, ComponentError};
use cf3_types::{ComponentRef, Uri};
use serde::{Deserialize, Serialize};

/// Name of the option holding the target path.
pub const TARGET_OPTION: &str = "target";

/// Behaviour of link components.
#[derive(Debug, Default)]
pub struct Link;

impl Behavior for Link {}

/// Observable state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Unset,
    Linked,
    Expired,
}

impl Link {
    /// A detached, unset link component.
    ///
    /// # Errors
    ///
    /// Never in practice; declaring `target` on a fresh component
    /// cannot conflict.
    pub fn create(name: impl Into<String>) -> Result<Component, ComponentError> {
        let mut link = Component::with_behavior(name, "Link", Link);
        link.options_mut()
            .add_component_ref(TARGET_OPTION)?
            .set_description("Path of the linked component")
            .mark_basic();
        Ok(link)
    }

    /// Points `link` at `target`. A relative target is resolved against
    /// the link's own path when followed.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`] when `link` is not a link, or
    /// [`ComponentError::TypeError`] for a non-`cpath` target.
    pub fn link_to(link: &mut Component, target: &Uri) -> Result<(), ComponentError> {
        link.configure_option(TARGET_OPTION, target.clone())
    }

    /// Clears the stored path.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`] when `link` is not a link.
    pub fn unlink(link: &mut Component) -> Result<(), ComponentError> {
        link.configure_option(TARGET_OPTION, Uri::default())
    }

    /// Stored target path, if any.
    #[must_use]
    pub fn target(link: &Component) -> Option<Uri> {
        let reference: ComponentRef = link.option(TARGET_OPTION).ok()?;
        (!reference.is_unset()).then_some(reference.0)
    }

    /// True when a target path is stored, whether or not it resolves.
    #[must_use]
    pub fn is_linked(link: &Component) -> bool {
        Self::target(link).is_some()
    }

    /// Resolves the target from `root`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] when `link` is not a link,
    /// [`ComponentError::SetupError`] when unset,
    /// [`ComponentError::Expired`] when the target no longer resolves.
    pub fn follow<'r>(root: &'r Component, link: &Component) -> Result<&'r Component, ComponentError> {
        if !link.is::<Link>() {
            return Err(link.type_mismatch("Link"));
        }
        let target = Self::target(link)
            .ok_or_else(|| ComponentError::setup(link.uri(), "link has no target"))?;
        let expired = || ComponentError::Expired {
            component: link.uri().to_string(),
            target: target.to_string(),
        };
        let absolute = target.resolve_against(link.uri()).map_err(|_| expired())?;
        root.access_component(&absolute).map_err(|_| expired())
    }

    /// Current state of `link` in the tree under `root`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] when `link` is not a link.
    pub fn state(root: &Component, link: &Component) -> Result<LinkState, ComponentError> {
        if !link.is::<Link>() {
            return Err(link.type_mismatch("Link"));
        }
        if !Self::is_linked(link) {
            return Ok(LinkState::Unset);
        }
        match Self::follow(root, link) {
            Ok(_) => Ok(LinkState::Linked),
            Err(ComponentError::Expired { .. }) => Ok(LinkState::Expired),
            Err(other) => Err(other),
        }
    }
}
