//! Tree snapshots for persistence and inspection.
//!
//! A [`ComponentSnapshot`] records a subtree as data: names, builder
//! type names, tags, option values, properties and signal names. It
//! serialises to JSON and can be rebuilt through a [`BuilderRegistry`].
//!
//! Restoring builds every component with its registered builder, then
//! configures the recorded option values. Children the builder already
//! created (such as a solver's `bc` director) are reused rather than
//! built twice.
//!
//! Behaviour-internal state is not captured; only what options and
//! properties expose survives a round trip.
//!
//! # Example
//!
//! ```
//! use cf3_component::{BuilderRegistry, Component, ComponentSnapshot};
//!
//! let mut root = Component::root();
//! root.add_component(Component::new("mesh")).unwrap()
//!     .options_mut().add("dimension", 3_u64).unwrap();
//!
//! let json = ComponentSnapshot::capture(&root).to_json().unwrap();
//! let restored = ComponentSnapshot::from_json(&json)
//!     .unwrap()
//!     .restore(&BuilderRegistry::with_core().unwrap())
//!     .unwrap();
//! assert!(restored.get_child("mesh").is_ok());
//! ```

use crate::{BuilderRegistry, Component, ComponentError};
use cf3_types::{Uri, Value, ValueType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot version mismatch.
    #[error("version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u32, actual: u32 },

    /// Rebuilding a component failed.
    #[error("restore failed: {0}")]
    Restore(#[from] ComponentError),
}

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One recorded option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSnapshot {
    pub name: String,
    pub value_type: ValueType,
    pub value: Value,
    #[serde(default)]
    pub basic: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Recorded state of a component and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    /// Snapshot format version.
    pub version: u32,
    pub name: String,
    pub type_name: String,
    pub uri: Uri,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: Vec<OptionSnapshot>,
    #[serde(default)]
    pub properties: Vec<(String, Value)>,
    /// Visible signal names, informational only.
    #[serde(default)]
    pub signals: Vec<String>,
    #[serde(default)]
    pub children: Vec<ComponentSnapshot>,
}

impl ComponentSnapshot {
    /// Records `component` and everything below it.
    #[must_use]
    pub fn capture(component: &Component) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            name: component.name().to_string(),
            type_name: component.type_name().to_string(),
            uri: component.uri().clone(),
            tags: component.tags().iter().cloned().collect(),
            options: component
                .options()
                .iter()
                .map(|o| OptionSnapshot {
                    name: o.name().to_string(),
                    value_type: o.value_type(),
                    value: o.value().clone(),
                    basic: o.is_basic(),
                    description: o.description().to_string(),
                })
                .collect(),
            properties: component
                .properties()
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
            signals: component.signals().visible_names().map(str::to_string).collect(),
            children: component.children().map(Self::capture).collect(),
        }
    }

    /// # Errors
    ///
    /// [`SnapshotError::Serialization`].
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and checks the format version.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Serialization`] or
    /// [`SnapshotError::VersionMismatch`].
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                actual: self.version,
            })
        }
    }

    /// Rebuilds the recorded subtree.
    ///
    /// A snapshot of the root yields a new root; anything else yields a
    /// detached component.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::VersionMismatch`], or
    /// [`SnapshotError::Restore`] when a builder is missing or a
    /// recorded value no longer type-checks.
    pub fn restore(&self, builders: &BuilderRegistry) -> Result<Component, SnapshotError> {
        self.check_version()?;
        let mut component = if self.uri.is_root() {
            Component::root()
        } else {
            builders.build(&self.type_name, &self.name)?
        };
        self.apply(&mut component, builders)?;
        Ok(component)
    }

    /// Rebuilds the recorded subtree and attaches it under `parent`.
    ///
    /// # Errors
    ///
    /// As [`restore`](Self::restore), plus name conflicts under `parent`.
    pub fn restore_into(
        &self,
        parent: &mut Component,
        builders: &BuilderRegistry,
    ) -> Result<(), SnapshotError> {
        let component = self.restore(builders)?;
        parent.add_component(component)?;
        Ok(())
    }

    fn apply(&self, component: &mut Component, builders: &BuilderRegistry) -> Result<(), ComponentError> {
        for tag in &self.tags {
            component.add_tag(tag.clone());
        }
        for option in &self.options {
            if component.options().contains(&option.name) {
                component.configure_option(&option.name, option.value.clone())?;
            } else {
                warn!(
                    component = %component.uri(),
                    option = %option.name,
                    "recorded option is not declared, skipped"
                );
            }
        }
        for (name, value) in &self.properties {
            component.properties_mut().set(name.clone(), value.clone());
        }
        for child in &self.children {
            if component.child(&child.name).is_some() {
                child.apply(component.get_child_mut(&child.name)?, builders)?;
            } else {
                let mut built = builders.build(&child.type_name, &child.name)?;
                child.apply(&mut built, builders)?;
                component.add_component(built)?;
            }
        }
        Ok(())
    }
}
