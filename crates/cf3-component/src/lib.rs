//! Component tree for the cf3 runtime.
//!
//! Everything in a cf3 simulation is a [`Component`]: meshes, solvers,
//! boundary conditions, the time keeper. Components form a tree that
//! owns them, are addressed by `cpath` [`Uri`](cf3_types::Uri)s, expose
//! typed [`ConfigOption`]s and named signals, and may be executable
//! [`Action`]s.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cf3-types      : Uri, Value, ValueType, names, ErrorCode   │
//! │  cf3-signal     : SignalArgs, ArgSchema, text syntax        │
//! │  cf3-component  : Component tree              ◄── HERE      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cf3-runtime    : RuntimeContext, builtins, config, scripts │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cf3-cli        : `cf3` binary                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Tree Overview
//!
//! ```text
//! Component
//! ├── name / type_name / uri / tags
//! ├── OptionList       typed options, triggers, write-through links
//! ├── PropertyList     untyped informational values
//! ├── SignalTable      named handlers with optional signatures
//! ├── Behavior         Group, Link, or a domain type (maybe an Action)
//! └── children         owned subtrees
//! ```
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Component`] | Tree node |
//! | [`ComponentContext`] | Tree access for handlers and actions |
//! | [`BuilderRegistry`] | Build components by registered type name |
//! | [`Link`] | Non-owning reference component |
//! | [`ComponentSnapshot`] | Serialisable record of a subtree |
//! | [`ComponentError`] | Every failure of this crate |
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
//!
//! let mut ctx = ComponentContext::new(&mut root, &builders);
//! let reply = ctx
//!     .call_signal(
//!         &Uri::root(),
//!         "create_component",
//!         &SignalArgs::new().with("name", "mesh").with("type", "Group"),
//!     )
//!     .unwrap();
//! assert_eq!(reply.get_as::<Uri>("uri").unwrap().to_string(), "cpath:/mesh");
//! ```

mod behavior;
mod builder;
mod component;
mod context;
mod core_signals;
mod error;
pub mod find;
mod link;
mod option;
mod option_list;
mod signal;
mod snapshot;
pub mod testing;

pub use behavior::{Action, ActionKind, AnyComponent, AsAny, Behavior, ComponentKind, Group};
pub use builder::{BuilderEntry, BuilderRegistry, Factory};
pub use component::{Component, ConfigureReport};
pub use context::ComponentContext;
pub use error::ComponentError;
pub use link::{Link, LinkState, TARGET_OPTION};
pub use option::{ConfigOption, SharedValue, Trigger};
pub use option_list::{OptionList, PropertyList};
pub use signal::{SignalDef, SignalHandler, SignalTable, SignatureHandler};
pub use snapshot::{ComponentSnapshot, OptionSnapshot, SnapshotError, SNAPSHOT_VERSION};
