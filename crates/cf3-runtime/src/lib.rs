//! cf3 Runtime - context, builtin components, configuration, scripts.
//!
//! This crate assembles the SDK crates into something that runs: a
//! [`RuntimeContext`] that owns a component tree and its builder
//! registry, the builtin component library, layered configuration and a
//! line-oriented script interpreter.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SDK Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  cf3-types      : Uri, Value, ValueType, ErrorCode          │
//! │  cf3-signal     : SignalArgs, ArgSchema, text syntax        │
//! │  cf3-component  : Component tree, options, signals, links   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  context  : RuntimeContext (root + builders + config)       │
//! │  library/ : CTime, CAdvanceTime, ActionDirector,            │
//! │             FlowSolver, ConstantBC                          │
//! │  config/  : Cf3Config, ConfigLoader                         │
//! │  script/  : ScriptParser, ScriptRunner                      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Frontend Layer                        │
//! │  (cf3-cli)                                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`library`] - Builtin Components
//!
//! - [`CTime`](library::CTime): simulation clock
//! - [`CAdvanceTime`](library::CAdvanceTime): advances a referenced clock
//! - [`ActionDirector`](library::ActionDirector): runs child actions in order
//! - [`FlowSolver`](library::FlowSolver): owns boundary conditions
//! - [`ConstantBC`](library::ConstantBC): boundary condition over regions
//!
//! [`register_builtins`](library::register_builtins) is the registration
//! phase; it runs before the registry is handed to a context.
//!
//! ## [`config`] - Configuration Management
//!
//! - [`Cf3Config`](config::Cf3Config): unified configuration type
//! - [`ConfigLoader`](config::ConfigLoader): multi-source config loader
//!
//! Configuration priority: CLI > Environment > Project > Global > Default
//!
//! ## [`script`] - Command Scripts
//!
//! - [`ScriptParser`](script::ScriptParser): pure line parser
//! - [`ScriptRunner`](script::ScriptRunner): executes commands against a context
//!
//! # Example
//!
//! ```
//! use cf3_runtime::RuntimeContext;
//! use cf3_types::Uri;
//!
//! let mut runtime = RuntimeContext::with_builtins().unwrap();
//! let time = runtime.create_component(&Uri::root(), "CTime", "time").unwrap();
//! runtime.configure(&time, "time_step", 0.5).unwrap();
//!
//! let step = runtime.create_component(&Uri::root(), "CAdvanceTime", "step").unwrap();
//! runtime.configure(&step, "time", time.clone()).unwrap();
//! runtime.execute(&step).unwrap();
//!
//! let clock = runtime.access(&time).unwrap();
//! assert_eq!(clock.option::<f64>("current_time").unwrap(), 0.5);
//! ```

pub mod config;
mod context;
pub mod library;
pub mod script;

pub use context::{RuntimeContext, SharedRuntime};
