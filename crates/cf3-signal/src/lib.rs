//! Signal frames for the cf3 component runtime.
//!
//! Signals are named, introspectable entry points on a component.
//! This crate defines what travels through them:
//!
//! ```text
//! caller ──► SignalArgs ──► [ArgSchema::validate] ──► handler ──► SignalArgs (reply)
//!                                   │
//!                                   └─ FrameError ──► ArgumentError (handler not run)
//! ```
//!
//! | Type | Role |
//! |------|------|
//! | [`SignalArgs`] | Ordered argument / reply frame |
//! | [`ArgSpec`], [`ArgSchema`] | Declared arguments of a signal |
//! | [`Signature`] | `Unspecified` or a described schema |
//! | [`RawArg`], [`parse_args`], [`tokenize`] | `name:type=value` text syntax |
//! | [`FrameError`] | Validation and syntax failures |
//!
//! Dispatch itself (finding the handler, building its context) lives in
//! `cf3-component`.

mod error;
mod frame;
mod schema;
mod syntax;

pub use error::FrameError;
pub use frame::SignalArgs;
pub use schema::{ArgSchema, ArgSpec, Signature};
pub use syntax::{parse_args, tokenize, RawArg};
