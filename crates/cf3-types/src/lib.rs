//! Core types for the cf3 component runtime.
//!
//! This crate holds the vocabulary every other cf3 crate speaks:
//! paths, names, the closed value domain and error codes.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  cf3-types     : Uri, Value, names, ErrorCode        ◄ HERE │
//! │  cf3-signal    : SignalArgs, ArgSchema, text syntax          │
//! │  cf3-component : Component tree, options, signals, builders  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Runtime Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  cf3-runtime   : RuntimeContext, builtin library, scripting  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Frontend Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  cf3-cli       : `cf3` command-line interpreter              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cf3_types::{Uri, Value, ValueType};
//!
//! let time = Uri::parse("cpath:/solver/time").unwrap();
//! assert_eq!(time.name(), Some("time"));
//!
//! let dt = Value::parse(ValueType::Real, "0.5").unwrap();
//! assert_eq!(dt.as_real(), Some(0.5));
//! ```

mod error;
mod name;
mod uri;
mod value;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use name::{validate_name, NameError};
pub use uri::{Scheme, Uri, UriError};
pub use value::{parse_bool, ComponentRef, TypedValue, Value, ValueError, ValueType};
