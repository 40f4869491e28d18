//! Line-oriented command scripts.
//!
//! A script drives a [`RuntimeContext`](crate::RuntimeContext) one line
//! at a time. Parsing is pure ([`ScriptParser`]); execution keeps a
//! working directory and collects output ([`ScriptRunner`]).
//!
//! ```text
//! # time loop
//! create /time CTime
//! configure /time time_step=0.5
//! create /step CAdvanceTime
//! configure /step time=/time
//! execute /step
//! options /time
//! ```
//!
//! Execution stops at the first failing line; the error carries the line
//! number and the failing command.

mod command;
mod error;
mod parser;
mod runner;

pub use command::ScriptCommand;
pub use error::{ScriptError, SyntaxError};
pub use parser::ScriptParser;
pub use runner::ScriptRunner;
