#![forbid(unsafe_code)]

//! Interactive and scripted sessions over `rewind-history`.
//!
//! Two sessions are provided:
//!
//! - **memento**: a text box recorded as whole-value snapshots.
//! - **calculator**: an integer accumulator recorded as reversible commands.
//!
//! Both read one command per line (see [`script`]) and print the value and
//! history position after each one, as text or as JSON lines.

pub mod cli;
pub mod error;
pub mod logging;
pub mod runner;
pub mod script;
pub mod session;

pub use cli::run_from_env;
pub use error::{PlaygroundError, Result};
