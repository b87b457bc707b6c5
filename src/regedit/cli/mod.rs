//! # CLI Layer
//!
//! This is **one possible UI client** for regedit, not the application itself.
//! It is the only place that knows about terminal I/O, logging setup, the async
//! runtime and exit codes.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Context setup and per-command handlers that call the API
//! - `render`: Output formatting (script output, config, colored messages)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
