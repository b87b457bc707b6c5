//! # Regedit Architecture
//!
//! Regedit reads and writes the Windows registry by running small script files through
//! the system scripting host (`cscript.exe`) and decoding what they print. The registry
//! logic itself lives in the scripts; this crate builds their command lines, runs them,
//! and classifies the outcome.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Async facade plus callback-style `submit`                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Builds and validates one script invocation per operation │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Runner Layer (runner/)                                     │
//! │  - ScriptRunner trait: ProcessRunner, MemoryRunner          │
//! │  - `interpret`: exit code table, stderr, JSON or text       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Command Lines
//!
//! Every operation becomes `<script> <arch> <args...>`, e.g.
//!
//! ```text
//! regList.wsf A "HKLM\Software\A" "HKLM\Software\B"
//! regPutValue.wsf A "HKCU\Software\X" "Name" "v" REG_SZ
//! ```
//!
//! Arguments are wrapped in double quotes unless they already start or end with one.
//! Binary and multi-string values are joined with commas before quoting.
//!
//! ## Outcomes
//!
//! - known exit code: the matching [`error::ScriptError`]
//! - any other failure: [`error::RegeditError::ProcessFailed`] with the raw code and stderr
//! - clean exit with stderr: [`error::RegeditError::Stderr`]
//! - otherwise stdout as JSON, or as plain text if it does not parse
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Command building and dispatch per operation
//! - [`runner`]: Script transports and output interpretation
//! - [`model`]: Keys, value kinds, value maps, architecture modes, listings
//! - [`config`]: Interpreter and script location settings
//! - [`error`]: Error types and the exit code table
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod runner;
