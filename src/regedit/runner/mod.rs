//! # Runner Layer
//!
//! A [`ScriptRunner`] is the transport between a prepared [`ScriptCommand`] and the
//! registry. The only production transport today is [`process::ProcessRunner`], which
//! spawns the scripting host; a native registry backend would slot in here without the
//! command or API layers noticing.
//!
//! ## Implementations
//!
//! - [`process::ProcessRunner`]: spawns `cscript.exe //Nologo <script> ...` on tokio
//! - [`memory::MemoryRunner`]: records commands and replays canned output, for tests
//!
//! Runners only report what the process did ([`RawOutput`]). Turning that into a value
//! or an error is [`interpret`]'s job, shared by every runner so classification cannot
//! drift between them.

use crate::commands::ScriptCommand;
use crate::error::{RegeditError, Result, ScriptError};
use crate::model::Listing;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

pub mod memory;
pub mod process;

/// What a finished script invocation left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Decoded script output: JSON when stdout parses, the raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScriptOutput {
    Json(Value),
    Text(String),
}

impl ScriptOutput {
    /// Reads the output as a list result.
    pub fn listing(&self) -> Result<Listing> {
        match self {
            ScriptOutput::Json(value) => Ok(serde_json::from_value(value.clone())?),
            ScriptOutput::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

pub trait ScriptRunner {
    /// Executes the command once and reports how the process ended.
    ///
    /// Only failures to run at all are errors here; exit codes and stderr are
    /// classified by [`interpret`].
    fn run(&self, command: &ScriptCommand) -> impl Future<Output = Result<RawOutput>> + Send;
}

/// Classifies a finished invocation.
///
/// A failed exit maps through the error table when the code is known and is surfaced
/// as-is otherwise. A clean exit with stderr is still an error. Stdout that is not JSON
/// comes back as text.
pub fn interpret(raw: RawOutput) -> Result<ScriptOutput> {
    if !raw.success {
        if !raw.stdout.is_empty() {
            log::error!("{}", raw.stdout);
        }
        if !raw.stderr.is_empty() {
            log::error!("{}", raw.stderr);
        }

        if let Some(known) = raw.code.and_then(ScriptError::from_code) {
            return Err(RegeditError::Script(known));
        }
        return Err(RegeditError::ProcessFailed {
            code: raw.code,
            stderr: raw.stderr,
        });
    }

    if !raw.stderr.is_empty() {
        return Err(RegeditError::Stderr(raw.stderr));
    }

    log::debug!("{}", raw.stdout);

    match serde_json::from_str(&raw.stdout) {
        Ok(value) => Ok(ScriptOutput::Json(value)),
        Err(_) => Ok(ScriptOutput::Text(raw.stdout)),
    }
}

/// Runs a command through `runner` and interprets the result.
pub async fn execute<R: ScriptRunner + Sync>(
    runner: &R,
    command: &ScriptCommand,
) -> Result<ScriptOutput> {
    log::debug!("{}", command);
    let raw = runner.run(command).await?;
    interpret(raw)
}
