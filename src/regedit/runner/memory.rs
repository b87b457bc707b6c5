use super::{RawOutput, ScriptRunner};
use crate::commands::ScriptCommand;
use crate::error::Result;
use std::future::{self, Future};
use std::sync::{Arc, Mutex, MutexGuard};

/// Runner that never spawns anything.
/// Records every command it is given and answers with a fixed output.
///
/// Clones share the same command log, so a clone handed to a spawned task still
/// reports back to the original.
#[derive(Debug, Clone)]
pub struct MemoryRunner {
    response: RawOutput,
    commands: Arc<Mutex<Vec<ScriptCommand>>>,
}

impl Default for MemoryRunner {
    fn default() -> Self {
        Self {
            response: RawOutput::ok(""),
            commands: Arc::default(),
        }
    }
}

impl MemoryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: RawOutput) -> Self {
        self.response = response;
        self
    }

    pub fn with_stdout(self, stdout: &str) -> Self {
        self.with_response(RawOutput::ok(stdout))
    }

    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.response.stderr = stderr.to_string();
        self
    }

    pub fn with_exit_code(self, code: i32) -> Self {
        self.with_response(RawOutput::failed(code, ""))
    }

    /// Commands received so far, in order.
    pub fn commands(&self) -> Vec<ScriptCommand> {
        self.log().clone()
    }

    fn log(&self) -> MutexGuard<'_, Vec<ScriptCommand>> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ScriptRunner for MemoryRunner {
    fn run(&self, command: &ScriptCommand) -> impl Future<Output = Result<RawOutput>> + Send {
        self.log().push(command.clone());
        future::ready(Ok(self.response.clone()))
    }
}
