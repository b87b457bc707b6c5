use super::{RawOutput, ScriptRunner};
use crate::commands::ScriptCommand;
use crate::config::RegeditConfig;
use crate::error::{RegeditError, Result};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Runs scripts through the configured scripting host as child processes.
///
/// Every call spawns its own process and waits for it without blocking the runtime.
/// There is no timeout: a hung script hangs the call.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RegeditConfig,
}

impl ProcessRunner {
    pub fn new(config: RegeditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegeditConfig {
        &self.config
    }

    /// The full command line, as it would be typed into a shell.
    pub fn command_line(&self, command: &ScriptCommand) -> String {
        let mut parts = vec![self.config.interpreter.clone()];
        parts.extend(self.config.interpreter_flags.iter().cloned());
        parts.push(
            self.config
                .script_path(command.script.file_name())
                .display()
                .to_string(),
        );
        parts.extend(command.script_args());
        parts.join(" ")
    }

    fn resolve_interpreter(&self) -> Result<PathBuf> {
        which::which(&self.config.interpreter).map_err(|e| {
            RegeditError::Config(format!(
                "Script interpreter '{}' not found: {}",
                self.config.interpreter, e
            ))
        })
    }

    fn prepare(&self, command: &ScriptCommand) -> Result<Command> {
        let mut cmd = Command::new(self.resolve_interpreter()?);
        cmd.args(&self.config.interpreter_flags)
            .arg(self.config.script_path(command.script.file_name()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        push_script_args(&mut cmd, command);
        Ok(cmd)
    }
}

// The arguments are already quoted for the Windows command line, so they are
// appended verbatim instead of being escaped a second time.
#[cfg(windows)]
fn push_script_args(cmd: &mut Command, command: &ScriptCommand) {
    for arg in command.script_args() {
        cmd.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn push_script_args(cmd: &mut Command, command: &ScriptCommand) {
    cmd.args(command.script_args().iter().map(|arg| strip_quotes(arg)));
}

#[cfg_attr(windows, allow(dead_code))]
fn strip_quotes(arg: &str) -> &str {
    if arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"') {
        &arg[1..arg.len() - 1]
    } else {
        arg
    }
}

impl ScriptRunner for ProcessRunner {
    fn run(&self, command: &ScriptCommand) -> impl Future<Output = Result<RawOutput>> + Send {
        log::debug!("{}", self.command_line(command));
        let prepared = self.prepare(command);

        async move {
            let output = prepared?.output().await?;
            Ok(RawOutput {
                success: output.status.success(),
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}
