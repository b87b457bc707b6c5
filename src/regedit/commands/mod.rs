//! # Command Layer
//!
//! Each operation lives in its own module and is split in two steps:
//!
//! - `build(...)`: turns typed inputs into a [`ScriptCommand`]. Pure and synchronous,
//!   this is where validation happens, so a bad payload never reaches a process.
//! - `run(...)`: hands the command to a [`ScriptRunner`] and wraps the output in a
//!   [`CmdResult`].
//!
//! The rendered form of a command is the script name, the architecture token and the
//! quoted arguments, e.g. `regList.wsf A "HKLM\Software"`.

use crate::error::Result;
use crate::model::{Arch, Keys, Listing};
use crate::runner::{execute, ScriptOutput, ScriptRunner};
use std::fmt;

pub mod config;
pub mod create_key;
pub mod delete_key;
pub mod list;
pub mod put_value;

/// The registry scripts shipped next to the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    List,
    CreateKey,
    DeleteKey,
    PutValue,
}

impl Script {
    pub fn file_name(&self) -> &'static str {
        match self {
            Script::List => "regList.wsf",
            Script::CreateKey => "regCreateKey.wsf",
            Script::DeleteKey => "regDeleteKey.wsf",
            Script::PutValue => "regPutValue.wsf",
        }
    }
}

/// A fully prepared script invocation.
///
/// `args` are already in their command-line form (quoted where needed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub script: Script,
    pub arch: Arch,
    pub args: Vec<String>,
}

impl ScriptCommand {
    pub fn new(script: Script, arch: Arch) -> Self {
        Self {
            script,
            arch,
            args: Vec::new(),
        }
    }

    /// Builds a command whose arguments are the given keys, each quoted.
    pub fn with_keys(script: Script, arch: Arch, keys: &Keys) -> Self {
        let mut command = Self::new(script, arch);
        command
            .args
            .extend(keys.as_slice().iter().map(|k| wrap_double_quotes(k)));
        command
    }

    pub fn push_quoted(&mut self, item: &str) {
        self.args.push(wrap_double_quotes(item));
    }

    pub fn push_raw(&mut self, item: impl Into<String>) {
        self.args.push(item.into());
    }

    /// The architecture token followed by the arguments, as handed to the script.
    pub fn script_args(&self) -> Vec<String> {
        std::iter::once(self.arch.token().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.script.file_name(), self.arch.token())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Wraps `item` in double quotes unless it already starts or ends with one.
pub fn wrap_double_quotes(item: &str) -> String {
    if item.starts_with('"') || item.ends_with('"') {
        item.to_string()
    } else {
        format!("\"{}\"", item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The script line that was executed, empty for commands that spawn nothing.
    pub command: String,
    pub output: Option<ScriptOutput>,
    pub config: Option<crate::config::RegeditConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_command(mut self, command: &ScriptCommand) -> Self {
        self.command = command.to_string();
        self
    }

    pub fn with_output(mut self, output: ScriptOutput) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_config(mut self, config: crate::config::RegeditConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Typed view of a list result.
    pub fn listing(&self) -> Result<Listing> {
        match &self.output {
            Some(output) => output.listing(),
            None => Ok(Listing::new()),
        }
    }
}

/// Runs `command` and wraps the interpreted output.
pub(crate) async fn run_command<R: ScriptRunner + Sync>(
    runner: &R,
    command: &ScriptCommand,
) -> Result<CmdResult> {
    let output = execute(runner, command).await?;
    Ok(CmdResult::default().with_command(command).with_output(output))
}
