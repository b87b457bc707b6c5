use crate::commands::{run_command, CmdMessage, CmdResult, Script, ScriptCommand};
use crate::error::Result;
use crate::model::{Arch, Keys};
use crate::runner::ScriptRunner;

pub fn build(keys: &Keys) -> ScriptCommand {
    ScriptCommand::with_keys(Script::DeleteKey, Arch::Agnostic, keys)
}

pub async fn run<R: ScriptRunner + Sync>(runner: &R, keys: &Keys) -> Result<CmdResult> {
    let mut result = run_command(runner, &build(keys)).await?;
    for key in keys.as_slice() {
        result.add_message(CmdMessage::success(format!("Key deleted: {}", key)));
    }
    Ok(result)
}
