use crate::commands::{run_command, CmdMessage, CmdResult, Script, ScriptCommand};
use crate::error::Result;
use crate::model::{Arch, ValueMap};
use crate::runner::ScriptRunner;

/// Appends `"key" "name" "value" TYPE` for every entry of the map.
///
/// Fails on the first entry whose payload does not fit its type.
pub fn build(values: &ValueMap) -> Result<ScriptCommand> {
    let mut command = ScriptCommand::new(Script::PutValue, Arch::Agnostic);
    for (key, name, entry) in values.iter() {
        let rendered = entry.render()?;
        command.push_quoted(key);
        command.push_quoted(name);
        command.push_quoted(&rendered);
        command.push_raw(entry.kind.as_str());
    }
    Ok(command)
}

pub async fn run<R: ScriptRunner + Sync>(runner: &R, values: &ValueMap) -> Result<CmdResult> {
    let command = build(values)?;
    let mut result = run_command(runner, &command).await?;
    for (key, name, entry) in values.iter() {
        result.add_message(CmdMessage::success(format!(
            "Value written: {}\\{} ({})",
            key, name, entry.kind
        )));
    }
    Ok(result)
}
