use crate::commands::{run_command, CmdMessage, CmdResult, Script, ScriptCommand};
use crate::error::Result;
use crate::model::{Arch, Keys};
use crate::runner::ScriptRunner;

pub fn build(keys: &Keys, arch: Arch) -> ScriptCommand {
    ScriptCommand::with_keys(Script::List, arch, keys)
}

pub async fn run<R: ScriptRunner + Sync>(runner: &R, keys: &Keys, arch: Arch) -> Result<CmdResult> {
    let command = build(keys, arch);
    let mut result = run_command(runner, &command).await?;

    // The script reports missing keys inline rather than failing.
    if let Ok(listing) = result.listing() {
        for (path, entry) in &listing {
            if !entry.exists {
                result.add_message(CmdMessage::warning(format!("Key not found: {}", path)));
            }
        }
    }

    Ok(result)
}
