use crate::commands::{CmdMessage, CmdResult};
use crate::config::RegeditConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = RegeditConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    let message = match action {
        ConfigAction::ShowAll => return Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => config
            .get(&key)
            .map(CmdMessage::info)
            .unwrap_or_else(|| CmdMessage::error(format!("Unknown config key: {}", key))),
        ConfigAction::Set(key, value) => match config.set(&key, &value) {
            Err(e) => CmdMessage::error(e.to_string()),
            Ok(()) => {
                config.save(config_dir)?;
                let shown = config.get(&key).unwrap_or(value);
                result = result.with_config(config);
                CmdMessage::success(format!("{} set to {}", key, shown))
            }
        },
    };

    result.add_message(message);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn show_all_returns_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(RegeditConfig::default()));
    }

    #[test]
    fn set_persists_value() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("interpreter".into(), "wscript.exe".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);

        let shown = run(dir.path(), ConfigAction::ShowKey("interpreter".into())).unwrap();
        assert_eq!(shown.messages[0].content, "wscript.exe");
    }

    #[test]
    fn show_unknown_key_reports_error_message() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowKey("nope".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(result.messages[0].content, "Unknown config key: nope");
        assert!(result.config.is_none());
    }

    #[test]
    fn unknown_key_reports_error_message() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::Set("nope".into(), "x".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
