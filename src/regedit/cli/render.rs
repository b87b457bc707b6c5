use colored::*;
use regedit::api::{CmdMessage, MessageLevel};
use regedit::config::{RegeditConfig, CONFIG_KEYS};
use regedit::error::Result;
use regedit::runner::ScriptOutput;

/// JSON output is pretty printed, text output is passed through.
pub fn render_output(output: &ScriptOutput) -> Result<String> {
    match output {
        ScriptOutput::Json(value) => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        ScriptOutput::Text(text) if text.trim().is_empty() => Ok(String::new()),
        ScriptOutput::Text(text) => Ok(format!("{}\n", text.trim_end())),
    }
}

pub fn print_output(output: &ScriptOutput) -> Result<()> {
    print!("{}", render_output(output)?);
    Ok(())
}

pub fn render_config(config: &RegeditConfig) -> String {
    CONFIG_KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}\n", key, value)))
        .collect()
}

pub fn print_config(config: &RegeditConfig) {
    print!("{}", render_config(config));
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let styled = match message.level {
                MessageLevel::Info => message.content.dimmed(),
                MessageLevel::Success => message.content.green(),
                MessageLevel::Warning => message.content.yellow(),
                MessageLevel::Error => message.content.red(),
            };
            format!("{}\n", styled)
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_output_is_pretty_printed() {
        let rendered = render_output(&ScriptOutput::Json(json!({"a": 1}))).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn text_output_is_trimmed_at_the_end() {
        let rendered = render_output(&ScriptOutput::Text("hello\r\n\r\n".into())).unwrap();
        assert_eq!(rendered, "hello\n");
    }

    #[test]
    fn blank_text_renders_nothing() {
        let rendered = render_output(&ScriptOutput::Text(" \r\n".into())).unwrap();
        assert!(rendered.is_empty());
    }

    #[test]
    fn config_lists_every_key() {
        let config = RegeditConfig::default().with_interpreter("cscript.exe", &["//Nologo"]);
        let rendered = render_config(&config);
        assert!(rendered.starts_with("interpreter = cscript.exe\n"));
        assert!(rendered.contains("interpreter-flags = //Nologo\n"));
        assert!(rendered.contains("script-dir = "));
    }

    #[test]
    fn messages_render_one_per_line() {
        colored::control::set_override(false);
        let rendered = render_messages(&[
            CmdMessage::success("Key created: HKCU\\A"),
            CmdMessage::warning("Key not found: HKCU\\B"),
        ]);
        assert_eq!(rendered, "Key created: HKCU\\A\nKey not found: HKCU\\B\n");
    }
}
