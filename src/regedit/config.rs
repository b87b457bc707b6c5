use crate::error::{RegeditError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_INTERPRETER: &str = "cscript.exe";
const DEFAULT_SCRIPT_DIR: &str = "vbs";

/// Overrides the configured script directory.
pub const SCRIPT_DIR_ENV: &str = "REGEDIT_SCRIPT_DIR";

/// Keys accepted by [`RegeditConfig::get`] and [`RegeditConfig::set`].
pub const CONFIG_KEYS: [&str; 3] = ["interpreter", "interpreter-flags", "script-dir"];

/// How scripts are located and launched, stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegeditConfig {
    /// Scripting host executable.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Flags passed to the interpreter before the script path.
    #[serde(default = "default_interpreter_flags")]
    pub interpreter_flags: Vec<String>,

    /// Directory holding the `.wsf` scripts. Defaults to `vbs/` next to the executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_dir: Option<PathBuf>,
}

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_interpreter_flags() -> Vec<String> {
    vec!["//Nologo".to_string()]
}

impl Default for RegeditConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interpreter_flags: default_interpreter_flags(),
            script_dir: None,
        }
    }
}

impl RegeditConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: RegeditConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// The directory scripts are read from.
    ///
    /// `REGEDIT_SCRIPT_DIR` wins over the configured value, which wins over the
    /// `vbs/` directory beside the running executable.
    pub fn script_dir(&self) -> PathBuf {
        if let Ok(dir) = env::var(SCRIPT_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }

        if let Some(dir) = &self.script_dir {
            return dir.clone();
        }

        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join(DEFAULT_SCRIPT_DIR)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_DIR))
    }

    pub fn script_path(&self, file_name: &str) -> PathBuf {
        self.script_dir().join(file_name)
    }

    pub fn with_script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = Some(dir.into());
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>, flags: &[&str]) -> Self {
        self.interpreter = interpreter.into();
        self.interpreter_flags = flags.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "interpreter" => Some(self.interpreter.clone()),
            "interpreter-flags" => Some(self.interpreter_flags.join(" ")),
            "script-dir" => Some(self.script_dir().display().to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "interpreter" => {
                if value.trim().is_empty() {
                    return Err(RegeditError::Config("interpreter cannot be empty".into()));
                }
                self.interpreter = value.trim().to_string();
            }
            "interpreter-flags" => {
                self.interpreter_flags = value.split_whitespace().map(String::from).collect();
            }
            "script-dir" => {
                self.script_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(RegeditError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegeditConfig::default();
        assert_eq!(config.interpreter, "cscript.exe");
        assert_eq!(config.interpreter_flags, vec!["//Nologo".to_string()]);
        assert_eq!(config.script_dir, None);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = RegeditConfig::load(temp_dir.path().join("missing")).unwrap();
        assert_eq!(config, RegeditConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_dir = temp_dir.path().join("nested");

        let config = RegeditConfig::default()
            .with_interpreter("wscript.exe", &["//B", "//Nologo"])
            .with_script_dir("C:\\scripts");
        config.save(&config_dir).unwrap();

        let loaded = RegeditConfig::load(&config_dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"interpreter": "sh"}"#,
        )
        .unwrap();

        let loaded = RegeditConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.interpreter, "sh");
        assert_eq!(loaded.interpreter_flags, vec!["//Nologo".to_string()]);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = RegeditConfig::default();
        config.set("interpreter-flags", "//B  //Nologo").unwrap();
        assert_eq!(config.interpreter_flags, vec!["//B", "//Nologo"]);
        assert_eq!(config.get("interpreter-flags").unwrap(), "//B //Nologo");

        config.set("interpreter", "wscript.exe").unwrap();
        assert_eq!(config.get("interpreter").unwrap(), "wscript.exe");
    }

    #[test]
    fn test_set_rejects_unknown_key_and_empty_interpreter() {
        let mut config = RegeditConfig::default();
        assert!(matches!(
            config.set("color", "red"),
            Err(RegeditError::Config(_))
        ));
        assert!(config.set("interpreter", "  ").is_err());
        assert_eq!(config.get("color"), None);
    }

    #[test]
    fn test_script_dir_clears_with_empty_value() {
        let mut config = RegeditConfig::default().with_script_dir("/opt/scripts");
        config.set("script-dir", "").unwrap();
        assert_eq!(config.script_dir, None);
    }
}
