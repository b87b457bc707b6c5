use crate::model::ValueType;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// Failures reported by the registry scripts through their exit code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptError {
    #[error("missing arguments")]
    MissingArguments,

    #[error("invalid hive")]
    InvalidHive,

    #[error("invalid registry value type")]
    InvalidValueType,

    #[error("error while reading from registry")]
    ReadFailed,

    #[error("error while writing to registry")]
    WriteFailed,

    #[error("error while creating registry key")]
    CreateKeyFailed,

    #[error("error while deleting registry key")]
    DeleteKeyFailed,

    #[error("error while putting registry value")]
    PutValueFailed,

    #[error("invalid registry key path")]
    InvalidKeyPath,

    #[error("unknown architecture")]
    UnknownArchitecture,

    #[error("registry path does not exist")]
    PathNotFound,
}

static ERROR_TABLE: Lazy<HashMap<i32, ScriptError>> = Lazy::new(|| {
    ScriptError::ALL
        .iter()
        .map(|error| (error.code(), *error))
        .collect()
});

impl ScriptError {
    pub const ALL: [ScriptError; 11] = [
        ScriptError::MissingArguments,
        ScriptError::InvalidHive,
        ScriptError::InvalidValueType,
        ScriptError::ReadFailed,
        ScriptError::WriteFailed,
        ScriptError::CreateKeyFailed,
        ScriptError::DeleteKeyFailed,
        ScriptError::PutValueFailed,
        ScriptError::InvalidKeyPath,
        ScriptError::UnknownArchitecture,
        ScriptError::PathNotFound,
    ];

    /// Exit code the scripts use for this failure.
    pub fn code(&self) -> i32 {
        match self {
            ScriptError::MissingArguments => 25121,
            ScriptError::InvalidHive => 25122,
            ScriptError::InvalidValueType => 25123,
            ScriptError::ReadFailed => 25124,
            ScriptError::WriteFailed => 25125,
            ScriptError::CreateKeyFailed => 25126,
            ScriptError::DeleteKeyFailed => 25127,
            ScriptError::PutValueFailed => 25128,
            ScriptError::InvalidKeyPath => 25129,
            ScriptError::UnknownArchitecture => 25130,
            ScriptError::PathNotFound => 2,
        }
    }

    /// Looks up a process exit code in the error table.
    pub fn from_code(code: i32) -> Option<ScriptError> {
        ERROR_TABLE.get(&code).copied()
    }
}

#[derive(Error, Debug)]
pub enum RegeditError {
    #[error("missing callback")]
    MissingCallback,

    #[error("invalid value type {found} for registry type {kind}, please use an array of {expected}")]
    InvalidValue {
        found: &'static str,
        kind: ValueType,
        expected: &'static str,
    },

    #[error("invalid value type {found} for registry type {kind}, please use a string or a number")]
    InvalidScalar {
        found: &'static str,
        kind: ValueType,
    },

    #[error("Unknown registry value type: {0}")]
    UnknownValueType(String),

    #[error("Unknown architecture: {0}")]
    UnknownArch(String),

    #[error("{0} (exit code {code})", code = .0.code())]
    Script(#[from] ScriptError),

    #[error("Command failed{}: {stderr}", .code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("{0}")]
    Stderr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RegeditError>;
