use super::render::{print_config, print_messages, print_output};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use regedit::api::{ConfigAction, Operation, RegeditApi};
use regedit::commands::config;
use regedit::config::RegeditConfig;
use regedit::error::{RegeditError, Result};
use regedit::model::{ValueEntry, ValueMap, ValueType};
use regedit::runner::process::ProcessRunner;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Config { key, value } => handle_config(&config_dir, key, value),
        command => {
            let operation = operation_for(command)?;
            let runner = ProcessRunner::new(RegeditConfig::load(&config_dir)?);

            if cli.dry_run {
                println!("{}", runner.command_line(&operation.build()?));
                return Ok(());
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(handle_operation(RegeditApi::new(runner), operation))
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn resolve_config_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    ProjectDirs::from("com", "regedit", "regedit")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| RegeditError::Config("Could not determine config dir".to_string()))
}

fn operation_for(command: Commands) -> Result<Operation> {
    match command {
        Commands::List { keys, arch } => Ok(Operation::list_arch(keys, arch)),
        Commands::CreateKey { keys } => Ok(Operation::CreateKey(keys.into())),
        Commands::DeleteKey { keys } => Ok(Operation::DeleteKey(keys.into())),
        Commands::PutValue {
            key,
            name,
            value,
            kind,
            file,
        } => {
            let values = match (file, key, name, value) {
                (Some(path), _, _, _) => read_value_map(&path)?,
                (None, Some(key), Some(name), Some(value)) => ValueMap::new().with(
                    key,
                    name,
                    ValueEntry::new(parse_cli_value(kind, &value), kind),
                ),
                _ => {
                    return Err(RegeditError::Config(
                        "put-value needs KEY NAME VALUE or --file".to_string(),
                    ))
                }
            };
            Ok(Operation::PutValue(values))
        }
        Commands::Config { .. } => Err(RegeditError::Config(
            "config is not a registry operation".to_string(),
        )),
    }
}

fn read_value_map(path: &Path) -> Result<ValueMap> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Turns command line text into the payload shape each value type expects.
fn parse_cli_value(kind: ValueType, raw: &str) -> Value {
    match kind {
        ValueType::Binary => Value::Array(
            raw.split(',')
                .filter(|part| !part.is_empty())
                .map(|part| match part.trim().parse::<u8>() {
                    Ok(byte) => Value::from(byte),
                    Err(_) => Value::from(part),
                })
                .collect(),
        ),
        ValueType::MultiSz => Value::Array(raw.split(',').map(Value::from).collect()),
        _ => Value::from(raw),
    }
}

async fn handle_operation(api: RegeditApi<ProcessRunner>, operation: Operation) -> Result<()> {
    let result = api.perform(&operation).await?;
    if let Some(output) = &result.output {
        print_output(output)?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(config_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = config::run(config_dir, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
