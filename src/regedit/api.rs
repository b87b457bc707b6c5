//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for registry operations, whatever the UI.
//!
//! ## Two ways in
//!
//! - **Async methods** (`list`, `create_key`, `delete_key`, `put_value`, `arch().list32`, ...)
//!   return a future that resolves once with the interpreted script output.
//! - **[`RegeditApi::submit`]** takes an [`Operation`] and a completion callback, spawns
//!   the invocation on the current tokio runtime and calls the callback exactly once.
//!   A missing callback or an invalid payload is rejected before anything is spawned.
//!
//! ## Generic Over ScriptRunner
//!
//! `RegeditApi<R: ScriptRunner>` is generic over the transport:
//! - Production: `RegeditApi<ProcessRunner>`
//! - Testing: `RegeditApi<MemoryRunner>`
//!
//! API tests verify dispatch (right script, right architecture token), not script
//! output handling, which is covered in `runner`.

use crate::commands::{self, CmdResult, ScriptCommand};
use crate::error::{RegeditError, Result};
use crate::model::{Arch, Keys, ValueMap};
use crate::runner::ScriptRunner;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Completion handler for [`RegeditApi::submit`].
pub type Callback = Box<dyn FnOnce(Result<CmdResult>) + Send + 'static>;

/// A registry operation, detached from any runner.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    List { keys: Keys, arch: Arch },
    CreateKey(Keys),
    DeleteKey(Keys),
    PutValue(ValueMap),
}

impl Operation {
    pub fn list(keys: impl Into<Keys>) -> Self {
        Operation::List {
            keys: keys.into(),
            arch: Arch::Agnostic,
        }
    }

    pub fn list_arch(keys: impl Into<Keys>, arch: Arch) -> Self {
        Operation::List {
            keys: keys.into(),
            arch,
        }
    }

    /// The script invocation this operation turns into. Validates value payloads.
    pub fn build(&self) -> Result<ScriptCommand> {
        match self {
            Operation::List { keys, arch } => Ok(commands::list::build(keys, *arch)),
            Operation::CreateKey(keys) => Ok(commands::create_key::build(keys)),
            Operation::DeleteKey(keys) => Ok(commands::delete_key::build(keys)),
            Operation::PutValue(values) => commands::put_value::build(values),
        }
    }
}

/// The main API facade for registry operations.
#[derive(Debug, Clone)]
pub struct RegeditApi<R: ScriptRunner> {
    runner: R,
}

impl<R: ScriptRunner + Sync> RegeditApi<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Lists subkeys and values of the given key(s), architecture agnostic.
    pub async fn list(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        self.list_arch(keys, Arch::Agnostic).await
    }

    pub async fn list_arch(&self, keys: impl Into<Keys>, arch: Arch) -> Result<CmdResult> {
        commands::list::run(&self.runner, &keys.into(), arch).await
    }

    /// Architecture pinned variants of `list`.
    pub fn arch(&self) -> ArchApi<'_, R> {
        ArchApi { api: self }
    }

    pub async fn create_key(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        commands::create_key::run(&self.runner, &keys.into()).await
    }

    pub async fn delete_key(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        commands::delete_key::run(&self.runner, &keys.into()).await
    }

    pub async fn put_value(&self, values: &ValueMap) -> Result<CmdResult> {
        commands::put_value::run(&self.runner, values).await
    }

    pub async fn perform(&self, operation: &Operation) -> Result<CmdResult> {
        match operation {
            Operation::List { keys, arch } => commands::list::run(&self.runner, keys, *arch).await,
            Operation::CreateKey(keys) => commands::create_key::run(&self.runner, keys).await,
            Operation::DeleteKey(keys) => commands::delete_key::run(&self.runner, keys).await,
            Operation::PutValue(values) => commands::put_value::run(&self.runner, values).await,
        }
    }
}

impl<R: ScriptRunner + Clone + Send + Sync + 'static> RegeditApi<R> {
    /// Starts `operation` in the background and reports through `callback`.
    ///
    /// Fails without spawning when `callback` is `None`, when the operation does not
    /// validate, or when called outside a tokio runtime.
    pub fn submit(&self, operation: Operation, callback: Option<Callback>) -> Result<JoinHandle<()>> {
        let callback = callback.ok_or(RegeditError::MissingCallback)?;
        operation.build()?;

        let handle = Handle::try_current()
            .map_err(|e| RegeditError::Config(format!("No async runtime available: {}", e)))?;

        let api = self.clone();
        Ok(handle.spawn(async move {
            let result = api.perform(&operation).await;
            callback(result);
        }))
    }
}

pub struct ArchApi<'a, R: ScriptRunner> {
    api: &'a RegeditApi<R>,
}

impl<R: ScriptRunner + Sync> ArchApi<'_, R> {
    /// Native view of the machine, detected by the script.
    pub async fn list(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        self.api.list_arch(keys, Arch::Specific).await
    }

    pub async fn list32(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        self.api.list_arch(keys, Arch::X32).await
    }

    pub async fn list64(&self, keys: impl Into<Keys>) -> Result<CmdResult> {
        self.api.list_arch(keys, Arch::X64).await
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Script;
    use crate::error::ScriptError;
    use crate::model::{ValueEntry, ValueType};
    use crate::runner::memory::MemoryRunner;
    use crate::runner::ScriptOutput;
    use serde_json::json;
    use tokio::sync::oneshot;

    fn api() -> RegeditApi<MemoryRunner> {
        RegeditApi::new(MemoryRunner::new())
    }

    #[tokio::test]
    async fn list_uses_agnostic_arch() {
        let api = api();
        let result = api.list(["HKLM\\A", "HKLM\\B"]).await.unwrap();
        assert_eq!(result.command, "regList.wsf A \"HKLM\\A\" \"HKLM\\B\"");
    }

    #[tokio::test]
    async fn arch_variants_pin_their_token() {
        let api = api();
        api.arch().list("HKLM\\A").await.unwrap();
        api.arch().list32("HKLM\\A").await.unwrap();
        api.arch().list64("HKLM\\A").await.unwrap();

        let archs: Vec<Arch> = api.runner().commands().iter().map(|c| c.arch).collect();
        assert_eq!(archs, vec![Arch::Specific, Arch::X32, Arch::X64]);
    }

    #[tokio::test]
    async fn create_and_delete_dispatch_to_their_scripts() {
        let api = api();
        api.create_key("HKCU\\A").await.unwrap();
        api.delete_key("HKCU\\A").await.unwrap();

        let scripts: Vec<Script> = api.runner().commands().iter().map(|c| c.script).collect();
        assert_eq!(scripts, vec![Script::CreateKey, Script::DeleteKey]);
    }

    #[tokio::test]
    async fn put_value_end_to_end_command() {
        let api = api();
        let values = ValueMap::new().with(
            "HKLM\\Software\\X",
            "Name",
            ValueEntry::new("v", ValueType::Sz),
        );
        let result = api.put_value(&values).await.unwrap();
        assert_eq!(
            result.command,
            "regPutValue.wsf A \"HKLM\\Software\\X\" \"Name\" \"v\" REG_SZ"
        );
    }

    #[tokio::test]
    async fn submit_without_callback_fails_without_running() {
        let api = api();
        let err = api.submit(Operation::list("HKLM\\A"), None).unwrap_err();
        assert!(matches!(err, RegeditError::MissingCallback));
        assert!(api.runner().commands().is_empty());
    }

    #[tokio::test]
    async fn submit_rejects_invalid_payload_synchronously() {
        let api = api();
        let values = ValueMap::new().with(
            "HKCU\\A",
            "Multi",
            ValueEntry::new("single", ValueType::MultiSz),
        );
        let callback: Callback = Box::new(|_| panic!("callback must not run"));

        let err = api
            .submit(Operation::PutValue(values), Some(callback))
            .unwrap_err();
        assert!(matches!(err, RegeditError::InvalidValue { .. }));
        assert!(api.runner().commands().is_empty());
    }

    #[tokio::test]
    async fn submit_calls_back_once_with_result() {
        let api = RegeditApi::new(MemoryRunner::new().with_stdout("{\"ok\": true}"));
        let (tx, rx) = oneshot::channel();

        let handle = api
            .submit(
                Operation::list_arch("HKLM\\A", Arch::X64),
                Some(Box::new(move |result: Result<CmdResult>| {
                    let _ = tx.send(result);
                })),
            )
            .unwrap();
        handle.await.unwrap();

        let result = rx.await.unwrap().unwrap();
        assert_eq!(result.output, Some(ScriptOutput::Json(json!({"ok": true}))));
        assert_eq!(api.runner().commands().len(), 1);
    }

    #[tokio::test]
    async fn submit_reports_process_errors_through_callback() {
        let api = RegeditApi::new(MemoryRunner::new().with_exit_code(25121));
        let (tx, rx) = oneshot::channel();

        api.submit(
            Operation::CreateKey(Keys::from("HKCU\\A")),
            Some(Box::new(move |result: Result<CmdResult>| {
                let _ = tx.send(result);
            })),
        )
        .unwrap();

        let err = rx.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            RegeditError::Script(ScriptError::MissingArguments)
        ));
    }

    #[test]
    fn submit_outside_runtime_is_an_error() {
        let api = api();
        let callback: Callback = Box::new(|_| {});
        let err = api
            .submit(Operation::list("HKLM\\A"), Some(callback))
            .unwrap_err();
        assert!(matches!(err, RegeditError::Config(_)));
    }
}
