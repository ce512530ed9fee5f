//! Strongly typed callables, one kind per slot.
//!
//! A `SlotHandler` always knows its own slot, so storing one can never put a callable under
//! the wrong key.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::contract::{Action, Fields, Response, TransactionToken, ValidationMap, Validator};
use crate::{ForgeError, Slot};

pub type ValidateFn = Arc<dyn Fn() -> anyhow::Result<Box<dyn Validator>> + Send + Sync>;
pub type ValidationMapFn = Arc<dyn Fn() -> anyhow::Result<ValidationMap> + Send + Sync>;
pub type LogFn = Arc<dyn Fn(&(dyn StdError + 'static)) + Send + Sync>;
pub type RequestFn = Arc<dyn Fn(Option<&[&str]>) -> anyhow::Result<Fields> + Send + Sync>;
pub type ResponseFn = Arc<dyn Fn() -> anyhow::Result<Box<dyn Response>> + Send + Sync>;
/// Shared by the `success` and `error` slots: `(message, action)`.
pub type OutcomeFn = Arc<dyn Fn(&str, &Action) -> anyhow::Result<Box<dyn Response>> + Send + Sync>;
pub type TransactionStartFn = Arc<dyn Fn() -> anyhow::Result<TransactionToken> + Send + Sync>;
/// Shared by the `transaction_commit` and `transaction_rollback` slots.
pub type TransactionEndFn = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// A callable bound to a slot.
///
/// Cloning is cheap; every variant is an `Arc`.
#[derive(Clone)]
pub enum SlotHandler {
    Validate(ValidateFn),
    ValidationMap(ValidationMapFn),
    Log(LogFn),
    Request(RequestFn),
    Response(ResponseFn),
    Success(OutcomeFn),
    Error(OutcomeFn),
    TransactionStart(TransactionStartFn),
    TransactionCommit(TransactionEndFn),
    TransactionRollback(TransactionEndFn),
}

impl SlotHandler {
    /// The slot this handler is stored under.
    pub fn slot(&self) -> Slot {
        match self {
            SlotHandler::Validate(_) => Slot::Validate,
            SlotHandler::ValidationMap(_) => Slot::ValidationMap,
            SlotHandler::Log(_) => Slot::Log,
            SlotHandler::Request(_) => Slot::Request,
            SlotHandler::Response(_) => Slot::Response,
            SlotHandler::Success(_) => Slot::Success,
            SlotHandler::Error(_) => Slot::Error,
            SlotHandler::TransactionStart(_) => Slot::TransactionStart,
            SlotHandler::TransactionCommit(_) => Slot::TransactionCommit,
            SlotHandler::TransactionRollback(_) => Slot::TransactionRollback,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------------------------------

    pub fn validate<V, F>(f: F) -> Self
    where
        V: Validator + 'static,
        F: Fn() -> anyhow::Result<V> + Send + Sync + 'static,
    {
        SlotHandler::Validate(Arc::new(move || {
            f().map(|validator| Box::new(validator) as Box<dyn Validator>)
        }))
    }

    pub fn validation_map(
        f: impl Fn() -> anyhow::Result<ValidationMap> + Send + Sync + 'static,
    ) -> Self {
        SlotHandler::ValidationMap(Arc::new(f))
    }

    pub fn log(f: impl Fn(&(dyn StdError + 'static)) + Send + Sync + 'static) -> Self {
        SlotHandler::Log(Arc::new(f))
    }

    pub fn request(
        f: impl Fn(Option<&[&str]>) -> anyhow::Result<Fields> + Send + Sync + 'static,
    ) -> Self {
        SlotHandler::Request(Arc::new(f))
    }

    pub fn response<R, F>(f: F) -> Self
    where
        R: Response + 'static,
        F: Fn() -> anyhow::Result<R> + Send + Sync + 'static,
    {
        SlotHandler::Response(Arc::new(move || {
            f().map(|response| Box::new(response) as Box<dyn Response>)
        }))
    }

    pub fn success<R, F>(f: F) -> Self
    where
        R: Response + 'static,
        F: Fn(&str, &Action) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        SlotHandler::Success(boxed_outcome(f))
    }

    pub fn error<R, F>(f: F) -> Self
    where
        R: Response + 'static,
        F: Fn(&str, &Action) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        SlotHandler::Error(boxed_outcome(f))
    }

    pub fn transaction_start<T, F>(f: F) -> Self
    where
        T: Into<TransactionToken>,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        SlotHandler::TransactionStart(Arc::new(
            move || -> anyhow::Result<TransactionToken> { f().map(Into::into) },
        ))
    }

    pub fn transaction_commit(f: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
        SlotHandler::TransactionCommit(Arc::new(f))
    }

    pub fn transaction_rollback(
        f: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        SlotHandler::TransactionRollback(Arc::new(f))
    }

    // ---------------------------------------------------------------------------------------------
    // Typed extraction
    // ---------------------------------------------------------------------------------------------

    fn mismatch(&self, slot: Slot) -> ForgeError {
        ForgeError::HandlerMismatch {
            slot,
            found: self.slot(),
        }
    }

    pub fn into_validate(self) -> Result<ValidateFn, ForgeError> {
        match self {
            SlotHandler::Validate(f) => Ok(f),
            other => Err(other.mismatch(Slot::Validate)),
        }
    }

    pub fn into_validation_map(self) -> Result<ValidationMapFn, ForgeError> {
        match self {
            SlotHandler::ValidationMap(f) => Ok(f),
            other => Err(other.mismatch(Slot::ValidationMap)),
        }
    }

    pub fn into_log(self) -> Result<LogFn, ForgeError> {
        match self {
            SlotHandler::Log(f) => Ok(f),
            other => Err(other.mismatch(Slot::Log)),
        }
    }

    pub fn into_request(self) -> Result<RequestFn, ForgeError> {
        match self {
            SlotHandler::Request(f) => Ok(f),
            other => Err(other.mismatch(Slot::Request)),
        }
    }

    pub fn into_response(self) -> Result<ResponseFn, ForgeError> {
        match self {
            SlotHandler::Response(f) => Ok(f),
            other => Err(other.mismatch(Slot::Response)),
        }
    }

    /// Extracts the `(message, action)` callable of a `success` or `error` handler.
    pub fn into_outcome(self, slot: Slot) -> Result<OutcomeFn, ForgeError> {
        match (slot, self) {
            (Slot::Success, SlotHandler::Success(f)) | (Slot::Error, SlotHandler::Error(f)) => {
                Ok(f)
            }
            (slot, other) => Err(other.mismatch(slot)),
        }
    }

    pub fn into_transaction_start(self) -> Result<TransactionStartFn, ForgeError> {
        match self {
            SlotHandler::TransactionStart(f) => Ok(f),
            other => Err(other.mismatch(Slot::TransactionStart)),
        }
    }

    /// Extracts the callable of a `transaction_commit` or `transaction_rollback` handler.
    pub fn into_transaction_end(self, slot: Slot) -> Result<TransactionEndFn, ForgeError> {
        match (slot, self) {
            (Slot::TransactionCommit, SlotHandler::TransactionCommit(f))
            | (Slot::TransactionRollback, SlotHandler::TransactionRollback(f)) => Ok(f),
            (slot, other) => Err(other.mismatch(slot)),
        }
    }
}

fn boxed_outcome<R, F>(f: F) -> OutcomeFn
where
    R: Response + 'static,
    F: Fn(&str, &Action) -> anyhow::Result<R> + Send + Sync + 'static,
{
    Arc::new(move |message: &str, action: &Action| {
        f(message, action).map(|response| Box::new(response) as Box<dyn Response>)
    })
}

impl fmt::Debug for SlotHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotHandler").field(&self.slot()).finish()
    }
}
