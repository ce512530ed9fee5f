//! Forge with transaction boundary hooks.
//!
//! Unlike a `Factory`, a `Forge` also carries the `transaction_start`, `transaction_commit`
//! and `transaction_rollback` slots. These have no default: a transaction hook that was never
//! wired fails with `SlotNotFound`.
//!
//! Construct one at startup, register closures, then share it (usually as `Arc<Forge>`) with
//! request handling code.

use std::fmt;

use crate::contract::TransactionToken;
use crate::forge_api::{ForgeApi, SlotStorage, TraceStorage};
use crate::{ForgeError, Result, Slot, SlotHandler};

/// Forge carrying every slot, transaction hooks included.
#[derive(Default)]
pub struct Forge {
    storage: SlotStorage,
    trace: TraceStorage,
}

impl Forge {
    /// Create an empty forge.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transaction_start_closure<T, F>(&self, f: F)
    where
        T: Into<TransactionToken>,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.set(SlotHandler::transaction_start(f));
    }

    pub fn set_transaction_commit_closure(
        &self,
        f: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.set(SlotHandler::transaction_commit(f));
    }

    pub fn set_transaction_rollback_closure(
        &self,
        f: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.set(SlotHandler::transaction_rollback(f));
    }

    /// Open a transaction through the `transaction_start` slot.
    ///
    /// # Errors
    ///
    /// `SlotNotFound` when the slot is unset; errors raised by the callable propagate.
    pub fn start_transaction(&self) -> Result<TransactionToken> {
        let token = self.invoke(Slot::TransactionStart, true, |handler| {
            let start = handler.into_transaction_start()?;
            Ok(start()?)
        })?;

        let token = token.ok_or(ForgeError::SlotNotFound {
            slot: Slot::TransactionStart,
        })?;
        tracing::debug!(token = %token, "transaction started");
        Ok(token)
    }

    /// Commit through the `transaction_commit` slot.
    ///
    /// # Errors
    ///
    /// `SlotNotFound` when the slot is unset; errors raised by the callable propagate.
    pub fn commit_transaction(&self) -> Result<()> {
        self.end_transaction(Slot::TransactionCommit)
    }

    /// Roll back through the `transaction_rollback` slot.
    ///
    /// # Errors
    ///
    /// `SlotNotFound` when the slot is unset; errors raised by the callable propagate.
    pub fn rollback_transaction(&self) -> Result<()> {
        self.end_transaction(Slot::TransactionRollback)
    }

    fn end_transaction(&self, slot: Slot) -> Result<()> {
        self.invoke(slot, true, |handler| {
            let end = handler.into_transaction_end(slot)?;
            Ok(end()?)
        })?
        .ok_or(ForgeError::SlotNotFound { slot })?;

        tracing::debug!(slot = %slot, "transaction finished");
        Ok(())
    }
}

impl ForgeApi for Forge {
    fn storage(&self) -> &SlotStorage {
        &self.storage
    }

    fn trace(&self) -> &TraceStorage {
        &self.trace
    }
}

impl fmt::Debug for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forge")
            .field("slots", &self.registered_slots())
            .finish()
    }
}
