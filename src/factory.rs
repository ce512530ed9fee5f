//! Instance forge with chained registration.
//!
//! A `Factory` is built once by the application's composition root and passed to whatever
//! needs it. Transaction hooks belong to a `Forge`: `with` and `register` skip them.
//!
//! ```rust
//! use anvil_forge::{EmptyResponse, Factory, ForgeApi, SlotHandler};
//!
//! let factory = Factory::new()
//!     .with(SlotHandler::response(|| Ok(EmptyResponse)))
//!     .with(SlotHandler::log(|err| eprintln!("{err}")));
//!
//! assert!(factory.response().unwrap().is_placeholder());
//! ```

use std::fmt;

use crate::forge_api::{ForgeApi, SlotStorage, TraceStorage};
use crate::SlotHandler;

/// Instance forge without transaction hooks.
#[derive(Default)]
pub struct Factory {
    storage: SlotStorage,
    trace: TraceStorage,
}

impl Factory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration. Transaction hooks are logged and skipped.
    pub fn with(self, handler: SlotHandler) -> Self {
        self.accept(handler);
        self
    }

    /// Register `handler` and return the factory for chaining. Transaction hooks are logged
    /// and skipped.
    pub fn register(&self, handler: SlotHandler) -> &Self {
        self.accept(handler);
        self
    }

    fn accept(&self, handler: SlotHandler) {
        let slot = handler.slot();
        if slot.is_transaction() {
            tracing::warn!(slot = %slot, "transaction hooks are only wired on a Forge, skipping");
            return;
        }
        self.set(handler);
    }
}

impl ForgeApi for Factory {
    fn storage(&self) -> &SlotStorage {
        &self.storage
    }

    fn trace(&self) -> &TraceStorage {
        &self.trace
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("slots", &self.registered_slots())
            .finish()
    }
}
