//! Slot keys.
//!
//! Every registration point in a forge is one of a fixed set of slots. The string form
//! (`validate`, `transaction_start`, ...) is kept for display, tracing and for hosts that
//! wire closures from string-keyed configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ForgeError;

/// A named registration point holding at most one callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Builds the validator for the current request.
    Validate,
    /// Describes field-level validation rules.
    ValidationMap,
    /// Receives errors the host wants logged.
    Log,
    /// Extracts request fields.
    Request,
    /// Builds the default response.
    Response,
    /// Builds the response for a successful action.
    Success,
    /// Builds the response for a failed action.
    Error,
    /// Opens a transaction and returns its token. Only wired on a `Forge`.
    TransactionStart,
    /// Commits the open transaction. Only wired on a `Forge`.
    TransactionCommit,
    /// Rolls back the open transaction. Only wired on a `Forge`.
    TransactionRollback,
}

impl Slot {
    /// Every slot, in declaration order.
    pub const ALL: [Slot; 10] = [
        Slot::Validate,
        Slot::ValidationMap,
        Slot::Log,
        Slot::Request,
        Slot::Response,
        Slot::Success,
        Slot::Error,
        Slot::TransactionStart,
        Slot::TransactionCommit,
        Slot::TransactionRollback,
    ];

    /// The string key of this slot.
    pub const fn as_str(self) -> &'static str {
        match self {
            Slot::Validate => "validate",
            Slot::ValidationMap => "validation_map",
            Slot::Log => "log",
            Slot::Request => "request",
            Slot::Response => "response",
            Slot::Success => "success",
            Slot::Error => "error",
            Slot::TransactionStart => "transaction_start",
            Slot::TransactionCommit => "transaction_commit",
            Slot::TransactionRollback => "transaction_rollback",
        }
    }

    /// Whether this slot is one of the transaction boundary hooks.
    pub const fn is_transaction(self) -> bool {
        matches!(
            self,
            Slot::TransactionStart | Slot::TransactionCommit | Slot::TransactionRollback
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ForgeError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == key)
            .ok_or_else(|| ForgeError::UnknownSlot(key.to_string()))
    }
}
