//! Capability contracts for the collaborators a forge hands out.
//!
//! Concrete validators and responses belong to the host application. The forge only needs
//! them to satisfy these traits so consumer code can treat registered implementations and
//! placeholders alike.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request fields, keyed by field name.
pub type Fields = serde_json::Map<String, Value>;

/// Opaque payload passed through to success/error callables.
pub type Action = Value;

/// Validation failures, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Value returned by a `transaction_start` callable and handed back to the caller.
pub type TransactionToken = String;

/// Validates request input.
pub trait Validator: Send + Sync {
    /// Check `input`, returning the messages for every failing field.
    fn validate(&self, input: &Fields) -> Result<(), FieldErrors>;

    /// The rules this validator enforces.
    fn rules(&self) -> ValidationMap {
        ValidationMap::default()
    }
}

/// An HTTP-style response produced by request handling code.
pub trait Response: fmt::Debug + Send + Sync {
    /// HTTP status code.
    fn status(&self) -> u16;

    fn body(&self) -> Option<&Value> {
        None
    }

    /// `true` only for the stand-in produced when no response slot is registered.
    fn is_placeholder(&self) -> bool {
        false
    }
}

/// Field-level validation rules: field name to rule names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationMap {
    rules: BTreeMap<String, Vec<String>>,
}

impl ValidationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rule` to the rules of `field`.
    pub fn with_rule(mut self, field: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rules.entry(field.into()).or_default().push(rule.into());
        self
    }

    /// Rules for `field`, empty when the field has none.
    pub fn rules_for(&self, field: &str) -> &[String] {
        self.rules.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
