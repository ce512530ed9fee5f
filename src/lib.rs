//! # Anvil Forge
//!
//! A closure-based slot registry for request-handling glue.
//!
//! Host code registers one callable per slot (validator, response, success and error
//! callbacks, logging, transaction hooks). Consumers go through accessors that apply each
//! slot's fallback policy, so an unset slot yields a placeholder, an empty value, an
//! alternate slot, or a `SlotNotFound` error, depending on the slot.
//!
//! ## Quick Start
//!
//! ```rust
//! use anvil_forge::{ForgeApi, Forge, Slot};
//! use serde_json::json;
//!
//! let forge = Forge::new();
//! forge.set_transaction_start_closure(|| Ok("T1"));
//!
//! assert_eq!(forge.start_transaction().unwrap(), "T1");
//!
//! // Unset slots fall back instead of failing
//! assert!(forge.response().unwrap().is_placeholder());
//! assert!(forge.validator().unwrap().validate(&Default::default()).is_ok());
//!
//! // ...unless there is nothing left to fall back to
//! let err = forge.success("saved", &json!({ "id": 1 })).unwrap_err();
//! assert_eq!(err.slot(), Some(Slot::Response));
//! ```
//!
//! ## Fallback policy
//!
//! | Accessor | Slot unset |
//! |---|---|
//! | [`ForgeApi::validator`] | [`PassthroughValidator`] |
//! | [`ForgeApi::validation_map`] | `None` |
//! | [`ForgeApi::request_data`] | empty [`Fields`] |
//! | [`ForgeApi::response`] | [`EmptyResponse`] |
//! | [`ForgeApi::success`] / [`ForgeApi::error`] | the `response` slot, else `SlotNotFound` |
//! | [`ForgeApi::log_throwable`] | nothing |
//! | [`Forge::start_transaction`] and friends | `SlotNotFound` |

mod contract;
mod factory;
mod forge;
mod forge_api;
mod forge_error;
mod forge_event;
mod handler;
mod placeholder;
mod slot;

pub use contract::{
    Action, FieldErrors, Fields, Response, TransactionToken, ValidationMap, Validator,
};
pub use factory::Factory;
pub use forge::Forge;
pub use forge_api::{ForgeApi, SlotStorage, TraceCallback, TraceStorage};
pub use forge_error::{ForgeError, Result};
pub use forge_event::ForgeEvent;
pub use handler::{
    LogFn, OutcomeFn, RequestFn, ResponseFn, SlotHandler, TransactionEndFn, TransactionStartFn,
    ValidateFn, ValidationMapFn,
};
pub use placeholder::{EmptyResponse, PassthroughValidator};
pub use slot::Slot;
