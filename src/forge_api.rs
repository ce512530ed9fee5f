//! Core trait defining forge behavior.
//!
//! This module provides the `ForgeApi` trait with default implementations for slot
//! registration, lookup, invocation, tracing and the convenience accessors that apply each
//! slot's fallback policy.
//!
//! Each slot holds at most one callable. Setting a slot again replaces the previous callable;
//! there is no way to unset a slot.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use crate::contract::{Action, Fields, Response, ValidationMap, Validator};
use crate::placeholder::{EmptyResponse, PassthroughValidator};
use crate::{ForgeError, ForgeEvent, Result, Slot, SlotHandler};

/// Callback receiving every `ForgeEvent` a forge emits.
pub type TraceCallback = dyn Fn(&ForgeEvent) + Send + Sync + 'static;

/// Slot storage shared by every `ForgeApi` implementor.
pub type SlotStorage = Mutex<HashMap<Slot, SlotHandler>>;

/// Trace callback storage shared by every `ForgeApi` implementor.
pub type TraceStorage = Mutex<Option<Arc<TraceCallback>>>;

/// Core trait defining forge behavior.
///
/// Provides default implementations for all operations, requiring only two accessor methods
/// (`storage` and `trace`) to be implemented by the implementor.
pub trait ForgeApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback storage.
    fn trace(&self) -> &TraceStorage;

    /// Set a tracing callback for forge operations.
    ///
    /// The callback is invoked for every set, lookup, existence check and fallback. It runs
    /// after the storage lock is released, so it may call back into the same forge.
    fn set_trace_callback(&self, callback: impl Fn(&ForgeEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Registered slots are not affected.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit an event to the current callback, if any.
    ///
    /// A panicking callback propagates to the caller.
    fn emit_event(&self, event: &ForgeEvent) {
        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            callback(event);
        }
    }

    /// Record that an accessor found `from` unset and took its alternate path.
    fn emit_fallback(&self, from: Slot, to: Option<Slot>) {
        match to {
            Some(to) => tracing::debug!(slot = %from, fallback = %to, "slot unset, falling back"),
            None => tracing::debug!(slot = %from, "slot unset, using default"),
        }
        self.emit_event(&ForgeEvent::Fallback { from, to });
    }

    // -------------------------------------------------------------------------------------------------
    // Slots
    // -------------------------------------------------------------------------------------------------

    /// Access the slot storage.
    fn storage(&self) -> &SlotStorage;

    /// Store `handler` under its own slot, replacing any previous callable.
    fn set(&self, handler: SlotHandler) {
        let slot = handler.slot();
        tracing::debug!(slot = %slot, "registering closure");
        self.emit_event(&ForgeEvent::Set { slot });

        self.storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(slot, handler);
    }

    /// Look up a slot without failing.
    fn try_get(&self, slot: Slot) -> Option<SlotHandler> {
        let handler = self
            .storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&slot)
            .cloned();

        if handler.is_none() {
            tracing::trace!(slot = %slot, "slot lookup missed");
        }
        self.emit_event(&ForgeEvent::Get {
            slot,
            found: handler.is_some(),
        });

        handler
    }

    /// Look up a slot.
    ///
    /// # Errors
    ///
    /// `SlotNotFound` if the slot is unset and `require` is true. With `require` false an unset
    /// slot yields `Ok(None)`.
    fn get(&self, slot: Slot, require: bool) -> Result<Option<SlotHandler>> {
        match self.try_get(slot) {
            None if require => Err(ForgeError::SlotNotFound { slot }),
            handler => Ok(handler),
        }
    }

    /// Check whether a slot has a callable.
    fn contains(&self, slot: Slot) -> bool {
        let found = self
            .storage()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(&slot);

        self.emit_event(&ForgeEvent::Contains { slot, found });

        found
    }

    /// Registered slots, in `Slot::ALL` order.
    fn registered_slots(&self) -> Vec<Slot> {
        let storage = self.storage().lock().unwrap_or_else(|p| p.into_inner());
        Slot::ALL
            .into_iter()
            .filter(|slot| storage.contains_key(slot))
            .collect()
    }

    /// Resolve a slot and hand its callable to `call`.
    ///
    /// Returns `Ok(None)` without calling anything when the slot is unset and `require` is
    /// false. Errors from `call` propagate unchanged.
    fn invoke<R>(
        &self,
        slot: Slot,
        require: bool,
        call: impl FnOnce(SlotHandler) -> Result<R>,
    ) -> Result<Option<R>> {
        match self.get(slot, require)? {
            Some(handler) => call(handler).map(Some),
            None => Ok(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    fn set_validator_closure<V, F>(&self, f: F)
    where
        V: Validator + 'static,
        F: Fn() -> anyhow::Result<V> + Send + Sync + 'static,
    {
        self.set(SlotHandler::validate(f));
    }

    fn set_validation_map_closure(
        &self,
        f: impl Fn() -> anyhow::Result<ValidationMap> + Send + Sync + 'static,
    ) {
        self.set(SlotHandler::validation_map(f));
    }

    fn set_log_closure(&self, f: impl Fn(&(dyn StdError + 'static)) + Send + Sync + 'static) {
        self.set(SlotHandler::log(f));
    }

    fn set_request_closure(
        &self,
        f: impl Fn(Option<&[&str]>) -> anyhow::Result<Fields> + Send + Sync + 'static,
    ) {
        self.set(SlotHandler::request(f));
    }

    fn set_response_closure<R, F>(&self, f: F)
    where
        R: Response + 'static,
        F: Fn() -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.set(SlotHandler::response(f));
    }

    fn set_success_closure<R, F>(&self, f: F)
    where
        R: Response + 'static,
        F: Fn(&str, &Action) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.set(SlotHandler::success(f));
    }

    fn set_error_closure<R, F>(&self, f: F)
    where
        R: Response + 'static,
        F: Fn(&str, &Action) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.set(SlotHandler::error(f));
    }

    // -------------------------------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------------------------------

    /// The registered validator, or a `PassthroughValidator` when `validate` is unset.
    fn validator(&self) -> Result<Box<dyn Validator>> {
        let validator = self.invoke(Slot::Validate, false, |handler| {
            let build = handler.into_validate()?;
            Ok(build()?)
        })?;

        match validator {
            Some(validator) => Ok(validator),
            None => {
                self.emit_fallback(Slot::Validate, None);
                Ok(Box::new(PassthroughValidator))
            }
        }
    }

    /// The registered validation rules; `None` when `validation_map` is unset.
    fn validation_map(&self) -> Result<Option<ValidationMap>> {
        self.invoke(Slot::ValidationMap, false, |handler| {
            let build = handler.into_validation_map()?;
            Ok(build()?)
        })
    }

    /// Request fields, optionally restricted to `fields`. Empty when `request` is unset.
    fn request_data(&self, fields: Option<&[&str]>) -> Result<Fields> {
        let data = self.invoke(Slot::Request, false, |handler| {
            let extract = handler.into_request()?;
            Ok(extract(fields)?)
        })?;

        match data {
            Some(data) => Ok(data),
            None => {
                self.emit_fallback(Slot::Request, None);
                Ok(Fields::new())
            }
        }
    }

    /// The registered response, or an `EmptyResponse` when `response` is unset.
    fn response(&self) -> Result<Box<dyn Response>> {
        match build_response(self, false)? {
            Some(response) => Ok(response),
            None => {
                self.emit_fallback(Slot::Response, None);
                Ok(Box::new(EmptyResponse))
            }
        }
    }

    /// Response for a successful action.
    ///
    /// Calls the `success` slot with `(message, action)`. When it is unset, calls the
    /// `response` slot with no arguments instead.
    ///
    /// # Errors
    ///
    /// `SlotNotFound` for `response` when neither slot is set. Errors raised by the
    /// registered callable propagate unchanged.
    fn success(&self, message: &str, action: &Action) -> Result<Box<dyn Response>> {
        respond(self, Slot::Success, message, action)
    }

    /// Response for a failed action. Same fallback as [`ForgeApi::success`], through the
    /// `error` slot.
    fn error(&self, message: &str, action: &Action) -> Result<Box<dyn Response>> {
        respond(self, Slot::Error, message, action)
    }

    /// Hand `err` to the `log` slot. Does nothing when it is unset.
    fn log_throwable(&self, err: &(dyn StdError + 'static)) {
        let logged = self.invoke(Slot::Log, false, |handler| {
            let log = handler.into_log()?;
            log(err);
            Ok(())
        });

        match logged {
            Ok(Some(())) => {}
            Ok(None) => {
                tracing::debug!(error = %err, "no log closure registered, error dropped");
                self.emit_fallback(Slot::Log, None);
            }
            Err(lookup) => {
                tracing::warn!(error = %err, %lookup, "could not hand error to log closure")
            }
        }
    }
}

fn build_response<A: ForgeApi + ?Sized>(
    api: &A,
    require: bool,
) -> Result<Option<Box<dyn Response>>> {
    api.invoke(Slot::Response, require, |handler| {
        let build = handler.into_response()?;
        Ok(build()?)
    })
}

/// `success`/`error`: dedicated slot first, then the bare `response` slot.
fn respond<A: ForgeApi + ?Sized>(
    api: &A,
    slot: Slot,
    message: &str,
    action: &Action,
) -> Result<Box<dyn Response>> {
    let response = api.invoke(slot, false, |handler| {
        let outcome = handler.into_outcome(slot)?;
        Ok(outcome(message, action)?)
    })?;

    if let Some(response) = response {
        return Ok(response);
    }

    api.emit_fallback(slot, Some(Slot::Response));
    build_response(api, true)?.ok_or(ForgeError::SlotNotFound {
        slot: Slot::Response,
    })
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{ForgeApi, SlotStorage, TraceStorage};
    use crate::contract::{Fields, Response};
    use crate::{ForgeError, ForgeEvent, Slot, SlotHandler};

    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Api {
        storage: SlotStorage,
        trace: TraceStorage,
    }

    impl ForgeApi for Api {
        fn storage(&self) -> &SlotStorage {
            &self.storage
        }

        fn trace(&self) -> &TraceStorage {
            &self.trace
        }
    }

    #[derive(Debug)]
    struct Page(u16, Value);

    impl Response for Page {
        fn status(&self) -> u16 {
            self.0
        }

        fn body(&self) -> Option<&Value> {
            Some(&self.1)
        }
    }

    fn record_events(api: &Api) -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        api.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });
        events
    }

    #[test]
    fn test_get_unset_slot() {
        let api = Api::default();

        for slot in Slot::ALL {
            let err = api.get(slot, true).unwrap_err();
            assert!(matches!(err, ForgeError::SlotNotFound { slot: s } if s == slot));
            assert!(api.get(slot, false).unwrap().is_none());
        }
    }

    #[test]
    fn test_last_write_wins() {
        let api = Api::default();

        api.set(SlotHandler::response(|| Ok(Page(200, json!("first")))));
        api.set(SlotHandler::response(|| Ok(Page(201, json!("second")))));

        let response = api.response().unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.body(), Some(&json!("second")));
    }

    #[test]
    fn test_contains_and_registered_slots() {
        let api = Api::default();
        assert!(!api.contains(Slot::Log));
        assert!(api.registered_slots().is_empty());

        api.set_log_closure(|_err| {});
        api.set_validation_map_closure(|| Ok(Default::default()));

        assert!(api.contains(Slot::Log));
        assert_eq!(
            api.registered_slots(),
            vec![Slot::ValidationMap, Slot::Log]
        );
    }

    #[test]
    fn test_invoke_skips_unset_slot() {
        let api = Api::default();
        let mut called = false;

        let result = api
            .invoke(Slot::Request, false, |_handler| {
                called = true;
                Ok(())
            })
            .unwrap();

        assert!(result.is_none());
        assert!(!called);
    }

    #[test]
    fn test_invoke_required_unset_slot() {
        let api = Api::default();
        let err = api
            .invoke(Slot::TransactionCommit, true, |_handler| Ok(()))
            .unwrap_err();
        assert!(err.is_slot_not_found());
    }

    #[test]
    fn test_callable_can_reenter_forge() {
        let api = Arc::new(Api::default());
        api.set_response_closure(|| Ok(Page(200, json!("inner"))));

        let inner = Arc::downgrade(&api);
        api.set_success_closure(move |_msg, _action| {
            let api = inner.upgrade().ok_or_else(|| anyhow::anyhow!("forge dropped"))?;
            let response = api.response()?;
            Ok(Page(response.status(), json!("wrapped")))
        });

        let response = api.success("done", &Value::Null).unwrap();
        assert_eq!(response.body(), Some(&json!("wrapped")));
    }

    #[test]
    fn test_success_falls_back_to_response() {
        let api = Api::default();
        api.set_response_closure(|| Ok(Page(200, json!("plain"))));

        let response = api.success("ignored", &json!({ "id": 1 })).unwrap();
        assert_eq!(response.body(), Some(&json!("plain")));
    }

    #[test]
    fn test_error_without_any_slot() {
        let api = Api::default();
        let err = api.error("fail", &Value::Null).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::SlotNotFound {
                slot: Slot::Response
            }
        ));
    }

    #[test]
    fn test_request_data_defaults_to_empty() {
        let api = Api::default();
        assert_eq!(api.request_data(None).unwrap(), Fields::new());
    }

    #[test]
    fn test_trace_events_for_fallback() {
        let api = Api::default();
        let events = record_events(&api);

        api.set_response_closure(|| Ok(Page(200, Value::Null)));
        let _ = api.error("fail", &Value::Null);

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "set { slot: response }",
                "get { slot: error, found: false }",
                "fallback { from: error, to: response }",
                "get { slot: response, found: true }",
            ]
        );
    }

    #[test]
    fn test_trace_events_for_defaults() {
        let api = Api::default();
        let events = record_events(&api);

        let _ = api.validator();
        let _ = api.contains(Slot::Validate);

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "get { slot: validate, found: false }",
                "fallback { from: validate, to: default }",
                "contains { slot: validate, found: false }",
            ]
        );
    }

    #[test]
    fn test_clear_trace_callback_stops_events() {
        let api = Api::default();
        let events = record_events(&api);

        api.set_log_closure(|_err| {});
        api.clear_trace_callback();
        api.set_log_closure(|_err| {});
        let _ = api.get(Slot::Log, false);

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_event_struct_forwarded() {
        let api = Api::default();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        api.set_trace_callback(move |e| events_clone.lock().unwrap().push(e.clone()));

        api.set_request_closure(|_fields| Ok(Fields::new()));

        assert_eq!(
            *events.lock().unwrap(),
            vec![ForgeEvent::Set {
                slot: Slot::Request
            }]
        );
    }
}
