//! Integration tests for the transaction boundary hooks.

use anvil_forge::{Forge, ForgeApi, ForgeError, Response, Slot};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[test]
fn test_start_transaction_uses_latest_registration() {
    let forge = Forge::new();

    forge.set_transaction_start_closure(|| Ok("T1"));
    assert_eq!(forge.start_transaction().unwrap(), "T1");

    forge.set_transaction_start_closure(|| Ok("T2"));
    assert_eq!(forge.start_transaction().unwrap(), "T2");
}

#[test]
fn test_hooks_must_be_wired() {
    let forge = Forge::new();

    // Other slots being set makes no difference
    forge.set_response_closure(|| Ok(anvil_forge::EmptyResponse));

    for (result, slot) in [
        (forge.start_transaction().map(|_| ()), Slot::TransactionStart),
        (forge.commit_transaction(), Slot::TransactionCommit),
        (forge.rollback_transaction(), Slot::TransactionRollback),
    ] {
        match result {
            Err(ForgeError::SlotNotFound { slot: missing }) => assert_eq!(missing, slot),
            other => panic!("expected SlotNotFound for {slot}, got {other:?}"),
        }
    }
}

#[test]
fn test_start_error_propagates() {
    let forge = Forge::new();
    forge.set_transaction_start_closure(|| -> anyhow::Result<String> {
        Err(anyhow::anyhow!("pool exhausted"))
    });

    let err = forge.start_transaction().unwrap_err();
    assert!(!err.is_slot_not_found());
    assert_eq!(err.to_string(), "pool exhausted");
}

// ============================================================================
// A request handled inside a transaction
// ============================================================================

#[derive(Debug)]
struct Reply(u16, Value);

impl Response for Reply {
    fn status(&self) -> u16 {
        self.0
    }

    fn body(&self) -> Option<&Value> {
        Some(&self.1)
    }
}

fn wire(forge: &Forge, journal: &Arc<Mutex<Vec<String>>>) {
    let j = journal.clone();
    forge.set_transaction_start_closure(move || {
        j.lock().unwrap().push("begin".to_string());
        Ok("tx-1")
    });
    let j = journal.clone();
    forge.set_transaction_commit_closure(move || {
        j.lock().unwrap().push("commit".to_string());
        Ok(())
    });
    let j = journal.clone();
    forge.set_transaction_rollback_closure(move || {
        j.lock().unwrap().push("rollback".to_string());
        Ok(())
    });
    let j = journal.clone();
    forge.set_log_closure(move |err| {
        j.lock().unwrap().push(format!("log: {err}"));
    });
    forge.set_success_closure(|message, action| {
        Ok(Reply(200, json!({ "ok": message, "action": action })))
    });
    forge.set_error_closure(|message, _action| Ok(Reply(500, json!({ "error": message }))));
}

fn handle(forge: &Forge, action: &Value, fail: bool) -> anvil_forge::Result<Box<dyn Response>> {
    let token = forge.start_transaction()?;

    let outcome: anyhow::Result<()> = if fail {
        Err(anyhow::anyhow!("constraint violated in {token}"))
    } else {
        Ok(())
    };

    match outcome {
        Ok(()) => {
            forge.commit_transaction()?;
            forge.success("saved", action)
        }
        Err(err) => {
            forge.rollback_transaction()?;
            forge.log_throwable(&*err);
            forge.error("not saved", action)
        }
    }
}

#[test]
fn test_request_commits_on_success() {
    let forge = Forge::new();
    let journal = Arc::new(Mutex::new(Vec::new()));
    wire(&forge, &journal);

    let response = handle(&forge, &json!({ "name": "publish" }), false).unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(*journal.lock().unwrap(), vec!["begin", "commit"]);
}

#[test]
fn test_request_rolls_back_on_failure() {
    let forge = Forge::new();
    let journal = Arc::new(Mutex::new(Vec::new()));
    wire(&forge, &journal);

    let response = handle(&forge, &json!({ "name": "publish" }), true).unwrap();

    assert_eq!(response.status(), 500);
    assert_eq!(response.body(), Some(&json!({ "error": "not saved" })));
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["begin", "rollback", "log: constraint violated in tx-1"]
    );
}
