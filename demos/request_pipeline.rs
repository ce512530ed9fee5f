//! Request pipeline example for anvil-forge.
//!
//! Demonstrates:
//! - Building a `Forge` once at startup and sharing it as `Arc<Forge>`
//! - Validating request data through the registered validator
//! - Wrapping a request in the transaction hooks
//! - Success and error responses, with failures handed to the log slot
//!
//! Run with: `RUST_LOG=debug cargo run --example request_pipeline`

use anvil_forge::{
    Action, FieldErrors, Fields, Forge, ForgeApi, Response, ValidationMap, Validator,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Application collaborators
// =============================================================================

#[derive(Debug)]
struct JsonReply {
    status: u16,
    body: Value,
}

impl Response for JsonReply {
    fn status(&self) -> u16 {
        self.status
    }

    fn body(&self) -> Option<&Value> {
        Some(&self.body)
    }
}

/// Checks that every field named in the map is present and non-empty.
struct RequiredFields(ValidationMap);

impl Validator for RequiredFields {
    fn validate(&self, input: &Fields) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in self.0.fields() {
            let present = match input.get(field) {
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !present {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push("required".to_string());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn rules(&self) -> ValidationMap {
        self.0.clone()
    }
}

#[derive(Debug)]
struct Invalid(FieldErrors);

impl std::fmt::Display for Invalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid fields: {:?}", self.0.keys().collect::<Vec<_>>())
    }
}

impl std::error::Error for Invalid {}

// =============================================================================
// Composition root
// =============================================================================

fn bootstrap(request: Fields) -> Arc<Forge> {
    let forge = Forge::new();
    let next_tx = Arc::new(AtomicU32::new(1));

    forge.set_validation_map_closure(|| Ok(ValidationMap::new().with_rule("title", "required")));
    forge.set_request_closure(move |_filter| Ok(request.clone()));

    forge.set_transaction_start_closure(move || {
        let id = next_tx.fetch_add(1, Ordering::SeqCst);
        println!("   [db] BEGIN tx-{}", id);
        Ok(format!("tx-{}", id))
    });
    forge.set_transaction_commit_closure(|| {
        println!("   [db] COMMIT");
        Ok(())
    });
    forge.set_transaction_rollback_closure(|| {
        println!("   [db] ROLLBACK");
        Ok(())
    });

    forge.set_log_closure(|err| println!("   [log] {}", err));
    forge.set_success_closure(|message, action| {
        Ok(JsonReply {
            status: 200,
            body: json!({ "message": message, "action": action }),
        })
    });
    forge.set_error_closure(|message, _action| {
        Ok(JsonReply {
            status: 422,
            body: json!({ "error": message }),
        })
    });

    let forge = Arc::new(forge);

    // The validator reads the rules from the same forge
    let rules_source = Arc::downgrade(&forge);
    forge.set_validator_closure(move || {
        let forge = rules_source
            .upgrade()
            .ok_or_else(|| anyhow::anyhow!("forge is gone"))?;
        let rules = forge.validation_map()?.unwrap_or_default();
        Ok(RequiredFields(rules))
    });

    forge
}

// =============================================================================
// Request handling (only sees the forge)
// =============================================================================

fn create_post(forge: &Forge, action: &Action) -> anvil_forge::Result<Box<dyn Response>> {
    let input = forge.request_data(Some(&["title", "body"][..]))?;
    let validator = forge.validator()?;

    let token = forge.start_transaction()?;
    match validator.validate(&input) {
        Ok(()) => {
            forge.commit_transaction()?;
            println!("   stored post in {}", token);
            forge.success("post created", action)
        }
        Err(errors) => {
            forge.rollback_transaction()?;
            forge.log_throwable(&Invalid(errors));
            forge.error("post rejected", action)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== anvil-forge: Request Pipeline ===\n");
    let action = json!({ "name": "create_post" });

    // -------------------------------------------------------------------------
    // 1. Valid request
    // -------------------------------------------------------------------------
    println!("1. Valid request...");

    let request = json!({ "title": "Hello", "body": "First post" });
    let forge = bootstrap(request.as_object().cloned().unwrap_or_default());
    match create_post(&forge, &action) {
        Ok(response) => println!("   -> {} {:?}\n", response.status(), response.body()),
        Err(e) => println!("   -> failed: {}\n", e),
    }

    // -------------------------------------------------------------------------
    // 2. Invalid request
    // -------------------------------------------------------------------------
    println!("2. Request without a title...");

    let request = json!({ "title": "", "body": "No title" });
    let forge = bootstrap(request.as_object().cloned().unwrap_or_default());
    match create_post(&forge, &action) {
        Ok(response) => println!("   -> {} {:?}\n", response.status(), response.body()),
        Err(e) => println!("   -> failed: {}\n", e),
    }

    // -------------------------------------------------------------------------
    // 3. Unwired forge
    // -------------------------------------------------------------------------
    println!("3. Forge without transaction hooks...");

    let forge = Forge::new();
    match create_post(&forge, &action) {
        Ok(response) => println!("   -> {} {:?}", response.status(), response.body()),
        Err(e) => println!("   -> failed (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
}
