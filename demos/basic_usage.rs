//! Basic usage example for anvil-forge.
//!
//! Demonstrates:
//! - Registering closures on a `Factory`
//! - Looking slots up with `get()` and `contains()`
//! - What each accessor returns when its slot is unset
//!
//! Run with: `RUST_LOG=anvil_forge=debug cargo run --example basic_usage`

use anvil_forge::{Factory, Fields, ForgeApi, Response, Slot, SlotHandler, ValidationMap};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Html(Value);

impl Response for Html {
    fn status(&self) -> u16 {
        200
    }

    fn body(&self) -> Option<&Value> {
        Some(&self.0)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== anvil-forge: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Accessors on an empty factory
    // -------------------------------------------------------------------------
    println!("1. Accessors with nothing registered...");

    let factory = Factory::new();

    let validator = factory.validator().unwrap();
    println!(
        "   validator() accepts anything: {}",
        validator.validate(&Fields::new()).is_ok()
    );
    println!("   validation_map()  = {:?}", factory.validation_map().unwrap());
    println!("   request_data()    = {:?}", factory.request_data(None).unwrap());
    println!(
        "   response()        = placeholder: {}",
        factory.response().unwrap().is_placeholder()
    );
    match factory.success("saved", &Value::Null) {
        Ok(response) => println!("   success()         = {:?}", response),
        Err(e) => println!("   success()         = error (expected): {}", e),
    }

    // -------------------------------------------------------------------------
    // 2. Register closures
    // -------------------------------------------------------------------------
    println!("\n2. Registering closures...");

    let factory = factory
        .with(SlotHandler::response(|| Ok(Html(json!("<p>ok</p>")))))
        .with(SlotHandler::validation_map(|| {
            Ok(ValidationMap::new()
                .with_rule("email", "required")
                .with_rule("email", "email"))
        }))
        .with(SlotHandler::request(|_fields| {
            Ok(json!({ "email": "dev@example.com" })
                .as_object()
                .cloned()
                .unwrap_or_default())
        }));

    println!("   Registered: {:?}", factory.registered_slots());

    // -------------------------------------------------------------------------
    // 3. Check slots with contains()
    // -------------------------------------------------------------------------
    println!("\n3. Checking slots with contains()...");

    for slot in [Slot::Response, Slot::Success, Slot::Log] {
        println!("   contains({:<8}) = {}", slot.as_str(), factory.contains(slot));
    }

    // -------------------------------------------------------------------------
    // 4. Accessors with slots registered
    // -------------------------------------------------------------------------
    println!("\n4. Accessors with slots registered...");

    println!("   validation_map()  = {:?}", factory.validation_map().unwrap());
    println!("   request_data()    = {:?}", factory.request_data(None).unwrap());
    // No success slot: falls back to the response slot
    println!(
        "   success()         = {:?}",
        factory.success("saved", &Value::Null).unwrap()
    );

    // -------------------------------------------------------------------------
    // 5. Required lookups
    // -------------------------------------------------------------------------
    println!("\n5. Required lookups...");

    match factory.get(Slot::Log, true) {
        Ok(handler) => println!("   Found: {:?}", handler),
        Err(e) => println!("   Error (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
    println!("{:?}", factory);
}
