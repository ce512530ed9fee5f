//! Trait contracts example for anvil-forge.
//!
//! Demonstrates the **contract-based** side of the forge:
//! - `Validator` and `Response` are contracts the application implements
//! - Consumer code only sees `Box<dyn Validator>` / `Box<dyn Response>`
//! - Implementations are swapped by registering a new closure
//! - Placeholders stand in until anything is registered
//!
//! Run with: `cargo run --example trait_contracts`

use anvil_forge::{Factory, FieldErrors, Fields, ForgeApi, Response, Validator};
use serde_json::{json, Value};

// =============================================================================
// Concrete Implementations
// =============================================================================

/// Rejects any field whose string value is longer than `max`.
struct MaxLength {
    max: usize,
}

impl Validator for MaxLength {
    fn validate(&self, input: &Fields) -> Result<(), FieldErrors> {
        let errors: FieldErrors = input
            .iter()
            .filter(|(_, value)| value.as_str().is_some_and(|s| s.len() > self.max))
            .map(|(key, _)| (key.clone(), vec![format!("max:{}", self.max)]))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug)]
struct JsonPage(Value);

impl Response for JsonPage {
    fn status(&self) -> u16 {
        200
    }

    fn body(&self) -> Option<&Value> {
        Some(&self.0)
    }
}

#[derive(Debug)]
struct Redirect(&'static str);

impl Response for Redirect {
    fn status(&self) -> u16 {
        302
    }

    fn body(&self) -> Option<&Value> {
        None
    }
}

impl Redirect {
    fn location(&self) -> &str {
        self.0
    }
}

// =============================================================================
// Application Code (Uses Contracts, Not Implementations)
// =============================================================================

fn render(factory: &Factory, input: &Fields) {
    let validator = factory.validator().unwrap();
    let response = factory.response().unwrap();

    match validator.validate(input) {
        Ok(()) => println!("   input accepted"),
        Err(errors) => println!("   input rejected: {:?}", errors),
    }
    println!(
        "   response: status {} placeholder={} body={:?}",
        response.status(),
        response.is_placeholder(),
        response.body()
    );
}

fn main() {
    println!("=== anvil-forge: Trait Contracts ===\n");

    let input = json!({ "title": "A title that is rather long", "slug": "short" })
        .as_object()
        .cloned()
        .unwrap_or_default();
    let factory = Factory::new();

    // -------------------------------------------------------------------------
    // 1. Placeholders
    // -------------------------------------------------------------------------
    println!("1. Nothing registered...");

    render(&factory, &input);

    // -------------------------------------------------------------------------
    // 2. Register implementations
    // -------------------------------------------------------------------------
    println!("\n2. Registering MaxLength(10) and JsonPage...");

    factory.set_validator_closure(|| Ok(MaxLength { max: 10 }));
    factory.set_response_closure(|| Ok(JsonPage(json!({ "page": "posts" }))));

    render(&factory, &input);

    // -------------------------------------------------------------------------
    // 3. Swap implementations
    // -------------------------------------------------------------------------
    println!("\n3. Swapping to MaxLength(64) and Redirect...");

    factory.set_validator_closure(|| Ok(MaxLength { max: 64 }));
    factory.set_response_closure(|| {
        let redirect = Redirect("/posts");
        println!("   redirecting to {}", redirect.location());
        Ok(redirect)
    });

    render(&factory, &input);

    println!("\n=== Example Complete ===");
}
