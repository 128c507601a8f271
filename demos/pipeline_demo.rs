//! Demo: sequences and pipes over mixed stage shapes
//!
//! Run with `RUST_LOG=failable=trace cargo run --example pipeline_demo`
//! to see the per-stage tracing output.

use failable::testing::{assert_failure, assert_success};
use failable::{Failable, FailablePipe, FailableSequence, empty, failure, success};
use serde_json::{Value, json};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ============================================================================
// DEMO STAGES
// ============================================================================

fn require_email(order: Value) -> Failable {
    match order["email"].as_str() {
        Some(email) if email.contains('@') => empty(),
        _ => failure(json!({ "message": "a valid email is required", "field": "email" })),
    }
}

fn require_items(order: Value) -> Failable {
    match order["items"].as_array() {
        Some(items) if !items.is_empty() => empty(),
        _ => failure("order has no items"),
    }
}

fn total(order: Value) -> Failable {
    let sum: f64 = order["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["price"].as_f64()).sum())
        .unwrap_or(0.0);
    success(json!({ "email": order["email"], "total": sum }))
}

async fn apply_discount(invoice: Value) -> Failable {
    // Stand-in for a remote pricing lookup
    tokio::time::sleep(Duration::from_millis(10)).await;
    let total = invoice["total"].as_f64().unwrap_or(0.0);
    success(json!({ "email": invoice["email"], "total": total * 0.9 }))
}

// ============================================================================
// SCENARIOS
// ============================================================================

async fn scenario_1_validation_sequence() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 1: Validation Sequence");
    println!("{}\n", "=".repeat(70));

    let validate = FailableSequence::new()
        .named("validate-order")
        .stage(require_email)
        .stage(require_items);

    let good = json!({ "email": "a@b.c", "items": [{ "price": 10.0 }] });
    let result = validate.run(good).await;
    println!("  valid order:   {}", serde_json::to_string(&result).unwrap_or_default());
    assert_success(&result, Some(&json!("all functions succeeded")));

    let bad = json!({ "email": "nope", "items": [] });
    let result = validate.run(bad).await;
    println!("  invalid order: {}", serde_json::to_string(&result).unwrap_or_default());
    assert_failure(&result, Some("a valid email is required"));

    println!("\n SCENARIO 1 PASSED\n");
}

async fn scenario_2_pricing_pipe() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 2: Pricing Pipe (sync + async stages)");
    println!("{}\n", "=".repeat(70));

    let price = FailablePipe::new()
        .named("price-order")
        .stage(total)
        .stage(apply_discount);

    let order = json!({ "email": "a@b.c", "items": [{ "price": 10.0 }, { "price": 30.0 }] });
    let result = price.run(order).await;
    println!("  invoice: {}", serde_json::to_string(&result).unwrap_or_default());
    assert_success(&result, Some(&json!({ "email": "a@b.c", "total": 36.0 })));

    println!("\n SCENARIO 2 PASSED\n");
}

async fn scenario_3_misbehaving_stages() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 3: Misbehaving Stages");
    println!("{}\n", "=".repeat(70));

    let forgetful = FailablePipe::new().stage(total).stage(|_: Value| 42);
    let result = forgetful.run(json!({})).await;
    println!("  plain value: {}", serde_json::to_string(&result).unwrap_or_default());
    assert_failure(&result, Some("function at index 1 did not return failable"));

    let panicky = FailablePipe::new().stage(|_: Value| -> Failable { panic!("pricing table missing") });
    let result = panicky.run(json!({})).await;
    println!("  panic:       {}", serde_json::to_string(&result).unwrap_or_default());
    assert_failure(&result, Some("function at index 0 threw an exception"));

    println!("\n SCENARIO 3 PASSED\n");
}

// ============================================================================
// MAIN
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    scenario_1_validation_sequence().await;
    scenario_2_pricing_pipe().await;
    scenario_3_misbehaving_stages().await;

    println!("\nALL SCENARIOS PASSED\n");
}
