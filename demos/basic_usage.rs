//! Basic logger usage example
//!
//! Demonstrates console logging, child contexts and the exit hook.
//!
//! Run with: cargo run --example basic_usage

use rust_telemetry_logger::prelude::*;
use rust_telemetry_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Telemetry Logger - Basic Usage Example ===\n");

    // Development mode renders readable text on stdout
    let root = Logger::builder()
        .config(
            Config::new()
                .logger_name("basic")
                .service_name("demo-service")
                .level("debug")
                .development(true),
        )
        .build()?;

    println!("1. Logging at different levels:");
    root.debug("This is a debug message", &[]);
    root.info("This is an info message", &[Field::int64("attempt", 1)]);
    root.warn("This is a warning message", &[]);
    root.error("This is an error message", &[Field::bool("retryable", false)]);

    println!("\n2. Per-request child context:");
    let mut request = root.new_child(
        Some(
            &FieldOpts::new()
                .correlation_id("req-1234")
                .endpoint("/v1/orders"),
        ),
        [Field::string("tenant", "acme")],
    );
    request.info("Request received", &[]);
    request.with(Some(&FieldOpts::new().user_id("user-42")), [Field::int64("items", 3)]);
    info!(request, "Cart loaded with {} items", 3);

    println!("\n3. The root context is untouched:");
    warn!(root, "Root still has {} accumulated fields", root.fields().len());

    println!("\n4. Fatal with a stubbed exit hook:");
    let stub = root.exit_hook().with_stub(|| root.fatal("Pretending to shut down", &[]));
    println!("   exit hook called: {}", stub.exited());

    root.close()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
