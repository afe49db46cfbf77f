//! Basic logger usage example
//!
//! Demonstrates the verbosity gate, the debug selector and whitelist capture.
//!
//! Run with: cargo run --example basic_usage
//! Try:      NODE_DEBUG=demo cargo run --example basic_usage

use debug_logtron::prelude::*;
use serde_json::json;
use std::panic::{catch_unwind, AssertUnwindSafe};

fn main() -> Result<()> {
    println!("=== Debug Logtron - Basic Usage Example ===\n");

    // Reads NODE_DEBUG and TRACE from the process environment
    let logger = Logger::new("demo")?;
    println!("Resolved gate: {:?}\n", logger.gate());

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message", None);
    logger.debug("This is a debug message", None);
    logger.access("GET /health 200", None);
    logger.info("This is an info message", None);
    logger.warn("This is a warning message", None);

    println!("\n2. Logging with metadata:");
    let meta = json!({ "user": "alice", "attempt": 3 });
    logger.info("Login succeeded", meta.as_object().cloned());
    if let Err(e) = logger.log_value(LogLevel::Info, "Rejected", json!("not an object")) {
        println!("   log_value refused: {}", e);
    }

    println!("\n3. Errors fail fast:");
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        logger.error("Database unreachable", None);
    }));
    println!("   error() panicked: {}", outcome.is_err());

    println!("\n4. Expected errors can be whitelisted:");
    logger.whitelist(LogLevel::Error, "Retrying request");
    logger.error("Retrying request", None);
    logger.error("Retrying request", None);
    let captured = logger.pop_logs("Retrying request");
    println!("   Captured {} records without writing them", captured.len());
    for record in captured {
        println!("   {}", String::from_utf8_lossy(record.to_bytes()?));
    }

    println!("\n5. Forcing verbosity from code:");
    let verbose = Logger::builder("verbosedemo")
        .verbose(true)
        .colors(false)
        .build()?;
    verbose.debug("Visible because verbose is set", None);

    let metrics = logger.metrics();
    println!(
        "\nMetrics: logged={} captured={} dropped={}",
        metrics.total_logged(),
        metrics.captured_count(),
        metrics.dropped_count()
    );

    println!("\n=== Example completed successfully ===");
    Ok(())
}
