//! File logging example
//!
//! Demonstrates writing wire records as JSON lines next to console output.
//!
//! Run with: cargo run --example file_logging

use debug_logtron::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Debug Logtron - File Logging Example ===\n");

    let path = "logtron_demo.jsonl";

    let logger = Logger::builder("files")
        .verbose(true)
        .identity(Identity {
            name: Some("file-demo".to_string()),
            component: Some("writer".to_string()),
            src: None,
        })
        .sink(ConsoleSink::new())
        .sink(JsonSink::open(path)?)
        .build()?;

    logger.info("Application started", None);
    logger.debug("Loaded configuration", json!({ "workers": 4 }).as_object().cloned());
    logger.warn("Cache is cold", None);
    logger.flush()?;

    println!("\nContents of {}:", path);
    for line in std::fs::read_to_string(path)?.lines() {
        println!("  {}", line);
    }

    std::fs::remove_file(path)?;

    println!("\n=== Example completed successfully ===");
    Ok(())
}
