//! Async logging example
//!
//! Demonstrates background sinks with multi-threaded logging and completion
//! callbacks.
//!
//! Run with: cargo run --example async_logging

use debug_logtron::prelude::*;
use debug_logtron::BackgroundSink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Debug Logtron - Async Logging Example ===\n");

    let lines = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("worker")
            .sink(BackgroundSink::new(ConsoleSink::new()))
            .sink(BackgroundSink::new(lines.clone()))
            .build()?,
    );

    let completed = Arc::new(AtomicUsize::new(0));

    println!("1. Logging from 4 threads:");
    let handles: Vec<_> = (0..4)
        .map(|id| {
            let logger = Arc::clone(&logger);
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                for i in 0..5 {
                    let completed = Arc::clone(&completed);
                    logger.log_with_callback(
                        LogLevel::Info,
                        format!("Thread {} - message {}", id, i),
                        None,
                        move |result| {
                            if result.is_ok() {
                                completed.fetch_add(1, Ordering::SeqCst);
                            }
                        },
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    logger.flush()?;

    println!("\n2. Results:");
    println!("   Lines captured in memory: {}", lines.len());
    println!("   Completions fired: {}", completed.load(Ordering::SeqCst));

    println!("\n=== Example completed successfully ===");
    Ok(())
}
