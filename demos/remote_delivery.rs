//! Remote delivery example
//!
//! Starts a local TCP collector, then sends monitor records and business
//! events through buffered pipelines to it.
//!
//! Run with: cargo run --example remote_delivery

use rust_telemetry_logger::prelude::*;
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Telemetry Logger - Remote Delivery Example ===\n");

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;

    // One connection per pipeline
    let collector = thread::spawn(move || {
        let mut readers = Vec::new();
        for (index, stream) in listener.incoming().take(2).enumerate() {
            let Ok(stream) = stream else { continue };
            readers.push(thread::spawn(move || {
                for line in BufReader::new(stream).lines().map_while(|l| l.ok()) {
                    println!("   [collector #{}] {}", index, line);
                }
            }));
        }
        for reader in readers {
            let _ = reader.join();
        }
    });

    let logger = Logger::builder()
        .config(
            Config::new()
                .logger_name("remote")
                .service_name("orders")
                .remote_enabled(true)
                .monitor_stream(format!("tcp://{}", address))
                .report_stream(format!("tcp://{}", address))
                .buffer_size(16 * 1024)
                .flush_interval(Duration::from_secs(1)),
        )
        .on_flush_error(|err| eprintln!("background flush failed: {}", err))
        .build()?;

    println!("1. Records are buffered, then flushed once per second:");
    for i in 0..5 {
        logger.info("Order processed", &[Field::int64("order", i)]);
    }
    logger.report("Revenue booked", &[Field::float64("amount", 99.5)]);
    thread::sleep(Duration::from_millis(1500));

    println!("\n2. Close drains whatever is still buffered:");
    logger.warn("Shutting down", &[]);
    logger.close()?;

    let _ = collector.join();

    let metrics = logger.metrics();
    println!(
        "\nwritten: {}, discarded: {}, failed: {}",
        metrics.records_written(),
        metrics.records_discarded(),
        metrics.write_failures()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
