//! Async sink example
//!
//! Demonstrates back-pressured submission from several threads into one
//! file, followed by a draining shutdown.
//!
//! Run with: cargo run --example async_sink

use blocking_log_sink::prelude::*;
use blocking_log_sink::submit;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Blocking Log Sink - Async Sink Example ===\n");

    // Small queue so producers feel back-pressure
    let sink = AsyncSink::builder()
        .path("async_sink.log")
        .capacity(10)
        .timestamp(TimestampFormat::Iso8601)
        .build()?;

    println!("1. Single-threaded submission:");
    for i in 0..100 {
        sink.submit("Message #{}", [i]);
    }
    println!("   Submitted 100 lines");

    println!("\n2. Multi-threaded submission:");
    let sink = Arc::new(sink);
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..20 {
                    submit!(sink, "Thread {} - Message {}", thread_id, i);
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("   a producer thread panicked");
        }
    }
    println!("   5 threads submitted 20 lines each");

    println!("\n3. Rendering without submitting:");
    println!("   {}", render("a {} b {} c", ["X"]));

    sink.shutdown();

    let metrics = sink.metrics();
    println!("\n=== Example completed successfully! ===");
    println!(
        "admitted={} written={} waited_for_room={}",
        metrics.admitted(),
        metrics.written(),
        metrics.queue_full_events()
    );
    println!("Check 'async_sink.log' for file output");

    Ok(())
}
