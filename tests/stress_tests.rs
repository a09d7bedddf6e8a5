//! Stress tests for back-pressure and drain correctness
//!
//! These tests verify:
//! - Every accepted line is written exactly once under concurrent load
//! - Per-producer order survives interleaving
//! - Dropping a saturated sink neither deadlocks nor loses lines
//! - The bare queue survives many producers and consumers

use blocking_log_sink::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const PRODUCERS: usize = 8;
const MESSAGES_PER_PRODUCER: usize = 1000;

#[test]
fn test_concurrent_producers_write_every_line_once() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("multithread.log");

    let sink = Arc::new(AsyncSink::open(&log_file).expect("Failed to open sink"));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..MESSAGES_PER_PRODUCER {
                    sink.submit("T{} {}", [t, i]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Producer panicked");
    }
    sink.shutdown();

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), PRODUCERS * MESSAGES_PER_PRODUCER);

    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(unique.len(), lines.len(), "a line was written twice");

    for t in 0..PRODUCERS {
        for i in 0..MESSAGES_PER_PRODUCER {
            assert!(unique.contains(format!("T{} {}", t, i).as_str()));
        }
    }

    assert_eq!(sink.metrics().admitted(), (PRODUCERS * MESSAGES_PER_PRODUCER) as u64);
    assert_eq!(sink.metrics().written(), (PRODUCERS * MESSAGES_PER_PRODUCER) as u64);
}

#[test]
fn test_per_producer_order_in_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("per_producer_order.log");

    let sink = Arc::new(
        AsyncSink::builder()
            .path(&log_file)
            .capacity(4)
            .build()
            .expect("Failed to build sink"),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..500 {
                    sink.submit("{} {}", [t, i]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Producer panicked");
    }
    sink.shutdown();

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let mut next = [0usize; 4];
    for line in content.lines() {
        let (t, i) = line.split_once(' ').expect("two fields");
        let t: usize = t.parse().unwrap();
        let i: usize = i.parse().unwrap();
        assert_eq!(next[t], i, "producer {} out of order", t);
        next[t] += 1;
    }
    assert_eq!(next, [500; 4]);
}

#[test]
fn test_no_deadlock_on_drop() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("deadlock.log");

    let start = Instant::now();
    {
        let sink = AsyncSink::open(&log_file).expect("Failed to open sink");
        for i in 0..5000 {
            sink.submit("Deadlock {}", [i]);
        }
    }
    assert!(start.elapsed() < Duration::from_secs(5));

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 5000);
}

#[test]
fn test_throughput_is_acceptable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("throughput.log");
    const MESSAGES: usize = 100_000;

    let start = Instant::now();
    {
        let sink = AsyncSink::builder()
            .path(&log_file)
            .capacity(1024)
            .build()
            .expect("Failed to build sink");
        for i in 0..MESSAGES {
            sink.submit("Throughput {}", [i]);
        }
    }
    let elapsed = start.elapsed();

    let per_sec = MESSAGES as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    assert!(per_sec > 500.0, "throughput was {:.0} lines/s", per_sec);

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), MESSAGES);
}

#[test]
fn test_shutdown_while_producers_active() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("racing_shutdown.log");

    let sink = Arc::new(
        AsyncSink::builder()
            .path(&log_file)
            .capacity(2)
            .build()
            .expect("Failed to build sink"),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..10_000 {
                    sink.submit("{} {}", [t, i]);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    sink.shutdown();

    // Every producer must be released, whether admitted or rejected
    for handle in handles {
        handle.join().expect("Producer panicked");
    }

    let metrics = sink.metrics();
    assert_eq!(
        metrics.admitted() + metrics.rejected_after_shutdown(),
        40_000,
        "every submission is either admitted or rejected"
    );

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count() as u64, metrics.admitted());
}

#[test]
fn test_queue_many_producers_many_consumers() {
    const N: usize = 200_000;
    const THREADS: usize = 8;

    let queue = Arc::new(BoundedQueue::new(64).expect("valid capacity"));
    let consumed = Arc::new(AtomicUsize::new(0));
    let seen: Arc<Vec<AtomicUsize>> = Arc::new((0..N).map(|_| AtomicUsize::new(0)).collect());

    let producers: Vec<_> = (0..THREADS)
        .map(|t| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let chunk = N / THREADS;
                let begin = t * chunk;
                let end = if t == THREADS - 1 { N } else { begin + chunk };
                for i in begin..end {
                    assert!(queue.enqueue(i));
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..THREADS)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let consumed = Arc::clone(&consumed);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                while let Some(i) = queue.dequeue() {
                    seen[i].fetch_add(1, Ordering::Relaxed);
                    consumed.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let start = Instant::now();
    for producer in producers {
        producer.join().expect("Producer panicked");
    }
    queue.shutdown();
    for consumer in consumers {
        consumer.join().expect("Consumer panicked");
    }
    assert!(start.elapsed() < Duration::from_secs(10));

    assert_eq!(consumed.load(Ordering::Relaxed), N);
    assert!(seen.iter().all(|count| count.load(Ordering::Relaxed) == 1));
}
