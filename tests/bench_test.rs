//! Benchmark tests for visit ingestion and analytics reads
//!
//! Run with: cargo test --release bench -- --ignored --nocapture

mod common;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{Extensions, HeaderMap, HeaderValue},
};

use common::setup_state;
use portfolio::database::OfflineStore;
use portfolio::fallback::FallbackBuffer;
use portfolio::geo::GeoLocator;
use portfolio::handler::{get_analytics, record_visit};
use portfolio::recorder::VisitRecorder;

/// Benchmark helper to measure execution time
fn benchmark<F>(name: &str, iterations: usize, mut f: F)
where
    F: FnMut(),
{
    let start = Instant::now();

    for _ in 0..iterations {
        f();
    }

    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

#[test]
#[ignore]
fn bench_record_visits() {
    println!("\n=== Benchmark: Record Visits ===\n");

    let test = setup_state();
    let recorder = test.state.recorder.clone();
    benchmark("Durable store", 1000, || {
        recorder.record_visit("192.0.2.10", Some("bench"), Some("bench"));
    });

    let offline = VisitRecorder::new(
        Arc::new(OfflineStore),
        GeoLocator::disabled(),
        FallbackBuffer::default(),
    );
    benchmark("Fallback buffer (overflowing)", 10_000, || {
        offline.record_visit("192.0.2.10", Some("bench"), Some("bench"));
    });
}

#[test]
#[ignore]
fn bench_analytics_reads() {
    println!("\n=== Benchmark: Analytics ===\n");

    let test = setup_state();
    println!("  Preparing: recording 10000 visits...");
    for i in 0..10_000 {
        test.state
            .recorder
            .record_visit(&format!("198.51.100.{}", i % 256), None, None);
    }
    println!("  Done!\n");

    benchmark("Durable summary", 1000, || {
        test.state.recorder.analytics();
    });

    test.store.set_failing(true);
    benchmark("Fallback summary", 1000, || {
        test.state.recorder.analytics();
    });
}

#[tokio::test]
#[ignore]
async fn bench_concurrent_visit_handlers() {
    println!("\n=== Benchmark: Concurrent Visit Handlers ===\n");

    let test = setup_state();
    let num_tasks = 100;
    let ops_per_task = 10;

    println!(
        "  Running {} concurrent tasks with {} ops each...",
        num_tasks, ops_per_task
    );

    let start = Instant::now();
    let mut handles = vec![];

    for task_id in 0..num_tasks {
        let state = test.state.clone();

        handles.push(tokio::spawn(async move {
            for _ in 0..ops_per_task {
                let mut headers = HeaderMap::new();
                headers.insert(
                    "x-forwarded-for",
                    HeaderValue::from_str(&format!("203.0.113.{}", task_id % 256)).unwrap(),
                );
                record_visit(
                    State(state.clone()),
                    headers,
                    Extensions::new(),
                    Bytes::from_static(b"{\"platform\":\"bench\"}"),
                )
                .await;
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let duration = start.elapsed();
    let total_ops = num_tasks * ops_per_task;
    println!("  Total operations: {}", total_ops);
    println!("  Total time: {:?}", duration);
    println!(
        "  Throughput: {:.0} ops/sec\n",
        total_ops as f64 / duration.as_secs_f64()
    );

    get_analytics(State(test.state.clone())).await;
    assert_eq!(test.state.recorder.analytics().total_visits, total_ops as u64);
}
