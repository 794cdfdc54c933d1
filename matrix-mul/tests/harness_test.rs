use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use matmul_dispatch::SplitStrategy;
use matmul_worker::WorkerService;
use matrix_mul::{Outcome, RunConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;

async fn start_test_workers(k: usize) -> (Vec<String>, Vec<JoinHandle<()>>) {
    let mut addrs = Vec::new();
    let mut handles = Vec::new();
    for i in 0..k {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        addrs.push(listener.local_addr().unwrap().to_string());
        handles.push(tokio::spawn(async move {
            WorkerService::new(format!("worker {}", i + 1))
                .serve(listener)
                .await
                .unwrap();
        }));
    }
    sleep(Duration::from_millis(50)).await;
    (addrs, handles)
}

#[tokio::test]
async fn test_all_methods_agree() {
    let (workers, handles) = start_test_workers(2).await;

    for strategy in [SplitStrategy::RowOnly, SplitStrategy::RowAndColumn] {
        let config = RunConfig {
            size: 48,
            workers: workers.clone(),
            strategy,
            ..RunConfig::default()
        };
        let report = matrix_mul::run(&config).await.unwrap();

        assert_eq!(report.entries().len(), 2);
        assert!(report.all_match(), "strategy {strategy}");
        assert!(report.entries().iter().all(|e| matches!(
            e.outcome,
            Outcome::Completed {
                matches_serial: true,
                ..
            }
        )));
    }

    for handle in handles {
        handle.abort();
    }
}

#[tokio::test]
async fn test_skip_distributed() {
    let config = RunConfig {
        size: 16,
        skip_distributed: true,
        ..RunConfig::default()
    };
    let report = matrix_mul::run(&config).await.unwrap();

    assert_eq!(report.entries()[1].outcome, Outcome::Skipped);
    assert!(report.all_match());
}

#[tokio::test]
async fn test_baselines_leave_the_runtime_free() {
    // Single-threaded runtime: the task below only runs if `run` yields.
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let _ticker = tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

    let config = RunConfig {
        size: 64,
        skip_distributed: true,
        ..RunConfig::default()
    };
    let report = matrix_mul::run(&config).await.unwrap();

    assert!(ran.load(Ordering::SeqCst));
    assert!(report.all_match());
}

#[tokio::test]
async fn test_unreachable_workers_are_reported_not_returned() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap().to_string();
    drop(listener);

    let config = RunConfig {
        size: 8,
        workers: vec![dead],
        ..RunConfig::default()
    };
    let report = matrix_mul::run(&config).await.unwrap();

    assert!(matches!(report.entries()[1].outcome, Outcome::Failed(_)));
    assert!(report.to_string().contains("failed"));
}
