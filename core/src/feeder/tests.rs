//! Feeder tests

use super::*;
use crate::config::SelectionPolicy;
use std::time::{Duration, Instant};

fn feeder(len: usize, rate: f64, cap: Option<u64>, buffer: usize) -> (Feeder, mpsc::Receiver<usize>) {
    let (tx, rx) = mpsc::channel(buffer);
    let feeder = Feeder::new(
        RequestRateLimiter::new(rate).unwrap(),
        IndexSelector::new(SelectionPolicy::Sequential, len, None).unwrap(),
        cap,
        tx,
    );
    (feeder, rx)
}

#[tokio::test]
async fn test_sequential_emission_order() {
    let (feeder, mut rx) = feeder(3, 1000.0, None, 1);
    let signal = RunSignal::new();
    let handle = tokio::spawn(feeder.run(signal.clone()));

    let mut received = Vec::new();
    for _ in 0..6 {
        received.push(rx.recv().await.unwrap());
    }
    signal.trigger(StopReason::Interrupted);

    let stats = handle.await.unwrap();
    assert_eq!(received, vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(stats.exit, FeederExit::Cancelled);
    assert_eq!(signal.reason(), Some(StopReason::Interrupted));
}

#[tokio::test]
async fn test_loop_cap_stops_and_cancels_run() {
    let (feeder, mut rx) = feeder(3, 1000.0, Some(2 * 3), 16);
    let signal = RunSignal::new();

    let stats = tokio::time::timeout(Duration::from_secs(5), feeder.run(signal.clone()))
        .await
        .expect("feeder should stop on its own");

    assert_eq!(stats.emitted, 6);
    assert_eq!(stats.exit, FeederExit::LoopCapReached);
    assert!(signal.is_triggered());
    assert_eq!(signal.reason(), Some(StopReason::LoopCapReached));

    // queued indices survive the cap, then the queue is closed
    let mut drained = Vec::new();
    while let Some(index) = rx.recv().await {
        drained.push(index);
    }
    assert_eq!(drained, vec![0, 1, 2, 0, 1, 2]);
}

#[tokio::test]
async fn test_rate_bounds_emissions() {
    for _ in 0..2 {
        let (feeder, mut rx) = feeder(5, 10.0, None, 1024);
        let signal = RunSignal::new();
        let handle = tokio::spawn(feeder.run(signal.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        signal.trigger(StopReason::Deadline);
        let stats = handle.await.unwrap();

        let mut queued = 0;
        while rx.recv().await.is_some() {
            queued += 1;
        }

        assert_eq!(stats.emitted, queued);
        assert!(stats.emitted <= 11, "emitted {} in 1s at 10/s", stats.emitted);
        assert!(stats.emitted >= 8, "emitted {} in 1s at 10/s", stats.emitted);
    }
}

#[tokio::test]
async fn test_cancel_unblocks_full_queue() {
    let (feeder, _rx) = feeder(2, 1000.0, None, 1);
    let signal = RunSignal::new();
    let handle = tokio::spawn(feeder.run(signal.clone()));

    // nobody receives, so the feeder ends up blocked on send
    tokio::time::sleep(Duration::from_millis(50)).await;
    let cancelled_at = Instant::now();
    signal.trigger(StopReason::Interrupted);

    let stats = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("feeder should observe cancellation")
        .unwrap();

    assert!(cancelled_at.elapsed() < Duration::from_millis(500));
    assert_eq!(stats.exit, FeederExit::Cancelled);
    assert_eq!(stats.emitted, 1);
}

#[tokio::test]
async fn test_cancel_unblocks_rate_wait() {
    let (feeder, _rx) = feeder(2, 0.1, None, 16);
    let signal = RunSignal::new();
    let handle = tokio::spawn(feeder.run(signal.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    signal.trigger(StopReason::Deadline);

    let stats = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("rate wait should be interruptible")
        .unwrap();
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.exit, FeederExit::Cancelled);
}

#[tokio::test]
async fn test_closed_queue_reports_workers_exited() {
    let (feeder, rx) = feeder(2, 1000.0, None, 1);
    drop(rx);
    let signal = RunSignal::new();

    let stats = feeder.run(signal.clone()).await;

    assert_eq!(stats.exit, FeederExit::QueueClosed);
    assert_eq!(stats.emitted, 0);
    assert_eq!(signal.reason(), Some(StopReason::WorkersExited));
}

#[tokio::test]
async fn test_already_cancelled_emits_nothing() {
    let (feeder, mut rx) = feeder(2, 1000.0, None, 16);
    let signal = RunSignal::new();
    signal.trigger(StopReason::Interrupted);

    let stats = feeder.run(signal).await;

    assert_eq!(stats.emitted, 0);
    assert!(rx.recv().await.is_none());
}
