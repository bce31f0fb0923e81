//! Drain behaviour and final statistics on shutdown.

use eyre::Result;
use rohrpost::relay::config::RelayConfig;

use crate::relay::helpers::{spawn_pipeline, submit_sequence, wait_for_processed};

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_reports_final_statistics() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    submit_sequence(&pipeline.submit, "alice", "bob", &["one", "two", "three"]).await?;
    wait_for_processed(&pipeline.handle, 3).await?;

    let stats = pipeline.handle.shutdown().await;
    assert_eq!(stats.committed, 3);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.dead_lettered, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn committed_work_survives_shutdown() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default().with_worker_lanes(2));
    submit_sequence(&pipeline.submit, "alice", "bob", &["kept one", "kept two"]).await?;
    wait_for_processed(&pipeline.handle, 2).await?;
    pipeline.handle.shutdown().await;

    // The store outlives the worker; queries still serve the history.
    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(history.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn idle_worker_shuts_down_cleanly() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default().with_worker_lanes(4));
    let stats = pipeline.handle.shutdown().await;
    assert_eq!(stats.processed(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn entries_still_queued_at_shutdown_are_not_lost_to_errors() -> Result<()> {
    // Stop the worker without waiting; whatever was not dequeued stays on
    // the queue, and nothing is dead-lettered by the act of stopping.
    let pipeline = spawn_pipeline(RelayConfig::default());
    submit_sequence(
        &pipeline.submit,
        "alice",
        "bob",
        &["a", "b", "c", "d", "e", "f"],
    )
    .await?;
    let stats = pipeline.handle.shutdown().await;

    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.dead_lettered, 0);
    assert!(pipeline.sink.is_empty());

    // Committed entries form a prefix of the submitted sequence.
    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(u64::try_from(history.len())?, stats.committed);
    let expected_prefix = ["a", "b", "c", "d", "e", "f"];
    for (position, message) in history.iter().enumerate() {
        assert_eq!(
            Some(message.body().as_str()),
            expected_prefix.get(position).copied()
        );
    }
    Ok(())
}
