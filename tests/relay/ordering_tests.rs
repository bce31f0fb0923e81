//! Ordering guarantees from submission through committed history.

use eyre::Result;
use rohrpost::message::domain::RawEntry;
use rohrpost::relay::config::RelayConfig;
use rohrpost::relay::ports::queue::InboundQueue;

use crate::relay::helpers::{bodies_of, spawn_pipeline, submit_sequence, wait_for_processed};

#[tokio::test(flavor = "multi_thread")]
async fn preserves_submission_order_within_a_conversation() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    submit_sequence(
        &pipeline.submit,
        "alice",
        "bob",
        &["first", "second", "third"],
    )
    .await?;
    wait_for_processed(&pipeline.handle, 3).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&history), vec!["first", "second", "third"]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn both_directions_interleave_into_one_history() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    pipeline.submit.submit("alice", "bob", "hi bob").await?;
    pipeline.submit.submit("bob", "alice", "hi alice").await?;
    pipeline.submit.submit("alice", "bob", "how are you?").await?;
    wait_for_processed(&pipeline.handle, 3).await?;

    let history = pipeline.query.conversation("bob", "alice").await?;
    assert_eq!(bodies_of(&history), vec!["hi bob", "hi alice", "how are you?"]);

    let senders: Vec<_> = history
        .iter()
        .map(|message| message.sender().as_str().to_owned())
        .collect();
    assert_eq!(senders, vec!["alice", "bob", "alice"]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn commit_timestamps_never_run_backwards() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    for n in 0..20 {
        pipeline
            .submit
            .submit("alice", "bob", &format!("message {n}"))
            .await?;
    }
    wait_for_processed(&pipeline.handle, 20).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(history.len(), 20);
    for pair in history.windows(2) {
        if let [earlier, later] = pair {
            assert!(earlier.committed_at() <= later.committed_at());
        }
    }
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn involving_merges_conversations_in_commit_order() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    pipeline.submit.submit("alice", "bob", "to bob").await?;
    pipeline.submit.submit("carol", "alice", "to alice").await?;
    pipeline.submit.submit("bob", "carol", "not alice").await?;
    wait_for_processed(&pipeline.handle, 3).await?;

    let view = pipeline.query.involving("alice").await?;
    assert_eq!(bodies_of(&view), vec!["to bob", "to alice"]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn self_conversation_commits_normally() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    pipeline
        .submit
        .submit("alice", "alice", "note to self")
        .await?;
    wait_for_processed(&pipeline.handle, 1).await?;

    let history = pipeline.query.conversation("alice", "alice").await?;
    assert_eq!(bodies_of(&history), vec!["note to self"]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn redelivered_entry_commits_once() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    let entry = RawEntry::new("alice", "bob", "exactly once");
    let payload = entry.encode()?;
    pipeline.queue.enqueue(payload.clone()).await?;
    pipeline.queue.enqueue(payload).await?;
    wait_for_processed(&pipeline.handle, 2).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&history), vec!["exactly once"]);
    assert!(pipeline.sink.is_empty());
    pipeline.handle.shutdown().await;
    Ok(())
}
