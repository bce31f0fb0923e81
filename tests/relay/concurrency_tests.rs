//! Behaviour with multiple commit lanes and concurrent producers.

use std::sync::Arc;

use eyre::Result;
use rohrpost::relay::config::RelayConfig;
use rohrpost::relay::services::{SubmitError, SubmitService};

use crate::relay::helpers::{bodies_of, spawn_pipeline, wait_for_processed};

#[tokio::test(flavor = "multi_thread")]
async fn parallel_lanes_keep_per_conversation_order() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default().with_worker_lanes(4));
    let pairs = [
        ("alice", "bob"),
        ("carol", "dave"),
        ("erin", "frank"),
        ("grace", "heidi"),
    ];
    let per_pair = 25;
    for n in 0..per_pair {
        for (sender, recipient) in pairs {
            pipeline
                .submit
                .submit(sender, recipient, &format!("message {n}"))
                .await?;
        }
    }
    wait_for_processed(&pipeline.handle, 100).await?;

    for (sender, recipient) in pairs {
        let history = pipeline.query.conversation(sender, recipient).await?;
        let expected: Vec<String> = (0..per_pair).map(|n| format!("message {n}")).collect();
        assert_eq!(bodies_of(&history), expected, "history for {sender}<->{recipient}");
    }
    assert!(pipeline.sink.is_empty());
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn conversations_stay_isolated_across_lanes() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default().with_worker_lanes(3));
    pipeline.submit.submit("alice", "bob", "for bob").await?;
    pipeline.submit.submit("alice", "carol", "for carol").await?;
    pipeline.submit.submit("dave", "erin", "for erin").await?;
    wait_for_processed(&pipeline.handle, 3).await?;

    let alice_bob = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&alice_bob), vec!["for bob"]);
    let alice_carol = pipeline.query.conversation("alice", "carol").await?;
    assert_eq!(bodies_of(&alice_carol), vec!["for carol"]);
    let dave_erin = pipeline.query.conversation("erin", "dave").await?;
    assert_eq!(bodies_of(&dave_erin), vec!["for erin"]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_producers_keep_their_own_order() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default().with_worker_lanes(4));
    let mut producers = Vec::new();
    for producer in 0..4_u32 {
        let submit = SubmitService::new(Arc::clone(&pipeline.queue));
        producers.push(tokio::spawn(async move {
            for n in 0..10 {
                submit
                    .submit("alice", "bob", &format!("p{producer} n{n}"))
                    .await?;
            }
            Ok::<(), SubmitError>(())
        }));
    }
    for producer in producers {
        producer.await??;
    }
    wait_for_processed(&pipeline.handle, 40).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(history.len(), 40);

    // Producers interleave arbitrarily, but each producer's own messages
    // must come out in the order it submitted them.
    let bodies = bodies_of(&history);
    for producer in 0..4 {
        let tag = format!("p{producer} ");
        let seen: Vec<&String> = bodies.iter().filter(|body| body.starts_with(&tag)).collect();
        let expected: Vec<String> = (0..10).map(|n| format!("p{producer} n{n}")).collect();
        assert_eq!(seen.len(), expected.len());
        for (got, want) in seen.iter().zip(expected.iter()) {
            assert_eq!(*got, want);
        }
    }
    assert!(pipeline.sink.is_empty());
    pipeline.handle.shutdown().await;
    Ok(())
}
