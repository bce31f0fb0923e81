//! Content that stresses the wire codec, end to end.
//!
//! The queue payload is structural JSON, so bodies containing delimiter
//! characters, quotes, newlines, or anything else must come out of the
//! history byte-for-byte identical.

use eyre::Result;
use rohrpost::relay::config::RelayConfig;

use crate::relay::helpers::{bodies_of, spawn_pipeline, wait_for_processed};

const AWKWARD_BODIES: &[&str] = &[
    "pipes | are | not | delimiters",
    "line one\nline two\r\nline three",
    "\"quoted\" and 'single' and \\backslash\\",
    "{\"sender\": \"mallory\", \"recipient\": \"trudy\", \"content\": \"spoof\"}",
    "nulls \u{0} and tabs \t survive",
    "emoji 🎉 and umlauts äöü and kanji 漢字",
];

#[tokio::test(flavor = "multi_thread")]
async fn awkward_content_survives_the_round_trip() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    for body in AWKWARD_BODIES {
        pipeline.submit.submit("alice", "bob", body).await?;
    }
    wait_for_processed(&pipeline.handle, u64::try_from(AWKWARD_BODIES.len())?).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&history), AWKWARD_BODIES);
    assert!(pipeline.sink.is_empty());
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn whitespace_padding_is_preserved_in_bodies() -> Result<()> {
    let pipeline = spawn_pipeline(RelayConfig::default());
    pipeline.submit.submit("alice", "bob", "  padded  ").await?;
    wait_for_processed(&pipeline.handle, 1).await?;

    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&history), vec!["  padded  "]);
    pipeline.handle.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn field_like_content_does_not_change_routing() -> Result<()> {
    // A body that looks like an entry must not reroute the message.
    let pipeline = spawn_pipeline(RelayConfig::default());
    let spoof = "{\"sender\": \"mallory\", \"recipient\": \"trudy\", \"content\": \"spoof\"}";
    pipeline.submit.submit("alice", "bob", spoof).await?;
    wait_for_processed(&pipeline.handle, 1).await?;

    assert!(pipeline.query.conversation("mallory", "trudy").await?.is_empty());
    let history = pipeline.query.conversation("alice", "bob").await?;
    assert_eq!(bodies_of(&history), vec![spoof]);
    pipeline.handle.shutdown().await;
    Ok(())
}
