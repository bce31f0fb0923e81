//! Shared helpers for `PostgreSQL` integration tests.

use eyre::Result;
use mockable::DefaultClock;
use rohrpost::message::adapters::postgres::PostgresConversationStore;
use rohrpost::message::domain::{ConversationKey, EntryLimits, Message, ParticipantId, RawEntry};
use uuid::Uuid;

/// Environment variable naming the test database.
pub const DATABASE_URL_VAR: &str = "RELAY_TEST_DATABASE_URL";

/// Connects to the configured test database, or returns `None` to skip.
///
/// The schema is created on first use and shared by all tests, so every
/// test works with participants from [`unique_participant`] to stay
/// isolated from concurrent runs.
///
/// # Errors
///
/// Returns an error when the database is configured but unreachable or
/// the schema cannot be created.
#[expect(
    clippy::print_stderr,
    reason = "The skip notice must reach the test log without a subscriber"
)]
pub async fn connect_store() -> Result<Option<PostgresConversationStore>> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("skipping: {DATABASE_URL_VAR} is not set");
        return Ok(None);
    };
    let store = PostgresConversationStore::connect(&url)?;
    store.ensure_schema().await?;
    Ok(Some(store))
}

/// Returns a participant token no other test run will use.
pub fn unique_participant(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Validates and stamps an entry into a key/message pair.
///
/// # Errors
///
/// Returns an error when the entry fails validation; tests pass tokens
/// from [`unique_participant`], which always validate.
pub fn committed(sender: &str, recipient: &str, text: &str) -> Result<(ConversationKey, Message)> {
    let pair = RawEntry::new(sender, recipient, text)
        .into_message(&EntryLimits::default(), &DefaultClock)?;
    Ok(pair)
}

/// Builds a validated participant from an owned token.
///
/// # Errors
///
/// Returns an error for invalid tokens.
pub fn participant(token: &str) -> Result<ParticipantId> {
    Ok(ParticipantId::new(token)?)
}
