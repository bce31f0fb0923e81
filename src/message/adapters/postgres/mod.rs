//! `PostgreSQL` implementation of the [`ConversationStore`] port using
//! Diesel ORM.
//!
//! Commit order per conversation is tracked by an explicit `position`
//! column assigned inside the append transaction, so histories stay
//! totally ordered even when commit timestamps collide. Idempotency rides
//! on the message id primary key with `ON CONFLICT DO NOTHING`.

mod blocking;
mod models;
pub mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::message::{
    domain::{ConversationKey, Message, ParticipantId},
    error::StoreError,
    ports::store::{ConversationStore, StoreResult},
};
use schema::messages;

pub use blocking::PgPool;
use blocking::{get_conn, run_blocking};
pub use models::{MessageRow, NewMessageRow};

/// Bootstrap DDL for the messages table.
const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS messages (
    id UUID PRIMARY KEY,
    participant_low TEXT NOT NULL,
    participant_high TEXT NOT NULL,
    sender TEXT NOT NULL,
    recipient TEXT NOT NULL,
    body TEXT NOT NULL,
    committed_at TIMESTAMPTZ NOT NULL,
    position BIGINT NOT NULL
)";

/// One ordered history per conversation key.
const CREATE_KEY_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
    messages_key_position_idx ON messages (participant_low, participant_high, position)";

/// Participant lookups for cross-conversation history queries.
const CREATE_SENDER_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS messages_sender_idx ON messages (sender)";
const CREATE_RECIPIENT_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS messages_recipient_idx ON messages (recipient)";

/// `PostgreSQL` implementation of [`ConversationStore`].
///
/// Uses Diesel ORM with connection pooling via r2d2. Thread-safe for
/// concurrent access. All database operations are offloaded to a blocking
/// thread pool via [`tokio::task::spawn_blocking`] to avoid blocking the
/// async runtime.
///
/// # Example
///
/// ```ignore
/// use rohrpost::message::adapters::postgres::PostgresConversationStore;
///
/// let store = PostgresConversationStore::connect("postgres://...")?;
/// store.ensure_schema().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for the given database URL and wraps it in a store.
    ///
    /// The pool is created once and shared by every clone of the store;
    /// callers should construct the store at startup and pass clones
    /// around rather than reconnecting per operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the pool cannot be built.
    pub fn connect(database_url: &str) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the messages table and its indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the DDL cannot be executed.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            for statement in [
                CREATE_TABLE_SQL,
                CREATE_KEY_INDEX_SQL,
                CREATE_SENDER_INDEX_SQL,
                CREATE_RECIPIENT_INDEX_SQL,
            ] {
                diesel::sql_query(statement).execute(&mut conn)?;
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn append(&self, key: &ConversationKey, message: Message) -> StoreResult<()> {
        let pool = self.pool.clone();
        let owned_key = key.clone();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<_, StoreError, _>(|tx| {
                let highest: Option<i64> = messages::table
                    .filter(messages::participant_low.eq(owned_key.low().as_str()))
                    .filter(messages::participant_high.eq(owned_key.high().as_str()))
                    .select(diesel::dsl::max(messages::position))
                    .first(tx)?;
                let next_position = highest.unwrap_or(0).saturating_add(1);

                let row = NewMessageRow::from_domain(&owned_key, &message, next_position);
                diesel::insert_into(messages::table)
                    .values(&row)
                    .on_conflict(messages::id)
                    .do_nothing()
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn history(&self, key: &ConversationKey) -> StoreResult<Vec<Message>> {
        let pool = self.pool.clone();
        let low = key.low().as_str().to_owned();
        let high = key.high().as_str().to_owned();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<MessageRow> = messages::table
                .filter(messages::participant_low.eq(&low))
                .filter(messages::participant_high.eq(&high))
                .order(messages::position.asc())
                .load(&mut conn)?;

            rows.into_iter().map(MessageRow::into_domain).collect()
        })
        .await
    }

    async fn history_involving(&self, participant: &ParticipantId) -> StoreResult<Vec<Message>> {
        let pool = self.pool.clone();
        let token = participant.as_str().to_owned();

        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<MessageRow> = messages::table
                .filter(
                    messages::sender
                        .eq(&token)
                        .or(messages::recipient.eq(&token)),
                )
                .order(messages::committed_at.asc())
                .load(&mut conn)?;

            rows.into_iter().map(MessageRow::into_domain).collect()
        })
        .await
    }
}
