//! Diesel schema for committed relay messages.

diesel::table! {
    /// Committed messages, one row per message.
    messages (id) {
        /// Message identifier, also the idempotency key.
        id -> Uuid,
        /// Lexicographically smaller participant of the conversation key.
        participant_low -> Text,
        /// Lexicographically larger participant of the conversation key.
        participant_high -> Text,
        /// Sending participant.
        sender -> Text,
        /// Receiving participant.
        recipient -> Text,
        /// Message text payload.
        body -> Text,
        /// Commit timestamp assigned by the relay worker.
        committed_at -> Timestamptz,
        /// Per-conversation commit sequence, assigned inside the append
        /// transaction.
        position -> Int8,
    }
}
