//! Feed synchronizer error types.

use crate::book::{BookError, Side};

/// Errors from the feed synchronizer (C3). Distinguishes protocol-integrity
/// failures (fatal to the session, spec §7) from transport failures
/// (also session-ending, but expected and handled by reconnecting).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SyncError {
    /// A message's sequence number skipped ahead of
    /// `last_applied_sequence + 1` (spec I4, §4.3 step 4).
    #[error("sequence gap: expected {expected}, got {got}")]
    SequenceGap {
        /// The sequence number that should have arrived next.
        expected: u64,
        /// The sequence number that actually arrived.
        got: u64,
    },

    /// The first message past the snapshot did not have
    /// `sequence == snapshot_sequence + 1` (spec §4.3 step 3).
    #[error("seam mismatch: snapshot at {snapshot_sequence}, first live message at {got}")]
    SeamMismatch {
        /// The snapshot's sequence number.
        snapshot_sequence: u64,
        /// The first live message's sequence number.
        got: u64,
    },

    /// A `(type, side)` combination this synchronizer does not recognize
    /// (spec §4.3 step 6, "any other combination aborts the session").
    #[error("unknown message: type={kind:?} side={side:?}")]
    UnknownMessage {
        /// The message's `type` field.
        kind: String,
        /// The message's `side` field, if present.
        side: Option<Side>,
    },

    /// The book reported a crossed state after applying a message (spec
    /// I3, surfaced through the synchronizer since it is detected on every
    /// applied event).
    #[error(transparent)]
    Book(#[from] BookError),

    /// A message frame failed to parse as JSON.
    #[error("malformed message JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The REST snapshot or websocket transport failed. Boxed because the
    /// concrete transport is generic over the `ExchangeRest`/`ExchangeFeed`
    /// implementation.
    #[error("transport error: {0}")]
    Transport(#[from] Box<dyn std::error::Error + Send + Sync>),
}
