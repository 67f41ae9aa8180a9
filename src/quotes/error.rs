//! Quote manager error types.

use crate::book::BookError;

/// Errors from the quote manager (C4). Unhandled exchange response bodies
/// are hard failures per spec §7 and propagate as a session abort.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QuoteError {
    /// The book reported a crossed state (spec I3, checked at the top of
    /// every `on_event` call per spec §4.4).
    #[error(transparent)]
    Book(#[from] BookError),

    /// A `POST /orders` response was neither `pending`/`rejected` nor
    /// `"Insufficient funds"` (spec §4.4, §7).
    #[error("unhandled order response: {0}")]
    UnhandledOrderResponse(String),

    /// A `DELETE /orders/{id}` response carried a `message` other than
    /// `"order not found"`/`"Order already done"` (spec §4.4, §7).
    #[error("unhandled cancel response: {0}")]
    UnhandledCancelResponse(String),

    /// The REST transport itself failed (connect refused, TLS error,
    /// etc.) — transient, not a protocol-integrity failure, but still
    /// ends the session so the supervisor can reconnect with a fresh book.
    #[error("exchange transport error: {0}")]
    Transport(#[from] Box<dyn std::error::Error + Send + Sync>),
}
