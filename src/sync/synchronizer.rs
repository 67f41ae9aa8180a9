//! Feed synchronizer (C3): warmup buffering, snapshot load, and the
//! replay/live dispatch loop of spec §4.3.

use rust_decimal::Decimal;

use super::error::SyncError;
use super::message::{AppliedEvent, RawMessage};
use crate::book::{OrderBook, Side};
use crate::exchange::{ExchangeFeed, ExchangeRest};

/// The synchronizer's state machine position (spec §4.3 diagram). Exposed
/// so callers (and tests) can assert which phase a session is in without
/// re-deriving it from sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Websocket open, warming up the message buffer.
    Connected,
    /// Snapshot loaded, draining the buffered prefix.
    Replaying,
    /// Buffer drained; applying messages as they arrive live.
    Live,
    /// A protocol-integrity violation ended the session.
    Aborted,
}

/// Drives one exchange session's message feed against an [`OrderBook`].
pub struct Synchronizer<F, R> {
    feed: F,
    rest: R,
    product_id: String,
    warmup_messages: usize,
    phase: Phase,
}

impl<F, R> Synchronizer<F, R>
where
    F: ExchangeFeed,
    R: ExchangeRest,
{
    /// Builds a synchronizer that will buffer `warmup_messages` frames (or
    /// fewer, if the feed closes first) before loading the snapshot (spec
    /// §4.3 Phase A, §9 open question: the source uses 51).
    pub fn new(feed: F, rest: R, product_id: impl Into<String>, warmup_messages: usize) -> Self {
        Synchronizer {
            feed,
            rest,
            product_id: product_id.into(),
            warmup_messages,
            phase: Phase::Connected,
        }
    }

    /// The synchronizer's current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase A + B: connect, buffer the warmup window, then load the
    /// level-3 snapshot and build a fresh [`OrderBook`] from it. Returns
    /// the book and the still-unreplayed buffered frames.
    pub async fn bootstrap(&mut self) -> Result<(OrderBook, Vec<String>), SyncError> {
        self.feed
            .connect_and_subscribe(&self.product_id)
            .await
            .map_err(|e| SyncError::Transport(Box::new(e)))?;

        let mut buffered = Vec::with_capacity(self.warmup_messages);
        while buffered.len() < self.warmup_messages {
            match self
                .feed
                .recv_message()
                .await
                .map_err(|e| SyncError::Transport(Box::new(e)))?
            {
                Some(text) => buffered.push(text),
                None => break,
            }
        }

        let snapshot = self
            .rest
            .get_snapshot()
            .await
            .map_err(|e| SyncError::Transport(Box::new(e)))?;

        let mut book = OrderBook::new();
        for entry in snapshot.bids {
            book.insert_order(entry.order_id, entry.size, entry.price, Side::Bid, true);
        }
        for entry in snapshot.asks {
            book.insert_order(entry.order_id, entry.size, entry.price, Side::Ask, true);
        }
        book.snapshot_sequence = snapshot.sequence;
        book.last_applied_sequence = snapshot.sequence;

        self.phase = Phase::Replaying;
        Ok((book, buffered))
    }

    /// Phase C over the buffered prefix captured during warmup.
    pub fn replay(
        &mut self,
        book: &mut OrderBook,
        buffered: Vec<String>,
    ) -> Result<Vec<AppliedEvent>, SyncError> {
        let mut events = Vec::with_capacity(buffered.len());
        for raw in buffered {
            match apply_raw(book, &raw) {
                Ok(event) => events.push(event),
                Err(err) => {
                    self.phase = Phase::Aborted;
                    return Err(err);
                }
            }
        }
        self.phase = Phase::Live;
        Ok(events)
    }

    /// Reads and applies exactly one live message (spec §4.3 Phase C,
    /// "live" half). Returns [`SyncError`] on any protocol-integrity
    /// violation, transitioning this synchronizer to [`Phase::Aborted`].
    pub async fn next_live_event(&mut self, book: &mut OrderBook) -> Result<AppliedEvent, SyncError> {
        let text = self
            .feed
            .recv_message()
            .await
            .map_err(|e| SyncError::Transport(Box::new(e)))?
            .ok_or_else(|| {
                SyncError::Transport(Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "websocket closed",
                )))
            })?;
        match apply_raw(book, &text) {
            Ok(event) => Ok(event),
            Err(err) => {
                self.phase = Phase::Aborted;
                Err(err)
            }
        }
    }
}

/// Parses and applies one raw frame, per spec §4.3 steps 1-7.
fn apply_raw(book: &mut OrderBook, raw: &str) -> Result<AppliedEvent, SyncError> {
    let message: RawMessage = serde_json::from_str(raw)?;
    apply_message(book, message)
}

/// Applies a parsed [`RawMessage`] to `book`, maintaining sequence state
/// and dispatching by `(type, side)` (spec §4.3 steps 1-7).
pub fn apply_message(book: &mut OrderBook, message: RawMessage) -> Result<AppliedEvent, SyncError> {
    if message.sequence <= book.snapshot_sequence {
        return Ok(AppliedEvent::Discarded);
    }

    match book.first_live_sequence {
        None => {
            if message.sequence != book.snapshot_sequence + 1 {
                return Err(SyncError::SeamMismatch {
                    snapshot_sequence: book.snapshot_sequence,
                    got: message.sequence,
                });
            }
            book.first_live_sequence = Some(message.sequence);
        }
        Some(_) => {
            if message.sequence != book.last_applied_sequence + 1 {
                return Err(SyncError::SequenceGap {
                    expected: book.last_applied_sequence + 1,
                    got: message.sequence,
                });
            }
        }
    }
    book.last_applied_sequence = message.sequence;

    if message.order_type.as_deref() == Some("market") {
        return Ok(AppliedEvent::MarketOrderSkipped);
    }

    book.last_event_time = message.time;

    let event = match (message.kind.as_str(), message.side) {
        ("received", Some(_)) => {
            let order_id = require(message.order_id, "received.order_id")?;
            book.receive(&order_id, message.size.unwrap_or(Decimal::ZERO));
            AppliedEvent::Received { order_id }
        }
        ("open", Some(side)) => {
            let order_id = require(message.order_id, "open.order_id")?;
            let price = require(message.price, "open.price")?;
            let size = require(message.remaining_size, "open.remaining_size")?;
            book.insert_order(order_id.clone(), size, price, side, false);
            AppliedEvent::Opened {
                order_id,
                side,
                price,
                size,
            }
        }
        ("match", Some(maker_side)) => {
            let maker_order_id = require(message.maker_order_id, "match.maker_order_id")?;
            let size = require(message.size, "match.size")?;
            let price = require(message.price, "match.price")?;
            let time = message.time.unwrap_or_default();
            book.apply_match(maker_side, &maker_order_id, size, price, time)?;
            AppliedEvent::Matched {
                maker_order_id,
                maker_side,
                size,
                price,
            }
        }
        ("done", Some(side)) => {
            let order_id = require(message.order_id, "done.order_id")?;
            book.remove_order(&order_id)?;
            AppliedEvent::Done {
                order_id,
                side,
                reason: message.reason,
            }
        }
        ("change", Some(_)) => {
            let order_id = require(message.order_id, "change.order_id")?;
            let new_size = require(message.new_size, "change.new_size")?;
            book.change(&order_id, new_size)?;
            AppliedEvent::Changed { order_id, new_size }
        }
        (kind, side) => {
            return Err(SyncError::UnknownMessage {
                kind: kind.to_string(),
                side,
            });
        }
    };
    Ok(event)
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SyncError> {
    value.ok_or_else(|| SyncError::UnknownMessage {
        kind: format!("missing field {field}"),
        side: None,
    })
}
