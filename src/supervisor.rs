//! Supervisor (C5): the reconnect loop that wraps one session (connect →
//! warmup → snapshot → replay → live) and keeps the quote manager fed with
//! applied events (spec §4.5).

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::book::OrderBook;
use crate::exchange::{ExchangeFeed, ExchangeRest};
use crate::quotes::{QuoteError, QuoteManager};
use crate::sync::{AppliedEvent, Phase, SyncError, Synchronizer};

/// Sessions shorter than this are "fast failures" for backoff purposes
/// (spec §4.5).
const FAST_FAILURE_THRESHOLD: Duration = Duration::from_secs(2);
/// Number of consecutive fast failures after which the backoff exponent
/// resets, so a persistently broken feed doesn't back off forever (spec
/// §4.5).
const FAST_FAILURE_RESET_COUNT: u32 = 7;

/// Unifies the synchronizer and quote-manager error types so a session's
/// `run` returns a single error (spec §7's taxonomy collapses to
/// transient-vs-fatal at the supervisor, which only cares about wall time).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The feed synchronizer aborted (spec §7 protocol-integrity or
    /// transport failure).
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// The quote manager aborted (spec §7, unhandled exchange response or
    /// transport failure).
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Drives the connect/warmup/snapshot/replay/live loop, reconnecting with
/// exponential backoff on fast failures (spec §4.5).
pub struct Supervisor<MakeFeed, R> {
    make_feed: MakeFeed,
    rest: R,
    product_id: String,
    warmup_messages: usize,
    print_status: bool,
    normal_size: rust_decimal::Decimal,
    rebalance_size: rust_decimal::Decimal,
}

impl<MakeFeed, F, R> Supervisor<MakeFeed, R>
where
    MakeFeed: Fn() -> F,
    F: ExchangeFeed,
    R: ExchangeRest + Clone,
{
    /// Builds a supervisor. `make_feed` constructs a fresh, unconnected
    /// feed for each session — a websocket connection is single-use once
    /// its session ends (spec §4.3).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        make_feed: MakeFeed,
        rest: R,
        product_id: impl Into<String>,
        warmup_messages: usize,
        print_status: bool,
        normal_size: rust_decimal::Decimal,
        rebalance_size: rust_decimal::Decimal,
    ) -> Self {
        Supervisor {
            make_feed,
            rest,
            product_id: product_id.into(),
            warmup_messages,
            print_status,
            normal_size,
            rebalance_size,
        }
    }

    /// Cancels any resting orders left from a previous run, then loops
    /// sessions forever, backing off per spec §4.5.
    pub async fn run(&self) -> ! {
        let mut quotes = QuoteManager::new(self.rest.clone(), self.normal_size, self.rebalance_size);
        if let Err(err) = quotes.cancel_all().await {
            warn!("startup cancel-all failed: {err}");
        }

        let mut backoff_exponent: u32 = 0;
        let mut fast_failures: u32 = 0;

        loop {
            let started = Instant::now();
            if let Err(err) = self.run_session(&mut quotes).await {
                error!("session ended: {err}");
            }
            let elapsed = started.elapsed();

            if elapsed < FAST_FAILURE_THRESHOLD {
                fast_failures += 1;
                backoff_exponent += 1;
                let sleep_secs = 2f64.powi(backoff_exponent as i32) + rand::random::<f64>();
                warn!(
                    "fast failure #{fast_failures} after {:.2}s, backing off {sleep_secs:.2}s",
                    elapsed.as_secs_f64()
                );
                tokio::time::sleep(Duration::from_secs_f64(sleep_secs)).await;
                if fast_failures >= FAST_FAILURE_RESET_COUNT {
                    backoff_exponent = 0;
                    fast_failures = 0;
                }
            } else {
                info!("session ran {:.1}s, reconnecting immediately", elapsed.as_secs_f64());
                backoff_exponent = 0;
                fast_failures = 0;
            }
        }
    }

    async fn run_session(&self, quotes: &mut QuoteManager<R>) -> Result<(), SessionError> {
        let feed = (self.make_feed)();
        let mut sync = Synchronizer::new(feed, self.rest.clone(), self.product_id.clone(), self.warmup_messages);

        let (mut book, buffered) = sync.bootstrap().await?;
        quotes.sync_open_orders().await?;
        info!("snapshot loaded at sequence {}", book.snapshot_sequence);

        let replayed = sync.replay(&mut book, buffered)?;
        for event in &replayed {
            self.apply(quotes, &book, event).await?;
        }
        debug_assert_eq!(sync.phase(), Phase::Live);

        loop {
            let event = sync.next_live_event(&mut book).await?;
            self.apply(quotes, &book, &event).await?;
        }
    }

    async fn apply(
        &self,
        quotes: &mut QuoteManager<R>,
        book: &OrderBook,
        event: &AppliedEvent,
    ) -> Result<(), SessionError> {
        quotes.on_event(book, event).await?;
        if self.print_status {
            if let Some(line) = render_status(book, quotes) {
                println!("{line}");
            }
        }
        Ok(())
    }
}

/// Renders the one-line status (spec §6 CLI): `Latency, Min ask, Max bid,
/// Spread, Your ask, Your bid, Your spread`. Returns `None` when either
/// side of the book is empty (nothing meaningful to report yet).
fn render_status<R>(book: &OrderBook, quotes: &QuoteManager<R>) -> Option<String> {
    if book.bids_is_empty() || book.asks_is_empty() {
        return None;
    }
    let max_bid = book.max_bid().ok()?;
    let min_ask = book.min_ask().ok()?;
    let spread = min_ask.as_decimal() - max_bid.as_decimal();
    let latency_ms = book
        .last_event_time
        .map(|t| (Utc::now() - t).num_milliseconds())
        .unwrap_or_default();

    let open_orders = quotes.open_orders();
    let your_ask = open_orders.ask.as_ref().map(|o| o.price.to_string()).unwrap_or_else(|| "-".into());
    let your_bid = open_orders.bid.as_ref().map(|o| o.price.to_string()).unwrap_or_else(|| "-".into());
    let your_spread = match (&open_orders.bid, &open_orders.ask) {
        (Some(bid), Some(ask)) => (ask.price.as_decimal() - bid.price.as_decimal()).to_string(),
        _ => "-".into(),
    };

    Some(format!(
        "{latency_ms}ms, {min_ask}, {max_bid}, {spread}, {your_ask}, {your_bid}, {your_spread}"
    ))
}
