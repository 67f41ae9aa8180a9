//! Quote manager (C4): posts and cancels the resting bid/ask per spec §4.4.

use rand::rngs::ThreadRng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::QuoteError;
use super::open_orders::OpenOrders;
use super::spreads::Spreads;
use crate::book::{OrderBook, Side};
use crate::exchange::{ExchangeRest, NewOrder, OrderResponse};
use crate::price::Price;
use crate::sync::AppliedEvent;

/// Amount the rejection bias grows on each post-only rejection (spec §4.4,
/// §9 — an exact decimal constant, not configurable).
const REJECTION_STEP: Decimal = Decimal::from_parts(4, 0, 0, false, 2); // 0.04

/// Maintains at most one resting bid and one resting ask, reacting to book
/// updates and exchange responses (spec §4.4).
pub struct QuoteManager<R> {
    rest: R,
    open_orders: OpenOrders,
    spreads: Spreads,
    rng: ThreadRng,
    /// Size posted during normal (non-rebalancing) market making.
    normal_size: Decimal,
    /// Size posted while rebalancing inventory after an "insufficient" flag.
    rebalance_size: Decimal,
}

impl<R> QuoteManager<R>
where
    R: ExchangeRest,
{
    /// Builds a quote manager with no resting orders and the default
    /// 0.10/0.10 spreads (spec §3), posting `normal_size` in ordinary
    /// operation and `rebalance_size` while working off an
    /// "insufficient funds" flag.
    pub fn new(rest: R, normal_size: Decimal, rebalance_size: Decimal) -> Self {
        QuoteManager {
            rest,
            open_orders: OpenOrders::default(),
            spreads: Spreads::default(),
            rng: rand::thread_rng(),
            normal_size,
            rebalance_size,
        }
    }

    /// Read-only view of the currently resting quotes.
    pub fn open_orders(&self) -> &OpenOrders {
        &self.open_orders
    }

    /// Seeds resting-order state from the account's currently-open orders
    /// (spec §9 supplemented feature). Call once, right after the
    /// synchronizer's snapshot load.
    pub async fn sync_open_orders(&mut self) -> Result<(), QuoteError> {
        let orders = self
            .rest
            .get_open_orders()
            .await
            .map_err(|e| QuoteError::Transport(Box::new(e)))?;
        for order in orders {
            match order.side {
                Side::Bid => self.open_orders.seed_bid(order.id, order.price),
                Side::Ask => self.open_orders.seed_ask(order.id, order.price),
            }
        }
        Ok(())
    }

    /// Invoked after every successfully applied live message (spec §4.4).
    /// Clears managed-order slots on `done`, then evaluates whether to
    /// post or cancel quotes given the current top of book.
    pub async fn on_event(&mut self, book: &OrderBook, event: &AppliedEvent) -> Result<(), QuoteError> {
        if let AppliedEvent::Done {
            order_id,
            side,
            reason,
        } = event
        {
            self.handle_done(order_id, *side, reason.as_deref());
        }

        if book.bids_is_empty() || book.asks_is_empty() {
            return Ok(());
        }
        book.check_not_crossed()?;
        let max_bid = book.max_bid()?;
        let min_ask = book.min_ask()?;

        self.try_post_bid(max_bid, min_ask).await?;
        self.try_post_ask(max_bid, min_ask).await?;
        self.try_cancel_stale(max_bid, min_ask).await?;
        Ok(())
    }

    fn handle_done(&mut self, order_id: &str, side: Side, reason: Option<&str>) {
        match side {
            Side::Bid => {
                let Some(resting) = &self.open_orders.bid else {
                    return;
                };
                if resting.order_id != order_id {
                    return;
                }
                if reason == Some("filled") {
                    info!("bid filled @ {}", resting.price);
                }
                self.open_orders.bid = None;
                self.open_orders.insufficient_btc = false;
            }
            Side::Ask => {
                let Some(resting) = &self.open_orders.ask else {
                    return;
                };
                if resting.order_id != order_id {
                    return;
                }
                if reason == Some("filled") {
                    info!("ask filled @ {}", resting.price);
                }
                self.open_orders.ask = None;
                self.open_orders.insufficient_usd = false;
            }
        }
    }

    async fn try_post_bid(&mut self, max_bid: Price, min_ask: Price) -> Result<(), QuoteError> {
        if self.open_orders.bid.is_some() || self.open_orders.insufficient_usd {
            return Ok(());
        }

        let (size, price) = if self.open_orders.insufficient_btc {
            (self.rebalance_size, max_bid.offset(self.open_orders.bid_rejection_bias))
        } else {
            self.spreads.bid_spread = Spreads::draw(&mut self.rng);
            let price = min_ask
                .sub_offset(self.spreads.bid_spread)
                .sub_offset(self.open_orders.bid_rejection_bias);
            (self.normal_size, price)
        };

        let response = self
            .rest
            .post_order(NewOrder {
                size,
                price,
                side: Side::Bid,
                product_id: "BTC-USD",
                post_only: true,
            })
            .await
            .map_err(|e| QuoteError::Transport(Box::new(e)))?;

        match response {
            OrderResponse::Status { id: Some(id), status } if status == "pending" => {
                info!("new bid @ {price}");
                self.open_orders.bid = Some(super::open_orders::RestingOrder { order_id: id, price });
                self.open_orders.bid_rejection_bias = Decimal::ZERO;
            }
            OrderResponse::Status { status, .. } if status == "rejected" => {
                warn!("rejected: new bid @ {price}");
                self.open_orders.bid = None;
                self.open_orders.bid_rejection_bias += REJECTION_STEP;
            }
            OrderResponse::Message { message } if message == "Insufficient funds" => {
                warn!("insufficient USD");
                self.open_orders.insufficient_usd = true;
                self.open_orders.bid = None;
            }
            other => return Err(QuoteError::UnhandledOrderResponse(format!("{other:?}"))),
        }
        Ok(())
    }

    async fn try_post_ask(&mut self, max_bid: Price, min_ask: Price) -> Result<(), QuoteError> {
        if self.open_orders.ask.is_some() || self.open_orders.insufficient_btc {
            return Ok(());
        }

        let (size, price) = if self.open_orders.insufficient_usd {
            (self.rebalance_size, min_ask.offset(self.open_orders.ask_rejection_bias))
        } else {
            self.spreads.ask_spread = Spreads::draw(&mut self.rng);
            let price = max_bid
                .offset(self.spreads.ask_spread)
                .offset(self.open_orders.ask_rejection_bias);
            (self.normal_size, price)
        };

        let response = self
            .rest
            .post_order(NewOrder {
                size,
                price,
                side: Side::Ask,
                product_id: "BTC-USD",
                post_only: true,
            })
            .await
            .map_err(|e| QuoteError::Transport(Box::new(e)))?;

        match response {
            OrderResponse::Status { id: Some(id), status } if status == "pending" => {
                info!("new ask @ {price}");
                self.open_orders.ask = Some(super::open_orders::RestingOrder { order_id: id, price });
                self.open_orders.ask_rejection_bias = Decimal::ZERO;
            }
            OrderResponse::Status { status, .. } if status == "rejected" => {
                warn!("rejected: new ask @ {price}");
                self.open_orders.ask = None;
                self.open_orders.ask_rejection_bias += REJECTION_STEP;
            }
            OrderResponse::Message { message } if message == "Insufficient funds" => {
                warn!("insufficient BTC");
                self.open_orders.insufficient_btc = true;
                self.open_orders.ask = None;
            }
            other => return Err(QuoteError::UnhandledOrderResponse(format!("{other:?}"))),
        }
        Ok(())
    }

    async fn try_cancel_stale(&mut self, max_bid: Price, min_ask: Price) -> Result<(), QuoteError> {
        if let Some(bid) = &self.open_orders.bid {
            let threshold = min_ask.sub_offset(self.spreads.bid_adjustment_spread());
            if bid.price < threshold {
                self.cancel(Side::Bid).await?;
            }
        }
        if let Some(ask) = &self.open_orders.ask {
            let threshold = max_bid.offset(self.spreads.ask_adjustment_spread());
            if ask.price > threshold {
                self.cancel(Side::Ask).await?;
            }
        }
        Ok(())
    }

    /// Cancels all currently-resting quotes (spec §4.5 clean-slate
    /// startup invariant). Errors from an already-settled order are not
    /// failures here — there is nothing resting yet to race against.
    pub async fn cancel_all(&mut self) -> Result<(), QuoteError> {
        if self.open_orders.bid.is_some() {
            self.cancel(Side::Bid).await?;
        }
        if self.open_orders.ask.is_some() {
            self.cancel(Side::Ask).await?;
        }
        Ok(())
    }

    async fn cancel(&mut self, side: Side) -> Result<(), QuoteError> {
        let resting = match side {
            Side::Bid => self.open_orders.bid.take(),
            Side::Ask => self.open_orders.ask.take(),
        };
        let Some(resting) = resting else {
            return Ok(());
        };
        let response = self
            .rest
            .cancel_order(&resting.order_id)
            .await
            .map_err(|e| QuoteError::Transport(Box::new(e)))?;

        match response.message.as_deref() {
            None => info!("canceled {side} {} @ {}", resting.order_id, resting.price),
            Some("order not found") => {
                info!("{side} already canceled: {} @ {}", resting.order_id, resting.price)
            }
            Some("Order already done") => {
                info!("{side} already filled: {} @ {}", resting.order_id, resting.price)
            }
            Some(other) => return Err(QuoteError::UnhandledCancelResponse(other.to_string())),
        }
        Ok(())
    }
}
