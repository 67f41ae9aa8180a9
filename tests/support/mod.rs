//! In-memory fakes for `ExchangeRest`/`ExchangeFeed`, shared across the
//! integration test binaries (spec §6: "No network or real exchange access
//! in tests").

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use btcusd_mm::exchange::{
    CancelResponse, ExchangeFeed, ExchangeRest, NewOrder, OpenOrderEntry, OrderResponse, Snapshot,
    SnapshotEntry,
};

#[derive(Debug)]
pub struct FakeError(pub String);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FakeError {}

/// A scripted websocket feed: yields `frames` one at a time, then closes.
pub struct FakeFeed {
    frames: VecDeque<String>,
}

impl FakeFeed {
    pub fn new(frames: Vec<String>) -> Self {
        FakeFeed {
            frames: frames.into(),
        }
    }
}

#[async_trait]
impl ExchangeFeed for FakeFeed {
    type Error = FakeError;

    async fn connect_and_subscribe(&mut self, _product_id: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn recv_message(&mut self) -> Result<Option<String>, Self::Error> {
        Ok(self.frames.pop_front())
    }
}

struct Inner {
    snapshot: Snapshot,
    open_orders: Vec<OpenOrderEntry>,
    post_responses: Mutex<VecDeque<OrderResponse>>,
    cancel_responses: Mutex<VecDeque<CancelResponse>>,
    posted: Mutex<Vec<NewOrder>>,
    cancelled: Mutex<Vec<String>>,
}

/// A scripted REST backend: returns a fixed snapshot/open-orders list, and
/// records every posted/cancelled order so tests can assert on them.
///
/// Cheap to clone: every clone shares the same recorded state, matching
/// how the supervisor clones its `ExchangeRest` into both the quote
/// manager and each session's synchronizer.
#[derive(Clone)]
pub struct FakeRest(Arc<Inner>);

impl FakeRest {
    pub fn new(snapshot: Snapshot) -> Self {
        FakeRest(Arc::new(Inner {
            snapshot,
            open_orders: Vec::new(),
            post_responses: Mutex::new(VecDeque::new()),
            cancel_responses: Mutex::new(VecDeque::new()),
            posted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }))
    }

    pub fn with_open_orders(snapshot: Snapshot, open_orders: Vec<OpenOrderEntry>) -> Self {
        FakeRest(Arc::new(Inner {
            snapshot,
            open_orders,
            post_responses: Mutex::new(VecDeque::new()),
            cancel_responses: Mutex::new(VecDeque::new()),
            posted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }))
    }

    pub fn push_post_response(&self, response: OrderResponse) {
        self.0.post_responses.lock().unwrap().push_back(response);
    }

    pub fn push_cancel_response(&self, response: CancelResponse) {
        self.0.cancel_responses.lock().unwrap().push_back(response);
    }

    pub fn posted(&self) -> Vec<NewOrder> {
        self.0.posted.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.0.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeRest for FakeRest {
    type Error = FakeError;

    async fn get_snapshot(&self) -> Result<Snapshot, Self::Error> {
        Ok(self.0.snapshot.clone())
    }

    async fn get_open_orders(&self) -> Result<Vec<OpenOrderEntry>, Self::Error> {
        Ok(self.0.open_orders.clone())
    }

    async fn post_order(&self, order: NewOrder) -> Result<OrderResponse, Self::Error> {
        self.0.posted.lock().unwrap().push(order);
        Ok(self
            .0
            .post_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(OrderResponse::Status {
                id: Some("default".into()),
                status: "pending".into(),
            }))
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelResponse, Self::Error> {
        self.0.cancelled.lock().unwrap().push(order_id.to_string());
        Ok(self
            .0
            .cancel_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// A minimal snapshot, for tests that exercise the quote manager and only
/// need `FakeRest::get_snapshot` to return something well-formed.
pub fn snapshot_entry_book() -> Snapshot {
    Snapshot {
        sequence: 1,
        bids: vec![snapshot_entry("100.00", "1", "seed-bid")],
        asks: vec![snapshot_entry("100.50", "1", "seed-ask")],
    }
}

pub fn snapshot_entry(price: &str, size: &str, order_id: &str) -> SnapshotEntry {
    SnapshotEntry {
        price: price.parse().unwrap(),
        size: size.parse::<Decimal>().unwrap(),
        order_id: order_id.to_string(),
    }
}
