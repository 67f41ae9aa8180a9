//! Level-3 order book synchronizer and inventory-aware market maker for a
//! single BTC-USD venue feed.
//!
//! - [`book`] — price-level tree and order book (C1, C2).
//! - [`sync`] — REST snapshot + websocket replay/live feed synchronizer (C3).
//! - [`quotes`] — single resting bid/ask quote manager (C4).
//! - [`supervisor`] — session reconnect loop with exponential backoff (C5).
//! - [`exchange`] — REST/websocket collaborator traits and their
//!   `reqwest`/`tokio-tungstenite` implementations.
//! - [`price`] — fixed-scale cent price type used throughout the book.
//! - [`config`] / [`logging`] — ambient configuration and structured
//!   logging setup.

pub mod book;
pub mod config;
pub mod exchange;
pub mod logging;
pub mod price;
pub mod quotes;
pub mod supervisor;
pub mod sync;
