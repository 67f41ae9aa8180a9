//! Price-level tree, order book, and their error type (C1 + C2).

mod book;
mod error;
mod level;
mod order;
mod tree;

pub use book::{MatchRecord, OrderBook, MATCH_HISTORY_CAPACITY};
pub use error::BookError;
pub use level::PriceLevel;
pub use order::{Order, Side};
pub use tree::PriceTree;
