//! External collaborators: REST and websocket clients, kept behind traits
//! so the core engine (`book`, `sync`, `quotes`, `supervisor`) never
//! depends on a concrete transport (spec §1/§6).

mod rest;
mod types;
mod ws;

pub use rest::{ExchangeRest, NullSigner, ReqwestExchange, RequestSigner, RestEndpoints};
pub use types::{CancelResponse, NewOrder, OpenOrderEntry, OrderResponse, Snapshot, SnapshotEntry};
pub use ws::{ExchangeFeed, TungsteniteFeed};
