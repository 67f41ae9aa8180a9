//! Feed synchronizer (C3): reconciles the REST snapshot with the live
//! per-order websocket stream (spec §4.3).

mod error;
mod message;
mod synchronizer;

pub use error::SyncError;
pub use message::{AppliedEvent, RawMessage};
pub use synchronizer::{apply_message, Phase, Synchronizer};
