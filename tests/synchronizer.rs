//! Integration tests for the feed synchronizer (C3), against in-memory
//! `ExchangeFeed`/`ExchangeRest` fakes (spec §4.3, §8 P3/P4).

mod support;

use btcusd_mm::book::Side;
use btcusd_mm::exchange::Snapshot;
use btcusd_mm::sync::{Phase, SyncError, Synchronizer};
use support::{snapshot_entry, FakeFeed, FakeRest};

fn frame(seq: u64, extra: &str) -> String {
    format!(r#"{{"sequence":{seq},{extra}}}"#)
}

fn open_frame(seq: u64, side: &str, order_id: &str, price: &str) -> String {
    frame(
        seq,
        &format!(
            r#""type":"open","side":"{side}","order_id":"{order_id}","remaining_size":"1","price":"{price}""#
        ),
    )
}

fn snapshot(sequence: u64) -> Snapshot {
    Snapshot {
        sequence,
        bids: vec![snapshot_entry("100.00", "1", "A")],
        asks: vec![snapshot_entry("101.00", "1", "B")],
    }
}

#[tokio::test]
async fn bootstrap_then_replay_reaches_live_phase() {
    let feed = FakeFeed::new(vec![open_frame(1001, "sell", "C", "102.00")]);
    let rest = FakeRest::new(snapshot(1000));
    let mut sync = Synchronizer::new(feed, rest, "BTC-USD", 10);

    let (mut book, buffered) = sync.bootstrap().await.unwrap();
    assert_eq!(sync.phase(), Phase::Replaying);

    let events = sync.replay(&mut book, buffered).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(sync.phase(), Phase::Live);
    assert_eq!(book.max_bid().unwrap(), "100.00".parse().unwrap());
    assert_eq!(book.min_ask().unwrap(), "101.00".parse().unwrap());
}

#[tokio::test]
async fn replay_is_idempotent_regardless_of_snapshot_overlap() {
    // Spec P3: frames at/under the snapshot sequence are discarded, and the
    // resulting book is identical whether or not the buffered prefix
    // contains them.
    let overlapping = vec![
        frame(999, r#""type":"open","side":"buy","order_id":"stale","remaining_size":"1","price":"50.00""#),
        open_frame(1001, "sell", "C", "102.00"),
    ];
    let clean = vec![open_frame(1001, "sell", "C", "102.00")];

    let mut book_a = snapshot_book(1000);
    let mut sync_a = Synchronizer::new(FakeFeed::new(vec![]), FakeRest::new(snapshot(1000)), "BTC-USD", 0);
    sync_a.replay(&mut book_a, overlapping).unwrap();

    let mut book_b = snapshot_book(1000);
    let mut sync_b = Synchronizer::new(FakeFeed::new(vec![]), FakeRest::new(snapshot(1000)), "BTC-USD", 0);
    sync_b.replay(&mut book_b, clean).unwrap();

    assert_eq!(book_a.max_bid().unwrap(), book_b.max_bid().unwrap());
    assert_eq!(book_a.min_ask().unwrap(), book_b.min_ask().unwrap());
    assert_eq!(book_a.last_applied_sequence, book_b.last_applied_sequence);
}

fn snapshot_book(sequence: u64) -> btcusd_mm::book::OrderBook {
    let book = btcusd_mm::book::OrderBook::new();
    book.insert_order("A".into(), "1".parse().unwrap(), "100.00".parse().unwrap(), Side::Bid, true);
    book.insert_order("B".into(), "1".parse().unwrap(), "101.00".parse().unwrap(), Side::Ask, true);
    let mut book = book;
    book.snapshot_sequence = sequence;
    book.last_applied_sequence = sequence;
    book
}

#[tokio::test]
async fn sequence_gap_aborts_the_session() {
    // Spec P4: a single gap aborts; without it, the same stream never does.
    let feed = FakeFeed::new(vec![
        open_frame(1001, "sell", "C", "102.00"),
        open_frame(1003, "sell", "D", "103.00"),
    ]);
    let rest = FakeRest::new(snapshot(1000));
    let mut sync = Synchronizer::new(feed, rest, "BTC-USD", 10);
    let (mut book, buffered) = sync.bootstrap().await.unwrap();
    let err = sync.replay(&mut book, buffered);
    assert!(matches!(err, Err(SyncError::SequenceGap { expected: 1002, got: 1003 })));
    assert_eq!(sync.phase(), Phase::Aborted);
}

#[tokio::test]
async fn no_gap_never_aborts() {
    let feed = FakeFeed::new(vec![
        open_frame(1001, "sell", "C", "102.00"),
        open_frame(1002, "sell", "D", "103.00"),
        open_frame(1003, "sell", "E", "104.00"),
    ]);
    let rest = FakeRest::new(snapshot(1000));
    let mut sync = Synchronizer::new(feed, rest, "BTC-USD", 10);
    let (mut book, buffered) = sync.bootstrap().await.unwrap();
    let events = sync.replay(&mut book, buffered).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(sync.phase(), Phase::Live);
}
