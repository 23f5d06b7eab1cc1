//! Integration tests for order book lifecycle and listing
//!
//! The book tracks every offer ever created (closed offers stay
//! addressable) and lists open ones in creation order. Reservation
//! accounting, and the Filled status path, live in the market engine and
//! are covered in test_market.

use market_simulator_core_rs::{AssetKind, MarketError, OfferStatus, OrderBook, Side};

#[test]
fn test_closed_offers_stay_addressable() {
    let mut book = OrderBook::new();
    let id = book.open("alice", Side::Sell, AssetKind::Gold, 5, 1000, 0);
    book.cancel(id, "alice").unwrap();

    // Still findable, just not open: an acceptance racing a cancel must
    // see OfferNotOpen, never OfferNotFound.
    let offer = book.get(id).unwrap();
    assert_eq!(offer.status(), OfferStatus::Cancelled);
    assert_eq!(book.iter_active().count(), 0);
}

#[test]
fn test_ids_are_monotonic_across_the_run() {
    let mut book = OrderBook::new();
    let a = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    book.cancel(a, "alice").unwrap();
    let b = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let c = book.open("bob", Side::Buy, AssetKind::Chip, 1, 100, 1);

    assert!(a < b && b < c, "IDs never reused, always increasing");
    assert_eq!(book.len(), 3, "closed offers still count toward history");
}

#[test]
fn test_listing_orders_and_filters() {
    let mut book = OrderBook::new();
    let a = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let b = book.open("bob", Side::Buy, AssetKind::Gold, 1, 90, 0);
    let c = book.open("alice", Side::Sell, AssetKind::Apple, 2, 50, 1);

    let all: Vec<u64> = book.iter_active().map(|o| o.id()).collect();
    assert_eq!(all, vec![a, b, c], "listing follows creation order");

    let gold_sells: Vec<u64> = book
        .iter_active_filtered(AssetKind::Gold, Side::Sell)
        .map(|o| o.id())
        .collect();
    assert_eq!(gold_sells, vec![a]);

    let alices: Vec<u64> = book
        .iter_active_for_owner("alice")
        .map(|o| o.id())
        .collect();
    assert_eq!(alices, vec![a, c]);
}

#[test]
fn test_expiry_skips_closed_offers() {
    let mut book = OrderBook::new();
    let cancelled = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let standing = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let fresh = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 3);
    book.cancel(cancelled, "alice").unwrap();

    let expired = book.expire_older_than(1);
    assert_eq!(expired, vec![standing]);
    assert_eq!(book.get(cancelled).unwrap().status(), OfferStatus::Cancelled);
    assert_eq!(book.get(standing).unwrap().status(), OfferStatus::Expired);
    assert!(book.get(fresh).unwrap().is_open());
}

#[test]
fn test_cancel_all_for_owner_returns_creation_order() {
    let mut book = OrderBook::new();
    let a = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let _bob = book.open("bob", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let c = book.open("alice", Side::Buy, AssetKind::Chip, 1, 100, 0);

    assert_eq!(book.cancel_all_for_owner("alice"), vec![a, c]);
    assert_eq!(book.iter_active().count(), 1);
    // Second sweep finds nothing open.
    assert!(book.cancel_all_for_owner("alice").is_empty());
}

#[test]
fn test_cancel_by_non_owner_rejected() {
    let mut book = OrderBook::new();
    let id = book.open("alice", Side::Sell, AssetKind::Gold, 1, 100, 0);
    let err = book.cancel(id, "bob").unwrap_err();
    assert_eq!(
        err,
        MarketError::NotOwner {
            offer_id: id,
            requester: "bob".to_string()
        }
    );
    assert!(book.get(id).unwrap().is_open());
}

#[test]
fn test_unknown_offer_not_found() {
    let mut book = OrderBook::new();
    let err = book.cancel(42, "alice").unwrap_err();
    assert_eq!(err, MarketError::OfferNotFound(42));
}
