// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinpurse::error::Error;
use coinpurse::services::{transfers, users, wallets};
use coinpurse::{db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

struct Seed {
    alice: i64,
    bob: i64,
    alice_wallet: i64,
    bob_wallet: i64,
    btc: i64,
}

/// Alice with a 1000-fiat wallet, Bobby with an empty one, BTC at 50000.
fn seed(conn: &mut Connection) -> Seed {
    let alice = users::create_user(conn, "Alice", "alice@example.com", "note").unwrap();
    let bob = users::create_user(conn, "Bobby", "bob@example.com", "note").unwrap();
    let alice_wallet = wallets::create_wallet(conn, "alice@example.com", dec("1000")).unwrap();
    let bob_wallet = wallets::create_wallet(conn, "bob@example.com", Decimal::ZERO).unwrap();
    let btc = store::insert_crypto(conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();
    Seed {
        alice: alice.id,
        bob: bob.id,
        alice_wallet: alice_wallet.id,
        bob_wallet: bob_wallet.id,
        btc: btc.id,
    }
}

#[test]
fn invest_then_transfer_moves_units_not_fiat() {
    let mut conn = setup();
    let s = seed(&mut conn);

    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();
    let transfer =
        transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("500")).unwrap();

    assert_eq!(transfer.quantity, dec("0.01"));
    assert_eq!(transfer.sender_id, s.alice);
    assert_eq!(transfer.receiver_id, s.bob);

    let sender_asset = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    assert_eq!(sender_asset.quantity, Decimal::ZERO);
    let receiver_asset = store::find_asset(&conn, s.bob_wallet, s.btc).unwrap().unwrap();
    assert_eq!(receiver_asset.quantity, dec("0.01"));

    // Transfers move crypto units; the fiat balance stays where invest left it
    let alice_wallet = store::find_wallet(&conn, s.alice_wallet).unwrap().unwrap();
    assert_eq!(alice_wallet.fiat_balance, dec("500"));
    let bob_wallet = store::find_wallet(&conn, s.bob_wallet).unwrap().unwrap();
    assert_eq!(bob_wallet.fiat_balance, Decimal::ZERO);
}

#[test]
fn transfer_conserves_units_on_both_sides() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("800")).unwrap();

    let before_sender = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    let transfer =
        transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("300")).unwrap();
    let after_sender = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    let after_receiver = store::find_asset(&conn, s.bob_wallet, s.btc).unwrap().unwrap();

    assert_eq!(before_sender.quantity - transfer.quantity, after_sender.quantity);
    assert_eq!(after_receiver.quantity, transfer.quantity);
}

#[test]
fn self_transfer_is_rejected() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    let err = transfers::execute(&mut conn, s.alice, s.alice, s.alice_wallet, "BTC", dec("100"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let asset = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    assert_eq!(asset.quantity, dec("0.01"));
}

#[test]
fn nonpositive_amount_is_rejected_untouched() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    for amount in ["0", "-500"] {
        let err = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec(amount))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
    let asset = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    assert_eq!(asset.quantity, dec("0.01"));
    assert!(store::find_transfers_by_user(&conn, s.alice).unwrap().is_empty());
}

#[test]
fn unknown_parties_and_symbols_are_not_found() {
    let mut conn = setup();
    let s = seed(&mut conn);

    let err = transfers::execute(&mut conn, 99, s.bob, s.alice_wallet, "BTC", dec("1")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err =
        transfers::execute(&mut conn, s.alice, 99, s.alice_wallet, "BTC", dec("1")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err =
        transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "XRP", dec("1")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = transfers::execute(&mut conn, s.alice, s.bob, 99, "BTC", dec("1")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn unpriced_crypto_is_illegal_state() {
    let mut conn = setup();
    let s = seed(&mut conn);
    store::insert_crypto(&conn, "Dogecoin", "DOGE", None).unwrap();

    let err = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "DOGE", dec("1"))
        .unwrap_err();
    assert!(matches!(err, Error::IllegalState(_)));
}

#[test]
fn foreign_wallet_is_a_security_error() {
    let mut conn = setup();
    let s = seed(&mut conn);

    let err = transfers::execute(&mut conn, s.alice, s.bob, s.bob_wallet, "BTC", dec("100"))
        .unwrap_err();
    assert!(matches!(err, Error::Security(_)));
}

#[test]
fn missing_position_is_a_validation_error() {
    let mut conn = setup();
    let s = seed(&mut conn);

    let err = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("100"))
        .unwrap_err();
    match err {
        Error::Validation(msg) => assert!(msg.contains("Bitcoin")),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[test]
fn insufficient_units_names_held_and_requested_figures() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    let err = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("600"))
        .unwrap_err();
    match err {
        Error::Validation(msg) => {
            assert!(msg.contains("0.0100"), "held units missing in '{}'", msg);
            assert!(msg.contains("500.00"), "held value missing in '{}'", msg);
            assert!(msg.contains("600.00"), "requested value missing in '{}'", msg);
        }
        other => panic!("expected Validation, got {:?}", other),
    }

    // Nothing changed anywhere
    let asset = store::find_asset(&conn, s.alice_wallet, s.btc).unwrap().unwrap();
    assert_eq!(asset.quantity, dec("0.01"));
    assert!(store::find_asset(&conn, s.bob_wallet, s.btc).unwrap().is_none());
    assert!(store::find_transfers_by_user(&conn, s.alice).unwrap().is_empty());
}

#[test]
fn receiver_without_wallet_rolls_back_the_debit() {
    let mut conn = setup();
    let alice = users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let carol = users::create_user(&mut conn, "Carol", "carol@example.com", "note").unwrap();
    let alice_wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();
    wallets::invest(&mut conn, alice_wallet.id, btc.id, dec("500")).unwrap();

    let err = transfers::execute(&mut conn, alice.id, carol.id, alice_wallet.id, "BTC", dec("100"))
        .unwrap_err();
    assert!(matches!(err, Error::IllegalState(_)));

    // The sender debit happened before the receiver lookup failed; the
    // transaction rollback must have undone it.
    let asset = store::find_asset(&conn, alice_wallet.id, btc.id).unwrap().unwrap();
    assert_eq!(asset.quantity, dec("0.01"));
    assert!(store::find_transfers_by_user(&conn, alice.id).unwrap().is_empty());
}

#[test]
fn transfer_credits_receivers_lowest_id_wallet() {
    let mut conn = setup();
    let s = seed(&mut conn);
    let bob_second = wallets::create_wallet(&conn, "bob@example.com", dec("10")).unwrap();
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("500")).unwrap();

    let first = store::find_asset(&conn, s.bob_wallet, s.btc).unwrap();
    let second = store::find_asset(&conn, bob_second.id, s.btc).unwrap();
    assert_eq!(first.unwrap().quantity, dec("0.01"));
    assert!(second.is_none());
}

#[test]
fn transfer_annotates_both_histories() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("500")).unwrap();

    let sender_log = store::find_history_by_user(&conn, s.alice).unwrap().unwrap();
    assert!(
        sender_log.detail.contains("[SENT] $500.00 (0.0100 BTC) to Bobby"),
        "got '{}'",
        sender_log.detail
    );
    let receiver_log = store::find_history_by_user(&conn, s.bob).unwrap().unwrap();
    assert!(
        receiver_log
            .detail
            .contains("[RECEIVED] $500.00 (0.0100 BTC) from Alice"),
        "got '{}'",
        receiver_log.detail
    );
}

#[test]
fn transfers_of_lists_newest_first_for_both_sides() {
    let mut conn = setup();
    let s = seed(&mut conn);
    wallets::invest(&mut conn, s.alice_wallet, s.btc, dec("500")).unwrap();

    let t1 = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("100"))
        .unwrap();
    let t2 = transfers::execute(&mut conn, s.alice, s.bob, s.alice_wallet, "BTC", dec("100"))
        .unwrap();

    let mine = transfers::transfers_of(&conn, s.alice).unwrap();
    let theirs = transfers::transfers_of(&conn, s.bob).unwrap();
    assert_eq!(mine.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t2.id, t1.id]);
    assert_eq!(theirs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t2.id, t1.id]);

    let err = transfers::transfers_of(&conn, 99).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
