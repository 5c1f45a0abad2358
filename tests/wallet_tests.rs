// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinpurse::error::Error;
use coinpurse::services::{users, wallets};
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

#[test]
fn create_wallet_requires_existing_user() {
    let conn = setup();
    let err = wallets::create_wallet(&conn, "ghost@example.com", Decimal::ZERO).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn create_wallet_rejects_bad_email_and_negative_balance() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();

    let err = wallets::create_wallet(&conn, "not-an-email", Decimal::ZERO).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = wallets::create_wallet(&conn, "alice@example.com", dec("-1")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn add_asset_starts_at_zero_and_rejects_duplicates() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("100")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    let asset = wallets::add_asset(&conn, wallet.id, btc.id).unwrap();
    assert_eq!(asset.quantity, Decimal::ZERO);

    let err = wallets::add_asset(&conn, wallet.id, btc.id).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn add_asset_missing_wallet_or_crypto_is_not_found() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("100")).unwrap();

    let err = wallets::add_asset(&conn, 99, 1).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = wallets::add_asset(&conn, wallet.id, 99).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn remove_asset_rejects_absent_position() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("100")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    let err = wallets::remove_asset(&conn, wallet.id, btc.id).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn remove_then_re_add_resets_quantity_to_zero() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    wallets::invest(&mut conn, wallet.id, btc.id, dec("500")).unwrap();
    let held = store::find_asset(&conn, wallet.id, btc.id).unwrap().unwrap();
    assert!(held.quantity > Decimal::ZERO);

    wallets::remove_asset(&conn, wallet.id, btc.id).unwrap();
    let fresh = wallets::add_asset(&conn, wallet.id, btc.id).unwrap();
    assert_eq!(fresh.quantity, Decimal::ZERO);
}

#[test]
fn invest_debits_fiat_and_credits_units() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    let asset = wallets::invest(&mut conn, wallet.id, btc.id, dec("500")).unwrap();
    assert_eq!(asset.quantity, dec("0.01"));

    let wallet = store::find_wallet(&conn, wallet.id).unwrap().unwrap();
    assert_eq!(wallet.fiat_balance, dec("500"));
}

#[test]
fn invest_composes_additively() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    wallets::invest(&mut conn, wallet.id, btc.id, dec("500")).unwrap();
    let asset = wallets::invest(&mut conn, wallet.id, btc.id, dec("500")).unwrap();
    assert_eq!(asset.quantity, dec("0.02"));

    let wallet = store::find_wallet(&conn, wallet.id).unwrap().unwrap();
    assert_eq!(wallet.fiat_balance, Decimal::ZERO);
}

#[test]
fn invest_rejects_nonpositive_amount() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    for amount in ["0", "-10"] {
        let err = wallets::invest(&mut conn, wallet.id, btc.id, dec(amount)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}

#[test]
fn invest_requires_a_configured_price() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let doge = store::insert_crypto(&conn, "Dogecoin", "DOGE", None).unwrap();

    let err = wallets::invest(&mut conn, wallet.id, doge.id, dec("100")).unwrap_err();
    assert!(matches!(err, Error::IllegalState(_)));
}

#[test]
fn invest_insufficient_funds_names_both_figures() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("100")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();

    let err = wallets::invest(&mut conn, wallet.id, btc.id, dec("250")).unwrap_err();
    match err {
        Error::Validation(msg) => {
            assert!(msg.contains("100.00"));
            assert!(msg.contains("250.00"));
        }
        other => panic!("expected Validation, got {:?}", other),
    }
    // Nothing moved
    let wallet = store::find_wallet(&conn, wallet.id).unwrap().unwrap();
    assert_eq!(wallet.fiat_balance, dec("100"));
    assert!(store::find_asset(&conn, wallet.id, btc.id).unwrap().is_none());
}

#[test]
fn net_worth_counts_priced_assets_and_skips_unpriced() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let w1 = wallets::create_wallet(&conn, "alice@example.com", dec("100")).unwrap();
    let w2 = wallets::create_wallet(&conn, "alice@example.com", dec("50")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();
    let doge = store::insert_crypto(&conn, "Dogecoin", "DOGE", None).unwrap();

    store::insert_asset(&conn, w1.id, btc.id, dec("0.01")).unwrap();
    store::insert_asset(&conn, w2.id, doge.id, dec("1000")).unwrap();

    // 100 + 50 fiat, 0.01 BTC at 50000 = 500, DOGE unpriced contributes zero
    let total = wallets::net_worth(&conn, "alice@example.com").unwrap();
    assert_eq!(total, dec("650"));
}

#[test]
fn net_worth_unknown_user_is_not_found() {
    let conn = setup();
    let err = wallets::net_worth(&conn, "ghost@example.com").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn delete_wallet_cascades_positions() {
    let mut conn = setup();
    users::create_user(&mut conn, "Alice", "alice@example.com", "note").unwrap();
    let wallet = wallets::create_wallet(&conn, "alice@example.com", dec("1000")).unwrap();
    let btc = store::insert_crypto(&conn, "Bitcoin", "BTC", Some(dec("50000"))).unwrap();
    wallets::invest(&mut conn, wallet.id, btc.id, dec("500")).unwrap();

    wallets::delete_wallet(&mut conn, wallet.id).unwrap();

    assert!(store::find_wallet(&conn, wallet.id).unwrap().is_none());
    assert!(store::find_asset(&conn, wallet.id, btc.id).unwrap().is_none());
    // The cryptocurrency itself survives and is unused again
    let unused = store::find_unused_cryptos(&conn).unwrap();
    assert!(unused.iter().any(|c| c.id == btc.id));
}

#[test]
fn delete_missing_wallet_is_not_found() {
    let mut conn = setup();
    let err = wallets::delete_wallet(&mut conn, 42).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
