// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-user asset transfers. The caller names a fiat amount; the service
//! converts it to crypto units at the current price, moves the units between
//! the two wallets, records the transfer, and annotates both histories,
//! all inside a single transaction. Any failure rolls the whole thing back.

use crate::error::{Error, Result};
use crate::models::Transfer;
use crate::store;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn execute(
    conn: &mut Connection,
    sender_id: i64,
    receiver_id: i64,
    sender_wallet_id: i64,
    symbol: &str,
    fiat_amount: Decimal,
) -> Result<Transfer> {
    if fiat_amount <= Decimal::ZERO {
        return Err(Error::Validation("Transfer amount must be positive.".into()));
    }
    if sender_id == receiver_id {
        return Err(Error::Validation(
            "You cannot send assets to yourself.".into(),
        ));
    }

    // Dropping the transaction on any early return rolls everything back.
    let tx = conn.transaction()?;

    let sender = store::find_user(&tx, sender_id)?
        .ok_or_else(|| Error::NotFound(format!("No sender with id {}", sender_id)))?;
    let receiver = store::find_user(&tx, receiver_id)?
        .ok_or_else(|| Error::NotFound(format!("No receiver with id {}", receiver_id)))?;
    let crypto = store::find_crypto_by_symbol(&tx, symbol)?
        .ok_or_else(|| Error::NotFound(format!("Unsupported cryptocurrency: {}", symbol)))?;

    let price = match crypto.current_price {
        Some(p) if p > Decimal::ZERO => p,
        _ => {
            return Err(Error::IllegalState(format!(
                "{} has no configured price.",
                crypto.symbol
            )));
        }
    };
    let units = fiat_amount / price;

    let sender_wallet = store::find_wallet(&tx, sender_wallet_id)?
        .ok_or_else(|| Error::NotFound(format!("No wallet with id {}", sender_wallet_id)))?;
    if sender_wallet.user_id != sender.id {
        return Err(Error::Security(format!(
            "Wallet {} does not belong to {}.",
            sender_wallet.id, sender.name
        )));
    }

    let sender_asset = store::find_asset(&tx, sender_wallet.id, crypto.id)?.ok_or_else(|| {
        Error::Validation(format!(
            "You do not hold {} in this wallet.",
            crypto.name
        ))
    })?;
    if sender_asset.quantity < units {
        return Err(Error::Validation(format!(
            "Insufficient balance: you hold {:.4} {} (worth ${:.2}), attempted to send ${:.2}",
            sender_asset.quantity,
            crypto.symbol,
            sender_asset.quantity * price,
            fiat_amount
        )));
    }

    store::update_asset_quantity(&tx, sender_asset.id, sender_asset.quantity - units)?;

    // Lowest-id wallet of the receiver takes the credit.
    let receiver_wallet = store::first_wallet_of_user(&tx, receiver.id)?.ok_or_else(|| {
        Error::IllegalState(format!(
            "{} has no wallet able to receive assets.",
            receiver.name
        ))
    })?;
    match store::find_asset(&tx, receiver_wallet.id, crypto.id)? {
        Some(asset) => store::update_asset_quantity(&tx, asset.id, asset.quantity + units)?,
        None => {
            store::insert_asset(&tx, receiver_wallet.id, crypto.id, units)?;
        }
    }

    let transfer = store::insert_transfer(&tx, sender.id, receiver.id, crypto.id, units, Utc::now())?;

    let detail = format!("${:.2} ({:.4} {})", fiat_amount, units, crypto.symbol);
    if let Some(history) = store::find_history_by_user(&tx, sender.id)? {
        store::append_history(&tx, history.id, &format!("[SENT] {} to {}", detail, receiver.name))?;
    }
    if let Some(history) = store::find_history_by_user(&tx, receiver.id)? {
        store::append_history(
            &tx,
            history.id,
            &format!("[RECEIVED] {} from {}", detail, sender.name),
        )?;
    }

    tx.commit()?;
    Ok(transfer)
}

/// Transfers where the user appears as sender or receiver, newest first.
pub fn transfers_of(conn: &Connection, user_id: i64) -> Result<Vec<Transfer>> {
    if store::find_user(conn, user_id)?.is_none() {
        return Err(Error::NotFound(format!("No user with id {}", user_id)));
    }
    store::find_transfers_by_user(conn, user_id)
}
