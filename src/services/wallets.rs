// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wallet lifecycle, asset positions, valuation, and fiat-to-crypto buys.

use crate::error::{Error, Result};
use crate::models::{Asset, Wallet};
use crate::store;
use crate::utils::valid_email;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn create_wallet(conn: &Connection, email: &str, initial_balance: Decimal) -> Result<Wallet> {
    if !valid_email(email) {
        return Err(Error::Validation(format!(
            "Invalid email for wallet creation: {}",
            email
        )));
    }
    if initial_balance < Decimal::ZERO {
        return Err(Error::Validation(
            "Initial balance must not be negative.".into(),
        ));
    }
    let user = store::find_user_by_email(conn, email)?.ok_or_else(|| {
        Error::NotFound(format!("Cannot create wallet: no user with email {}", email))
    })?;
    store::insert_wallet(conn, user.id, initial_balance)
}

/// Attaches a zero-quantity position for the cryptocurrency. At most one
/// position per (wallet, cryptocurrency) pair.
pub fn add_asset(conn: &Connection, wallet_id: i64, crypto_id: i64) -> Result<Asset> {
    let wallet = store::find_wallet(conn, wallet_id)?
        .ok_or_else(|| Error::NotFound(format!("No wallet with id {}", wallet_id)))?;
    let crypto = store::find_crypto(conn, crypto_id)?
        .ok_or_else(|| Error::NotFound(format!("No cryptocurrency with id {}", crypto_id)))?;
    if store::find_asset(conn, wallet.id, crypto.id)?.is_some() {
        return Err(Error::Validation(format!(
            "Wallet {} already holds {}.",
            wallet.id, crypto.symbol
        )));
    }
    store::insert_asset(conn, wallet.id, crypto.id, Decimal::ZERO)
}

pub fn remove_asset(conn: &Connection, wallet_id: i64, crypto_id: i64) -> Result<()> {
    let wallet = store::find_wallet(conn, wallet_id)?
        .ok_or_else(|| Error::NotFound(format!("No wallet with id {}", wallet_id)))?;
    let crypto = store::find_crypto(conn, crypto_id)?
        .ok_or_else(|| Error::NotFound(format!("No cryptocurrency with id {}", crypto_id)))?;
    let asset = store::find_asset(conn, wallet.id, crypto.id)?.ok_or_else(|| {
        Error::Validation(format!(
            "Cannot remove: wallet {} does not hold {}.",
            wallet.id, crypto.symbol
        ))
    })?;
    store::delete_asset(conn, asset.id)
}

/// Fiat balances plus quantity × current price over every wallet the user
/// owns. An unpriced cryptocurrency contributes zero.
pub fn net_worth(conn: &Connection, email: &str) -> Result<Decimal> {
    let user = store::find_user_by_email(conn, email)?
        .ok_or_else(|| Error::NotFound(format!("No user with email {}", email)))?;

    let mut total = Decimal::ZERO;
    for wallet in store::find_wallets_by_user(conn, user.id)? {
        total += wallet.fiat_balance;
        for asset in store::find_assets_by_wallet(conn, wallet.id)? {
            if let Some(crypto) = store::find_crypto(conn, asset.crypto_id)? {
                if let Some(price) = crypto.current_price {
                    total += asset.quantity * price;
                }
            }
        }
    }
    Ok(total)
}

/// Buys crypto with fiat held in the wallet: debits `fiat_amount`, credits
/// the matching position by `fiat_amount / price`, creating it at zero if
/// absent. Both mutations commit together.
pub fn invest(
    conn: &mut Connection,
    wallet_id: i64,
    crypto_id: i64,
    fiat_amount: Decimal,
) -> Result<Asset> {
    if fiat_amount <= Decimal::ZERO {
        return Err(Error::Validation(
            "Investment amount must be positive.".into(),
        ));
    }
    let wallet = store::find_wallet(conn, wallet_id)?
        .ok_or_else(|| Error::NotFound(format!("No wallet with id {}", wallet_id)))?;
    let crypto = store::find_crypto(conn, crypto_id)?
        .ok_or_else(|| Error::NotFound(format!("No cryptocurrency with id {}", crypto_id)))?;
    let price = match crypto.current_price {
        Some(p) if p > Decimal::ZERO => p,
        _ => {
            return Err(Error::IllegalState(format!(
                "{} has no configured price.",
                crypto.symbol
            )));
        }
    };
    if wallet.fiat_balance < fiat_amount {
        return Err(Error::Validation(format!(
            "Insufficient funds: wallet holds ${:.2}, attempted to invest ${:.2}",
            wallet.fiat_balance, fiat_amount
        )));
    }

    let units = fiat_amount / price;

    let tx = conn.transaction()?;
    store::update_wallet_balance(&tx, wallet.id, wallet.fiat_balance - fiat_amount)?;
    let asset = match store::find_asset(&tx, wallet.id, crypto.id)? {
        Some(a) => {
            let quantity = a.quantity + units;
            store::update_asset_quantity(&tx, a.id, quantity)?;
            Asset { quantity, ..a }
        }
        None => store::insert_asset(&tx, wallet.id, crypto.id, units)?,
    };
    tx.commit()?;
    Ok(asset)
}

pub fn delete_wallet(conn: &mut Connection, id: i64) -> Result<()> {
    if store::find_wallet(conn, id)?.is_none() {
        return Err(Error::NotFound(format!(
            "Cannot delete: no wallet with id {}",
            id
        )));
    }
    let tx = conn.transaction()?;
    store::delete_wallet_cascade(&tx, id)?;
    tx.commit()?;
    Ok(())
}

pub fn wallets_of(conn: &Connection, email: &str) -> Result<Vec<Wallet>> {
    if !valid_email(email) {
        return Err(Error::Validation(format!("Invalid email format: {}", email)));
    }
    let user = store::find_user_by_email(conn, email)?
        .ok_or_else(|| Error::NotFound(format!("No user with email {}", email)))?;
    store::find_wallets_by_user(conn, user.id)
}
