// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Repository layer: every statement that touches the ledger tables lives
//! here. Services call these functions with an explicit connection (or an
//! open transaction, which derefs to one) and never write SQL themselves.

use crate::error::Result;
use crate::models::{Asset, Cryptocurrency, History, Transfer, User, Wallet};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str_exact(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn opt_decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => Decimal::from_str_exact(&s)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

fn datetime_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(r: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        name: r.get(1)?,
        email: r.get(2)?,
    })
}

fn wallet_from_row(r: &Row) -> rusqlite::Result<Wallet> {
    Ok(Wallet {
        id: r.get(0)?,
        user_id: r.get(1)?,
        fiat_balance: decimal_col(r, 2)?,
    })
}

fn crypto_from_row(r: &Row) -> rusqlite::Result<Cryptocurrency> {
    Ok(Cryptocurrency {
        id: r.get(0)?,
        name: r.get(1)?,
        symbol: r.get(2)?,
        current_price: opt_decimal_col(r, 3)?,
    })
}

fn asset_from_row(r: &Row) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: r.get(0)?,
        wallet_id: r.get(1)?,
        crypto_id: r.get(2)?,
        quantity: decimal_col(r, 3)?,
    })
}

fn transfer_from_row(r: &Row) -> rusqlite::Result<Transfer> {
    Ok(Transfer {
        id: r.get(0)?,
        sender_id: r.get(1)?,
        receiver_id: r.get(2)?,
        crypto_id: r.get(3)?,
        quantity: decimal_col(r, 4)?,
        executed_at: datetime_col(r, 5)?,
    })
}

fn history_from_row(r: &Row) -> rusqlite::Result<History> {
    Ok(History {
        id: r.get(0)?,
        user_id: r.get(1)?,
        detail: r.get(2)?,
    })
}

// --- users ---

pub fn insert_user(conn: &Connection, name: &str, email: &str) -> Result<User> {
    conn.execute(
        "INSERT INTO users(name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

pub fn find_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, name, email FROM users WHERE id=?1",
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, name, email FROM users WHERE email=?1",
            params![email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;
    let rows = stmt.query_map([], user_from_row)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn find_users_by_name_prefix(conn: &Connection, prefix: &str) -> Result<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, name, email FROM users WHERE name LIKE ?1 || '%' ORDER BY name")?;
    let rows = stmt.query_map(params![prefix], user_from_row)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn find_users_with_multiple_wallets(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.email FROM users u
         JOIN wallets w ON w.user_id = u.id
         GROUP BY u.id HAVING COUNT(w.id) > 1 ORDER BY u.id",
    )?;
    let rows = stmt.query_map([], user_from_row)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn find_users_holding_symbol(conn: &Connection, symbol: &str) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT u.id, u.name, u.email FROM users u
         JOIN wallets w ON w.user_id = u.id
         JOIN assets a ON a.wallet_id = w.id
         JOIN cryptocurrencies c ON c.id = a.crypto_id
         WHERE c.symbol = ?1 ORDER BY u.id",
    )?;
    let rows = stmt.query_map(params![symbol], user_from_row)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

/// Explicit cascade: transfers on either side, assets of every owned wallet,
/// the wallets, the history, then the user row. The caller owns the
/// surrounding transaction.
pub fn delete_user_cascade(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM transfers WHERE sender_id=?1 OR receiver_id=?1",
        params![user_id],
    )?;
    conn.execute(
        "DELETE FROM assets WHERE wallet_id IN (SELECT id FROM wallets WHERE user_id=?1)",
        params![user_id],
    )?;
    conn.execute("DELETE FROM wallets WHERE user_id=?1", params![user_id])?;
    conn.execute("DELETE FROM histories WHERE user_id=?1", params![user_id])?;
    conn.execute("DELETE FROM users WHERE id=?1", params![user_id])?;
    Ok(())
}

// --- histories ---

pub fn insert_history(conn: &Connection, user_id: i64, detail: &str) -> Result<History> {
    conn.execute(
        "INSERT INTO histories(user_id, detail) VALUES (?1, ?2)",
        params![user_id, detail],
    )?;
    Ok(History {
        id: conn.last_insert_rowid(),
        user_id,
        detail: detail.to_string(),
    })
}

pub fn find_history_by_user(conn: &Connection, user_id: i64) -> Result<Option<History>> {
    let history = conn
        .query_row(
            "SELECT id, user_id, detail FROM histories WHERE user_id=?1",
            params![user_id],
            history_from_row,
        )
        .optional()?;
    Ok(history)
}

pub fn find_history_by_email(conn: &Connection, email: &str) -> Result<Option<History>> {
    let history = conn
        .query_row(
            "SELECT h.id, h.user_id, h.detail FROM histories h
             JOIN users u ON u.id = h.user_id WHERE u.email=?1",
            params![email],
            history_from_row,
        )
        .optional()?;
    Ok(history)
}

pub fn append_history(conn: &Connection, history_id: i64, entry: &str) -> Result<()> {
    conn.execute(
        "UPDATE histories SET detail = detail || char(10) || ?2 WHERE id=?1",
        params![history_id, entry],
    )?;
    Ok(())
}

// --- wallets ---

pub fn insert_wallet(conn: &Connection, user_id: i64, fiat_balance: Decimal) -> Result<Wallet> {
    conn.execute(
        "INSERT INTO wallets(user_id, fiat_balance) VALUES (?1, ?2)",
        params![user_id, fiat_balance.to_string()],
    )?;
    Ok(Wallet {
        id: conn.last_insert_rowid(),
        user_id,
        fiat_balance,
    })
}

pub fn find_wallet(conn: &Connection, id: i64) -> Result<Option<Wallet>> {
    let wallet = conn
        .query_row(
            "SELECT id, user_id, fiat_balance FROM wallets WHERE id=?1",
            params![id],
            wallet_from_row,
        )
        .optional()?;
    Ok(wallet)
}

pub fn find_wallets_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Wallet>> {
    let mut stmt =
        conn.prepare("SELECT id, user_id, fiat_balance FROM wallets WHERE user_id=?1 ORDER BY id")?;
    let rows = stmt.query_map(params![user_id], wallet_from_row)?;
    let mut wallets = Vec::new();
    for row in rows {
        wallets.push(row?);
    }
    Ok(wallets)
}

/// Receiving wallet for a transfer: the owner's lowest-id wallet.
pub fn first_wallet_of_user(conn: &Connection, user_id: i64) -> Result<Option<Wallet>> {
    let wallet = conn
        .query_row(
            "SELECT id, user_id, fiat_balance FROM wallets WHERE user_id=?1 ORDER BY id LIMIT 1",
            params![user_id],
            wallet_from_row,
        )
        .optional()?;
    Ok(wallet)
}

pub fn update_wallet_balance(conn: &Connection, wallet_id: i64, balance: Decimal) -> Result<()> {
    conn.execute(
        "UPDATE wallets SET fiat_balance=?2 WHERE id=?1",
        params![wallet_id, balance.to_string()],
    )?;
    Ok(())
}

pub fn wallets_with_balance_above(conn: &Connection, min: Decimal) -> Result<Vec<Wallet>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, fiat_balance FROM wallets
         WHERE CAST(fiat_balance AS REAL) > CAST(?1 AS REAL) ORDER BY id",
    )?;
    let rows = stmt.query_map(params![min.to_string()], wallet_from_row)?;
    let mut wallets = Vec::new();
    for row in rows {
        wallets.push(row?);
    }
    Ok(wallets)
}

/// Explicit cascade: the wallet's assets, then the wallet.
pub fn delete_wallet_cascade(conn: &Connection, wallet_id: i64) -> Result<()> {
    conn.execute("DELETE FROM assets WHERE wallet_id=?1", params![wallet_id])?;
    conn.execute("DELETE FROM wallets WHERE id=?1", params![wallet_id])?;
    Ok(())
}

// --- cryptocurrencies ---

pub fn insert_crypto(
    conn: &Connection,
    name: &str,
    symbol: &str,
    current_price: Option<Decimal>,
) -> Result<Cryptocurrency> {
    conn.execute(
        "INSERT INTO cryptocurrencies(name, symbol, current_price) VALUES (?1, ?2, ?3)",
        params![name, symbol, current_price.map(|p| p.to_string())],
    )?;
    Ok(Cryptocurrency {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        current_price,
    })
}

pub fn find_crypto(conn: &Connection, id: i64) -> Result<Option<Cryptocurrency>> {
    let crypto = conn
        .query_row(
            "SELECT id, name, symbol, current_price FROM cryptocurrencies WHERE id=?1",
            params![id],
            crypto_from_row,
        )
        .optional()?;
    Ok(crypto)
}

pub fn find_crypto_by_symbol(conn: &Connection, symbol: &str) -> Result<Option<Cryptocurrency>> {
    let crypto = conn
        .query_row(
            "SELECT id, name, symbol, current_price FROM cryptocurrencies WHERE symbol=?1",
            params![symbol],
            crypto_from_row,
        )
        .optional()?;
    Ok(crypto)
}

pub fn find_crypto_by_name(conn: &Connection, name: &str) -> Result<Option<Cryptocurrency>> {
    let crypto = conn
        .query_row(
            "SELECT id, name, symbol, current_price FROM cryptocurrencies WHERE name=?1",
            params![name],
            crypto_from_row,
        )
        .optional()?;
    Ok(crypto)
}

pub fn list_cryptos(conn: &Connection) -> Result<Vec<Cryptocurrency>> {
    let mut stmt =
        conn.prepare("SELECT id, name, symbol, current_price FROM cryptocurrencies ORDER BY symbol")?;
    let rows = stmt.query_map([], crypto_from_row)?;
    let mut cryptos = Vec::new();
    for row in rows {
        cryptos.push(row?);
    }
    Ok(cryptos)
}

pub fn update_crypto_price(
    conn: &Connection,
    crypto_id: i64,
    price: Option<Decimal>,
) -> Result<()> {
    conn.execute(
        "UPDATE cryptocurrencies SET current_price=?2 WHERE id=?1",
        params![crypto_id, price.map(|p| p.to_string())],
    )?;
    Ok(())
}

/// Plain delete. While any asset or transfer still references the
/// cryptocurrency the FK constraint fires and the rusqlite error propagates
/// to the caller unchanged.
pub fn delete_crypto(conn: &Connection, crypto_id: i64) -> Result<()> {
    conn.execute("DELETE FROM cryptocurrencies WHERE id=?1", params![crypto_id])?;
    Ok(())
}

pub fn find_unused_cryptos(conn: &Connection) -> Result<Vec<Cryptocurrency>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.symbol, c.current_price FROM cryptocurrencies c
         WHERE NOT EXISTS (SELECT 1 FROM assets a WHERE a.crypto_id = c.id)
         ORDER BY c.symbol",
    )?;
    let rows = stmt.query_map([], crypto_from_row)?;
    let mut cryptos = Vec::new();
    for row in rows {
        cryptos.push(row?);
    }
    Ok(cryptos)
}

// --- assets ---

pub fn insert_asset(
    conn: &Connection,
    wallet_id: i64,
    crypto_id: i64,
    quantity: Decimal,
) -> Result<Asset> {
    conn.execute(
        "INSERT INTO assets(wallet_id, crypto_id, quantity) VALUES (?1, ?2, ?3)",
        params![wallet_id, crypto_id, quantity.to_string()],
    )?;
    Ok(Asset {
        id: conn.last_insert_rowid(),
        wallet_id,
        crypto_id,
        quantity,
    })
}

pub fn find_asset(conn: &Connection, wallet_id: i64, crypto_id: i64) -> Result<Option<Asset>> {
    let asset = conn
        .query_row(
            "SELECT id, wallet_id, crypto_id, quantity FROM assets
             WHERE wallet_id=?1 AND crypto_id=?2",
            params![wallet_id, crypto_id],
            asset_from_row,
        )
        .optional()?;
    Ok(asset)
}

pub fn find_assets_by_wallet(conn: &Connection, wallet_id: i64) -> Result<Vec<Asset>> {
    let mut stmt = conn.prepare(
        "SELECT id, wallet_id, crypto_id, quantity FROM assets WHERE wallet_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![wallet_id], asset_from_row)?;
    let mut assets = Vec::new();
    for row in rows {
        assets.push(row?);
    }
    Ok(assets)
}

pub fn update_asset_quantity(conn: &Connection, asset_id: i64, quantity: Decimal) -> Result<()> {
    conn.execute(
        "UPDATE assets SET quantity=?2 WHERE id=?1",
        params![asset_id, quantity.to_string()],
    )?;
    Ok(())
}

pub fn delete_asset(conn: &Connection, asset_id: i64) -> Result<()> {
    conn.execute("DELETE FROM assets WHERE id=?1", params![asset_id])?;
    Ok(())
}

// --- transfers ---

pub fn insert_transfer(
    conn: &Connection,
    sender_id: i64,
    receiver_id: i64,
    crypto_id: i64,
    quantity: Decimal,
    executed_at: DateTime<Utc>,
) -> Result<Transfer> {
    conn.execute(
        "INSERT INTO transfers(sender_id, receiver_id, crypto_id, quantity, executed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            sender_id,
            receiver_id,
            crypto_id,
            quantity.to_string(),
            executed_at.to_rfc3339()
        ],
    )?;
    Ok(Transfer {
        id: conn.last_insert_rowid(),
        sender_id,
        receiver_id,
        crypto_id,
        quantity,
        executed_at,
    })
}

/// Transfers where the user appears on either side, newest first.
pub fn find_transfers_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Transfer>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, receiver_id, crypto_id, quantity, executed_at FROM transfers
         WHERE sender_id=?1 OR receiver_id=?1
         ORDER BY executed_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], transfer_from_row)?;
    let mut transfers = Vec::new();
    for row in rows {
        transfers.push(row?);
    }
    Ok(transfers)
}

pub fn find_transfers_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transfer>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, receiver_id, crypto_id, quantity, executed_at FROM transfers
         WHERE substr(executed_at, 1, 10) BETWEEN ?1 AND ?2
         ORDER BY executed_at, id",
    )?;
    let rows = stmt.query_map(
        params![start.to_string(), end.to_string()],
        transfer_from_row,
    )?;
    let mut transfers = Vec::new();
    for row in rows {
        transfers.push(row?);
    }
    Ok(transfers)
}

pub fn find_self_transfers(conn: &Connection) -> Result<Vec<Transfer>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, receiver_id, crypto_id, quantity, executed_at FROM transfers
         WHERE sender_id = receiver_id ORDER BY id",
    )?;
    let rows = stmt.query_map([], transfer_from_row)?;
    let mut transfers = Vec::new();
    for row in rows {
        transfers.push(row?);
    }
    Ok(transfers)
}
