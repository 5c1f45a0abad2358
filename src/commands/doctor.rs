// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Users whose history went missing
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email FROM users u
         WHERE NOT EXISTS (SELECT 1 FROM histories h WHERE h.user_id = u.id)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let email: String = r.get(1)?;
        rows.push(vec!["user_missing_history".into(), format!("{} {}", id, email)]);
    }

    // 2) Users without any wallet cannot receive transfers
    let mut stmt2 = conn.prepare(
        "SELECT u.id, u.email FROM users u
         WHERE NOT EXISTS (SELECT 1 FROM wallets w WHERE w.user_id = u.id)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let email: String = r.get(1)?;
        rows.push(vec!["user_cannot_receive".into(), format!("{} {}", id, email)]);
    }

    // 3) Held cryptocurrencies with no price value at zero
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT c.symbol FROM cryptocurrencies c
         JOIN assets a ON a.crypto_id = c.id WHERE c.current_price IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let symbol: String = r.get(0)?;
        rows.push(vec!["held_crypto_unpriced".into(), symbol]);
    }

    // 4) Negative quantities or balances should be unreachable
    let mut stmt4 =
        conn.prepare("SELECT id FROM assets WHERE CAST(quantity AS REAL) < 0")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["negative_quantity".into(), format!("asset {}", id)]);
    }
    let mut stmt5 =
        conn.prepare("SELECT id FROM wallets WHERE CAST(fiat_balance AS REAL) < 0")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["negative_balance".into(), format!("wallet {}", id)]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
