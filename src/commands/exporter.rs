// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transfers", sub)) => export_transfers(conn, sub),
        _ => Ok(()),
    }
}

fn export_transfers(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.executed_at, s.email as sender, r.email as receiver, c.symbol, t.quantity
         FROM transfers t
         JOIN users s ON t.sender_id=s.id
         JOIN users r ON t.receiver_id=r.id
         JOIN cryptocurrencies c ON t.crypto_id=c.id
         ORDER BY t.executed_at, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["executed_at", "sender", "receiver", "symbol", "quantity"])?;
            for row in rows {
                let (at, sender, receiver, symbol, quantity) = row?;
                wtr.write_record([at, sender, receiver, symbol, quantity])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (at, sender, receiver, symbol, quantity) = row?;
                items.push(json!({
                    "executed_at": at, "sender": sender, "receiver": receiver,
                    "symbol": symbol, "quantity": quantity
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transfers to {}", out);
    Ok(())
}
