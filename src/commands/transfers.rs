// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::services::transfers;
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, parse_id, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("send", sub)) => send(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn send(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let sender_id = parse_id(sub.get_one::<String>("from").unwrap().trim())?;
    let receiver_id = parse_id(sub.get_one::<String>("to").unwrap().trim())?;
    let wallet_id = parse_id(sub.get_one::<String>("wallet").unwrap().trim())?;
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;

    let transfer = transfers::execute(conn, sender_id, receiver_id, wallet_id, &symbol, amount)?;
    println!(
        "Sent {:.4} {} (${:.2}) to user {} as transfer #{}",
        transfer.quantity, symbol, amount, receiver_id, transfer.id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransferRow {
    pub id: i64,
    pub executed_at: String,
    pub sender: String,
    pub receiver: String,
    pub symbol: String,
    pub quantity: String,
}

pub fn query_rows(conn: &Connection, user_id: i64) -> Result<Vec<TransferRow>> {
    let mut data = Vec::new();
    for t in transfers::transfers_of(conn, user_id)? {
        let sender = store::find_user(conn, t.sender_id)?
            .map(|u| u.name)
            .unwrap_or_else(|| t.sender_id.to_string());
        let receiver = store::find_user(conn, t.receiver_id)?
            .map(|u| u.name)
            .unwrap_or_else(|| t.receiver_id.to_string());
        let symbol = store::find_crypto(conn, t.crypto_id)?
            .map(|c| c.symbol)
            .unwrap_or_default();
        data.push(TransferRow {
            id: t.id,
            executed_at: t.executed_at.to_rfc3339(),
            sender,
            receiver,
            symbol,
            quantity: t.quantity.to_string(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = parse_id(sub.get_one::<String>("user").unwrap().trim())?;
    let data = query_rows(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.executed_at,
                    r.sender,
                    r.receiver,
                    r.symbol,
                    r.quantity,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Executed", "Sender", "Receiver", "Symbol", "Quantity"],
                rows,
            )
        );
    }
    Ok(())
}
