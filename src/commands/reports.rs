// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transfer, User};
use crate::store;
use crate::utils::{parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("holders", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
            print_users(store::find_users_holding_symbol(conn, &symbol)?);
        }
        Some(("multiwallet", _)) => {
            print_users(store::find_users_with_multiple_wallets(conn)?);
        }
        Some(("wealthy", sub)) => {
            let min = parse_decimal(sub.get_one::<String>("min").unwrap().trim())?;
            let rows = store::wallets_with_balance_above(conn, min)?
                .into_iter()
                .map(|w| {
                    vec![
                        w.id.to_string(),
                        w.user_id.to_string(),
                        format!("{:.2}", w.fiat_balance),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Wallet", "Owner", "Fiat"], rows));
        }
        Some(("range", sub)) => {
            let start = parse_date(sub.get_one::<String>("start").unwrap().trim())?;
            let end = parse_date(sub.get_one::<String>("end").unwrap().trim())?;
            print_transfers(store::find_transfers_in_range(conn, start, end)?);
        }
        Some(("internal", _)) => {
            print_transfers(store::find_self_transfers(conn)?);
        }
        _ => {}
    }
    Ok(())
}

fn print_users(users: Vec<User>) {
    let rows = users
        .into_iter()
        .map(|u| vec![u.id.to_string(), u.name, u.email])
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Email"], rows));
}

fn print_transfers(transfers: Vec<Transfer>) {
    let rows = transfers
        .into_iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.executed_at.to_rfc3339(),
                t.sender_id.to_string(),
                t.receiver_id.to_string(),
                t.quantity.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Executed", "Sender", "Receiver", "Quantity"], rows)
    );
}
