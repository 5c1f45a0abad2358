// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::services::{users, wallets};
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, parse_id, pretty_table};
use anyhow::{Result, bail};
use chrono::Local;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let balance = match sub.get_one::<String>("balance") {
        Some(raw) => parse_decimal(raw.trim())?,
        None => Decimal::ZERO,
    };
    if balance < Decimal::ZERO {
        bail!("Opening balance must not be negative");
    }
    let note = match sub.get_one::<String>("note") {
        Some(n) => n.trim().to_string(),
        None => format!("Account created on {}", Local::now().date_naive()),
    };

    let user = users::create_user(conn, &name, &email, &note)?;
    let wallet = wallets::create_wallet(conn, &user.email, balance)?;
    println!(
        "Registered {} <{}> with wallet {} (balance {})",
        user.name, user.email, wallet.id, wallet.fiat_balance
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = users::list_all(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|u| vec![u.id.to_string(), u.name, u.email])
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Email"], rows));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap().trim())?;
    let Some(user) = users::find_by_id(conn, id)? else {
        bail!("No user with id {}", id);
    };
    println!("{} <{}>", user.name, user.email);

    let mut rows = Vec::new();
    for wallet in store::find_wallets_by_user(conn, user.id)? {
        let assets = store::find_assets_by_wallet(conn, wallet.id)?;
        if assets.is_empty() {
            rows.push(vec![
                wallet.id.to_string(),
                format!("{:.2}", wallet.fiat_balance),
                String::new(),
                String::new(),
            ]);
        }
        for asset in assets {
            let symbol = store::find_crypto(conn, asset.crypto_id)?
                .map(|c| c.symbol)
                .unwrap_or_default();
            rows.push(vec![
                wallet.id.to_string(),
                format!("{:.2}", wallet.fiat_balance),
                symbol,
                format!("{:.4}", asset.quantity),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Wallet", "Fiat", "Asset", "Quantity"], rows)
    );

    let worth = wallets::net_worth(conn, &user.email)?;
    println!("Estimated net worth: ${:.2}", worth);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap().trim())?;
    users::delete_user(conn, id)?;
    println!("Deleted user {} and everything it owned", id);
    Ok(())
}
