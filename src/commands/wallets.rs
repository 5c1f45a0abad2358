// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::services::wallets;
use crate::store;
use crate::utils::{parse_decimal, parse_id, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("add-asset", sub)) => add_asset(conn, sub)?,
        Some(("remove-asset", sub)) => remove_asset(conn, sub)?,
        Some(("invest", sub)) => invest(conn, sub)?,
        Some(("worth", sub)) => worth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap().trim())?;
    let wallet = wallets::create_wallet(conn, &email, balance)?;
    println!(
        "Created wallet {} for {} (balance {})",
        wallet.id, email, wallet.fiat_balance
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let data = wallets::wallets_of(conn, &email)?;
    let mut rows = Vec::new();
    for w in data {
        let positions = store::find_assets_by_wallet(conn, w.id)?.len();
        rows.push(vec![
            w.id.to_string(),
            format!("{:.2}", w.fiat_balance),
            positions.to_string(),
        ]);
    }
    println!("{}", pretty_table(&["Id", "Fiat", "Positions"], rows));
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap().trim())?;
    wallets::delete_wallet(conn, id)?;
    println!("Deleted wallet {}", id);
    Ok(())
}

fn resolve_symbol(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    match store::find_crypto_by_symbol(conn, &symbol)? {
        Some(c) => Ok(c.id),
        None => bail!("Unsupported cryptocurrency: {}", symbol),
    }
}

fn add_asset(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = parse_id(sub.get_one::<String>("wallet").unwrap().trim())?;
    let crypto_id = resolve_symbol(conn, sub)?;
    let asset = wallets::add_asset(conn, wallet_id, crypto_id)?;
    println!("Attached position {} to wallet {}", asset.id, wallet_id);
    Ok(())
}

fn remove_asset(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = parse_id(sub.get_one::<String>("wallet").unwrap().trim())?;
    let crypto_id = resolve_symbol(conn, sub)?;
    wallets::remove_asset(conn, wallet_id, crypto_id)?;
    println!("Removed position from wallet {}", wallet_id);
    Ok(())
}

fn invest(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = parse_id(sub.get_one::<String>("wallet").unwrap().trim())?;
    let crypto_id = resolve_symbol(conn, sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let asset = wallets::invest(conn, wallet_id, crypto_id, amount)?;
    println!(
        "Invested ${:.2}; position now {:.4} units",
        amount, asset.quantity
    );
    Ok(())
}

fn worth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let total = wallets::net_worth(conn, &email)?;
    println!("Estimated net worth of {}: ${:.2}", email, total);
    Ok(())
}
