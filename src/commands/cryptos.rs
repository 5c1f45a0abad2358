// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("set-price", sub)) => set_price(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("unused", _)) => unused(conn)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let price = match sub.get_one::<String>("price") {
        Some(raw) => Some(parse_decimal(raw.trim())?),
        None => None,
    };
    let crypto = store::insert_crypto(conn, &name, &symbol, price)?;
    println!("Added {} ({})", crypto.name, crypto.symbol);
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let rows = store::list_cryptos(conn)?
        .into_iter()
        .map(|c| {
            let price = match c.current_price {
                Some(p) => format!("{:.2}", p),
                None => "unset".to_string(),
            };
            vec![c.symbol, c.name, price]
        })
        .collect();
    println!("{}", pretty_table(&["Symbol", "Name", "Price"], rows));
    Ok(())
}

fn set_price(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let Some(crypto) = store::find_crypto_by_symbol(conn, &symbol)? else {
        bail!("Unsupported cryptocurrency: {}", symbol);
    };
    store::update_crypto_price(conn, crypto.id, Some(price))?;
    println!("{} price set to {:.2}", symbol, price);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let Some(crypto) = store::find_crypto_by_symbol(conn, &symbol)? else {
        bail!("Unsupported cryptocurrency: {}", symbol);
    };
    // Fails on the FK constraint while any position or transfer references it.
    store::delete_crypto(conn, crypto.id)?;
    println!("Removed {}", symbol);
    Ok(())
}

fn unused(conn: &Connection) -> Result<()> {
    let rows = store::find_unused_cryptos(conn)?
        .into_iter()
        .map(|c| vec![c.symbol, c.name])
        .collect();
    println!("{}", pretty_table(&["Symbol", "Name"], rows));
    Ok(())
}
