// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim().to_string();
            let Some(history) = store::find_history_by_email(conn, &email)? else {
                bail!("No history for {}", email);
            };
            println!("{}", history.detail);
        }
        _ => {}
    }
    Ok(())
}
