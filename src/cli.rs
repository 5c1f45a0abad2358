// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Command, arg};

pub fn build_cli() -> Command {
    Command::new("coinpurse")
        .about("Demo crypto wallet ledger: users, wallets, asset positions, transfers")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Register a user with a linked history and an opening wallet")
                        .arg(arg!(--name <NAME> "Display name").required(true))
                        .arg(arg!(--email <EMAIL> "Unique email").required(true))
                        .arg(arg!(--balance <FIAT> "Opening wallet balance (default 0)").required(false))
                        .arg(arg!(--note <NOTE> "Initial history note").required(false)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List users")
                        .arg(arg!(--json "Emit pretty JSON"))
                        .arg(arg!(--jsonl "Emit JSON lines")),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show a user's wallets, positions, and net worth")
                        .arg(arg!(--id <ID>).required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a user and everything it owns")
                        .arg(arg!(--id <ID>).required(true)),
                ),
        )
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets and their asset positions")
                .subcommand(
                    Command::new("add")
                        .about("Create a wallet for a user")
                        .arg(arg!(--email <EMAIL> "Owner's email").required(true))
                        .arg(arg!(--balance <FIAT> "Initial fiat balance").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List a user's wallets")
                        .arg(arg!(--email <EMAIL>).required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a wallet and its positions")
                        .arg(arg!(--id <ID>).required(true)),
                )
                .subcommand(
                    Command::new("add-asset")
                        .about("Attach a zero-quantity position to a wallet")
                        .arg(arg!(--wallet <ID>).required(true))
                        .arg(arg!(--symbol <SYMBOL>).required(true)),
                )
                .subcommand(
                    Command::new("remove-asset")
                        .about("Detach a position from a wallet")
                        .arg(arg!(--wallet <ID>).required(true))
                        .arg(arg!(--symbol <SYMBOL>).required(true)),
                )
                .subcommand(
                    Command::new("invest")
                        .about("Buy crypto with fiat held in the wallet")
                        .arg(arg!(--wallet <ID>).required(true))
                        .arg(arg!(--symbol <SYMBOL>).required(true))
                        .arg(arg!(--amount <FIAT>).required(true)),
                )
                .subcommand(
                    Command::new("worth")
                        .about("Estimated net worth across a user's wallets")
                        .arg(arg!(--email <EMAIL>).required(true)),
                ),
        )
        .subcommand(
            Command::new("crypto")
                .about("Manage supported cryptocurrencies")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME> "Full name, e.g. Bitcoin").required(true))
                        .arg(arg!(--symbol <SYMBOL> "Ticker, e.g. BTC").required(true))
                        .arg(arg!(--price <FIAT> "Current fiat price per unit").required(false)),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("set-price")
                        .arg(arg!(--symbol <SYMBOL>).required(true))
                        .arg(arg!(--price <FIAT>).required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a cryptocurrency (fails while positions or transfers reference it)")
                        .arg(arg!(--symbol <SYMBOL>).required(true)),
                )
                .subcommand(Command::new("unused").about("Cryptocurrencies no wallet holds")),
        )
        .subcommand(
            Command::new("transfer")
                .about("Send crypto value between users")
                .subcommand(
                    Command::new("send")
                        .arg(arg!(--from <USER_ID> "Sender user id").required(true))
                        .arg(arg!(--to <USER_ID> "Receiver user id").required(true))
                        .arg(arg!(--wallet <ID> "Sender's wallet").required(true))
                        .arg(arg!(--symbol <SYMBOL>).required(true))
                        .arg(arg!(--amount <FIAT> "Fiat value to send").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("Transfers involving a user, newest first")
                        .arg(arg!(--user <USER_ID>).required(true))
                        .arg(arg!(--json "Emit pretty JSON"))
                        .arg(arg!(--jsonl "Emit JSON lines")),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("User history logs")
                .subcommand(
                    Command::new("show").arg(arg!(--email <EMAIL>).required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Ledger reports")
                .subcommand(
                    Command::new("holders")
                        .about("Users holding a cryptocurrency in any wallet")
                        .arg(arg!(--symbol <SYMBOL>).required(true)),
                )
                .subcommand(Command::new("multiwallet").about("Users owning more than one wallet"))
                .subcommand(
                    Command::new("wealthy")
                        .about("Wallets with a fiat balance above a threshold")
                        .arg(arg!(--min <FIAT>).required(true)),
                )
                .subcommand(
                    Command::new("range")
                        .about("Transfers executed in a date range")
                        .arg(arg!(--start <DATE>).required(true))
                        .arg(arg!(--end <DATE>).required(true)),
                )
                .subcommand(Command::new("internal").about("Transfers a user sent to themselves")),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data")
                .subcommand(
                    Command::new("transfers")
                        .arg(arg!(--format <FMT> "csv or json").required(true))
                        .arg(arg!(--out <FILE>).required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Integrity checks on the ledger"))
}
