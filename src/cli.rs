// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the window (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the window (inclusive)"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn transaction_fields(cmd: Command, type_required: bool) -> Command {
    let kind = Arg::new("type")
        .long("type")
        .value_parser(["expense", "income"]);
    let kind = if type_required {
        kind.required(true)
    } else {
        kind.default_value("expense")
    };
    cmd.arg(Arg::new("title").long("title").required(true))
        .arg(Arg::new("description").long("description").required(true))
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(true)
                .allow_hyphen_values(true)
                .help("Non-negative magnitude; expenses are stored negative"),
        )
        .arg(kind)
        .arg(
            Arg::new("account")
                .long("account")
                .required(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .required(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .required(true)
                .value_name("YYYY-MM-DD"),
        )
}

pub fn build_cli() -> Command {
    Command::new("moneytrail")
        .version(crate_version!())
        .about("Wallet ledger with consistent balances and dashboard reports")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("MONEYTRAIL_DB")
                .value_name("PATH")
                .help("SQLite database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .env("MONEYTRAIL_USER")
                .help("Identity to act as"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts (wallets)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("wallet"))
                        .arg(
                            Arg::new("opening")
                                .long("opening")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("tag"))
                        .arg(Arg::new("color").long("color").default_value("#9e9e9e"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Conventionally used for income"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and change transactions")
                .subcommand(transaction_fields(Command::new("add"), false))
                .subcommand(transaction_fields(Command::new("edit").arg(id_arg()), true))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("rm-many").arg(
                        Arg::new("ids")
                            .long("ids")
                            .required(true)
                            .help("Comma separated transaction ids"),
                    ),
                )
                .subcommand(json_flags(period_args(Command::new("list")))),
        )
        .subcommand(
            Command::new("report")
                .about("Read-only summaries")
                .subcommand(json_flags(Command::new("balance")))
                .subcommand(json_flags(period_args(Command::new("period"))))
                .subcommand(json_flags(period_args(Command::new("categories"))))
                .subcommand(json_flags(period_args(Command::new("monthly"))))
                .subcommand(json_flags(
                    Command::new("recent").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("persona")))
                .subcommand(json_flags(period_args(
                    Command::new("dashboard")
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["from", "to"])
                                .help("Cover all time instead of the current month"),
                        )
                        .arg(
                            Arg::new("recent-limit")
                                .long("recent-limit")
                                .value_parser(value_parser!(usize))
                                .help("Cap the recent transactions feed (default: all)"),
                        ),
                ))),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger")
                .subcommand(period_args(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
        .subcommand(
            json_flags(Command::new("doctor"))
                .about("Check cached balances against the ledger")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite drifted balances from the ledger"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(Command::new("set-user").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("show")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }
}
