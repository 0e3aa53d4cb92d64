// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneytrail::error::ErrorKind;
use moneytrail::store::accounts;
use moneytrail::{LedgerError, cli, commands, db, reports};
use rust_decimal::Decimal;

fn account_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["moneytrail", "account"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("account", acc_m)) => acc_m.clone(),
        _ => panic!("no account subcommand"),
    }
}

#[test]
fn add_rejects_opening_balance_beyond_limit() {
    let conn = db::open_in_memory().unwrap();
    let m = account_matches(&["add", "--title", "Vault", "--opening", "50000000000000000000000000000"]);
    let err = commands::accounts::handle(&conn, "alice", &m).unwrap_err();
    let ledger_err = err.downcast_ref::<LedgerError>().unwrap();
    assert_eq!(ledger_err.kind(), ErrorKind::Validation);
    assert!(accounts::list_accounts(&conn, "alice").unwrap().is_empty());

    let m = account_matches(&["add", "--title", "Savings", "--opening", "-2500.75"]);
    commands::accounts::handle(&conn, "alice", &m).unwrap();
    let stored = accounts::list_accounts(&conn, "alice").unwrap();
    assert_eq!(stored[0].balance, Decimal::new(-250075, 2));
}

#[test]
fn total_balance_reports_overflow_instead_of_panicking() {
    let conn = db::open_in_memory().unwrap();
    let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    accounts::insert_account(&conn, "alice", "A", "", huge).unwrap();
    accounts::insert_account(&conn, "alice", "B", "", huge).unwrap();

    let err = reports::total_balance(&conn, "alice").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Inconsistent);
}
