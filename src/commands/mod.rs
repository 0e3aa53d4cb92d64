// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod transactions;

use crate::models::Period;
use crate::utils::parse_date;
use anyhow::{Context, Result};

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .with_context(|| format!("--{} is required", name))
}

/// Reads `--from` / `--to`; both absent means all time.
pub(crate) fn period_from_args(m: &clap::ArgMatches) -> Result<Period> {
    let start = m.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let end = m.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    Ok(Period::new(start, end)?)
}
