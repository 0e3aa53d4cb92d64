// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersonaTier {
    /// Lowest savings rate (percent, inclusive) that earns this tier.
    pub min_rate: i64,
    pub label: &'static str,
    pub summary: &'static str,
}

/// Ordered from the highest threshold down; the last entry catches everything.
pub const PERSONA_TIERS: &[PersonaTier] = &[
    PersonaTier {
        min_rate: 50,
        label: "Wealth Builder",
        summary: "Saves at least half of what comes in.",
    },
    PersonaTier {
        min_rate: 30,
        label: "Smart Saver",
        summary: "Puts a solid share of income aside.",
    },
    PersonaTier {
        min_rate: 10,
        label: "Steady Saver",
        summary: "Keeps a modest buffer every month.",
    },
    PersonaTier {
        min_rate: 0,
        label: "Paycheck Balancer",
        summary: "Spends roughly what is earned.",
    },
    PersonaTier {
        min_rate: i64::MIN,
        label: "Overspender",
        summary: "Spending runs ahead of income.",
    },
];

/// First tier in `tiers` whose threshold `rate` reaches. Falls back to the
/// last tier if none match.
pub fn classify_with(tiers: &'static [PersonaTier], rate: Decimal) -> Option<&'static PersonaTier> {
    tiers
        .iter()
        .find(|t| rate >= Decimal::from(t.min_rate))
        .or_else(|| tiers.last())
}

pub fn financial_persona(savings_rate: Decimal) -> &'static PersonaTier {
    classify_with(PERSONA_TIERS, savings_rate).unwrap_or(&PERSONA_TIERS[PERSONA_TIERS.len() - 1])
}
