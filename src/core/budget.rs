//! Monthly budget alerting.
//!
//! The budget limit never blocks a spend; it only drives the dashboard alert.

use crate::{
    core::{balance, calendar},
    models::SpendRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// How close this month's spending is to the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    /// No limit set
    Disabled,
    /// Comfortably below the limit
    Ok,
    /// At or above the alert threshold, not yet over
    Near,
    /// Spending exceeds the limit
    Over,
}

/// Budget usage for the month containing the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    /// Spent this calendar month
    pub spent: Decimal,
    /// Configured monthly limit
    pub limit: Decimal,
    /// `spent / limit * 100`, rounded to one decimal; `0` when disabled
    pub percentage: Decimal,
    /// Alert level
    pub level: BudgetLevel,
}

impl BudgetStatus {
    /// Amount left before the limit is reached, never negative.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.limit - self.spent).max(Decimal::ZERO)
    }
}

/// Evaluates this month's spending against `limit`.
#[must_use]
pub fn budget_status(
    spends: &[SpendRecord],
    limit: Decimal,
    today: NaiveDate,
    near_limit_percent: u32,
) -> BudgetStatus {
    let spent = balance::total_spent_in_range(
        spends,
        calendar::start_of_month(today),
        calendar::end_of_month(today),
    );

    if limit <= Decimal::ZERO {
        return BudgetStatus {
            spent,
            limit,
            percentage: Decimal::ZERO,
            level: BudgetLevel::Disabled,
        };
    }

    // threshold is compared unrounded; only the reported percentage is rounded
    let level = if spent > limit {
        BudgetLevel::Over
    } else if spent * Decimal::ONE_HUNDRED >= limit * Decimal::from(near_limit_percent) {
        BudgetLevel::Near
    } else {
        BudgetLevel::Ok
    };

    BudgetStatus {
        spent,
        limit,
        percentage: (spent / limit * Decimal::ONE_HUNDRED).round_dp(1),
        level,
    }
}
