//! Balance engine - pure computations over the record set.
//!
//! Nothing here touches the store or the clock: every function takes the
//! baseline, the records and (where a window is anchored on "now") the anchor
//! date as arguments, and returns a fresh value. All functions are O(n) in the
//! number of records.

use crate::{
    core::calendar,
    errors::{Error, Result},
    models::{BalanceState, DepositRecord, PaymentMethod, SpendRecord, WalletBaseline},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::{collections::BTreeMap, iter::FusedIterator};
use uuid::Uuid;

/// A dated money movement. Implemented by deposits and spends so the range
/// totals work for both.
pub trait MoneyRecord {
    /// Calendar date the movement belongs to
    fn date(&self) -> NaiveDate;
    /// Amount moved
    fn amount(&self) -> Decimal;
    /// Method the movement applies to
    fn method(&self) -> PaymentMethod;
}

impl MoneyRecord for DepositRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn method(&self) -> PaymentMethod {
        self.method
    }
}

impl MoneyRecord for SpendRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn method(&self) -> PaymentMethod {
        self.method
    }
}

fn sum_for_method<'a, R, I>(records: I, method: PaymentMethod) -> Decimal
where
    R: MoneyRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| r.method() == method)
        .map(MoneyRecord::amount)
        .sum()
}

/// Derives current balances: baseline plus deposits minus spends, per method.
#[must_use]
pub fn compute_balance(
    baseline: &WalletBaseline,
    deposits: &[DepositRecord],
    spends: &[SpendRecord],
) -> BalanceState {
    let hand = baseline.initial_hand + sum_for_method(deposits, PaymentMethod::Hand)
        - sum_for_method(spends, PaymentMethod::Hand);
    let gpay = baseline.initial_gpay + sum_for_method(deposits, PaymentMethod::Gpay)
        - sum_for_method(spends, PaymentMethod::Gpay);

    BalanceState {
        hand,
        gpay,
        total: hand + gpay,
    }
}

/// Balance currently available for one method.
#[must_use]
pub fn available_balance(
    method: PaymentMethod,
    baseline: &WalletBaseline,
    deposits: &[DepositRecord],
    spends: &[SpendRecord],
) -> Decimal {
    compute_balance(baseline, deposits, spends).for_method(method)
}

/// Pre-write guard for creating or updating a spend.
///
/// When `exclude` names an existing spend, that spend is left out of the
/// deduction so an update is checked against the balance without its old value.
pub fn ensure_affordable(
    method: PaymentMethod,
    amount: Decimal,
    baseline: &WalletBaseline,
    deposits: &[DepositRecord],
    spends: &[SpendRecord],
    exclude: Option<Uuid>,
) -> Result<()> {
    let spent: Decimal = spends
        .iter()
        .filter(|s| Some(s.id) != exclude)
        .filter(|s| s.method == method)
        .map(|s| s.amount)
        .sum();
    let available =
        baseline.initial_for(method) + sum_for_method(deposits, method) - spent;

    if amount > available {
        return Err(Error::InsufficientFunds {
            method,
            available,
            requested: amount,
        });
    }
    Ok(())
}

/// Sum of amounts whose date lies in `[from, to]` inclusive. Empty ranges yield `0`.
#[must_use]
pub fn total_in_range<R: MoneyRecord>(records: &[R], from: NaiveDate, to: NaiveDate) -> Decimal {
    records
        .iter()
        .filter(|r| (from..=to).contains(&r.date()))
        .map(MoneyRecord::amount)
        .sum()
}

/// Total spent in `[from, to]`.
#[must_use]
pub fn total_spent_in_range(spends: &[SpendRecord], from: NaiveDate, to: NaiveDate) -> Decimal {
    total_in_range(spends, from, to)
}

/// Total deposited in `[from, to]`.
#[must_use]
pub fn total_deposited_in_range(
    deposits: &[DepositRecord],
    from: NaiveDate,
    to: NaiveDate,
) -> Decimal {
    total_in_range(deposits, from, to)
}

/// Amount spent on a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySpend {
    /// The day
    pub date: NaiveDate,
    /// Total spent that day, `0` when nothing was spent
    pub amount: Decimal,
}

/// One entry per day of an inclusive range, in ascending order, with no gaps.
///
/// Clone the series before iterating to walk it again.
#[derive(Debug, Clone)]
pub struct DailySeries {
    next: Option<NaiveDate>,
    end: NaiveDate,
    totals: BTreeMap<NaiveDate, Decimal>,
}

impl Iterator for DailySeries {
    type Item = DailySpend;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = if current < self.end {
            current.succ_opt()
        } else {
            None
        };

        Some(DailySpend {
            date: current,
            amount: self.totals.get(&current).copied().unwrap_or_default(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |next| calendar::days_inclusive(next, self.end));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DailySeries {}

impl FusedIterator for DailySeries {}

/// Builds the per-day spending series for `[from, to]`. `from > to` yields an empty series.
#[must_use]
pub fn daily_series(spends: &[SpendRecord], from: NaiveDate, to: NaiveDate) -> DailySeries {
    let mut totals = BTreeMap::new();
    for spend in spends.iter().filter(|s| (from..=to).contains(&s.date)) {
        *totals.entry(spend.date).or_insert(Decimal::ZERO) += spend.amount;
    }

    DailySeries {
        next: (from <= to).then_some(from),
        end: to,
        totals,
    }
}

/// Two totals over consecutive windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Total over the earlier window
    pub previous: Decimal,
    /// Total over the window containing the anchor date
    pub current: Decimal,
}

impl Comparison {
    /// Change from `previous` to `current`, see [`percent_change`].
    #[must_use]
    pub fn percent_change(&self) -> Decimal {
        percent_change(self.previous, self.current)
    }
}

/// Growth of `current` over `previous` in percent, rounded to one decimal.
///
/// Growth from zero is undefined, so `previous == 0` reports `100` when
/// `current` is positive and `0` otherwise.
#[must_use]
pub fn percent_change(previous: Decimal, current: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(1)
    } else if current > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Spending this Monday-start week against last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyComparison {
    /// Spent in the week containing the anchor date
    pub this_week: Decimal,
    /// Spent in the week before
    pub last_week: Decimal,
}

impl From<WeeklyComparison> for Comparison {
    fn from(value: WeeklyComparison) -> Self {
        Self {
            previous: value.last_week,
            current: value.this_week,
        }
    }
}

/// Spending this calendar month against last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyComparison {
    /// Spent in the month containing the anchor date
    pub this_month: Decimal,
    /// Spent in the month before
    pub last_month: Decimal,
}

impl From<MonthlyComparison> for Comparison {
    fn from(value: MonthlyComparison) -> Self {
        Self {
            previous: value.last_month,
            current: value.this_month,
        }
    }
}

/// Compares the week containing `today` with the previous week.
#[must_use]
pub fn weekly_comparison(spends: &[SpendRecord], today: NaiveDate) -> WeeklyComparison {
    let this_start = calendar::start_of_week(today);
    let last_start = this_start - chrono::Duration::days(7);

    WeeklyComparison {
        this_week: total_in_range(spends, this_start, calendar::end_of_week(today)),
        last_week: total_in_range(spends, last_start, calendar::end_of_week(last_start)),
    }
}

/// Compares the month containing `today` with the previous month.
#[must_use]
pub fn monthly_comparison(spends: &[SpendRecord], today: NaiveDate) -> MonthlyComparison {
    let last_start = calendar::previous_month_start(today);

    MonthlyComparison {
        this_month: total_in_range(
            spends,
            calendar::start_of_month(today),
            calendar::end_of_month(today),
        ),
        last_month: total_in_range(spends, last_start, calendar::end_of_month(last_start)),
    }
}
