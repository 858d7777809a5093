//! Domain types shared by the store, the balance engine and the session.
//!
//! These are plain values, independent of the database entities in
//! [`crate::entities`]; the store converts between the two.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// One of the two money-holding channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash
    Hand,
    /// Digital wallet
    Gpay,
}

impl PaymentMethod {
    /// Both methods, in display order.
    pub const ALL: [Self; 2] = [Self::Hand, Self::Gpay];

    /// Value stored in the `method` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hand => "hand",
            Self::Gpay => "gpay",
        }
    }

    /// Label used in exports and notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hand => "Hand",
            Self::Gpay => "GPay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hand" => Ok(Self::Hand),
            "gpay" => Ok(Self::Gpay),
            other => Err(Error::validation(format!("Unknown payment method: {other}"))),
        }
    }
}

/// Starting balance of each method before any recorded deposit or spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBaseline {
    /// Initial cash balance
    pub initial_hand: Decimal,
    /// Initial digital-wallet balance
    pub initial_gpay: Decimal,
    /// When the baseline row was created
    pub created_at: DateTime<Utc>,
}

impl Default for WalletBaseline {
    fn default() -> Self {
        Self {
            initial_hand: Decimal::ZERO,
            initial_gpay: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }
}

impl WalletBaseline {
    /// Baseline amount for one method.
    #[must_use]
    pub const fn initial_for(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Hand => self.initial_hand,
            PaymentMethod::Gpay => self.initial_gpay,
        }
    }
}

/// Money added to one method. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Unique id, assigned at creation
    pub id: Uuid,
    /// Strictly positive amount
    pub amount: Decimal,
    /// Method the money was added to
    pub method: PaymentMethod,
    /// Calendar date of the deposit
    pub date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Money spent from one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendRecord {
    /// Unique id, assigned at creation
    pub id: Uuid,
    /// What the money was spent on
    pub purpose: String,
    /// Strictly positive amount
    pub amount: Decimal,
    /// Method the money came from
    pub method: PaymentMethod,
    /// Calendar date of the spend
    pub date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Singleton settings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Row id
    pub id: Uuid,
    /// Stored PIN hash, `None` until a PIN is set
    pub pin_hash: Option<String>,
    /// Monthly spending ceiling used for alerts; `0` disables alerts
    pub budget_limit: Decimal,
}

/// Derived balances, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceState {
    /// Cash balance
    pub hand: Decimal,
    /// Digital-wallet balance
    pub gpay: Decimal,
    /// `hand + gpay`
    pub total: Decimal,
}

impl BalanceState {
    /// Balance of one method.
    #[must_use]
    pub const fn for_method(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Hand => self.hand,
            PaymentMethod::Gpay => self.gpay,
        }
    }
}

/// Input for a new deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeposit {
    /// Amount to add
    pub amount: Decimal,
    /// Target method
    pub method: PaymentMethod,
    /// Calendar date
    pub date: NaiveDate,
}

impl NewDeposit {
    pub(crate) fn validate(&self) -> Result<()> {
        ensure_positive(self.amount)
    }
}

/// Input for a new spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpend {
    /// What the money is spent on
    pub purpose: String,
    /// Amount to spend
    pub amount: Decimal,
    /// Source method
    pub method: PaymentMethod,
    /// Calendar date
    pub date: NaiveDate,
}

impl NewSpend {
    /// Validates the input and returns it with the purpose trimmed.
    pub(crate) fn validated(self) -> Result<Self> {
        let purpose = validate_purpose(&self.purpose)?;
        ensure_positive(self.amount)?;
        Ok(Self { purpose, ..self })
    }
}

/// Partial update of a spend; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendUpdate {
    /// New purpose
    pub purpose: Option<String>,
    /// New amount
    pub amount: Option<Decimal>,
    /// New method
    pub method: Option<PaymentMethod>,
    /// New date
    pub date: Option<NaiveDate>,
}

impl SpendUpdate {
    /// Merges the update into `record`, validating the merged fields.
    pub(crate) fn apply_to(&self, record: &SpendRecord) -> Result<SpendRecord> {
        let purpose = match &self.purpose {
            Some(purpose) => validate_purpose(purpose)?,
            None => record.purpose.clone(),
        };
        let amount = self.amount.unwrap_or(record.amount);
        ensure_positive(amount)?;

        Ok(SpendRecord {
            id: record.id,
            purpose,
            amount,
            method: self.method.unwrap_or(record.method),
            date: self.date.unwrap_or(record.date),
            created_at: record.created_at,
        })
    }
}

/// Parses a user-entered amount. Rejects non-numeric and non-positive input.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount =
        Decimal::from_str(input.trim()).map_err(|_| Error::validation("Enter valid amount"))?;
    ensure_positive(amount)?;
    Ok(amount)
}

/// Parses a user-entered `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::validation("Select a date"));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("Invalid date: {input}")))
}

fn validate_purpose(purpose: &str) -> Result<String> {
    let trimmed = purpose.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Enter a purpose"));
    }
    Ok(trimmed.to_string())
}

/// Most decimal places a stored money value may carry.
pub const MONEY_SCALE: u32 = 2;

// values at this scale round-trip through the sqlite REAL column unchanged
fn ensure_money_scale(amount: Decimal) -> Result<()> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(Error::validation("Enter valid amount"));
    }
    Ok(())
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation("Enter valid amount"));
    }
    ensure_money_scale(amount)
}

pub(crate) fn ensure_non_negative(amount: Decimal, message: &str) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::validation(message));
    }
    ensure_money_scale(amount)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_spend() -> SpendRecord {
        SpendRecord {
            id: Uuid::new_v4(),
            purpose: "Groceries".to_string(),
            amount: dec!(250),
            method: PaymentMethod::Hand,
            date: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_payment_method_round_trips_through_column_value() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("card".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::Gpay.label(), "GPay");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
        assert!(matches!(parse_amount("abc"), Err(Error::Validation { .. })));
        assert!(matches!(parse_amount("0"), Err(Error::Validation { .. })));
        assert!(matches!(parse_amount("-5"), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_amounts_limited_to_two_decimal_places() {
        assert_eq!(parse_amount("10.10").unwrap(), dec!(10.10));
        assert_eq!(parse_amount("7.500").unwrap(), dec!(7.5));
        assert!(matches!(parse_amount("0.001"), Err(Error::Validation { .. })));
        assert!(matches!(
            parse_amount("123456789.123456789"),
            Err(Error::Validation { .. })
        ));

        assert!(ensure_non_negative(dec!(0.25), "Values cannot be negative").is_ok());
        let err = ensure_non_negative(dec!(0.255), "Values cannot be negative").unwrap_err();
        assert_eq!(err.to_string(), "Enter valid amount");

        let result = SpendUpdate {
            amount: Some(dec!(12.345)),
            ..Default::default()
        }
        .apply_to(&sample_spend());
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-10-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
        let err = parse_date("  ").unwrap_err();
        assert_eq!(err.to_string(), "Select a date");
        assert!(parse_date("15/10/2026").is_err());
    }

    #[test]
    fn test_new_spend_trims_purpose() {
        let spend = NewSpend {
            purpose: "  Bus fare ".to_string(),
            amount: dec!(20),
            method: PaymentMethod::Gpay,
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        }
        .validated()
        .unwrap();
        assert_eq!(spend.purpose, "Bus fare");
    }

    #[test]
    fn test_new_spend_rejects_empty_purpose() {
        let err = NewSpend {
            purpose: "   ".to_string(),
            amount: dec!(20),
            method: PaymentMethod::Gpay,
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        }
        .validated()
        .unwrap_err();
        assert_eq!(err.to_string(), "Enter a purpose");
    }

    #[test]
    fn test_spend_update_keeps_unset_fields() {
        let record = sample_spend();
        let updated = SpendUpdate {
            amount: Some(dec!(300)),
            ..Default::default()
        }
        .apply_to(&record)
        .unwrap();

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.amount, dec!(300));
        assert_eq!(updated.purpose, record.purpose);
        assert_eq!(updated.method, record.method);
        assert_eq!(updated.date, record.date);
        assert_eq!(updated.created_at, record.created_at);
    }

    #[test]
    fn test_spend_update_rejects_non_positive_amount() {
        let record = sample_spend();
        let result = SpendUpdate {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        }
        .apply_to(&record);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
