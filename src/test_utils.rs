//! Shared test utilities for `ExpenseWise`.
//!
//! This module provides an in-memory Record Store, record builders with
//! sensible defaults, and store doubles for the remote-failure paths.

use crate::{
    errors::{Error, Result},
    models::{DepositRecord, PaymentMethod, Settings, SpendRecord, WalletBaseline},
    store::{RecordStore, SeaOrmStore, SharedStore},
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all store-backed tests.
pub async fn setup_test_store() -> Result<SeaOrmStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(SeaOrmStore::new(db))
}

/// [`setup_test_store`] behind the shared trait-object handle.
pub async fn shared_test_store() -> Result<SharedStore> {
    Ok(Arc::new(setup_test_store().await?))
}

/// Shorthand for a calendar date. Panics on an invalid date.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a spend record with a fresh id and the current time as `created_at`.
pub fn sample_spend(
    purpose: &str,
    amount: Decimal,
    method: PaymentMethod,
    date: NaiveDate,
) -> SpendRecord {
    SpendRecord {
        id: Uuid::new_v4(),
        purpose: purpose.to_string(),
        amount,
        method,
        date,
        created_at: Utc::now(),
    }
}

/// Creates a deposit record with a fresh id and the current time as `created_at`.
pub fn sample_deposit(amount: Decimal, method: PaymentMethod, date: NaiveDate) -> DepositRecord {
    DepositRecord {
        id: Uuid::new_v4(),
        amount,
        method,
        date,
        created_at: Utc::now(),
    }
}

/// Baseline with the given initial balances.
pub fn baseline(initial_hand: Decimal, initial_gpay: Decimal) -> WalletBaseline {
    WalletBaseline {
        initial_hand,
        initial_gpay,
        created_at: Utc::now(),
    }
}

fn connection_refused() -> Error {
    Error::Database(DbErr::Conn(sea_orm::RuntimeErr::Internal(
        "connection refused".to_string(),
    )))
}

/// A store whose every call fails as if the server were down.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn fetch_wallet(&self) -> Result<Option<WalletBaseline>> {
        Err(connection_refused())
    }

    async fn fetch_deposits(&self) -> Result<Vec<DepositRecord>> {
        Err(connection_refused())
    }

    async fn fetch_spends(&self) -> Result<Vec<SpendRecord>> {
        Err(connection_refused())
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>> {
        Err(connection_refused())
    }

    async fn save_wallet(&self, _: Decimal, _: Decimal) -> Result<WalletBaseline> {
        Err(connection_refused())
    }

    async fn insert_deposit(&self, _: &DepositRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn insert_spend(&self, _: &SpendRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn update_spend(&self, _: &SpendRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn save_pin_hash(&self, _: &str) -> Result<Settings> {
        Err(connection_refused())
    }

    async fn save_budget_limit(&self, _: Decimal) -> Result<Settings> {
        Err(connection_refused())
    }
}

/// Reads go to the wrapped store; every write is refused.
pub struct ReadOnlyStore {
    inner: SharedStore,
}

impl ReadOnlyStore {
    /// Wraps `inner`.
    pub fn new(inner: SharedStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RecordStore for ReadOnlyStore {
    async fn fetch_wallet(&self) -> Result<Option<WalletBaseline>> {
        self.inner.fetch_wallet().await
    }

    async fn fetch_deposits(&self) -> Result<Vec<DepositRecord>> {
        self.inner.fetch_deposits().await
    }

    async fn fetch_spends(&self) -> Result<Vec<SpendRecord>> {
        self.inner.fetch_spends().await
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>> {
        self.inner.fetch_settings().await
    }

    async fn save_wallet(&self, _: Decimal, _: Decimal) -> Result<WalletBaseline> {
        Err(connection_refused())
    }

    async fn insert_deposit(&self, _: &DepositRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn insert_spend(&self, _: &SpendRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn update_spend(&self, _: &SpendRecord) -> Result<()> {
        Err(connection_refused())
    }

    async fn save_pin_hash(&self, _: &str) -> Result<Settings> {
        Err(connection_refused())
    }

    async fn save_budget_limit(&self, _: Decimal) -> Result<Settings> {
        Err(connection_refused())
    }
}

/// Delays every write by a fixed duration before handing it to the wrapped store.
pub struct SlowStore {
    inner: SharedStore,
    delay: Duration,
}

impl SlowStore {
    /// Wraps `inner`, delaying writes by `delay`.
    pub fn new(inner: SharedStore, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl RecordStore for SlowStore {
    async fn fetch_wallet(&self) -> Result<Option<WalletBaseline>> {
        self.inner.fetch_wallet().await
    }

    async fn fetch_deposits(&self) -> Result<Vec<DepositRecord>> {
        self.inner.fetch_deposits().await
    }

    async fn fetch_spends(&self) -> Result<Vec<SpendRecord>> {
        self.inner.fetch_spends().await
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>> {
        self.inner.fetch_settings().await
    }

    async fn save_wallet(&self, hand: Decimal, gpay: Decimal) -> Result<WalletBaseline> {
        tokio::time::sleep(self.delay).await;
        self.inner.save_wallet(hand, gpay).await
    }

    async fn insert_deposit(&self, record: &DepositRecord) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_deposit(record).await
    }

    async fn insert_spend(&self, record: &SpendRecord) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_spend(record).await
    }

    async fn update_spend(&self, record: &SpendRecord) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_spend(record).await
    }

    async fn save_pin_hash(&self, pin_hash: &str) -> Result<Settings> {
        tokio::time::sleep(self.delay).await;
        self.inner.save_pin_hash(pin_hash).await
    }

    async fn save_budget_limit(&self, limit: Decimal) -> Result<Settings> {
        tokio::time::sleep(self.delay).await;
        self.inner.save_budget_limit(limit).await
    }
}
