//! Record Store boundary.
//!
//! The store persists the wallet baseline, deposit and spend records and the
//! settings row. Everything above this trait treats it as a remote collaborator:
//! calls may fail or hang, and the session decides how to surface that.

mod sea_orm_store;

pub use sea_orm_store::SeaOrmStore;

use crate::errors::{Error, Result};
use crate::models::{DepositRecord, Settings, SpendRecord, WalletBaseline};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::error;

/// Shared handle to a store, used by both the auth gate and the wallet session.
pub type SharedStore = Arc<dyn RecordStore>;

/// Request/response access to the four record tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads the singleton baseline row, if it exists.
    async fn fetch_wallet(&self) -> Result<Option<WalletBaseline>>;

    /// Loads every deposit, newest first by creation time.
    async fn fetch_deposits(&self) -> Result<Vec<DepositRecord>>;

    /// Loads every spend, newest first by creation time.
    async fn fetch_spends(&self) -> Result<Vec<SpendRecord>>;

    /// Loads the singleton settings row, if it exists.
    async fn fetch_settings(&self) -> Result<Option<Settings>>;

    /// Creates or replaces the baseline row.
    async fn save_wallet(&self, initial_hand: Decimal, initial_gpay: Decimal)
    -> Result<WalletBaseline>;

    /// Inserts a deposit with its client-assigned id.
    async fn insert_deposit(&self, record: &DepositRecord) -> Result<()>;

    /// Inserts a spend with its client-assigned id.
    async fn insert_spend(&self, record: &SpendRecord) -> Result<()>;

    /// Overwrites the mutable fields of an existing spend.
    ///
    /// Returns [`crate::errors::Error::NotFound`] when no row has the record's id.
    async fn update_spend(&self, record: &SpendRecord) -> Result<()>;

    /// Stores a PIN hash, creating the settings row if needed.
    async fn save_pin_hash(&self, pin_hash: &str) -> Result<Settings>;

    /// Stores the budget limit, creating the settings row if needed.
    async fn save_budget_limit(&self, limit: Decimal) -> Result<Settings>;
}

/// Runs one remote write under `timeout`.
///
/// [`Error::NotFound`] passes through unchanged. Every other failure, and an
/// elapsed timeout, becomes [`Error::RemoteWrite`] naming `operation`.
pub(crate) async fn guarded_write<T, F>(
    operation: &'static str,
    timeout: Duration,
    write: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, write).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err @ Error::NotFound { .. })) => Err(err),
        Ok(Err(err)) => {
            error!("Remote write '{}' failed: {}", operation, err);
            Err(Error::RemoteWrite {
                operation,
                message: err.to_string(),
            })
        }
        Err(_) => {
            error!(
                "Remote write '{}' timed out after {:?}",
                operation, timeout
            );
            Err(Error::RemoteWrite {
                operation,
                message: format!("timed out after {timeout:?}"),
            })
        }
    }
}
