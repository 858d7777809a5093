//! Wallet Data Session - the in-memory snapshot and its mutators.
//!
//! The snapshot is loaded once at session start and replaced wholesale after
//! every successful remote write. Mutators follow the same sequence:
//! validate the input, check connectivity, claim the single write slot, run the
//! balance guard where it applies, write to the Record Store, then publish the
//! new snapshot. A failure at any step leaves the published snapshot untouched.

use crate::{
    core::{
        balance::{self, DailySeries, MonthlyComparison, WeeklyComparison},
        budget::{self, BudgetStatus},
        calendar,
        connectivity::Connectivity,
    },
    errors::{Error, Result},
    models::{
        BalanceState, DepositRecord, NewDeposit, NewSpend, PaymentMethod, SpendRecord,
        SpendUpdate, WalletBaseline, ensure_non_negative,
    },
    store::{SharedStore, guarded_write},
};
use chrono::{Datelike, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::{
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Immutable view of the wallet data at one point in time.
///
/// Both record collections are ordered newest first by creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSnapshot {
    /// Initial balances
    pub wallet: WalletBaseline,
    /// Deposits, newest first
    pub deposits: Vec<DepositRecord>,
    /// Spends, newest first
    pub spends: Vec<SpendRecord>,
    /// Monthly budget limit, `0` when unset
    pub budget_limit: Decimal,
}

impl WalletSnapshot {
    /// Current balances.
    #[must_use]
    pub fn balance(&self) -> BalanceState {
        balance::compute_balance(&self.wallet, &self.deposits, &self.spends)
    }

    /// Current balance of one method.
    #[must_use]
    pub fn available(&self, method: PaymentMethod) -> Decimal {
        balance::available_balance(method, &self.wallet, &self.deposits, &self.spends)
    }

    /// Looks up a spend by id.
    #[must_use]
    pub fn spend_by_id(&self, id: Uuid) -> Option<&SpendRecord> {
        self.spends.iter().find(|s| s.id == id)
    }

    /// Spends dated in the given calendar month, newest first.
    pub fn spends_in_month(&self, year: i32, month: u32) -> Result<Vec<&SpendRecord>> {
        let (from, to) = calendar::month_bounds(year, month)?;
        Ok(self
            .spends
            .iter()
            .filter(|s| (from..=to).contains(&s.date))
            .collect())
    }

    /// All deposits, newest first.
    #[must_use]
    pub fn deposits_newest_first(&self) -> &[DepositRecord] {
        &self.deposits
    }

    /// Budget usage for the month containing `today`.
    #[must_use]
    pub fn budget_status(&self, today: NaiveDate, near_limit_percent: u32) -> BudgetStatus {
        budget::budget_status(&self.spends, self.budget_limit, today, near_limit_percent)
    }

    /// This week against last week, anchored on `today`.
    #[must_use]
    pub fn weekly_comparison(&self, today: NaiveDate) -> WeeklyComparison {
        balance::weekly_comparison(&self.spends, today)
    }

    /// This month against last month, anchored on `today`.
    #[must_use]
    pub fn monthly_comparison(&self, today: NaiveDate) -> MonthlyComparison {
        balance::monthly_comparison(&self.spends, today)
    }

    /// Per-day spending for `[from, to]`.
    #[must_use]
    pub fn daily_series(&self, from: NaiveDate, to: NaiveDate) -> DailySeries {
        balance::daily_series(&self.spends, from, to)
    }
}

/// Releases the write slot when dropped.
struct WriteSlot<'a>(&'a AtomicBool);

impl Drop for WriteSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owner of the wallet snapshot for one application session.
pub struct WalletSession {
    store: SharedStore,
    connectivity: Connectivity,
    write_timeout: Duration,
    snapshot: RwLock<Arc<WalletSnapshot>>,
    write_in_flight: AtomicBool,
}

impl WalletSession {
    /// Loads the wallet data from the store.
    ///
    /// When offline, or when the store cannot be read, the session starts from
    /// an empty snapshot (zero baseline, no records, no budget).
    pub async fn load(
        store: SharedStore,
        connectivity: Connectivity,
        write_timeout: Duration,
    ) -> Self {
        let snapshot = if connectivity.is_online() {
            fetch_snapshot(&store).await.unwrap_or_else(|e| {
                warn!("Could not load wallet data, starting with an empty snapshot: {}", e);
                WalletSnapshot::default()
            })
        } else {
            info!("Offline at startup, starting with an empty wallet snapshot");
            WalletSnapshot::default()
        };

        Self::from_snapshot(store, connectivity, write_timeout, snapshot)
    }

    /// Builds a session around an existing snapshot.
    #[must_use]
    pub fn from_snapshot(
        store: SharedStore,
        connectivity: Connectivity,
        write_timeout: Duration,
        snapshot: WalletSnapshot,
    ) -> Self {
        Self {
            store,
            connectivity,
            write_timeout,
            snapshot: RwLock::new(Arc::new(snapshot)),
            write_in_flight: AtomicBool::new(false),
        }
    }

    /// The currently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WalletSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Current balances.
    #[must_use]
    pub fn balance(&self) -> BalanceState {
        self.snapshot().balance()
    }

    /// This week against last week, anchored on the local date.
    #[must_use]
    pub fn weekly_comparison(&self) -> WeeklyComparison {
        self.snapshot().weekly_comparison(local_today())
    }

    /// This month against last month, anchored on the local date.
    #[must_use]
    pub fn monthly_comparison(&self) -> MonthlyComparison {
        self.snapshot().monthly_comparison(local_today())
    }

    /// Per-day spending for the current local month.
    #[must_use]
    pub fn current_month_series(&self) -> DailySeries {
        let today = local_today();
        self.snapshot().daily_series(
            calendar::start_of_month(today),
            calendar::end_of_month(today),
        )
    }

    /// Adds money to one method.
    #[instrument(skip(self, input))]
    pub async fn add_deposit(&self, input: NewDeposit) -> Result<DepositRecord> {
        input.validate()?;
        self.connectivity.ensure_online("add money")?;
        let _slot = self.begin_write()?;

        let record = DepositRecord {
            id: Uuid::new_v4(),
            amount: input.amount,
            method: input.method,
            date: input.date,
            created_at: Utc::now(),
        };
        guarded_write(
            "add money",
            self.write_timeout,
            self.store.insert_deposit(&record),
        )
        .await?;

        self.publish(|next| next.deposits.insert(0, record.clone()));
        info!("Added {} to {}", record.amount, record.method);
        Ok(record)
    }

    /// Records a spend, rejecting it when the method cannot cover it.
    #[instrument(skip(self, input))]
    pub async fn add_spend(&self, input: NewSpend) -> Result<SpendRecord> {
        let input = input.validated()?;
        self.connectivity.ensure_online("add spend")?;
        let _slot = self.begin_write()?;

        let current = self.snapshot();
        balance::ensure_affordable(
            input.method,
            input.amount,
            &current.wallet,
            &current.deposits,
            &current.spends,
            None,
        )
        .inspect_err(|e| warn!("Spend rejected: {}", e))?;

        let record = SpendRecord {
            id: Uuid::new_v4(),
            purpose: input.purpose,
            amount: input.amount,
            method: input.method,
            date: input.date,
            created_at: Utc::now(),
        };
        guarded_write("add spend", self.write_timeout, self.store.insert_spend(&record)).await?;

        self.publish(|next| next.spends.insert(0, record.clone()));
        info!("Spent {} from {}", record.amount, record.method);
        Ok(record)
    }

    /// Updates a spend in place.
    ///
    /// Returns `Ok(None)` without contacting the store when `id` is not in the
    /// snapshot. The balance guard excludes the record's own current amount.
    #[instrument(skip(self, update))]
    pub async fn update_spend(&self, id: Uuid, update: SpendUpdate) -> Result<Option<SpendRecord>> {
        self.connectivity.ensure_online("update spend")?;
        let _slot = self.begin_write()?;

        let current = self.snapshot();
        let Some(existing) = current.spend_by_id(id) else {
            debug!("Spend {} not in snapshot, nothing to update", id);
            return Ok(None);
        };
        let updated = update.apply_to(existing)?;

        balance::ensure_affordable(
            updated.method,
            updated.amount,
            &current.wallet,
            &current.deposits,
            &current.spends,
            Some(id),
        )
        .inspect_err(|e| warn!("Spend update rejected: {}", e))?;

        guarded_write("update", self.write_timeout, self.store.update_spend(&updated)).await?;

        self.publish(|next| {
            if let Some(slot) = next.spends.iter_mut().find(|s| s.id == id) {
                *slot = updated.clone();
            }
        });
        info!("Updated spend {}", id);
        Ok(Some(updated))
    }

    /// Replaces the initial balances. A `None` side keeps its current value.
    #[instrument(skip(self))]
    pub async fn set_initial_balance(
        &self,
        hand: Option<Decimal>,
        gpay: Option<Decimal>,
    ) -> Result<WalletBaseline> {
        for value in [hand, gpay].into_iter().flatten() {
            ensure_non_negative(value, "Values cannot be negative")?;
        }
        self.connectivity.ensure_online("update balance")?;
        let _slot = self.begin_write()?;

        let current = self.snapshot();
        let hand = hand.unwrap_or(current.wallet.initial_hand);
        let gpay = gpay.unwrap_or(current.wallet.initial_gpay);

        let wallet = guarded_write("save", self.write_timeout, self.store.save_wallet(hand, gpay))
            .await?;

        self.publish(|next| next.wallet = wallet.clone());
        info!("Initial balances set: hand {}, gpay {}", hand, gpay);
        Ok(wallet)
    }

    /// Sets the monthly budget limit; `0` turns budget alerts off.
    #[instrument(skip(self))]
    pub async fn set_budget_limit(&self, limit: Decimal) -> Result<Decimal> {
        ensure_non_negative(limit, "Budget cannot be negative")?;
        self.connectivity.ensure_online("update budget")?;
        let _slot = self.begin_write()?;

        let settings =
            guarded_write("save", self.write_timeout, self.store.save_budget_limit(limit)).await?;

        self.publish(|next| next.budget_limit = settings.budget_limit);
        info!("Budget limit set to {}", settings.budget_limit);
        Ok(settings.budget_limit)
    }

    fn begin_write(&self) -> Result<WriteSlot<'_>> {
        self.write_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                warn!("Write rejected: another write is in flight");
                Error::WriteInProgress
            })?;
        Ok(WriteSlot(&self.write_in_flight))
    }

    /// Applies `change` to a copy of the current snapshot and publishes the copy.
    fn publish(&self, change: impl FnOnce(&mut WalletSnapshot)) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = WalletSnapshot::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
    }
}

async fn fetch_snapshot(store: &SharedStore) -> Result<WalletSnapshot> {
    let wallet = store.fetch_wallet().await?.unwrap_or_default();
    let deposits = store.fetch_deposits().await?;
    let spends = store.fetch_spends().await?;
    let budget_limit = store
        .fetch_settings()
        .await?
        .map_or(Decimal::ZERO, |s| s.budget_limit);
    debug!(
        "Loaded wallet data: {} deposits, {} spends",
        deposits.len(),
        spends.len()
    );

    Ok(WalletSnapshot {
        wallet,
        deposits,
        spends,
        budget_limit,
    })
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The month containing the local date, as `(year, month)`.
#[must_use]
pub fn current_month() -> (i32, u32) {
    let today = local_today();
    (today.year(), today.month())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{ReadOnlyStore, SlowStore, UnreachableStore, date, shared_test_store};
    use rust_decimal_macros::dec;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn session_with(
        hand: Decimal,
        gpay: Decimal,
    ) -> Result<(WalletSession, SharedStore, Connectivity)> {
        let store = shared_test_store().await?;
        store.save_wallet(hand, gpay).await?;
        let connectivity = Connectivity::new(true);
        let session =
            WalletSession::load(Arc::clone(&store), connectivity.clone(), TIMEOUT).await;
        Ok((session, store, connectivity))
    }

    fn spend(purpose: &str, amount: Decimal, method: PaymentMethod) -> NewSpend {
        NewSpend {
            purpose: purpose.to_string(),
            amount,
            method,
            date: date(2026, 10, 15),
        }
    }

    fn deposit(amount: Decimal, method: PaymentMethod) -> NewDeposit {
        NewDeposit {
            amount,
            method,
            date: date(2026, 10, 15),
        }
    }

    #[tokio::test]
    async fn test_load_reads_everything_from_store() -> Result<()> {
        let (session, store, connectivity) = session_with(dec!(1000), dec!(500)).await?;
        session.add_deposit(deposit(dec!(200), PaymentMethod::Hand)).await?;
        session.add_spend(spend("Rent share", dec!(300), PaymentMethod::Hand)).await?;
        session.set_budget_limit(dec!(4000)).await?;

        let reloaded = WalletSession::load(store, connectivity, TIMEOUT).await;
        let (before, after) = (session.snapshot(), reloaded.snapshot());
        assert_eq!(after.deposits[0].id, before.deposits[0].id);
        assert_eq!(after.spends[0].id, before.spends[0].id);
        assert_eq!(after.spends[0].purpose, "Rent share");
        assert_eq!(
            reloaded.balance(),
            BalanceState {
                hand: dec!(900),
                gpay: dec!(500),
                total: dec!(1400),
            }
        );
        assert_eq!(reloaded.snapshot().budget_limit, dec!(4000));
        Ok(())
    }

    #[tokio::test]
    async fn test_offline_load_starts_empty() -> Result<()> {
        let store = shared_test_store().await?;
        store.save_wallet(dec!(50), dec!(50)).await?;

        let session = WalletSession::load(store, Connectivity::new(false), TIMEOUT).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.wallet.initial_hand, Decimal::ZERO);
        assert!(snapshot.spends.is_empty());
        assert_eq!(snapshot.budget_limit, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_store_starts_empty() {
        let store: SharedStore = Arc::new(UnreachableStore);
        let session = WalletSession::load(store, Connectivity::new(true), TIMEOUT).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.balance().total, Decimal::ZERO);
        assert!(snapshot.deposits.is_empty());
        assert!(snapshot.spends.is_empty());
        assert_eq!(snapshot.budget_limit, Decimal::ZERO);
        let result = session.set_budget_limit(dec!(100)).await;
        assert!(matches!(result, Err(Error::RemoteWrite { .. })));
    }

    #[tokio::test]
    async fn test_new_records_are_prepended() -> Result<()> {
        let (session, _, _) = session_with(dec!(100), dec!(100)).await?;

        let first = session.add_deposit(deposit(dec!(10), PaymentMethod::Hand)).await?;
        let second = session.add_deposit(deposit(dec!(20), PaymentMethod::Gpay)).await?;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.deposits_newest_first(), &[second, first][..]);
        Ok(())
    }

    #[tokio::test]
    async fn test_spend_guard_boundary() -> Result<()> {
        let (session, store, _) = session_with(dec!(250), dec!(0)).await?;
        let available = session.snapshot().available(PaymentMethod::Hand);

        let before = session.snapshot();
        let rejected = session
            .add_spend(spend("Too much", available + dec!(0.01), PaymentMethod::Hand))
            .await;
        assert!(matches!(rejected, Err(Error::InsufficientFunds { .. })));
        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        assert!(store.fetch_spends().await?.is_empty());

        session
            .add_spend(spend("Everything", available, PaymentMethod::Hand))
            .await?;
        assert_eq!(session.snapshot().available(PaymentMethod::Hand), Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_spend_guard_is_per_method() -> Result<()> {
        let (session, _, _) = session_with(dec!(0), dec!(300)).await?;

        let result = session.add_spend(spend("Cash", dec!(1), PaymentMethod::Hand)).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds { method: PaymentMethod::Hand, .. })
        ));
        session.add_spend(spend("Online", dec!(300), PaymentMethod::Gpay)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_update_excludes_own_amount() -> Result<()> {
        let (session, store, _) = session_with(dec!(100), dec!(0)).await?;
        let record = session.add_spend(spend("Dinner", dec!(60), PaymentMethod::Hand)).await?;

        // 40 left, the record may still grow to 100
        let updated = session
            .update_spend(
                record.id,
                SpendUpdate {
                    amount: Some(dec!(100)),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();
        assert_eq!(updated.amount, dec!(100));
        assert_eq!(session.snapshot().available(PaymentMethod::Hand), Decimal::ZERO);

        let too_much = session
            .update_spend(
                record.id,
                SpendUpdate {
                    amount: Some(dec!(100.01)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(too_much, Err(Error::InsufficientFunds { .. })));

        let stored = store.fetch_spends().await?;
        assert_eq!(stored[0].amount, dec!(100));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() -> Result<()> {
        let (session, _, _) = session_with(dec!(500), dec!(500)).await?;
        let older = session.add_spend(spend("Tea", dec!(10), PaymentMethod::Hand)).await?;
        let newer = session.add_spend(spend("Book", dec!(90), PaymentMethod::Gpay)).await?;

        session
            .update_spend(
                older.id,
                SpendUpdate {
                    purpose: Some(" Coffee ".to_string()),
                    method: Some(PaymentMethod::Gpay),
                    date: Some(date(2026, 10, 1)),
                    ..Default::default()
                },
            )
            .await?;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.spends[0].id, newer.id);
        assert_eq!(snapshot.spends[1].id, older.id);
        assert_eq!(snapshot.spends[1].purpose, "Coffee");
        assert_eq!(snapshot.spends[1].method, PaymentMethod::Gpay);
        assert_eq!(snapshot.spends[1].created_at, older.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() -> Result<()> {
        let (session, _, _) = session_with(dec!(100), dec!(0)).await?;
        let result = session
            .update_spend(Uuid::new_v4(), SpendUpdate::default())
            .await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_happens_before_remote_call() -> Result<()> {
        let (session, store, _) = session_with(dec!(100), dec!(0)).await?;

        let empty = session.add_spend(spend("  ", dec!(5), PaymentMethod::Hand)).await;
        assert!(matches!(empty, Err(Error::Validation { .. })));
        let zero = session.add_deposit(deposit(Decimal::ZERO, PaymentMethod::Hand)).await;
        assert!(matches!(zero, Err(Error::Validation { .. })));
        let negative = session.set_budget_limit(dec!(-1)).await;
        assert_eq!(negative.unwrap_err().to_string(), "Budget cannot be negative");
        let negative = session.set_initial_balance(Some(dec!(-1)), None).await;
        assert_eq!(negative.unwrap_err().to_string(), "Values cannot be negative");

        assert!(store.fetch_spends().await?.is_empty());
        assert!(store.fetch_deposits().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_offline_mutations_rejected() -> Result<()> {
        let (session, store, connectivity) = session_with(dec!(100), dec!(0)).await?;
        connectivity.set_online(false);
        let before = session.snapshot();

        let result = session.add_spend(spend("Tea", dec!(5), PaymentMethod::Hand)).await;
        assert_eq!(result.unwrap_err().to_string(), "Please go online to add spend");
        let result = session.add_deposit(deposit(dec!(5), PaymentMethod::Hand)).await;
        assert!(matches!(result, Err(Error::Connectivity { operation: "add money" })));
        let result = session.set_budget_limit(dec!(5)).await;
        assert!(matches!(result, Err(Error::Connectivity { .. })));

        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        assert!(store.fetch_spends().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_snapshot_unchanged() -> Result<()> {
        let inner = shared_test_store().await?;
        inner.save_wallet(dec!(100), dec!(100)).await?;
        let store: SharedStore = Arc::new(ReadOnlyStore::new(inner));
        let session = WalletSession::load(store, Connectivity::new(true), TIMEOUT).await;
        let before = session.snapshot();

        let result = session.add_spend(spend("Tea", dec!(5), PaymentMethod::Hand)).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to add spend. Please try again."
        );
        let result = session.set_initial_balance(Some(dec!(1)), None).await;
        assert!(matches!(result, Err(Error::RemoteWrite { operation: "save", .. })));

        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        Ok(())
    }

    #[tokio::test]
    async fn test_slow_write_times_out() -> Result<()> {
        let inner = shared_test_store().await?;
        let store: SharedStore = Arc::new(SlowStore::new(Arc::clone(&inner), Duration::from_secs(2)));
        let session =
            WalletSession::load(store, Connectivity::new(true), Duration::from_millis(100)).await;

        let result = session.add_deposit(deposit(dec!(10), PaymentMethod::Hand)).await;
        assert!(matches!(result, Err(Error::RemoteWrite { operation: "add money", .. })));
        assert!(session.snapshot().deposits.is_empty());
        assert!(inner.fetch_deposits().await?.is_empty());

        // the slot is released after a timeout
        let result = session.add_deposit(deposit(dec!(10), PaymentMethod::Hand)).await;
        assert!(matches!(result, Err(Error::RemoteWrite { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_double_submit_is_rejected() -> Result<()> {
        let inner = shared_test_store().await?;
        let store: SharedStore =
            Arc::new(SlowStore::new(Arc::clone(&inner), Duration::from_millis(50)));
        let session = WalletSession::load(store, Connectivity::new(true), TIMEOUT).await;

        let (first, second) = tokio::join!(
            session.add_deposit(deposit(dec!(10), PaymentMethod::Hand)),
            session.add_deposit(deposit(dec!(10), PaymentMethod::Hand)),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::WriteInProgress)));
        assert_eq!(session.snapshot().deposits.len(), 1);
        assert_eq!(inner.fetch_deposits().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_initial_balance_partial_replace() -> Result<()> {
        let (session, store, _) = session_with(dec!(1000), dec!(500)).await?;

        let wallet = session.set_initial_balance(None, Some(dec!(750))).await?;
        assert_eq!(wallet.initial_hand, dec!(1000));
        assert_eq!(wallet.initial_gpay, dec!(750));

        let wallet = session.set_initial_balance(Some(Decimal::ZERO), None).await?;
        assert_eq!(wallet.initial_hand, Decimal::ZERO);
        assert_eq!(session.snapshot().wallet, wallet);
        assert_eq!(store.fetch_wallet().await?.unwrap(), wallet);
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_readers_keep_old_view() -> Result<()> {
        let (session, _, _) = session_with(dec!(100), dec!(0)).await?;
        let reader = session.snapshot();

        session.add_spend(spend("Tea", dec!(5), PaymentMethod::Hand)).await?;

        assert!(reader.spends.is_empty());
        assert_eq!(reader.available(PaymentMethod::Hand), dec!(100));
        assert_eq!(session.snapshot().available(PaymentMethod::Hand), dec!(95));
        Ok(())
    }

    #[tokio::test]
    async fn test_spends_in_month_and_budget_status() -> Result<()> {
        let (session, _, _) = session_with(dec!(5000), dec!(0)).await?;
        session.set_budget_limit(dec!(1000)).await?;
        session.add_spend(spend("Groceries", dec!(850), PaymentMethod::Hand)).await?;
        session
            .add_spend(NewSpend {
                date: date(2026, 9, 20),
                ..spend("September", dec!(400), PaymentMethod::Hand)
            })
            .await?;

        let snapshot = session.snapshot();
        let october = snapshot.spends_in_month(2026, 10)?;
        assert_eq!(october.len(), 1);
        assert_eq!(october[0].purpose, "Groceries");
        assert!(snapshot.spends_in_month(2026, 13).is_err());

        let status = snapshot.budget_status(date(2026, 10, 15), 80);
        assert_eq!(status.spent, dec!(850));
        assert_eq!(status.level, budget::BudgetLevel::Near);
        Ok(())
    }
}
