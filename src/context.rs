//! Session context - everything one running application instance owns.
//!
//! `AppContext` replaces process-wide state: the configuration, the online
//! flag, the PIN gate and the wallet session are created together by
//! [`AppContext::start`] and dropped together by [`AppContext::shutdown`].

use crate::{
    config::AppConfig,
    core::{
        auth::PinGate,
        budget::BudgetStatus,
        connectivity::Connectivity,
        export::{self, ExportFile, ExportFormat, ExportPeriod},
        pin::PinHashing,
        session::WalletSession,
    },
    errors::Result,
    store::SharedStore,
};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::info;

/// Owner of the per-session state.
pub struct AppContext {
    config: AppConfig,
    connectivity: Connectivity,
    auth: PinGate,
    wallet: WalletSession,
}

impl AppContext {
    /// Loads the PIN gate and the wallet session from `store`.
    ///
    /// `online` is the reachability observed at startup; later changes go
    /// through [`AppContext::connectivity`]. A store that cannot be read leaves
    /// both at their empty starting state.
    pub async fn start(config: AppConfig, store: SharedStore, online: bool) -> Self {
        let connectivity = Connectivity::new(online);
        let write_timeout = config.store.write_timeout();

        let auth = PinGate::load(
            Arc::clone(&store),
            connectivity.clone(),
            PinHashing::new(config.security.pin_hash_scheme),
            write_timeout,
        )
        .await;
        let wallet = WalletSession::load(store, connectivity.clone(), write_timeout).await;

        info!(
            "Session started ({}), PIN state: {:?}",
            if online { "online" } else { "offline" },
            auth.state()
        );

        Self {
            config,
            connectivity,
            auth,
            wallet,
        }
    }

    /// Application configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the online flag, for connectivity-change events.
    #[must_use]
    pub const fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// The PIN gate.
    #[must_use]
    pub const fn auth(&self) -> &PinGate {
        &self.auth
    }

    /// The PIN gate, for keypad input, locking and PIN changes.
    pub const fn auth_mut(&mut self) -> &mut PinGate {
        &mut self.auth
    }

    /// The wallet session. Fails with `Locked` unless the gate is unlocked.
    pub fn wallet(&self) -> Result<&WalletSession> {
        self.auth.require_unlocked()?;
        Ok(&self.wallet)
    }

    /// Budget usage for the current local month.
    pub fn budget_status(&self) -> Result<BudgetStatus> {
        let today = Local::now().date_naive();
        Ok(self
            .wallet()?
            .snapshot()
            .budget_status(today, self.config.budget.near_limit_percent))
    }

    /// Encodes one month of spends in `format`.
    pub fn export_month(
        &self,
        year: i32,
        month: u32,
        format: ExportFormat,
        generated_at: NaiveDateTime,
    ) -> Result<ExportFile> {
        let snapshot = self.wallet()?.snapshot();
        let period = ExportPeriod::month(year, month)?;
        export::export_spends(
            &snapshot.spends,
            &period,
            format,
            &self.config.export,
            generated_at,
        )
    }

    /// Ends the session. The gate is locked before the state is dropped.
    pub fn shutdown(mut self) {
        self.auth.lock();
        info!("Session closed");
    }
}
