//! Authentication Gate - PIN lifecycle state machine.
//!
//! A single four-digit PIN guards the whole application. The gate walks through
//! first-time creation (enter, confirm), then alternates between locked and
//! unlocked. Only the hash is ever persisted; entered digits live in memory
//! until the entry is submitted and are never logged.
//!
//! Writes to the settings row need the Record Store to be reachable. Unlocking
//! compares against the hash loaded at startup and works offline.

use crate::{
    core::{
        connectivity::Connectivity,
        pin::{PIN_LENGTH, Pin, PinHashing},
    },
    errors::{Error, Result},
    models::Settings,
    store::{SharedStore, guarded_write},
};
use serde::Serialize;
use std::{mem, time::Duration};
use tracing::{debug, info, instrument, warn};

/// Externally visible gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PinState {
    /// No PIN stored and no entry made yet
    Uninitialized,
    /// Creating a PIN, waiting for the first entry (after a mismatch or failed save)
    AwaitingFirstEntry,
    /// Creating a PIN, waiting for the confirmation entry
    AwaitingConfirmEntry,
    /// PIN set, app locked
    Locked,
    /// PIN set, full access
    Unlocked,
}

/// Successful result of a submitted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PinOutcome {
    /// First entry accepted, enter it again to confirm
    ConfirmRequired,
    /// New PIN stored, app unlocked
    PinSet,
    /// Stored PIN matched, app unlocked
    Unlocked,
    /// Entry ignored, the app was already unlocked
    AlreadyUnlocked,
}

enum Phase {
    Uninitialized,
    AwaitingFirstEntry,
    AwaitingConfirmEntry { first: Pin },
    Locked,
    Unlocked,
}

/// The PIN gate for one application session.
pub struct PinGate {
    store: SharedStore,
    connectivity: Connectivity,
    hashing: PinHashing,
    write_timeout: Duration,
    phase: Phase,
    pin_hash: Option<String>,
    entry: String,
}

impl PinGate {
    /// Loads the stored PIN hash and starts locked, or uninitialized when no PIN exists.
    ///
    /// An unreachable store is not fatal: the gate starts uninitialized and PIN
    /// creation stays blocked until the app is back online.
    pub async fn load(
        store: SharedStore,
        connectivity: Connectivity,
        hashing: PinHashing,
        write_timeout: Duration,
    ) -> Self {
        let settings = if connectivity.is_online() {
            match store.fetch_settings().await {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Could not load PIN settings, starting uninitialized: {}", e);
                    None
                }
            }
        } else {
            info!("Offline at startup, PIN settings not loaded");
            None
        };

        Self::from_settings(store, connectivity, hashing, write_timeout, settings.as_ref())
    }

    /// Builds a gate from an already-loaded settings row.
    #[must_use]
    pub fn from_settings(
        store: SharedStore,
        connectivity: Connectivity,
        hashing: PinHashing,
        write_timeout: Duration,
        settings: Option<&Settings>,
    ) -> Self {
        let pin_hash = settings.and_then(|s| s.pin_hash.clone());
        let phase = if pin_hash.is_some() {
            Phase::Locked
        } else {
            Phase::Uninitialized
        };
        debug!("PIN gate ready, pin set: {}", pin_hash.is_some());

        Self {
            store,
            connectivity,
            hashing,
            write_timeout,
            phase,
            pin_hash,
            entry: String::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PinState {
        match self.phase {
            Phase::Uninitialized => PinState::Uninitialized,
            Phase::AwaitingFirstEntry => PinState::AwaitingFirstEntry,
            Phase::AwaitingConfirmEntry { .. } => PinState::AwaitingConfirmEntry,
            Phase::Locked => PinState::Locked,
            Phase::Unlocked => PinState::Unlocked,
        }
    }

    /// Whether a PIN hash is stored.
    #[must_use]
    pub const fn is_pin_set(&self) -> bool {
        self.pin_hash.is_some()
    }

    /// Whether the app is unlocked.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.phase, Phase::Unlocked)
    }

    /// Number of digits currently in the entry buffer.
    #[must_use]
    pub fn entry_len(&self) -> usize {
        self.entry.len()
    }

    /// Route guard for everything behind the gate.
    pub fn require_unlocked(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::Locked)
        }
    }

    const fn is_creating(&self) -> bool {
        matches!(
            self.phase,
            Phase::Uninitialized | Phase::AwaitingFirstEntry | Phase::AwaitingConfirmEntry { .. }
        )
    }

    /// Appends one keypad digit. The fourth digit submits the entry.
    ///
    /// Returns `Ok(None)` while the entry is incomplete.
    pub async fn press_digit(&mut self, digit: char) -> Result<Option<PinOutcome>> {
        if !digit.is_ascii_digit() {
            return Err(Error::validation("PIN must be 4 digits"));
        }
        if self.is_creating() {
            self.connectivity.ensure_online("set your PIN")?;
        }

        self.entry.push(digit);
        if self.entry.len() < PIN_LENGTH {
            return Ok(None);
        }

        let entry = mem::take(&mut self.entry);
        let pin = Pin::new(&entry)?;
        self.submit_entry(&pin).await.map(Some)
    }

    /// Removes the last digit of the entry buffer, if any.
    pub fn delete_digit(&mut self) {
        self.entry.pop();
    }

    /// Submits a complete entry in the current state.
    ///
    /// The entry buffer is always cleared.
    #[instrument(skip(self, pin))]
    pub async fn submit_entry(&mut self, pin: &Pin) -> Result<PinOutcome> {
        self.entry.clear();

        match mem::replace(&mut self.phase, Phase::AwaitingFirstEntry) {
            previous @ (Phase::Uninitialized | Phase::AwaitingFirstEntry) => {
                if let Err(e) = self.connectivity.ensure_online("set your PIN") {
                    self.phase = previous;
                    return Err(e);
                }
                self.phase = Phase::AwaitingConfirmEntry { first: pin.clone() };
                Ok(PinOutcome::ConfirmRequired)
            }
            Phase::AwaitingConfirmEntry { first } => {
                if first != *pin {
                    warn!("PIN confirmation did not match, restarting PIN creation");
                    return Err(Error::PinMismatch);
                }
                self.store_new_pin(pin, "set PIN").await?;
                self.phase = Phase::Unlocked;
                info!("PIN created, app unlocked");
                Ok(PinOutcome::PinSet)
            }
            Phase::Locked => {
                let matches = match self.pin_hash.as_deref() {
                    Some(stored) => self.hashing.verify_async(pin, stored).await,
                    None => false,
                };
                if matches {
                    self.phase = Phase::Unlocked;
                    info!("App unlocked");
                    Ok(PinOutcome::Unlocked)
                } else {
                    self.phase = Phase::Locked;
                    warn!("Unlock attempt with incorrect PIN");
                    Err(Error::IncorrectPin)
                }
            }
            Phase::Unlocked => {
                self.phase = Phase::Unlocked;
                Ok(PinOutcome::AlreadyUnlocked)
            }
        }
    }

    /// Locks the app. No effect unless unlocked.
    pub fn lock(&mut self) {
        self.entry.clear();
        if matches!(self.phase, Phase::Unlocked) {
            self.phase = Phase::Locked;
            info!("App locked");
        }
    }

    /// Ends the session; the next access needs the PIN again.
    pub fn logout(&mut self) {
        self.entry.clear();
        if matches!(self.phase, Phase::Unlocked) {
            self.phase = Phase::Locked;
            info!("Logged out");
        }
    }

    /// Replaces the stored PIN. Only available while unlocked and online.
    ///
    /// On any failure the stored hash and the gate state are unchanged.
    #[instrument(skip_all)]
    pub async fn change_pin(&mut self, current: &Pin, new: &Pin, confirm: &Pin) -> Result<()> {
        self.require_unlocked()?;
        self.connectivity.ensure_online("change PIN")?;

        let current_ok = match self.pin_hash.as_deref() {
            Some(stored) => self.hashing.verify_async(current, stored).await,
            None => false,
        };
        if !current_ok {
            warn!("PIN change rejected: current PIN incorrect");
            return Err(Error::CurrentPinIncorrect);
        }
        if new != confirm {
            return Err(Error::PinMismatch);
        }

        self.store_new_pin(new, "change PIN").await?;
        info!("PIN changed");
        Ok(())
    }

    async fn store_new_pin(&mut self, pin: &Pin, operation: &'static str) -> Result<()> {
        self.connectivity.ensure_online(operation)?;
        let hash = self.hashing.hash_async(pin).await?;
        let store = &self.store;
        guarded_write(operation, self.write_timeout, store.save_pin_hash(&hash)).await?;
        self.pin_hash = Some(hash);
        Ok(())
    }
}
