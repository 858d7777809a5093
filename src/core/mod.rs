//! Core business logic, independent of any front end.
//!
//! The pure parts (`calendar`, `balance`, `budget`, `export`) take records and
//! dates as arguments. The stateful parts (`auth`, `session`) talk to the
//! Record Store through [`crate::store::RecordStore`].

/// Authentication Gate - PIN lifecycle state machine
pub mod auth;
/// Balance Engine - balances, range totals, daily series, comparisons
pub mod balance;
/// Monthly budget alert levels
pub mod budget;
/// Monday-start week and calendar month helpers
pub mod calendar;
/// Shared online/offline flag
pub mod connectivity;
/// Export Formatter - CSV and paginated text reports
pub mod export;
/// PIN values and hashers
pub mod pin;
/// Wallet Data Session - snapshot and mutators
pub mod session;
