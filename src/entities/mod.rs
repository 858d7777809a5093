//! Entity module - Contains all SeaORM entity definitions for the Record Store.
//! These entities mirror the four remote tables: the wallet baseline, deposit
//! records, spend records and the app settings row.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod add_money_record;
pub mod app_settings;
pub mod spend_record;
pub mod wallet_state;

// Re-export specific types to avoid conflicts
pub use add_money_record::{
    Column as AddMoneyRecordColumn, Entity as AddMoneyRecord, Model as AddMoneyRecordModel,
};
pub use app_settings::{
    Column as AppSettingsColumn, Entity as AppSettings, Model as AppSettingsModel,
};
pub use spend_record::{
    Column as SpendRecordColumn, Entity as SpendRecord, Model as SpendRecordModel,
};
pub use wallet_state::{
    Column as WalletStateColumn, Entity as WalletState, Model as WalletStateModel,
};
