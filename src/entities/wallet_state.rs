//! Wallet state entity - The singleton row holding the initial balance of
//! each payment method.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet baseline database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_state")]
pub struct Model {
    /// Unique identifier of the row
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Starting cash balance
    pub initial_hand: Decimal,
    /// Starting digital-wallet balance
    pub initial_gpay: Decimal,
    /// When the row was first written
    pub created_at: DateTimeUtc,
}

/// `WalletState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
