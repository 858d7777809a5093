//! Add-money entity - One row per deposit into a payment method.
//!
//! Rows are inserted with a client-generated UUID and never modified afterwards.
//! `method` holds the lowercase method name (`"hand"` or `"gpay"`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deposit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "add_money_records")]
pub struct Model {
    /// Unique identifier, assigned by the client at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Deposited amount, strictly positive
    pub amount: Decimal,
    /// Payment method: `"hand"` or `"gpay"`
    pub method: String,
    /// Calendar date of the deposit
    pub date: Date,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// `AddMoneyRecord` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
