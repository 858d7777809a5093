//! Spend entity - One row per expense.
//!
//! Rows are inserted with a client-generated UUID. Purpose, amount, method and
//! date may be updated in place by id; rows are never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spend database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spend_records")]
pub struct Model {
    /// Unique identifier, assigned by the client at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// What the money was spent on
    pub purpose: String,
    /// Spent amount, strictly positive
    pub amount: Decimal,
    /// Payment method: `"hand"` or `"gpay"`
    pub method: String,
    /// Calendar date of the spend
    pub date: Date,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// `SpendRecord` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
