//! App settings entity - The singleton row holding the PIN hash and the
//! monthly budget limit. Created lazily on the first write of either field.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// App settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_settings")]
pub struct Model {
    /// Unique identifier of the row
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Hash of the 4-digit PIN, `None` until a PIN is set
    pub pin_hash: Option<String>,
    /// Monthly spending ceiling for alerts (0 disables alerts)
    pub budget_limit: Decimal,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// `AppSettings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
