//! `SeaORM` implementation of the Record Store.
//!
//! Works over any `DatabaseConnection`. Singleton rows (baseline, settings) are
//! looked up with `find().one()`: the first row wins, and a missing row is created
//! on the first write.

use super::RecordStore;
use crate::{
    entities::{
        AddMoneyRecord, AppSettings, SpendRecord as SpendRecordEntity, WalletState,
        add_money_record, app_settings, spend_record, wallet_state,
    },
    errors::{Error, Result},
    models::{DepositRecord, PaymentMethod, Settings, SpendRecord, WalletBaseline},
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use std::str::FromStr;

/// Record Store backed by a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an open connection. Tables must already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn settings_row(&self) -> Result<Option<app_settings::Model>> {
        AppSettings::find().one(&self.db).await.map_err(Into::into)
    }

    /// Applies `change` to the settings row, inserting a default row first if none exists.
    async fn upsert_settings<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut app_settings::ActiveModel) + Send,
    {
        let now = Utc::now();
        let model = if let Some(existing) = self.settings_row().await? {
            let mut active: app_settings::ActiveModel = existing.into();
            change(&mut active);
            active.updated_at = Set(now);
            active.update(&self.db).await?
        } else {
            let mut active = app_settings::ActiveModel {
                id: Set(Uuid::new_v4()),
                pin_hash: Set(None),
                budget_limit: Set(Decimal::ZERO),
                updated_at: Set(now),
            };
            change(&mut active);
            active.insert(&self.db).await?
        };
        Ok(settings_from_model(model))
    }
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    async fn fetch_wallet(&self) -> Result<Option<WalletBaseline>> {
        let model = WalletState::find().one(&self.db).await?;
        Ok(model.map(|m| WalletBaseline {
            initial_hand: m.initial_hand,
            initial_gpay: m.initial_gpay,
            created_at: m.created_at,
        }))
    }

    async fn fetch_deposits(&self) -> Result<Vec<DepositRecord>> {
        AddMoneyRecord::find()
            .order_by_desc(add_money_record::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(deposit_from_model)
            .collect()
    }

    async fn fetch_spends(&self) -> Result<Vec<SpendRecord>> {
        SpendRecordEntity::find()
            .order_by_desc(spend_record::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(spend_from_model)
            .collect()
    }

    async fn fetch_settings(&self) -> Result<Option<Settings>> {
        Ok(self.settings_row().await?.map(settings_from_model))
    }

    async fn save_wallet(
        &self,
        initial_hand: Decimal,
        initial_gpay: Decimal,
    ) -> Result<WalletBaseline> {
        let model = match WalletState::find().one(&self.db).await? {
            Some(existing) => {
                let mut active: wallet_state::ActiveModel = existing.into();
                active.initial_hand = Set(initial_hand);
                active.initial_gpay = Set(initial_gpay);
                active.update(&self.db).await?
            }
            None => {
                wallet_state::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    initial_hand: Set(initial_hand),
                    initial_gpay: Set(initial_gpay),
                    created_at: Set(Utc::now()),
                }
                .insert(&self.db)
                .await?
            }
        };

        Ok(WalletBaseline {
            initial_hand: model.initial_hand,
            initial_gpay: model.initial_gpay,
            created_at: model.created_at,
        })
    }

    async fn insert_deposit(&self, record: &DepositRecord) -> Result<()> {
        add_money_record::ActiveModel {
            id: Set(record.id),
            amount: Set(record.amount),
            method: Set(record.method.as_str().to_string()),
            date: Set(record.date),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn insert_spend(&self, record: &SpendRecord) -> Result<()> {
        spend_record::ActiveModel {
            id: Set(record.id),
            purpose: Set(record.purpose.clone()),
            amount: Set(record.amount),
            method: Set(record.method.as_str().to_string()),
            date: Set(record.date),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn update_spend(&self, record: &SpendRecord) -> Result<()> {
        let result = SpendRecordEntity::update_many()
            .col_expr(spend_record::Column::Purpose, Expr::value(record.purpose.clone()))
            .col_expr(spend_record::Column::Amount, Expr::value(record.amount))
            .col_expr(
                spend_record::Column::Method,
                Expr::value(record.method.as_str()),
            )
            .col_expr(spend_record::Column::Date, Expr::value(record.date))
            .filter(spend_record::Column::Id.eq(record.id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound { id: record.id });
        }
        Ok(())
    }

    async fn save_pin_hash(&self, pin_hash: &str) -> Result<Settings> {
        let pin_hash = pin_hash.to_string();
        self.upsert_settings(move |active| active.pin_hash = Set(Some(pin_hash)))
            .await
    }

    async fn save_budget_limit(&self, limit: Decimal) -> Result<Settings> {
        self.upsert_settings(move |active| active.budget_limit = Set(limit))
            .await
    }
}

fn parse_method(value: &str) -> Result<PaymentMethod> {
    PaymentMethod::from_str(value).map_err(|_| {
        Error::Database(DbErr::Custom(format!(
            "Unknown payment method in record store: {value}"
        )))
    })
}

fn deposit_from_model(model: add_money_record::Model) -> Result<DepositRecord> {
    Ok(DepositRecord {
        id: model.id,
        amount: model.amount,
        method: parse_method(&model.method)?,
        date: model.date,
        created_at: model.created_at,
    })
}

fn spend_from_model(model: spend_record::Model) -> Result<SpendRecord> {
    Ok(SpendRecord {
        id: model.id,
        purpose: model.purpose,
        amount: model.amount,
        method: parse_method(&model.method)?,
        date: model.date,
        created_at: model.created_at,
    })
}

fn settings_from_model(model: app_settings::Model) -> Settings {
    Settings {
        id: model.id,
        pin_hash: model.pin_hash,
        budget_limit: model.budget_limit,
    }
}
