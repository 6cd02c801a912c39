//! Ledger records.
//!
//! A `Transaction` is an immutable record of one balance change (a top-up or
//! an admin entry) or of one transfer between two accounts. Records are only
//! ever inserted; the engine exposes no update or delete for them.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub category_id: Option<i64>,
    /// The account whose history lists this record.
    pub account_id: i64,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns `true` if the record moved money between two accounts.
    #[must_use]
    pub fn is_transfer(&self) -> bool {
        self.from_account_id.is_some() && self.to_account_id.is_some()
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category_id: model.transaction_category_id,
            account_id: model.account_id,
            from_account_id: model.from_account_id,
            to_account_id: model.to_account_id,
            amount: Money::new(model.amount_minor),
            occurred_at: model.occurred_at,
        }
    }
}

/// Values for a record that has not been inserted yet.
#[derive(Clone, Debug)]
pub(crate) struct NewRecord {
    pub category_id: Option<i64>,
    pub account_id: i64,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
}

impl From<NewRecord> for ActiveModel {
    fn from(record: NewRecord) -> Self {
        Self {
            id: ActiveValue::NotSet,
            transaction_category_id: ActiveValue::Set(record.category_id),
            account_id: ActiveValue::Set(record.account_id),
            from_account_id: ActiveValue::Set(record.from_account_id),
            to_account_id: ActiveValue::Set(record.to_account_id),
            amount_minor: ActiveValue::Set(record.amount_minor),
            occurred_at: ActiveValue::Set(record.occurred_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_category_id: Option<i64>,
    pub account_id: i64,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::TransactionCategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
