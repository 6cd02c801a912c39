use sea_orm::{ActiveValue, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Account, EngineError, Money, ResultEngine, accounts, util::normalize_required_name,
};

use super::{Engine, with_tx};

/// Load an account or fail with a labeled `KeyNotFound`.
pub(super) async fn require_account<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
    label: &str,
) -> ResultEngine<accounts::Model> {
    accounts::Entity::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{label} {account_id} not exists")))
}

impl Engine {
    /// Creates an account with a non-negative opening balance.
    pub async fn new_account(&self, name: &str, balance_minor: i64) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        if balance_minor < 0 {
            return Err(EngineError::InvalidArgument(
                "opening balance must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = accounts::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                balance: ActiveValue::Set(balance_minor),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(account_id = model.id, "account created");
            Ok(Account::from(model))
        })
    }

    /// Return an account snapshot from DB.
    pub async fn account(&self, account_id: i64) -> ResultEngine<Account> {
        let model = require_account(&self.database, account_id, "account").await?;
        Ok(Account::from(model))
    }

    /// All accounts, by ascending id.
    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Latest committed balance of an account.
    pub async fn balance(&self, account_id: i64) -> ResultEngine<Money> {
        Ok(self.account(account_id).await?.balance)
    }
}
