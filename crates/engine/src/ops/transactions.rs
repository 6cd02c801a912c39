use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Money, NewTransactionCmd, ResultEngine, TopUpCmd, Transaction,
    transactions::{self, NewRecord},
    util::require_positive_amount,
};

use super::{
    Engine, accounts::require_account, balances::lock_accounts, categories::require_category,
    with_tx,
};

impl Engine {
    /// Appends one immutable record to the ledger.
    pub(super) async fn append_record(
        &self,
        db_tx: &DatabaseTransaction,
        record: NewRecord,
    ) -> ResultEngine<Transaction> {
        let model = transactions::ActiveModel::from(record)
            .insert(db_tx)
            .await?;
        Ok(Transaction::from(model))
    }

    /// Credits `amount_minor` to an account and records it in the account
    /// history, returning the new balance.
    ///
    /// The balance change and the ledger record commit together.
    pub async fn top_up(&self, cmd: TopUpCmd) -> ResultEngine<Money> {
        let TopUpCmd {
            account_id,
            amount_minor,
            occurred_at,
        } = cmd;
        require_positive_amount(amount_minor)?;

        let result: ResultEngine<Money> = async {
            with_tx!(self, |db_tx| {
                let balance = self
                    .apply_delta_in(&db_tx, account_id, amount_minor, "account")
                    .await?;
                self.append_record(
                    &db_tx,
                    NewRecord {
                        category_id: None,
                        account_id,
                        from_account_id: None,
                        to_account_id: None,
                        amount_minor,
                        occurred_at,
                    },
                )
                .await?;
                Ok(balance)
            })
        }
        .await;

        match &result {
            Ok(balance) => tracing::info!(
                account_id,
                amount = %Money::new(amount_minor),
                %balance,
                "top-up committed"
            ),
            Err(err) => tracing::warn!(account_id, "top-up rejected: {err}"),
        }
        result
    }

    /// Records a signed entry against an account and applies it to the
    /// balance (admin path).
    ///
    /// Referenced category and from/to accounts must exist. A negative amount
    /// is a debit and obeys the same non-negative balance rule as a transfer.
    pub async fn new_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let NewTransactionCmd {
            account_id,
            amount_minor,
            category_id,
            from_account_id,
            to_account_id,
            occurred_at,
        } = cmd;
        if amount_minor == 0 {
            return Err(EngineError::InvalidArgument(
                "amount_minor must not be zero".to_string(),
            ));
        }

        let result: ResultEngine<Transaction> = async {
            with_tx!(self, |db_tx| {
                if lock_accounts(&db_tx, &[account_id]).await? == 0 {
                    return Err(EngineError::KeyNotFound(format!(
                        "account {account_id} not exists"
                    )));
                }
                if let Some(category_id) = category_id {
                    require_category(&db_tx, category_id).await?;
                }
                if let Some(id) = from_account_id {
                    require_account(&db_tx, id, "from account").await?;
                }
                if let Some(id) = to_account_id {
                    require_account(&db_tx, id, "to account").await?;
                }

                self.apply_delta_in(&db_tx, account_id, amount_minor, "account")
                    .await?;
                self.append_record(
                    &db_tx,
                    NewRecord {
                        category_id,
                        account_id,
                        from_account_id,
                        to_account_id,
                        amount_minor,
                        occurred_at,
                    },
                )
                .await
            })
        }
        .await;

        match &result {
            Ok(tx) => tracing::info!(
                transaction_id = tx.id,
                account_id,
                amount = %tx.amount,
                "transaction recorded"
            ),
            Err(err) => tracing::warn!(account_id, "transaction rejected: {err}"),
        }
        result
    }

    /// History of an account, most recent first.
    ///
    /// Records with the same timestamp are returned newest insert first.
    pub async fn list_transactions(&self, account_id: i64) -> ResultEngine<Vec<Transaction>> {
        require_account(&self.database, account_id, "account").await?;
        let models = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Transaction::from).collect())
    }
}
