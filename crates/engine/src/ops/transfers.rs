use sea_orm::TransactionTrait;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransferCmd, transactions::NewRecord,
    util::require_positive_amount,
};

use super::{Engine, accounts::require_account, balances::lock_accounts, with_tx};

impl Engine {
    /// Moves `amount_minor` from one account to another.
    ///
    /// Debit, credit and the ledger record share one store transaction: the
    /// sender is never debited without the recipient being credited. The
    /// record is owned by the sender and carries both account references.
    ///
    /// The two balance legs are applied in ascending account id, so opposite
    /// transfers between the same pair lock the rows in the same order.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<Transaction> {
        let TransferCmd {
            from_account_id,
            to_account_id,
            amount_minor,
            occurred_at,
        } = cmd;
        require_positive_amount(amount_minor)?;
        if from_account_id == to_account_id {
            return Err(EngineError::InvalidArgument(
                "from_account_id and to_account_id must differ".to_string(),
            ));
        }

        let result: ResultEngine<Transaction> = async {
            with_tx!(self, |db_tx| {
                let mut legs = [
                    (from_account_id, -amount_minor, "sender account"),
                    (to_account_id, amount_minor, "recipient account"),
                ];
                legs.sort_by_key(|(account_id, _, _)| *account_id);
                lock_accounts(&db_tx, &[legs[0].0, legs[1].0]).await?;

                require_account(&db_tx, from_account_id, "sender account").await?;
                require_account(&db_tx, to_account_id, "recipient account").await?;
                for (account_id, delta, label) in legs {
                    self.apply_delta_in(&db_tx, account_id, delta, label).await?;
                }

                self.append_record(
                    &db_tx,
                    NewRecord {
                        category_id: None,
                        account_id: from_account_id,
                        from_account_id: Some(from_account_id),
                        to_account_id: Some(to_account_id),
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
                from_account_id,
                to_account_id,
                amount = %Money::new(amount_minor),
                "transfer committed"
            ),
            Err(err) => tracing::warn!(
                from_account_id,
                to_account_id,
                "transfer rejected: {err}"
            ),
        }
        result
    }
}
