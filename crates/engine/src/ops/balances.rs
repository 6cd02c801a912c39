use sea_orm::{
    ConnectionTrait, DatabaseTransaction, TransactionTrait,
    prelude::*,
    sea_query::{Expr, SimpleExpr},
};

use crate::{EngineError, Money, ResultEngine, accounts};

use super::{Engine, with_tx};

/// Takes the write lock on the given account rows with a no-op update and
/// returns how many of them exist.
///
/// Must be the first statement of a write transaction. SQLite only waits
/// for a busy writer (busy timeout) while the transaction has not read yet;
/// a transaction that read first fails with "database is locked" when it
/// upgrades. On backends with row locks the update locks the rows, so pass
/// ids in ascending order.
pub(super) async fn lock_accounts<C: ConnectionTrait>(
    db: &C,
    account_ids: &[i64],
) -> ResultEngine<u64> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            SimpleExpr::from(Expr::col(accounts::Column::Balance)),
        )
        .filter(accounts::Column::Id.is_in(account_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

impl Engine {
    /// Applies a signed `delta` (minor units) to an account balance in its own
    /// store transaction and returns the new balance.
    ///
    /// No ledger record is written; use [`Engine::top_up`],
    /// [`Engine::transfer`] or [`Engine::new_transaction`] for movements that
    /// must appear in the account history.
    pub async fn apply_delta(&self, account_id: i64, delta: i64) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            self.apply_delta_in(&db_tx, account_id, delta, "account").await
        })
    }

    /// The balance mutator.
    ///
    /// Runs inside the caller's store transaction:
    /// - locks the account row (see [`lock_accounts`]),
    /// - rejects a debit that would take the balance below zero,
    /// - applies `balance = balance + delta` as a single conditional UPDATE,
    ///   so a concurrent writer can never be overwritten with a stale value,
    /// - re-reads the committed-to-be balance.
    ///
    /// `label` names the account in a `KeyNotFound` error.
    pub(super) async fn apply_delta_in(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        delta: i64,
        label: &str,
    ) -> ResultEngine<Money> {
        if delta == 0 {
            return Err(EngineError::InvalidArgument(
                "delta must not be zero".to_string(),
            ));
        }

        if lock_accounts(db_tx, &[account_id]).await? == 0 {
            return Err(EngineError::KeyNotFound(format!(
                "{label} {account_id} not exists"
            )));
        }
        let current = accounts::Entity::find_by_id(account_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{label} {account_id} not exists")))?;

        let balance = Money::new(current.balance);
        let next = balance.checked_add(Money::new(delta)).ok_or_else(|| {
            EngineError::InvalidArgument(format!("balance of account {account_id} would overflow"))
        })?;
        if delta < 0 && next.is_negative() {
            return Err(EngineError::InsufficientFunds(format!(
                "account {account_id} has {balance}, cannot apply {}",
                Money::new(delta)
            )));
        }

        let mut update = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .filter(accounts::Column::Id.eq(account_id));
        if delta < 0 {
            // `next >= 0` above guarantees `-delta` does not overflow.
            update = update.filter(accounts::Column::Balance.gte(-delta));
        }
        let result = update.exec(db_tx).await?;
        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(format!(
                "balance of account {account_id} changed concurrently"
            )));
        }

        let updated = accounts::Entity::find_by_id(account_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{label} {account_id} not exists")))?;
        tracing::debug!(account_id, delta, balance = updated.balance, "balance updated");
        Ok(Money::new(updated.balance))
    }
}
