//! Admin transaction endpoints.

use api_types::transaction::{
    TransactionListQuery, TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::NewTransactionCmd;

use crate::{ServerError, retry, server::ServerState};

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        category_id: tx.category_id,
        account_id: tx.account_id,
        from_account_id: tx.from_account_id,
        to_account_id: tx.to_account_id,
        amount_minor: tx.amount.minor(),
        occurred_at: tx.occurred_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = NewTransactionCmd::new(payload.account_id, payload.amount_minor, Utc::now());
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(account_id) = payload.from_account_id {
        cmd = cmd.from_account_id(account_id);
    }
    if let Some(account_id) = payload.to_account_id {
        cmd = cmd.to_account_id(account_id);
    }

    let engine = &state.engine;
    let tx = retry::on_conflict(state.conflict_retries, "transaction", || {
        engine.new_transaction(cmd.clone())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(query.account_id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}
