//! Account API endpoints.
//!
//! `my`, `balance`, `transfer` and `mutation` act on the calling account,
//! resolved from the `x-account-id` header.

use api_types::{
    account::{AccountList, AccountNew, AccountView, Balance, TopUp, Transfer},
    transaction::{TransactionListResponse, TransactionView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{TopUpCmd, TransferCmd};

use crate::{
    ServerError, retry,
    server::{Caller, ServerState},
    transactions::map_transaction,
};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        balance_minor: account.balance.minor(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .new_account(&payload.name, payload.balance_minor)
        .await?;
    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn read(
    State(state): State<ServerState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(account_id).await?;
    Ok(Json(map_account(account)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<AccountList>, ServerError> {
    let accounts = state
        .engine
        .accounts()
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(AccountList { accounts }))
}

pub async fn top_up(
    State(state): State<ServerState>,
    Json(payload): Json<TopUp>,
) -> Result<Json<Balance>, ServerError> {
    let cmd = TopUpCmd::new(payload.account_id, payload.amount_minor, Utc::now());
    let engine = &state.engine;
    let balance = retry::on_conflict(state.conflict_retries, "top-up", || {
        engine.top_up(cmd.clone())
    })
    .await?;

    Ok(Json(Balance {
        account_id: payload.account_id,
        balance_minor: balance.minor(),
    }))
}

pub async fn my(
    Extension(Caller(account_id)): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(account_id).await?;
    Ok(Json(map_account(account)))
}

pub async fn balance(
    Extension(Caller(account_id)): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Balance>, ServerError> {
    let balance = state.engine.balance(account_id).await?;
    Ok(Json(Balance {
        account_id,
        balance_minor: balance.minor(),
    }))
}

pub async fn transfer(
    Extension(Caller(account_id)): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<Transfer>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cmd = TransferCmd::new(
        account_id,
        payload.to_account_id,
        payload.amount_minor,
        Utc::now(),
    );
    let engine = &state.engine;
    let tx = retry::on_conflict(state.conflict_retries, "transfer", || {
        engine.transfer(cmd.clone())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn mutation(
    Extension(Caller(account_id)): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(account_id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}
