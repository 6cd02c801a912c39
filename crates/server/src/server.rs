use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use crate::{accounts, categories, transactions};
use engine::Engine;

static ACCOUNT_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-account-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// How many times an operation failing with a store conflict is re-run
    /// before the conflict is returned to the client.
    pub conflict_retries: u32,
}

impl ServerState {
    pub fn new(engine: Engine, conflict_retries: u32) -> Self {
        Self {
            engine: Arc::new(engine),
            conflict_retries,
        }
    }
}

/// The account acting on a caller-scoped route.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Caller(pub i64);

/// `TypedHeader` for the caller identity.
///
/// Caller-scoped requests must contain an "x-account-id" entry in the header.
#[derive(Debug)]
struct AccountHeader(i64);

impl Header for AccountHeader {
    fn name() -> &'static axum::http::HeaderName {
        &ACCOUNT_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = value.trim().parse() else {
            return Err(AxumError::invalid());
        };

        Ok(AccountHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-account-id header"),
        }
    }
}

async fn caller(
    header: Result<TypedHeader<AccountHeader>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Ok(TypedHeader(AccountHeader(account_id))) = header else {
        tracing::debug!("missing or malformed x-account-id header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(Caller(account_id));
    Ok(next.run(request).await)
}

/// Builds the HTTP router.
pub fn app(state: ServerState) -> Router {
    let caller_scoped = Router::new()
        .route("/account/my", get(accounts::my))
        .route("/account/balance", get(accounts::balance))
        .route("/account/transfer", post(accounts::transfer))
        .route("/account/mutation", get(accounts::mutation))
        .route_layer(middleware::from_fn(caller));

    Router::new()
        .route("/account/create", post(accounts::create))
        .route("/account/read/{id}", get(accounts::read))
        .route("/account/list", get(accounts::list))
        .route("/account/topup", post(accounts::top_up))
        .route("/transaction-category/create", post(categories::create))
        .route("/transaction-category/read/{id}", get(categories::read))
        .route("/transaction-category/list", get(categories::list))
        .route("/transaction/new", post(transactions::create))
        .route("/transaction/list", get(transactions::list))
        .merge(caller_scoped)
        .with_state(state)
}

pub async fn run(engine: Engine, addr: &str, conflict_retries: u32) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, listener, conflict_retries).await
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    conflict_retries: u32,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, conflict_retries);
    axum::serve(listener, app(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    conflict_retries: u32,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener, conflict_retries).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
