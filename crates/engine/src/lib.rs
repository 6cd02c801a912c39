//! Account ledger engine.
//!
//! Balances live in the `accounts` table and every change to them is
//! recorded in the append-only `transactions` ledger. All money movements go
//! through a single balance mutator that runs inside a store transaction, so a
//! top-up or a transfer is either fully committed or not visible at all.

pub use accounts::Account;
pub use categories::Category;
pub use commands::{NewTransactionCmd, TopUpCmd, TransferCmd};
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use transactions::Transaction;

mod accounts;
mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
