//! Command structs for engine write operations.
//!
//! These group the parameters of money movements so call sites stay
//! readable and optional fields can be set by name.

use chrono::{DateTime, Utc};

/// Credit an account with a strictly positive amount.
#[derive(Clone, Debug)]
pub struct TopUpCmd {
    pub account_id: i64,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
}

impl TopUpCmd {
    #[must_use]
    pub fn new(account_id: i64, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            amount_minor,
            occurred_at,
        }
    }
}

/// Move a strictly positive amount from one account to another.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_account_id: i64,
        to_account_id: i64,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount_minor,
            occurred_at,
        }
    }
}

/// Record an arbitrary signed entry against an account and apply it to the
/// account balance.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub account_id: i64,
    pub amount_minor: i64,
    pub category_id: Option<i64>,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(account_id: i64, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            amount_minor,
            category_id: None,
            from_account_id: None,
            to_account_id: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn from_account_id(mut self, account_id: i64) -> Self {
        self.from_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn to_account_id(mut self, account_id: i64) -> Self {
        self.to_account_id = Some(account_id);
        self
    }
}
