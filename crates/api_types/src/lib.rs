use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Opening balance, defaults to zero. Must be >= 0.
        #[serde(default)]
        pub balance_minor: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: i64,
        pub name: String,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountList {
        pub accounts: Vec<AccountView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopUp {
        pub account_id: i64,
        /// Must be > 0.
        pub amount_minor: i64,
    }

    /// Transfer from the calling account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Transfer {
        pub to_account_id: i64,
        /// Must be > 0.
        pub amount_minor: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Balance {
        pub account_id: i64,
        pub balance_minor: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryList {
        pub categories: Vec<CategoryView>,
    }
}

pub mod transaction {
    use super::*;

    /// Admin entry: applies `amount_minor` (signed, != 0) to `account_id`.
    ///
    /// Money movements carry no timestamp: the server stamps the time it
    /// records them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: i64,
        pub amount_minor: i64,
        pub category_id: Option<i64>,
        pub from_account_id: Option<i64>,
        pub to_account_id: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub account_id: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub category_id: Option<i64>,
        pub account_id: i64,
        pub from_account_id: Option<i64>,
        pub to_account_id: Option<i64>,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
    }

    /// Newest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_new_defaults_opening_balance() {
        let body: account::AccountNew = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(body.name, "Alice");
        assert_eq!(body.balance_minor, 0);
    }

    #[test]
    fn transaction_new_optional_fields() {
        let body: transaction::TransactionNew =
            serde_json::from_str(r#"{"account_id":1,"amount_minor":-250}"#).unwrap();
        assert_eq!(body.amount_minor, -250);
        assert!(body.category_id.is_none());
        assert!(body.from_account_id.is_none());

        let body: transaction::TransactionNew = serde_json::from_str(
            r#"{"account_id":1,"amount_minor":5,"category_id":2,"to_account_id":3}"#,
        )
        .unwrap();
        assert_eq!(body.category_id, Some(2));
        assert_eq!(body.to_account_id, Some(3));
    }
}
