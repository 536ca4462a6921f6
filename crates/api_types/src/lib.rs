use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain acknowledgement body, e.g. `{"message": "Category updated successfully"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub message: String,
        pub user_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenPair {
        pub access_token: String,
        pub refresh_token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Refresh {
        pub refresh_token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccessToken {
        pub access_token: String,
    }
}

pub mod user {
    use super::*;

    /// Public profile of the authenticated user. The password hash is never
    /// part of any response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserProfile {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    /// Body of both `POST /categories` and `PUT /categories/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpsert {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        /// Starting balance in minor units. Must be `>= 0`.
        #[serde(default)]
        pub initial_balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: i64,
        pub name: String,
        pub balance: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: i64,
        pub category_id: i64,
        /// Amount in minor units, always positive. The sign comes from `type`.
        pub amount: i64,
        /// `expense` or `income`.
        ///
        /// Kept as a plain string so an unknown value is reported as a
        /// validation error instead of a body rejection.
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        /// RFC 3339 timestamp. Defaults to the submission time.
        pub transaction_date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub wallet_id: i64,
        pub category_id: i64,
        pub amount: i64,
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        pub transaction_date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod dashboard {
    use super::*;

    /// Query string of `GET /dashboard`. Missing fields default to the
    /// current month/year in the server reference zone.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardSummary {
        pub total_balance: i64,
        pub total_income: i64,
        pub total_expense: i64,
    }
}
