//! Transaction primitives.
//!
//! A `Transaction` is an immutable income or expense record. Its signed
//! amount is what the wallet balance moved by when it was posted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Signed balance contribution of `amount_minor`.
    pub fn signed(self, amount_minor: i64) -> i64 {
        match self {
            Self::Expense => -amount_minor,
            Self::Income => amount_minor,
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::Validation(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: Uuid,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount_minor: i64,
    pub kind: TransactionType,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount_minor)
    }
}

/// A validated posting request, ready for the atomic apply.
///
/// `delta` is computed once from `kind` and `amount_minor` and is exactly what
/// gets added to the wallet balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub user_id: Uuid,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount_minor: i64,
    pub kind: TransactionType,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub delta: i64,
}

impl Posting {
    pub fn new(
        user_id: Uuid,
        wallet_id: i64,
        category_id: i64,
        amount_minor: i64,
        kind: TransactionType,
        description: Option<String>,
        transaction_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            user_id,
            wallet_id,
            category_id,
            amount_minor,
            kind,
            description,
            transaction_date,
            delta: kind.signed(amount_minor),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub transaction_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Row for a posting; `now` fills both audit timestamps.
    pub(crate) fn from_posting(posting: &Posting, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(posting.user_id),
            wallet_id: ActiveValue::Set(posting.wallet_id),
            category_id: ActiveValue::Set(posting.category_id),
            amount: ActiveValue::Set(posting.amount_minor),
            kind: ActiveValue::Set(posting.kind.as_str().to_string()),
            description: ActiveValue::Set(posting.description.clone()),
            transaction_date: ActiveValue::Set(posting.transaction_date),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            wallet_id: model.wallet_id,
            category_id: model.category_id,
            amount_minor: model.amount,
            kind: TransactionType::try_from(model.kind.as_str())?,
            description: model.description,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
