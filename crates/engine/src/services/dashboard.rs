use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{ResultEngine, TransactionStore, WalletStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
}

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Current balance of all wallets plus income/expense within
    /// `[start, end]`, both ends inclusive.
    async fn summarize(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<Summary>;
}

pub struct Dashboard<S> {
    store: S,
}

impl<S> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> DashboardService for Dashboard<S>
where
    S: WalletStore + TransactionStore,
{
    async fn summarize(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<Summary> {
        let total_balance = self.store.total_balance(user_id).await?;
        let (total_income, total_expense) =
            self.store.totals_between(user_id, start, end).await?;
        Ok(Summary {
            total_balance,
            total_income,
            total_expense,
        })
    }
}
