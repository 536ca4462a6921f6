use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Posting, ResultEngine, Transaction, TransactionStore, TransactionType,
    transactions, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Balance increment plus row insert inside one DB transaction.
    ///
    /// The increment is a single `balance = balance + delta` statement so two
    /// concurrent postings on the same wallet can't lose an update.
    async fn apply_posting_in_tx(&self, posting: &Posting) -> ResultEngine<Transaction> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let updated = wallets::Entity::update_many()
                .col_expr(
                    wallets::Column::Balance,
                    Expr::col(wallets::Column::Balance).add(posting.delta),
                )
                .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
                .filter(wallets::Column::Id.eq(posting.wallet_id))
                .filter(wallets::Column::UserId.eq(posting.user_id))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected != 1 {
                return Err(EngineError::Forbidden("wallet not exists".to_string()));
            }

            let model = transactions::ActiveModel::from_posting(posting, now)
                .insert(&db_tx)
                .await?;
            Transaction::try_from(model)
        })
    }
}

#[async_trait]
impl TransactionStore for Engine {
    async fn apply_posting(&self, posting: &Posting) -> ResultEngine<Transaction> {
        self.apply_posting_in_tx(posting)
            .await
            .map_err(|err| match err {
                EngineError::Database(db_err) => EngineError::AtomicApply(db_err),
                other => other,
            })
    }

    async fn transactions_for(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    async fn totals_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<(i64, i64)> {
        let rows: Vec<(String, Option<i64>)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Kind)
            .column_as(Expr::col(transactions::Column::Amount).sum(), "total")
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::TransactionDate.between(start, end))
            .group_by(transactions::Column::Kind)
            .into_tuple()
            .all(&self.database)
            .await?;

        let mut income = 0;
        let mut expense = 0;
        for (kind, total) in rows {
            match TransactionType::try_from(kind.as_str())? {
                TransactionType::Income => income += total.unwrap_or(0),
                TransactionType::Expense => expense += total.unwrap_or(0),
            }
        }
        Ok((income, expense))
    }
}
