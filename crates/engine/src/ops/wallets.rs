use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Wallet, WalletStore, error::conflict_or_database, wallets,
};

use super::Engine;

#[async_trait]
impl WalletStore for Engine {
    async fn create_wallet(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet> {
        let now = Utc::now();
        let active = wallets::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name.to_string()),
            balance: ActiveValue::Set(initial_balance),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active
            .insert(&self.database)
            .await
            .map_err(|err| conflict_or_database(err, name))?;
        Ok(Wallet::from(model))
    }

    async fn wallets_for(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        let models = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .order_by_asc(wallets::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Wallet::from).collect())
    }

    async fn wallet_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Wallet>> {
        self.find_owned_wallet(&self.database, id, user_id).await
    }

    /// Renames an existing wallet. The balance column is never touched here.
    async fn rename_wallet(&self, id: i64, name: &str) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Name, Expr::value(name))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(id))
            .exec(&self.database)
            .await
            .map_err(|err| conflict_or_database(err, name))?;
        if result.rows_affected == 0 {
            return Err(EngineError::Forbidden("wallet not exists".to_string()));
        }
        Ok(())
    }

    // Transactions referencing the wallet are left in place.
    async fn delete_wallet(&self, id: i64) -> ResultEngine<()> {
        wallets::Entity::delete_by_id(id).exec(&self.database).await?;
        Ok(())
    }

    async fn total_balance(&self, user_id: Uuid) -> ResultEngine<i64> {
        let total = wallets::Entity::find()
            .select_only()
            .column_as(Expr::col(wallets::Column::Balance).sum(), "total")
            .filter(wallets::Column::UserId.eq(user_id))
            .into_tuple::<Option<i64>>()
            .one(&self.database)
            .await?
            .flatten();
        Ok(total.unwrap_or(0))
    }
}
