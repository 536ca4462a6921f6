use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Category, CategoryStore, EngineError, ResultEngine, categories,
    error::conflict_or_database,
};

use super::Engine;

#[async_trait]
impl CategoryStore for Engine {
    async fn create_category(&self, user_id: Uuid, name: &str) -> ResultEngine<Category> {
        let now = Utc::now();
        let active = categories::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active
            .insert(&self.database)
            .await
            .map_err(|err| conflict_or_database(err, name))?;
        Ok(Category::from(model))
    }

    async fn categories_for(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn category_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Category>> {
        self.find_owned_category(&self.database, id, user_id).await
    }

    async fn rename_category(&self, id: i64, name: &str) -> ResultEngine<()> {
        let result = categories::Entity::update_many()
            .col_expr(categories::Column::Name, Expr::value(name))
            .col_expr(categories::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(categories::Column::Id.eq(id))
            .exec(&self.database)
            .await
            .map_err(|err| conflict_or_database(err, name))?;
        if result.rows_affected == 0 {
            return Err(EngineError::Forbidden("category not exists".to_string()));
        }
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> ResultEngine<()> {
        categories::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
