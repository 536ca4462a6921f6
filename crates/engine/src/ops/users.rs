use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    Credentials, NewUser, ResultEngine, User, UserStore, error::conflict_or_database, users,
};

use super::Engine;

#[async_trait]
impl UserStore for Engine {
    async fn create_user(&self, user: NewUser) -> ResultEngine<User> {
        let active = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(user.name),
            email: ActiveValue::Set(user.email.clone()),
            password_hash: ActiveValue::Set(user.password_hash),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let model = active
            .insert(&self.database)
            .await
            .map_err(|err| conflict_or_database(err, &user.email))?;
        Ok(User::from(model))
    }

    async fn credentials_by_email(&self, email: &str) -> ResultEngine<Option<Credentials>> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?;
        Ok(model.map(Credentials::from))
    }

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>> {
        let model = users::Entity::find_by_id(id).one(&self.database).await?;
        Ok(model.map(User::from))
    }
}
