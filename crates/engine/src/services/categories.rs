use async_trait::async_trait;
use uuid::Uuid;

use crate::{Category, CategoryStore, ResultEngine};

use super::{require_owned, validate_name};

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn create(&self, user_id: Uuid, name: &str) -> ResultEngine<Category>;

    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Category>>;

    /// `Forbidden` whether the category is missing or owned by someone else.
    async fn update(&self, id: i64, user_id: Uuid, name: &str) -> ResultEngine<()>;

    async fn delete(&self, id: i64, user_id: Uuid) -> ResultEngine<()>;
}

pub struct Categories<S> {
    store: S,
}

impl<S> Categories<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: CategoryStore> CategoryService for Categories<S> {
    async fn create(&self, user_id: Uuid, name: &str) -> ResultEngine<Category> {
        let name = validate_name(name)?;
        self.store.create_category(user_id, &name).await
    }

    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        self.store.categories_for(user_id).await
    }

    async fn update(&self, id: i64, user_id: Uuid, name: &str) -> ResultEngine<()> {
        let name = validate_name(name)?;
        let category = require_owned(
            self.store.category_owned_by(id, user_id).await?,
            "category",
        )?;
        self.store.rename_category(category.id, &name).await
    }

    // Transactions pointing at the category are not checked.
    async fn delete(&self, id: i64, user_id: Uuid) -> ResultEngine<()> {
        let category = require_owned(
            self.store.category_owned_by(id, user_id).await?,
            "category",
        )?;
        self.store.delete_category(category.id).await
    }
}
