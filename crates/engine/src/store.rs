//! Persistence gateway ports.
//!
//! The services only see these traits. [`crate::Engine`] implements all of
//! them on top of sea-orm; tests can swap in in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Category, Credentials, NewUser, Posting, ResultEngine, Transaction, User, Wallet,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a user. A taken email is `Conflict`.
    async fn create_user(&self, user: NewUser) -> ResultEngine<User>;

    async fn credentials_by_email(&self, email: &str) -> ResultEngine<Option<Credentials>>;

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// A name already used by the same user is `Conflict`.
    async fn create_category(&self, user_id: Uuid, name: &str) -> ResultEngine<Category>;

    /// Categories of `user_id`, by name ascending.
    async fn categories_for(&self, user_id: Uuid) -> ResultEngine<Vec<Category>>;

    /// The category only if it exists *and* belongs to `user_id`.
    async fn category_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Category>>;

    async fn rename_category(&self, id: i64, name: &str) -> ResultEngine<()>;

    async fn delete_category(&self, id: i64) -> ResultEngine<()>;
}

#[async_trait]
pub trait WalletStore: Send + Sync {
    /// A name already used by the same user is `Conflict`.
    async fn create_wallet(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet>;

    /// Wallets of `user_id`, by name ascending.
    async fn wallets_for(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>>;

    /// The wallet only if it exists *and* belongs to `user_id`.
    async fn wallet_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Wallet>>;

    async fn rename_wallet(&self, id: i64, name: &str) -> ResultEngine<()>;

    async fn delete_wallet(&self, id: i64) -> ResultEngine<()>;

    /// Sum of the current balances of every wallet of `user_id`.
    async fn total_balance(&self, user_id: Uuid) -> ResultEngine<i64>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Adds `posting.delta` to the wallet balance and inserts the transaction
    /// row as one atomic unit of work. On any failure nothing is visible.
    async fn apply_posting(&self, posting: &Posting) -> ResultEngine<Transaction>;

    /// Transactions of `user_id`, newest first by date then creation time.
    async fn transactions_for(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>>;

    /// `(income, expense)` totals of `user_id` within `[start, end]`.
    async fn totals_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<(i64, i64)>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn create_user(&self, user: NewUser) -> ResultEngine<User> {
        (**self).create_user(user).await
    }

    async fn credentials_by_email(&self, email: &str) -> ResultEngine<Option<Credentials>> {
        (**self).credentials_by_email(email).await
    }

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>> {
        (**self).user_by_id(id).await
    }
}

#[async_trait]
impl<T: CategoryStore + ?Sized> CategoryStore for Arc<T> {
    async fn create_category(&self, user_id: Uuid, name: &str) -> ResultEngine<Category> {
        (**self).create_category(user_id, name).await
    }

    async fn categories_for(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        (**self).categories_for(user_id).await
    }

    async fn category_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Category>> {
        (**self).category_owned_by(id, user_id).await
    }

    async fn rename_category(&self, id: i64, name: &str) -> ResultEngine<()> {
        (**self).rename_category(id, name).await
    }

    async fn delete_category(&self, id: i64) -> ResultEngine<()> {
        (**self).delete_category(id).await
    }
}

#[async_trait]
impl<T: WalletStore + ?Sized> WalletStore for Arc<T> {
    async fn create_wallet(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet> {
        (**self).create_wallet(user_id, name, initial_balance).await
    }

    async fn wallets_for(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        (**self).wallets_for(user_id).await
    }

    async fn wallet_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Wallet>> {
        (**self).wallet_owned_by(id, user_id).await
    }

    async fn rename_wallet(&self, id: i64, name: &str) -> ResultEngine<()> {
        (**self).rename_wallet(id, name).await
    }

    async fn delete_wallet(&self, id: i64) -> ResultEngine<()> {
        (**self).delete_wallet(id).await
    }

    async fn total_balance(&self, user_id: Uuid) -> ResultEngine<i64> {
        (**self).total_balance(user_id).await
    }
}

#[async_trait]
impl<T: TransactionStore + ?Sized> TransactionStore for Arc<T> {
    async fn apply_posting(&self, posting: &Posting) -> ResultEngine<Transaction> {
        (**self).apply_posting(posting).await
    }

    async fn transactions_for(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        (**self).transactions_for(user_id).await
    }

    async fn totals_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<(i64, i64)> {
        (**self).totals_between(user_id, start, end).await
    }
}
