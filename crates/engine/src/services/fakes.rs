use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::{
    Category, CategoryStore, Credentials, EngineError, NewUser, Posting, ResultEngine,
    Transaction, TransactionStore, TransactionType, User, UserStore, Wallet, WalletStore,
};

/// In-memory store used by the service unit tests.
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<Vec<(User, String)>>,
    categories: Mutex<Vec<Category>>,
    wallets: Mutex<Vec<Wallet>>,
    transactions: Mutex<Vec<Transaction>>,
    next_id: AtomicUsize,
    apply_calls: AtomicUsize,
    totals_calls: AtomicUsize,
    fail_balance: bool,
}

impl MemoryStore {
    /// A store whose `total_balance` always fails.
    pub(crate) fn with_failing_balance() -> Self {
        Self {
            fail_balance: true,
            ..Self::default()
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1
    }

    pub(crate) fn apply_calls(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn totals_calls(&self) -> usize {
        self.totals_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn wallet(&self, id: i64) -> Option<Wallet> {
        self.wallets
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .cloned()
    }

    pub(crate) fn transaction_count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> ResultEngine<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(u, _)| u.email == user.email) {
            return Err(EngineError::Conflict(user.email));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            created_at: Utc::now(),
        };
        users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn credentials_by_email(&self, email: &str) -> ResultEngine<Option<Credentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(user, hash)| Credentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn create_category(&self, user_id: Uuid, name: &str) -> ResultEngine<Category> {
        let id = self.next_id();
        let mut categories = self.categories.lock().unwrap();
        if categories
            .iter()
            .any(|c| c.user_id == user_id && c.name == name)
        {
            return Err(EngineError::Conflict(name.to_string()));
        }
        let now = Utc::now();
        let category = Category {
            id,
            user_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn categories_for(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        let mut found: Vec<_> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn category_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn rename_category(&self, id: i64, name: &str) -> ResultEngine<()> {
        let mut categories = self.categories.lock().unwrap();
        let Some(owner) = categories.iter().find(|c| c.id == id).map(|c| c.user_id) else {
            return Err(EngineError::Forbidden("category not exists".to_string()));
        };
        if categories
            .iter()
            .any(|c| c.id != id && c.user_id == owner && c.name == name)
        {
            return Err(EngineError::Conflict(name.to_string()));
        }
        if let Some(category) = categories.iter_mut().find(|c| c.id == id) {
            category.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> ResultEngine<()> {
        self.categories.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn create_wallet(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet> {
        let id = self.next_id();
        let mut wallets = self.wallets.lock().unwrap();
        if wallets.iter().any(|w| w.user_id == user_id && w.name == name) {
            return Err(EngineError::Conflict(name.to_string()));
        }
        let now = Utc::now();
        let wallet = Wallet {
            id,
            user_id,
            name: name.to_string(),
            balance: initial_balance,
            created_at: now,
            updated_at: now,
        };
        wallets.push(wallet.clone());
        Ok(wallet)
    }

    async fn wallets_for(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        let mut found: Vec<_> = self
            .wallets
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn wallet_owned_by(&self, id: i64, user_id: Uuid) -> ResultEngine<Option<Wallet>> {
        Ok(self
            .wallets
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id && w.user_id == user_id)
            .cloned())
    }

    async fn rename_wallet(&self, id: i64, name: &str) -> ResultEngine<()> {
        let mut wallets = self.wallets.lock().unwrap();
        match wallets.iter_mut().find(|w| w.id == id) {
            Some(wallet) => {
                wallet.name = name.to_string();
                Ok(())
            }
            None => Err(EngineError::Forbidden("wallet not exists".to_string())),
        }
    }

    async fn delete_wallet(&self, id: i64) -> ResultEngine<()> {
        self.wallets.lock().unwrap().retain(|w| w.id != id);
        Ok(())
    }

    async fn total_balance(&self, user_id: Uuid) -> ResultEngine<i64> {
        if self.fail_balance {
            return Err(EngineError::Database(DbErr::Custom(
                "connection lost".to_string(),
            )));
        }
        Ok(self
            .wallets
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.balance)
            .sum())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn apply_posting(&self, posting: &Posting) -> ResultEngine<Transaction> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id();
        let mut wallets = self.wallets.lock().unwrap();
        let wallet = wallets
            .iter_mut()
            .find(|w| w.id == posting.wallet_id && w.user_id == posting.user_id)
            .ok_or_else(|| EngineError::Forbidden("wallet not exists".to_string()))?;
        wallet.balance += posting.delta;

        let now = Utc::now();
        let transaction = Transaction {
            id,
            user_id: posting.user_id,
            wallet_id: posting.wallet_id,
            category_id: posting.category_id,
            amount_minor: posting.amount_minor,
            kind: posting.kind,
            description: posting.description.clone(),
            transaction_date: posting.transaction_date,
            created_at: now,
            updated_at: now,
        };
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn transactions_for(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let mut found: Vec<_> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(found)
    }

    async fn totals_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<(i64, i64)> {
        self.totals_calls.fetch_add(1, Ordering::SeqCst);
        let transactions = self.transactions.lock().unwrap();
        let in_range = transactions.iter().filter(|t| {
            t.user_id == user_id && t.transaction_date >= start && t.transaction_date <= end
        });
        let mut income = 0;
        let mut expense = 0;
        for t in in_range {
            match t.kind {
                TransactionType::Income => income += t.amount_minor,
                TransactionType::Expense => expense += t.amount_minor,
            }
        }
        Ok((income, expense))
    }
}
