use async_trait::async_trait;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Wallet, WalletStore};

use super::{require_owned, validate_name};

#[async_trait]
pub trait WalletService: Send + Sync {
    /// `initial_balance` is in minor units and must not be negative.
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet>;

    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>>;

    async fn update(&self, id: i64, user_id: Uuid, name: &str) -> ResultEngine<()>;

    async fn delete(&self, id: i64, user_id: Uuid) -> ResultEngine<()>;
}

pub struct Wallets<S> {
    store: S,
}

impl<S> Wallets<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: WalletStore> WalletService for Wallets<S> {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: i64,
    ) -> ResultEngine<Wallet> {
        let name = validate_name(name)?;
        if initial_balance < 0 {
            return Err(EngineError::Validation(
                "initial_balance must be >= 0".to_string(),
            ));
        }
        self.store
            .create_wallet(user_id, &name, initial_balance)
            .await
    }

    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        self.store.wallets_for(user_id).await
    }

    async fn update(&self, id: i64, user_id: Uuid, name: &str) -> ResultEngine<()> {
        let name = validate_name(name)?;
        let wallet = require_owned(self.store.wallet_owned_by(id, user_id).await?, "wallet")?;
        self.store.rename_wallet(wallet.id, &name).await
    }

    // No guard on balance or on transactions still pointing at the wallet.
    async fn delete(&self, id: i64, user_id: Uuid) -> ResultEngine<()> {
        let wallet = require_owned(self.store.wallet_owned_by(id, user_id).await?, "wallet")?;
        if wallet.balance != 0 {
            tracing::debug!("deleting wallet {} with balance {}", wallet.id, wallet.balance);
        }
        self.store.delete_wallet(wallet.id).await
    }
}
