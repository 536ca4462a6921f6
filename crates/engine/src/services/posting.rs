//! The transaction posting engine.
//!
//! A posting walks `validating -> computing -> applying -> committed`:
//!
//! 1. wallet and category ownership are checked with plain reads, wallet
//!    first; either failing is `Forbidden` and nothing is written,
//! 2. amount and type are checked and the signed delta computed,
//! 3. the store applies balance increment and row insert as one atomic unit.
//!
//! A failure in step 3 leaves no trace: the store rolls the whole unit back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    CategoryStore, Posting, ResultEngine, Transaction, TransactionStore, TransactionType,
    WalletStore,
};

use super::require_owned;

/// Caller input of a posting, before any validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRequest {
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount_minor: i64,
    pub kind: TransactionType,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn post(&self, user_id: Uuid, request: PostRequest) -> ResultEngine<Transaction>;

    /// Newest first by transaction date, then creation time.
    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>>;
}

pub struct Postings<S> {
    store: S,
}

impl<S> Postings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> TransactionService for Postings<S>
where
    S: WalletStore + CategoryStore + TransactionStore,
{
    async fn post(&self, user_id: Uuid, request: PostRequest) -> ResultEngine<Transaction> {
        let wallet = self.store.wallet_owned_by(request.wallet_id, user_id).await?;
        if wallet.is_none() {
            tracing::warn!("posting rejected: wallet {} not owned", request.wallet_id);
        }
        require_owned(wallet, "wallet")?;

        let category = self
            .store
            .category_owned_by(request.category_id, user_id)
            .await?;
        if category.is_none() {
            tracing::warn!("posting rejected: category {} not owned", request.category_id);
        }
        require_owned(category, "category")?;

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let posting = Posting::new(
            user_id,
            request.wallet_id,
            request.category_id,
            request.amount_minor,
            request.kind,
            description,
            request.transaction_date.unwrap_or_else(Utc::now),
        )?;
        tracing::debug!(
            "applying posting on wallet {}: delta {}",
            posting.wallet_id,
            posting.delta
        );
        let transaction = self
            .store
            .apply_posting(&posting)
            .await
            .inspect_err(|err| {
                tracing::error!("posting on wallet {} failed: {err}", posting.wallet_id);
            })?;
        tracing::debug!(
            "posting committed: transaction {} on wallet {}",
            transaction.id,
            transaction.wallet_id
        );
        Ok(transaction)
    }

    async fn list_for_owner(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        self.store.transactions_for(user_id).await
    }
}
