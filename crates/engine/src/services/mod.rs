//! Capability services consumed by the HTTP layer.
//!
//! Each service is a trait plus one implementation generic over the store
//! ports of [`crate::store`], so the same code runs on [`crate::Engine`] and
//! on in-memory fakes.

use crate::{EngineError, ResultEngine};

pub use categories::{CategoryService, Categories};
pub use dashboard::{Dashboard, DashboardService, Summary};
pub use identity::{Auth, AuthService, TokenPair};
pub use posting::{PostRequest, Postings, TransactionService};
pub use wallets::{WalletService, Wallets};

mod categories;
mod dashboard;
mod identity;
mod posting;
mod wallets;

#[cfg(test)]
pub(crate) mod fakes;

/// Resolves an owner-scoped lookup or fails with `Forbidden`.
///
/// Missing and not-owned are reported the same way.
pub(crate) fn require_owned<T>(found: Option<T>, what: &str) -> ResultEngine<T> {
    found.ok_or_else(|| EngineError::Forbidden(format!("{what} not exists")))
}

/// Trims `name` and checks it is 3-100 characters long.
pub(crate) fn validate_name(name: &str) -> ResultEngine<String> {
    let name = name.trim();
    let len = name.chars().count();
    if !(3..=100).contains(&len) {
        return Err(EngineError::Validation(
            "name must be between 3 and 100 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}
