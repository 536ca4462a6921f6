//! Domain core of the pocketbook backend.
//!
//! [`Engine`] is the persistence gateway: it owns the sea-orm connection and
//! implements the store ports of [`store`]. The business rules live in
//! [`services`] and only talk to those ports.

pub use categories::Category;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use store::{CategoryStore, TransactionStore, UserStore, WalletStore};
pub use transactions::{Posting, Transaction, TransactionType};
pub use users::{Credentials, NewUser, User};
pub use wallets::Wallet;

pub mod auth;
pub mod period;
pub mod services;
pub mod store;

mod categories;
mod error;
mod ops;
mod transactions;
mod users;
mod wallets;

/// sea-orm entities, exposed for the migration checks and tests.
pub mod entities {
    pub use crate::categories::{
        ActiveModel as CategoryActiveModel, Entity as CategoryEntity, Model as CategoryModel,
    };
    pub use crate::transactions::{
        ActiveModel as TransactionActiveModel, Entity as TransactionEntity,
        Model as TransactionModel,
    };
    pub use crate::users::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
    pub use crate::wallets::{
        ActiveModel as WalletActiveModel, Entity as WalletEntity, Model as WalletModel,
    };
}

pub type ResultEngine<T> = Result<T, EngineError>;
