use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{Category, ResultEngine, Wallet, categories, wallets};

use super::Engine;

/// Generates an owner-scoped lookup for a target entity: the row is returned
/// only when both the id and the owner match.
macro_rules! impl_owned_lookup {
    ($fn_name:ident, $entity:path, $user_col:expr, $domain:ty) => {
        pub(super) async fn $fn_name<C: ConnectionTrait>(
            &self,
            db: &C,
            id: i64,
            user_id: Uuid,
        ) -> ResultEngine<Option<$domain>> {
            let model = <$entity>::find_by_id(id)
                .filter($user_col.eq(user_id))
                .one(db)
                .await?;
            Ok(model.map(<$domain>::from))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_owned_category,
        categories::Entity,
        categories::Column::UserId,
        Category
    );

    impl_owned_lookup!(
        find_owned_wallet,
        wallets::Entity,
        wallets::Column::UserId,
        Wallet
    );
}
