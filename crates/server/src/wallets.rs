//! Wallets API endpoints.

use api_types::{
    Message,
    wallet::{WalletNew, WalletUpdate, WalletView},
};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{Principal, ServerError, server::ServerState};

fn map_wallet(wallet: engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        balance: wallet.balance,
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

pub async fn create(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    payload: Result<Json<WalletNew>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let Json(payload) = payload?;
    let wallet = state
        .wallets
        .create(user_id, &payload.name, payload.initial_balance)
        .await?;

    Ok((StatusCode::CREATED, Json(map_wallet(wallet))))
}

pub async fn list(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state
        .wallets
        .list_for_owner(user_id)
        .await?
        .into_iter()
        .map(map_wallet)
        .collect();

    Ok(Json(wallets))
}

/// Renames a wallet. The balance can't be edited through this endpoint.
pub async fn update(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<WalletUpdate>, JsonRejection>,
) -> Result<Json<Message>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    state.wallets.update(id, user_id, &payload.name).await?;

    Ok(Json(Message::new("Wallet updated successfully")))
}

pub async fn delete(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Message>, ServerError> {
    let Path(id) = id?;
    state.wallets.delete(id, user_id).await?;

    Ok(Json(Message::new("Wallet deleted successfully")))
}
