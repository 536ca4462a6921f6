//! Transactions API endpoints

use api_types::transaction::{TransactionNew, TransactionView};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{TransactionType, services::PostRequest};

use crate::{Principal, ServerError, server::ServerState};

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        category_id: tx.category_id,
        amount: tx.amount_minor,
        kind: tx.kind.as_str().to_string(),
        description: tx.description,
        transaction_date: tx.transaction_date,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;
    let kind = TransactionType::try_from(payload.kind.as_str())?;

    let request = PostRequest {
        wallet_id: payload.wallet_id,
        category_id: payload.category_id,
        amount_minor: payload.amount,
        kind,
        description: payload.description,
        transaction_date: payload.transaction_date.map(|dt| dt.with_timezone(&Utc)),
    };
    let tx = state.transactions.post(user_id, request).await?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn list(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .transactions
        .list_for_owner(user_id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(transactions))
}
