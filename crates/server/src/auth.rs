//! Public authentication endpoints.

use api_types::auth::{AccessToken, Login, Refresh, Register, Registered, TokenPair};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

use crate::{ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Register>, JsonRejection>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    let Json(payload) = payload?;
    let user = state
        .auth
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<TokenPair>, ServerError> {
    let Json(payload) = payload?;
    let tokens = state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenPair {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Only a new access token is issued; the refresh token stays as it is.
pub async fn refresh(
    State(state): State<ServerState>,
    payload: Result<Json<Refresh>, JsonRejection>,
) -> Result<Json<AccessToken>, ServerError> {
    let Json(payload) = payload?;
    let access_token = state.auth.refresh(&payload.refresh_token).await?;

    Ok(Json(AccessToken { access_token }))
}
