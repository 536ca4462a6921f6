use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{Principal, ServerState, router, run, run_with_listener, spawn_with_listener};

mod auth;
mod categories;
mod dashboard;
mod server;
mod transactions;
mod user;
mod wallets;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{AccessToken, Login, Refresh, Register, Registered, TokenPair};
    }

    pub mod user {
        pub use api_types::user::UserProfile;
    }

    pub mod category {
        pub use api_types::category::{CategoryUpsert, CategoryView};
    }

    pub mod wallet {
        pub use api_types::wallet::{WalletNew, WalletUpdate, WalletView};
    }

    pub mod transaction {
        pub use api_types::transaction::{TransactionNew, TransactionView};
    }

    pub mod dashboard {
        pub use api_types::dashboard::{DashboardQuery, DashboardSummary};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    BadRequest(String),
    Unauthorized(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidCredentials | EngineError::InvalidToken => StatusCode::UNAUTHORIZED,
        EngineError::Database(_)
        | EngineError::AtomicApply(_)
        | EngineError::Hashing(_)
        | EngineError::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    if err.is_internal() {
        tracing::error!("internal error: {err}");
        return "internal server error".to_string();
    }
    err.to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::BadRequest(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use sea_orm::DbErr;

    use super::*;

    async fn body_of(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res =
            ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn auth_failures_map_to_401() {
        for err in [EngineError::InvalidCredentials, EngineError::InvalidToken] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn store_errors_are_opaque() {
        let err = EngineError::AtomicApply(DbErr::Custom("UNIQUE constraint on wallets".into()));
        let res = ServerError::from(err).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(res).await,
            serde_json::json!({ "error": "internal server error" })
        );
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ServerError::BadRequest("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
