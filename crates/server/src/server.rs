use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use chrono_tz::Tz;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use std::sync::Arc;

use crate::{ServerError, auth, categories, dashboard, transactions, user, wallets};
use api_types::Message;
use engine::{
    Engine,
    auth::{TokenIssuer, TokenType},
    services::{
        Auth, AuthService, Categories, CategoryService, Dashboard, DashboardService, Postings,
        TransactionService, WalletService, Wallets,
    },
};

/// Services shared by every handler. Each one is reached only through its
/// trait, so tests can plug in any implementation.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<dyn AuthService>,
    pub categories: Arc<dyn CategoryService>,
    pub wallets: Arc<dyn WalletService>,
    pub transactions: Arc<dyn TransactionService>,
    pub dashboard: Arc<dyn DashboardService>,
    /// Zone in which dashboard months are resolved.
    pub zone: Tz,
}

impl ServerState {
    /// Wires every service on top of one `Engine`.
    pub fn new(engine: Engine, issuer: TokenIssuer, bcrypt_cost: u32, zone: Tz) -> Self {
        Self {
            auth: Arc::new(Auth::new(engine.clone(), issuer, bcrypt_cost)),
            categories: Arc::new(Categories::new(engine.clone())),
            wallets: Arc::new(Wallets::new(engine.clone())),
            transactions: Arc::new(Postings::new(engine.clone())),
            dashboard: Arc::new(Dashboard::new(engine)),
            zone,
        }
    }
}

/// Authenticated user id, inserted by the bearer gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal(pub Uuid);

async fn require_bearer(
    State(state): State<ServerState>,
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(ServerError::Unauthorized(
            "authorization header required".to_string(),
        ));
    };

    let user_id = state.auth.validate(bearer.token(), TokenType::Access)?;

    request.extensions_mut().insert(Principal(user_id));
    Ok(next.run(request).await)
}

async fn ping() -> Json<Message> {
    Json(Message::new("pong!"))
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/ping", get(ping))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    let protected = Router::new()
        .route("/me", get(user::me))
        .route(
            "/categories",
            post(categories::create).get(categories::list),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/wallets", post(wallets::create).get(wallets::list))
        .route(
            "/wallets/{id}",
            put(wallets::update).delete(wallets::delete),
        )
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/dashboard", get(dashboard::summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    public
        .nest("/api/v1", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: ServerState, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
