use migration::{Migrator, MigratorTrait};
use settings::{Database, Settings};

use engine::auth::TokenIssuer;
use server::ServerState;

mod error;
mod settings;

#[tokio::main]
async fn main() -> error::Result<()> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pocketbook={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;
    let issuer = TokenIssuer::new(
        &settings.auth.jwt_secret,
        settings.auth.access_ttl(),
        settings.auth.refresh_ttl(),
    );
    let state = ServerState::new(
        engine,
        issuer,
        settings.auth.bcrypt_cost,
        settings.timezone()?,
    );

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn connect(config: &Database) -> error::Result<sea_orm::DatabaseConnection> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
