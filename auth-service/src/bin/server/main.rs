use std::sync::Arc;

use auth::TokenIssuer;
use auth_service::config::Config;
use auth_service::domain::account::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::ledger::RedisRevocationLedger;
use auth_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        operation_timeout_ms = config.server.operation_timeout_ms,
        jwt_ttl_hours = config.jwt.ttl_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let ledger = RedisRevocationLedger::connect(&config.redis.url).await?;
    ledger.ping().await?;
    tracing::info!(ledger = "redis", "Revocation ledger connected");

    let token_issuer = Arc::new(TokenIssuer::new(config.jwt.token_config()?));
    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        Arc::new(ledger),
        token_issuer,
        config.server.operation_timeout(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service)).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
