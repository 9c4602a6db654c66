use std::sync::Arc;

use auth::TokenCodec;
use jsonwebtoken::Algorithm;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use volunteer_service::config::Config;
use volunteer_service::domain::auth::service::AuthService;
use volunteer_service::inbound::http::router::create_router;
use volunteer_service::outbound::repositories::SqliteProfileReader;
use volunteer_service::outbound::repositories::SqliteRoleRepository;
use volunteer_service::outbound::repositories::SqliteUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volunteer_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "volunteer-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        jwt_ttl_minutes = config.jwt.ttl_minutes,
        "Configuration loaded"
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "sqlite",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let algorithm = config
        .jwt
        .algorithm
        .parse::<Algorithm>()
        .map_err(|e| anyhow::anyhow!("invalid jwt algorithm: {e}"))?;
    let token_codec = Arc::new(TokenCodec::new(
        config.jwt.secret.as_bytes(),
        algorithm,
        config.jwt.ttl(),
    ));

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let role_repository = Arc::new(SqliteRoleRepository::new(pool.clone()));
    let profile_reader = Arc::new(SqliteProfileReader::new(pool));

    role_repository.seed_defaults().await?;
    tracing::info!("Default roles seeded");

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        Arc::clone(&role_repository),
        profile_reader,
        Arc::clone(&token_codec),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, role_repository, token_codec);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
