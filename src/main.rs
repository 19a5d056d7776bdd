use pulseconnect::{
    room::repository::{InMemoryRoomRepository, PostgresRoomRepository, RoomRepository},
    websockets::InMemoryConnectionManager,
    AppState, ServerConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulseconnect=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        port = config.port,
        presence_debounce_ms = config.presence.departure_debounce.as_millis() as u64,
        pong_timeout_ms = config.keepalive.pong_timeout.as_millis() as u64,
        "Starting pulse relay server"
    );

    let room_repository: Arc<dyn RoomRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresRoomRepository::new(pool);
            repository.init_schema().await?;
            info!("Using PostgreSQL room repository");
            Arc::new(repository)
        }
        None => {
            warn!("DATABASE_URL not set, rooms are kept in memory only");
            Arc::new(InMemoryRoomRepository::new())
        }
    };

    let app_state = AppState::new(
        room_repository,
        Arc::new(InMemoryConnectionManager::new()),
        config.presence,
    )
    .with_keepalive(config.keepalive);
    let app = pulseconnect::router(app_state, config.frontend_origin.clone());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "Backend live");
    axum::serve(listener, app).await?;

    Ok(())
}
