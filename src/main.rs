use std::sync::{Arc, Mutex};

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shopbook::config::AppConfig;
use shopbook::db;
use shopbook::handlers;
use shopbook::services::messaging::log_only::LogOnlyProvider;
use shopbook::services::messaging::ultramsg::UltraMsgProvider;
use shopbook::services::messaging::MessagingProvider;
use shopbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let messaging: Arc<dyn MessagingProvider> = if config.messaging_configured() {
        tracing::info!("using UltraMsg WhatsApp provider (instance: {})", config.ultramsg_instance_id);
        Arc::new(UltraMsgProvider::new(
            config.ultramsg_instance_id.clone(),
            config.ultramsg_token.clone(),
        ))
    } else {
        tracing::warn!("ULTRAMSG_INSTANCE_ID/ULTRAMSG_TOKEN not set, notifications will only be logged");
        Arc::new(LogOnlyProvider)
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        messaging,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/login", post(handlers::auth::login))
        .route("/create-business/", post(handlers::auth::register))
        .route("/add-service/", post(handlers::catalog::add_service))
        .route(
            "/business/:id/services",
            get(handlers::catalog::list_services),
        )
        .route("/business/:id/hours", put(handlers::catalog::set_hours))
        .route(
            "/services/:id",
            put(handlers::catalog::update_service).delete(handlers::catalog::delete_service),
        )
        .route("/shop/:slug/services", get(handlers::catalog::shop_services))
        .route("/book-appointment/", post(handlers::bookings::book_appointment))
        .route(
            "/business/:id/bookings",
            get(handlers::bookings::list_bookings),
        )
        .route(
            "/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/admin/businesses",
            get(handlers::admin::list_businesses).post(handlers::admin::create_business),
        )
        .route(
            "/api/admin/businesses/:id",
            put(handlers::admin::update_business).delete(handlers::admin::delete_business),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
