//! storefront-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use storefront_api::middleware::{AppState, auth_middleware};
use storefront_common::Config;
use storefront_core::{
    EmailConfig, EmailService, NoOpNotifier, NotifierService, ReviewService, SmtpConfig,
    UserService,
};
use storefront_db::repositories::{OrderRepository, ProductRepository, UserRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting storefront-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = storefront_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    storefront_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let product_repo = ProductRepository::new(Arc::clone(&db));
    let order_repo = OrderRepository::new(Arc::clone(&db));

    // Outbound email, disabled unless configured
    let notifier: NotifierService = match &config.email {
        Some(email) => {
            info!(host = %email.smtp_host, "Email notifications enabled");
            Arc::new(EmailService::new(EmailConfig {
                smtp: SmtpConfig {
                    host: email.smtp_host.clone(),
                    port: email.smtp_port,
                    use_tls: email.use_tls,
                    username: email.username.clone(),
                    password: email.password.clone(),
                },
                from_address: email.from_address.clone(),
                from_name: email.from_name.clone(),
            })?)
        }
        None => {
            info!("Email notifications disabled");
            Arc::new(NoOpNotifier)
        }
    };

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let review_service = ReviewService::new(user_repo, product_repo, order_repo, notifier);

    let state = AppState {
        user_service,
        review_service,
    };

    // Build the router
    let app = Router::new()
        .nest("/api/v1", storefront_api::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Serve
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
