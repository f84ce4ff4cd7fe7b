use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_api::config::ServerConfig;
use intake_api::state::AppState;
use intake_api::{background, routes};
use intake_files::{LocalFileStore, MountedShareMirror, NasMirror, NoopMirror, StagingArea};
use intake_notify::{
    DispatcherSettings, EmailConfig, Mailer, NoopMailer, NotificationDispatcher, SmtpMailer,
};
use intake_store::ProjectStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Project store ---
    // The single shared instance every handler operates on. Volatile by
    // design: a restart loses all intake state.
    let store = Arc::new(ProjectStore::new());

    // --- Filesystem collaborators ---
    let files = Arc::new(LocalFileStore::new(&config.upload_dir));
    let staging = Arc::new(StagingArea::new(&config.staging_dir));

    let mirror: Arc<dyn NasMirror> = match &config.nas_mount_path {
        Some(mount) => {
            tracing::info!(mount = %mount.display(), "NAS mirror enabled");
            Arc::new(MountedShareMirror::new(mount))
        }
        None => {
            tracing::info!("NAS mirror not configured, mirroring disabled");
            Arc::new(NoopMirror)
        }
    };

    // --- Mailer ---
    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            let host = email_config.smtp_host.clone();
            match SmtpMailer::new(email_config) {
                Ok(smtp) => {
                    tracing::info!(smtp_host = %host, "SMTP mailer enabled");
                    Arc::new(smtp)
                }
                Err(e) => {
                    tracing::error!(error = %e, "SMTP setup failed, notifications disabled");
                    Arc::new(NoopMailer)
                }
            }
        }
        None => {
            tracing::info!("SMTP not configured, notifications disabled");
            Arc::new(NoopMailer)
        }
    };

    let dispatcher = Arc::new(NotificationDispatcher::new(
        mailer,
        DispatcherSettings {
            operator_email: config.operator_email.clone(),
            base_url: config.base_url.clone(),
            send_timeout: Duration::from_secs(config.notify_timeout_secs),
        },
    ));

    // --- Reminder sweep (optional) ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = config.reminder_scan_interval_secs.map(|interval_secs| {
        tokio::spawn(background::reminder::run(
            Arc::clone(&store),
            Arc::clone(&dispatcher),
            interval_secs,
            config.reminder_stale_days,
            sweep_cancel.clone(),
        ))
    });

    // --- CORS ---
    let cors = build_cors_layer(&config);

    // --- App state ---
    let state = AppState {
        store,
        files,
        staging,
        mirror,
        dispatcher,
        config: Arc::new(config.clone()),
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Reminder sweep stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid; misconfiguration
/// should fail fast.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
