//! Team Leave Sync Backend
//!
//! Decides between a remote relational backend and a local store, keeps the
//! team, department and leave collections in one session, and serves them
//! over a JSON API.

mod api;
mod config;
mod errors;
mod local;
mod models;
mod probe;
mod remote;
mod seed;
mod sync;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use errors::AppError;
use local::LocalStore;
use probe::{BackendDecision, Prober};
use remote::{RemoteHandle, SqlRemote};
use sync::SyncSession;

#[derive(Parser)]
#[command(name = "leave-sync", version, about = "Team leave data sync backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the backends, load the session and serve the API (default)
    Serve,
    /// Check the remote backend once and print the decision
    Probe,
    /// Create the remote tables
    Provision {
        /// Insert the default records into empty tables
        #[arg(long)]
        seed: bool,
    },
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SyncSession>>,
    pub prober: Arc<Prober>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Probe => probe(config).await,
        Command::Provision { seed } => provision(config, seed).await,
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting Team Leave Sync Backend");
    tracing::info!("Local store path: {:?}", config.local_store_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    let local = match LocalStore::open(&config.local_store_path).await {
        Ok(local) => local,
        Err(e) => {
            tracing::error!("Local store unavailable, changes will not be kept: {}", e);
            LocalStore::detached()
        }
    };

    let remote = RemoteHandle::from_credentials(config.remote_credentials());
    let prober = Arc::new(Prober::new(config.probe_timeout));

    let mut session = SyncSession::new(remote, local);
    session.start(&prober).await;
    tracing::info!("Session ready in {} mode", session.mode().as_str());

    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        prober,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn probe(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let remote = RemoteHandle::from_credentials(config.remote_credentials());
    let decision = Prober::new(config.probe_timeout).probe(&remote).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);

    match decision {
        BackendDecision::NotProvisioned => Err(Box::new(AppError::SchemaNotProvisioned(
            sync::TABLES_NOT_FOUND.to_string(),
        ))),
        BackendDecision::Error(message) => Err(Box::new(AppError::Connection(message))),
        _ => Ok(()),
    }
}

async fn provision(config: Config, seed: bool) -> Result<(), Box<dyn std::error::Error>> {
    let Some(credentials) = config.remote_credentials() else {
        return Err("LEAVE_REMOTE_URL and LEAVE_REMOTE_KEY must both be set".into());
    };

    let remote = SqlRemote::connect_lazy(&credentials)?;
    remote::provision(&remote, seed).await?;
    tracing::info!("Provisioning finished");
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Session
        .route("/session", get(api::get_session))
        .route("/session/reload", post(api::reload_session))
        .route("/snapshot", get(api::get_snapshot))
        // Members
        .route("/members", get(api::list_members).post(api::create_member))
        .route(
            "/members/{id}",
            get(api::get_member)
                .put(api::update_member)
                .delete(api::delete_member),
        )
        .route("/members/{id}/leaves", get(api::list_member_leaves))
        // Departments
        .route(
            "/departments",
            get(api::list_departments).post(api::create_department),
        )
        .route(
            "/departments/{id}",
            put(api::update_department).delete(api::delete_department),
        )
        .route(
            "/departments/{id}/members",
            get(api::list_department_members),
        )
        // Leave requests
        .route("/leaves", get(api::list_leaves).post(api::create_leave))
        .route("/leaves/upcoming", get(api::list_upcoming_leaves))
        .route(
            "/leaves/{id}",
            put(api::update_leave).delete(api::delete_leave),
        )
        .route("/calendar/{date}", get(api::get_calendar_day));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
