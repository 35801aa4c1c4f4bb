//! Workforce - Employee and department management service

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use chrono::Duration;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use workforce_api::{AppState, create_router, default_policy};
use workforce_auth::{JwtManager, PasswordHasher};
use workforce_core::{
    AuthService, DailySummaryJob, DepartmentService, EmployeeService, spawn_daily_summary_task,
};
use workforce_db::Database;

/// Workforce - Employee and department management service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "WORKFORCE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "WORKFORCE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Workforce v{}", env!("CARGO_PKG_VERSION"));
    config.warn_insecure_defaults();

    // Metrics recorder must be installed before any counter is touched
    let metrics_handle = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(Arc::new(handle))
    } else {
        None
    };

    // Create data directory
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Initialize auth primitives
    let token_ttl = Duration::try_hours(config.auth.token_ttl_hours)
        .context("auth.token_ttl_hours is out of range")?;
    let jwt = Arc::new(JwtManager::new(&config.auth.jwt_secret, token_ttl));
    let hasher = PasswordHasher::new(
        config.auth.hash_memory_kib,
        config.auth.hash_iterations,
        config.auth.hash_parallelism,
    )?;

    // Initialize services
    let auth = Arc::new(AuthService::new(db.clone(), jwt.clone(), hasher.clone())?);
    let employees = Arc::new(EmployeeService::new(
        db.clone(),
        hasher,
        config.employees.default_password.clone(),
    ));
    let departments = Arc::new(DepartmentService::new(db.clone()));
    let summaries = Arc::new(DailySummaryJob::new(db.clone()));

    // Create default admin if no employees exist
    let bootstrap = &config.bootstrap;
    if employees
        .bootstrap_admin(
            &bootstrap.admin_name,
            &bootstrap.admin_email,
            &bootstrap.admin_password,
            &bootstrap.admin_department,
        )
        .await?
    {
        warn!(
            "Default admin created (email: {}); change its password",
            bootstrap.admin_email
        );
    }

    // Start daily summary scheduler
    let scheduler = if config.scheduler.enabled {
        Some(spawn_daily_summary_task(
            summaries.clone(),
            config.daily_schedule()?,
        ))
    } else {
        info!("Daily summary scheduler disabled");
        None
    };

    // Create application state
    let state = AppState::new(
        db,
        jwt,
        default_policy(),
        auth,
        employees,
        departments,
        summaries,
    );

    // Create router
    let mut app = create_router(state, metrics_handle);
    if let Some(cors) = cors_layer(&config.server.cors_origins)? {
        app = app.layer(cors);
    }
    let app = app.layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = scheduler {
        task.abort();
    }

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// CORS layer for the configured origins, `None` when no origin is allowed
fn cors_layer(origins: &[String]) -> Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    ))
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
