mod auth;
mod error;
mod handlers;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use stockdash_core::{Catalog, MockStore, PostgresStore, Session, StoreError};

use auth::{AccessLogLayer, BasicCredentials};
use openapi::ApiDoc;
use state::{AppContext, DynSource};

const DEFAULT_LOG_FILTER: &str = "stockdash_web=info,stockdash_core=info";

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "stockdash-web", about = "Stock market dashboard web server", version = stockdash_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "STOCKDASH_LISTEN")]
    listen: SocketAddr,

    /// libpq connection string ("host=... user=... dbname=...").
    /// If not specified, PGHOST/PGPORT/PGUSER/PGPASSWORD/PGDATABASE are used.
    #[arg(long, env = "STOCKDASH_DATABASE_URL")]
    database_url: Option<String>,

    /// Schema qualifying every table reference.
    #[arg(long, env = "STOCKDASH_SCHEMA")]
    schema: Option<String>,

    /// Seconds a loaded table is reused before reloading (0 = always reload).
    #[arg(long, default_value = "0", env = "STOCKDASH_CACHE_TTL")]
    cache_ttl: u64,

    /// Serve built-in sample data instead of connecting to PostgreSQL.
    #[arg(long, env = "STOCKDASH_DEMO")]
    demo: bool,

    /// Basic Auth username. If set, --auth-password is also required.
    #[arg(long, env = "STOCKDASH_AUTH_USER")]
    auth_user: Option<String>,

    /// Basic Auth password.
    #[arg(long, env = "STOCKDASH_AUTH_PASSWORD")]
    auth_password: Option<String>,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let auth = match (&args.auth_user, &args.auth_password) {
        (Some(user), Some(password)) => {
            info!("basic auth enabled");
            Some(Arc::new(BasicCredentials {
                user: user.clone(),
                password: password.clone(),
            }))
        }
        (Some(_), None) | (None, Some(_)) => {
            error!("--auth-user and --auth-password must both be set");
            process::exit(2);
        }
        (None, None) => None,
    };

    // Connect before serving: an unreachable store is fatal at startup.
    let source = match open_source(&args) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "failed to open table source");
            process::exit(1);
        }
    };
    info!(
        version = stockdash_core::VERSION,
        source = %source.describe(),
        cache_ttl_secs = args.cache_ttl,
        "table source ready"
    );

    let session = Session::new(source).with_cache_ttl(Duration::from_secs(args.cache_ttl));
    let app = build_app(state::shared(session), auth);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(serve(args.listen, app));
}

fn open_source(args: &Args) -> Result<DynSource, StoreError> {
    if args.demo {
        info!("demo mode: serving built-in sample market");
        return Ok(Box::new(MockStore::sample_market()));
    }

    let mut catalog = Catalog::new();
    if let Some(schema) = &args.schema {
        catalog = catalog.with_schema(schema.clone());
    }
    let store = match &args.database_url {
        Some(url) => PostgresStore::with_connection_string(url.clone(), catalog),
        None => PostgresStore::from_env(catalog)?,
    };
    Ok(Box::new(store.connect()?))
}

fn build_app(state: AppContext, auth: Option<Arc<BasicCredentials>>) -> Router {
    let mut app = Router::new()
        .route("/api/v1/health", get(handlers::handle_health))
        .route("/api/v1/info", get(handlers::handle_info))
        .route("/api/v1/views", get(handlers::handle_views))
        .route("/api/v1/views/{view}", get(handlers::handle_view))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(get(handlers::serve_frontend))
        .with_state(state);

    // AccessLogLayer goes BEFORE auth so auth wraps it and the log can read AuthUser
    // (axum layers: last .layer() = outermost; request flows outside-in)
    app = app.layer(AccessLogLayer);

    if let Some(creds) = auth {
        app = app.layer(axum::middleware::from_fn_with_state(
            creds,
            auth::basic_auth_middleware,
        ));
    }

    app.layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

async fn serve(addr: SocketAddr, app: Router) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, "listening");

    let app = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        process::exit(1);
    }
}
