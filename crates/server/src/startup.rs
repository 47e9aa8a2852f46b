use std::{future::Future, net::SocketAddr, time::Duration};

use axum::{
    http::{HeaderName, HeaderValue, Method},
    Router,
};
use configs::{AppConfig, CorsConfig, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

/// CORS policy from the `[cors]` section. A `*` origin allows any origin
/// and turns credentials off, since browsers reject that combination.
pub fn build_cors(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let methods = cfg
        .allowed_methods
        .iter()
        .map(|m| m.parse::<Method>())
        .collect::<Result<Vec<_>, _>>()?;
    let headers = cfg
        .allowed_headers
        .iter()
        .map(|h| h.parse::<HeaderName>())
        .collect::<Result<Vec<_>, _>>()?;
    let expose = cfg
        .expose_headers
        .iter()
        .map(|h| h.parse::<HeaderName>())
        .collect::<Result<Vec<_>, _>>()?;

    let wildcard = cfg.allowed_origins.iter().any(|o| o == "*");
    let origin = if wildcard {
        AllowOrigin::any()
    } else {
        let list = cfg
            .allowed_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(list)
    };
    let credentials = cfg.allow_credentials && !wildcard;
    if cfg.allow_credentials && wildcard {
        warn!("cors: wildcard origin, credentials disabled");
    }

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .expose_headers(expose)
        .allow_credentials(credentials)
        .max_age(Duration::from_secs(cfg.max_age_secs)))
}

/// Open the pool and apply migrations when `auto_migrate` is set.
pub async fn connect_database(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = models::db::connect_with_config(cfg).await?;
    if cfg.auto_migrate {
        models::db::migrate(&db).await?;
        info!("migrations applied");
    }
    Ok(db)
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: connect, build the app and serve until Ctrl+C. `cfg` is
/// expected to come from [`AppConfig::load_and_validate`].
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connect_database(&cfg.database).await?;
    let state = ServerState::from_db(db);
    let app = routes::build_router(state, build_cors(&cfg.cors)?);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "project-core listening");
    serve(listener, app, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
