use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

pub async fn serve(config: Config, args: ServeArgs) -> Result<()> {
    let port = args.port.unwrap_or(config.port);
    let state = AppState::new(config)?;
    info!(
        "Match engine ready (backend: {}, concurrency: {})",
        state.engine.backend(),
        state.engine.concurrency()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
