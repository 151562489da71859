use std::{env, net::SocketAddr, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use visitor_tracker::geo::{GeoResolver, IP_API_BASE};
use visitor_tracker::{resolve_store, router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // A store that cannot initialize must keep the process down.
    let store = resolve_store().await.map_err(|err| err.message)?;
    store.ensure_initialized().await.map_err(|err| err.message)?;

    let geo = GeoResolver::new(IP_API_BASE)?;
    let state = AppState::new(store, geo);

    let static_dir = env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("website"));
    let app = router(state, &static_dir);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("visitor tracker listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
