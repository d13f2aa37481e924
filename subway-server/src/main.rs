use subway_server::config::ServerConfig;
use subway_server::lines::{LineRepository, LineService};
use subway_server::stations::StationRegistry;
use subway_server::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("subway_server=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    // Build app state
    let service = LineService::new(StationRegistry::new(), LineRepository::new());
    let state = AppState::new(service);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.bind_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "failed to bind: {e}");
            std::process::exit(1);
        }
    };
    info!("Subway line server listening on http://{addr}");
    info!("  POST   /stations                       - Register a station");
    info!("  POST   /lines                          - Create a line");
    info!("  GET    /lines/:id                      - Line with ordered stations");
    info!("  POST   /lines/:id/sections             - Add a segment");
    info!("  DELETE /lines/:id/sections?stationId=  - Remove a station");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
