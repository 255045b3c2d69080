use plate_buckling::api;
use plate_buckling::executor::resolve_ccx_path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plate_buckling=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Plate Buckling Service");

    let ccx_path = resolve_ccx_path();
    tracing::info!("Using CalculiX command: {}", ccx_path);

    match std::process::Command::new(&ccx_path).arg("-v").output() {
        Ok(_) => tracing::info!("CalculiX found and accessible"),
        Err(e) => {
            tracing::warn!("CalculiX not found or not accessible: {}", e);
            tracing::warn!("Set CALCULIX_PATH environment variable to the correct path");
            tracing::warn!("Service will start but analyses will fail until CalculiX is available");
        }
    }

    let app = api::create_router();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Listening on {}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/version");
    tracing::info!("  POST /api/v1/validate");
    tracing::info!("  POST /api/v1/deck");
    tracing::info!("  POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
