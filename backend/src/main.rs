use thumbgen::config::AppConfig;
use thumbgen::handlers::{router, AppState};
use thumbgen::render::{FontResolver, RenderContext};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    info!(
        font_dirs = ?config.font_dirs,
        watermark = %config.watermark,
        "configuration loaded"
    );

    let fonts = FontResolver::new(config.font_dirs.clone());
    let app = router(AppState::new(RenderContext::new(fonts, config.watermark.clone())));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("thumbgen listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
