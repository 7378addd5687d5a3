use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use market_stats::api::routes::{router, ApiState};
use market_stats::config::Config;
use market_stats::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database (read-only; schema is owned by the ingesting service) ---
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=ro", cfg.db_path)).await?;
    info!("Database opened read-only at {}", cfg.db_path);

    // --- HTTP API server ---
    let app = router(ApiState::new(pool));
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
