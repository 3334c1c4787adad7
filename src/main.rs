use kycgate::{utils::config::Config, Application};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Console logging plus a daily-rolling file for audit trails
    let file_appender = tracing_appender::rolling::daily("logs", "kycgate.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    info!("Starting KYC verification service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::new().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize application
    let app = Application::new(config).map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    // Serve until shut down (actix handles the interrupt signals)
    app.run().await.map_err(|e| {
        error!("Server error: {}", e);
        e
    })?;

    info!("Application shutdown complete");
    Ok(())
}
