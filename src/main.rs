use tracing_subscriber::EnvFilter;
use xchangx_api::config::Config;
use xchangx_api::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("xchangx_api=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    tracing::info!("Reading configuration");
    let config = Config::from_env()?;
    tracing::info!("Starting XchangX API on {}", config.bind_addr);
    Application::new(config).run().await?;
    Ok(())
}
