use tracing::info;

use calculadora_web::WebConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = WebConfig::from_env()?;

    info!(
        "Starting Calculadora {} on http://{}",
        calculadora_engine::VERSION,
        cfg.addr
    );

    calculadora_web::server::serve(cfg).await
}
