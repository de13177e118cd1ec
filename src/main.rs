use portfolio_relay::configuration::get_configuration;
use portfolio_relay::startup::Application;
use portfolio_relay::telemetry::get_subscriber;
use portfolio_relay::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main] // requires tokio features: macros, rt-multi-thread
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("portfolio-relay", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;
    let app = Application::build(cfg).await?;
    tracing::info!(port = app.get_port(), "server is running");

    app.run_until_stopped().await?;
    Ok(())
}
