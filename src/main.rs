use newsletter_gateway::{
    error::NewsletterGatewayError,
    settings::Settings,
    telemetry::{get_tracing_subscriber, init_tracing_subscriber},
};
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() -> Result<(), NewsletterGatewayError> {
    let tracing_subscriber =
        get_tracing_subscriber("newsletter_gateway", LevelFilter::INFO, std::io::stdout);
    init_tracing_subscriber(tracing_subscriber);

    let settings = Settings::get_settings()?;
    let server = settings.build_server().await?;

    tracing::info!(
        address = %settings.application.get_address(),
        port = server.port()?,
        "Starting Server"
    );
    server.run().await?;
    Ok(())
}
