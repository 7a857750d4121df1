use openair_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    init_tracing(&config);

    // Initialize the application (collaborators, services, routes)
    let (_state, router) = openair_api::setup::initialize_app(config.clone())?;

    // Start the server
    openair_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = if config.debug {
        "debug,hyper=info,aws_config=info,aws_sdk_s3=info"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
