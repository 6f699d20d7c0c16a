use std::sync::Arc;

use shelf_web::{Config, Server, Storage, handlers};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    info!(
        listen = %config.listen,
        directory = ?config.directory,
        max_connections = config.max_connections,
        max_request_bytes = config.max_request_bytes,
        "starting shelf"
    );

    let storage = Arc::new(Storage::new(config.directory.clone()));
    let server = Server::builder()
        .address(config.listen.as_str())
        .router(handlers::routes(storage))
        .max_connections(config.max_connections)
        .connection_config(config.connection_config())
        .build()?;

    server.start().await?;
    Ok(())
}
