//! Pujasera Server Entry Point

use pujasera_server::core::{Config, Server};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = config.log_dir();
    if config.ensure_work_dir_structure().is_ok() {
        pujasera_server::init_logger_with_file(
            log_level.as_deref(),
            log_dir.to_str(),
        );
    } else {
        pujasera_server::init_logger();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Starting pujasera server"
    );

    if let Err(e) = Server::new(config).run().await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
