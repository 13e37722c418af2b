use bazaar_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // Production logs to rolling files under the work dir; everything else
    // goes to stdout
    if config.is_production() {
        let log_dir = config.log_dir();
        std::fs::create_dir_all(&log_dir)?;
        init_logger_with_file(Some(config.default_log_level()), log_dir.to_str());
    } else {
        init_logger_with_file(Some(config.default_log_level()), None);
    }

    print_banner();
    tracing::info!("Bazaar server starting...");

    let state = ServerState::initialize(&config).await;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
