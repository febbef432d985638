use std::sync::Arc;

use messenger_core::ConversationIndex;
use messenger_server::{init_logging, serve, ServerConfig, ServerState};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = init_logging(config.log_dir.as_deref());

    let index = match ConversationIndex::open(&config.store) {
        Ok(index) => index,
        Err(e) => {
            error!(
                "Failed to open message store at {}: {}",
                config.store.db_path.display(),
                e
            );
            std::process::exit(1);
        }
    };
    info!("Message store ready at {}", config.store.db_path.display());

    let state = Arc::new(ServerState::new(index));

    let listener = match TcpListener::bind(&config.addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", config.addr, e);
            std::process::exit(1);
        }
    };

    info!("Messenger server listening on {}", config.addr);

    tokio::select! {
        _ = serve(listener, state) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        }
    }
}
