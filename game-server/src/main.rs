use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::info;

use game_core::WordBank;
use game_server::{Config, RoomRegistry};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting draw-and-guess room server...");

    let config = Config::new();

    let words = match &config.words_directory {
        Some(dir) => {
            info!("Loading word lists from directory: {}", dir);
            match load_words_from_dir(dir) {
                Ok(words) => words,
                Err(e) => {
                    tracing::error!("Failed to load word lists from '{}': {}", dir, e);
                    tracing::error!(
                        "Expected easy.txt, medium.txt and hard.txt in that directory, \
                         or unset WORDS_DIRECTORY to use the built-in lists."
                    );
                    std::process::exit(1);
                }
            }
        }
        None => {
            info!("Using built-in word lists");
            WordBank::builtin()
        }
    };

    let registry = Arc::new(RoomRegistry::new(&config, words));

    // Start cleanup task: drop registry entries for rooms whose actors have
    // stopped (abandoned or idle).
    let cleanup_registry = registry.clone();
    let cleanup_interval = Duration::from_secs(config.cleanup_interval_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let removed = cleanup_registry.sweep_closed();
            if removed > 0 {
                info!(
                    "Swept {} closed rooms ({} live)",
                    removed,
                    cleanup_registry.room_count()
                );
            }
        }
    });

    info!("Room registry ready. Press Ctrl+C to stop.");

    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
        info!("Received Ctrl+C, shutting down gracefully...");
    }

    info!("Server shutdown complete.");
}

fn load_words_from_dir(dir: &str) -> std::io::Result<WordBank> {
    let read = |name: &str| std::fs::read_to_string(std::path::Path::new(dir).join(name));
    Ok(WordBank::from_lists(
        &read("easy.txt")?,
        &read("medium.txt")?,
        &read("hard.txt")?,
    ))
}
