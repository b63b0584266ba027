use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub command_channel_capacity: usize,
    pub room_idle_timeout_seconds: u64,
    pub cleanup_interval_seconds: u64,
    pub words_directory: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            command_channel_capacity: env::var("ROOM_CHANNEL_CAPACITY")
                .unwrap_or_else(|_| "64".to_string())
                .parse()
                .expect("Invalid ROOM_CHANNEL_CAPACITY"),
            room_idle_timeout_seconds: env::var("ROOM_IDLE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .expect("Invalid ROOM_IDLE_TIMEOUT_SECONDS"),
            cleanup_interval_seconds: env::var("CLEANUP_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid CLEANUP_INTERVAL_SECONDS"),
            words_directory: env::var("WORDS_DIRECTORY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
