use log::LevelFilter;

/// Demo playback cadence from the original dashboard.
pub const DEFAULT_DEMO_INTERVAL_MS: u64 = 4000;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Milliseconds between demo scenario applications.
    pub demo_interval_ms: u64,
    /// Websocket URL for the live position feed.
    pub feed_endpoint: String,
}

impl AppSettings {
    pub fn load() -> Self {
        let demo_interval_ms = std::env::var("COACHTUI_DEMO_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&ms| ms >= 100)
            .unwrap_or(DEFAULT_DEMO_INTERVAL_MS);

        Self {
            full_screen: false,
            log_level: None,
            demo_interval_ms,
            feed_endpoint: std::env::var("COACHTUI_FEED_WS")
                .unwrap_or_else(|_| "ws://127.0.0.1:8765".to_string()),
        }
    }
}
