//! Server configuration.

/// Origins allowed by default, matching the usual local front-end dev ports.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
];

/// Runtime settings for the relay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Origins accepted by the CORS layer
    pub allowed_origins: Vec<String>,
    /// Depth of each connection's outbound queue
    pub outbound_buffer: usize,
    /// Send `user-left` to the remaining members on leave / disconnect
    pub announce_departures: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            outbound_buffer: 256,
            announce_departures: false,
        }
    }
}
