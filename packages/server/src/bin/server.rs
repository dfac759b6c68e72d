//! Room-scoped WebSocket message relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --port 3000 --announce-departures
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use roomcast_server::{
    domain::RoomDirectory,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server, ServerConfig, config::DEFAULT_ALLOWED_ORIGINS},
};
use roomcast_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::{Mutex, RwLock};

#[derive(Parser, Debug)]
#[command(name = "roomcast-server")]
#[command(about = "Room-scoped WebSocket message relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Origin allowed to call the server (repeatable)
    #[arg(
        long = "allowed-origin",
        env = "FRONTEND_URL",
        value_delimiter = ',',
        default_values_t = DEFAULT_ALLOWED_ORIGINS.map(String::from)
    )]
    allowed_origins: Vec<String>,

    /// Outbound queue depth per connection
    #[arg(long, env = "OUTBOUND_BUFFER", default_value = "256")]
    outbound_buffer: usize,

    /// Notify remaining room members when someone leaves or disconnects
    #[arg(long, env = "ANNOUNCE_DEPARTURES")]
    announce_departures: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origins: args.allowed_origins,
            outbound_buffer: args.outbound_buffer,
            announce_departures: args.announce_departures,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_CRATE_NAME"), &args.log_level);

    let config = ServerConfig::from(args);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create Repository (in-memory room directory)
    let directory = Arc::new(Mutex::new(RoomDirectory::new()));
    let repository = Arc::new(InMemoryRoomRepository::new(directory));

    // 2. Create MessagePusher (WebSocket implementation)
    let channels = Arc::new(RwLock::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(channels));

    // 3. Create UseCases
    let state = AppState::new(repository, message_pusher, Arc::new(SystemClock), &config);

    // 4. Create and run the server
    let server = Server::new(state, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
