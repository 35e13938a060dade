//! Chat room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin noriai-server -- --port 8080
//! ```

use clap::Parser;
use noriai_server::{ServerArgs, ServerConfig};
use noriai_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = noriai_server::run_server(ServerConfig::from(&args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
