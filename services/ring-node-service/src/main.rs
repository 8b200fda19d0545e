//! RingRelay ring node service.
//!
//! Runs a single member of a message relay ring. Without `--entry-host` the
//! node is the ring's coordinator: it accepts registrations and originates
//! round trips. With an entry node configured it registers there at startup
//! and runs as a relay, forwarding every incoming message to its assigned
//! successor.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod error;
mod transport;
mod wire;

use ringrelay_core::NodeAddr;
use ringrelay_ring::{NodeConfig, RelayTransport, RingNode};
use transport::HttpRelayTransport;

/// Ring node CLI arguments
#[derive(Parser, Debug)]
#[command(name = "ring-node-service")]
#[command(about = "RingRelay message relay ring node")]
struct Args {
    /// Name this node signs with
    #[arg(long, default_value = "ring-node")]
    name: String,

    /// Host other nodes reach this node at
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Entry node host; omit to run as the ring coordinator
    #[arg(long)]
    entry_host: Option<String>,

    /// Entry node port
    #[arg(long, default_value = "8080")]
    entry_port: u16,

    /// Bound on the wait for a round trip, in seconds
    #[arg(long, default_value = "30")]
    round_trip_timeout_secs: u64,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Application state
pub struct AppState {
    pub node: Arc<RingNode>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = NodeConfig {
        name: args.name,
        host: args.host.clone(),
        port: args.port,
        entry: args
            .entry_host
            .map(|host| NodeAddr::new(host, args.entry_port)),
        round_trip_timeout_secs: args.round_trip_timeout_secs,
    };
    config
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let transport: Arc<dyn RelayTransport> = Arc::new(HttpRelayTransport::new());
    let node = if config.entry.is_some() {
        let node = RingNode::join(&config, transport).await.map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
        Arc::new(node)
    } else {
        Arc::new(RingNode::coordinator(&config, transport))
    };

    info!(name = node.name(), addr = %node.addr(), "ring node up");

    let state = web::Data::new(AppState { node });

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
