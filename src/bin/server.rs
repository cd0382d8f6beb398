//! framewire Server Binary
//!
//! Serves Unbind requests and answers heartbeats over TCP.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use framewire::packer::{UnbindPacker, UnbindRequest, UnbindResponse};
use framewire::network::Server;
use framewire::{Config, Router, WriterStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// framewire Server
#[derive(Parser, Debug)]
#[command(name = "framewire-server")]
#[command(about = "Framed request/response server")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3553")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Idle read timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "30000")]
    read_timeout_ms: u64,

    /// Largest accepted frame size in bytes
    #[arg(long, default_value = "16777216")]
    max_frame_size: u32,

    /// Frame writer used for responses
    #[arg(short, long, value_enum, default_value = "sequential")]
    writer: WriterArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WriterArg {
    Sequential,
    Typed,
}

impl From<WriterArg> for WriterStrategy {
    fn from(arg: WriterArg) -> Self {
        match arg {
            WriterArg::Sequential => WriterStrategy::Sequential,
            WriterArg::Typed => WriterStrategy::Typed,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,framewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("framewire Server v{}", framewire::VERSION);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .max_frame_size(args.max_frame_size)
        .writer_strategy(args.writer.into())
        .build();

    let mut router = Router::new();
    let unbind = Arc::new(UnbindPacker::with_writer(config.writer_strategy));
    router.serve(unbind, |req: UnbindRequest| {
        tracing::info!("Unbind uid={} seq={}", req.uid, req.seq);
        UnbindResponse { seq: req.seq, code: 0 }
    });

    let server = match Server::bind(config, router) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
