//! framewire CLI Client
//!
//! Sends framed requests to a framewire server.

use std::net::TcpStream;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use framewire::network::{KeepAlive, TcpFrameConn};
use framewire::packer::{UnbindPacker, UnbindRequest};
use framewire::{Config, Packer, Packet, Result, WriterStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// framewire CLI
#[derive(Parser, Debug)]
#[command(name = "framewire-cli")]
#[command(about = "CLI for framewire servers")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3553")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Unbind a user
    Unbind {
        /// Sequence number for the request
        #[arg(long, default_value = "1")]
        seq: u64,

        /// The user to unbind
        #[arg(long)]
        uid: i64,
    },

    /// Send heartbeats and wait for the replies
    Ping {
        /// Number of heartbeats
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Interval between heartbeats in milliseconds (defaults to the configured keep-alive)
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder().read_timeout_ms(5000).build();
    let stream = TcpStream::connect(&args.server)?;
    let mut conn = TcpFrameConn::from_tcp(stream, &config)?;

    match args.command {
        Commands::Unbind { seq, uid } => {
            let packer = UnbindPacker::new();
            conn.send(packer.pack_request(&UnbindRequest { seq, uid })?)?;

            loop {
                match conn.read_packet()? {
                    Packet::Data { route, data, .. } if route == packer.response_route() => {
                        let res = packer.unpack_response(&data)?;
                        println!("seq={} code={}", res.seq, res.code);
                        return Ok(());
                    }
                    other => tracing::debug!("Ignoring {:?}", other),
                }
            }
        }
        Commands::Ping { count, interval_ms } => {
            let interval =
                Duration::from_millis(interval_ms.unwrap_or(config.heartbeat_interval_ms));
            let started = Instant::now();

            conn.send_heartbeat(&WriterStrategy::Sequential)?;
            let _keepalive = (count > 1)
                .then(|| KeepAlive::spawn(conn.writer(), WriterStrategy::Sequential, interval));

            let mut seen = 0;
            while seen < count {
                if conn.read_packet()?.is_heartbeat() {
                    seen += 1;
                    println!("heartbeat {} after {:?}", seen, started.elapsed());
                }
            }
            Ok(())
        }
    }
}
