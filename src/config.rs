//! Command-Line Configuration
//!
//! Every flag can also be supplied through an `IMGREP_*` environment variable.

use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "imgrep-web",
    version,
    about = "grep image files for words",
    long_about = "web interface for using imgrep"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the web server
    #[command(visible_alias = "start")]
    Run(ServerConfig),
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, env = "IMGREP_PORT", default_value_t = 1337)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "IMGREP_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Directory tree to index (defaults to $HOME)
    #[arg(long, env = "IMGREP_ROOT")]
    pub root: Option<PathBuf>,

    /// Index snapshot file (defaults to <root>/.imgrep/index.bin)
    #[arg(long, env = "IMGREP_DB")]
    pub db: Option<PathBuf>,

    /// Directory served under /assets
    #[arg(long, env = "IMGREP_ASSETS", default_value = "assets")]
    pub assets: PathBuf,

    /// Re-run the indexer every N seconds; runs once when unset
    #[arg(long, env = "IMGREP_RESCAN_SECS")]
    pub rescan_secs: Option<u64>,

    /// Seconds between index snapshots
    #[arg(long, env = "IMGREP_SNAPSHOT_SECS", default_value_t = 30)]
    pub snapshot_secs: u64,

    /// Per-file read limit for search results, in milliseconds
    #[arg(long, env = "IMGREP_READ_TIMEOUT_MS", default_value_t = 5000)]
    pub read_timeout_ms: u64,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    pub fn db_file(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| self.root_dir().join(".imgrep").join("index.bin"))
    }

    pub fn rescan_interval(&self) -> Option<Duration> {
        self.rescan_secs.map(Duration::from_secs)
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_secs.max(1))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
