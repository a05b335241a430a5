use clap::Parser;
use std::{
    net::{
        IpAddr,
        Ipv4Addr,
    },
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_JSON_LIMIT: usize = 4 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Provably fair dice roll service", long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Restrict CORS to these origins. Any origin is allowed when omitted.
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,

    /// Write logs to a daily rolling file in this directory instead of stdout.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Install the log subscriber. Logging is off without it.
    #[arg(short, long, default_value = "false")]
    pub tracing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    /// Port 0 binds an ephemeral port.
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub json_limit: usize,
}

impl ServerConfig {
    pub fn ephemeral() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            allowed_origins: Vec::new(),
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origins: args.allowed_origins.clone(),
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}
