//! Command line configuration for the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use time::Duration;

/// The REST API server for tracking personal income and expenses.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    pub db_path: String,

    /// The IP address to serve the API from.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub address: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The number of days a session stays valid without any requests.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(1..))]
    pub session_days: u16,

    /// The secret used to encrypt session cookies.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,
}

impl Config {
    /// The address the server should listen on.
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    /// How long a session lasts.
    pub fn session_duration(&self) -> Duration {
        Duration::days(i64::from(self.session_days))
    }
}
