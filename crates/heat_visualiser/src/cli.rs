use clap::Parser;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

/// `heat_visualiser` - live heat map for the SpiNNaker heat demo.
///
/// Listens for temperature datagrams from the board and draws them. Once the
/// board has been heard from, edge temperatures and pause/resume commands can
/// be sent back to it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON parameter file. Missing keys take their defaults.
    #[arg(short, long, env = "HEAT_VIS_CONFIG", default_value = "visparam.json")]
    pub config: PathBuf,

    /// Address of the board. When unset it is learned from the first datagram.
    #[arg(short = 'i', long, env = "HEAT_VIS_BOARD_IP")]
    pub board_ip: Option<IpAddr>,

    /// Serve Prometheus metrics on this address.
    #[arg(long, env = "HEAT_VIS_METRICS_LISTEN_ADDR")]
    pub metrics_listen_addr: Option<SocketAddr>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}
