use clap::Parser;
use std::net::SocketAddr;

use vis_core::config::RAYTRACE_PORT;

/// `raytrace_visualiser` - shows the image a SpiNNaker path tracer is
/// rendering, refining each pixel as more samples arrive.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// UDP port the board sends pixel datagrams to.
    #[arg(long, env = "RAYTRACE_VIS_PORT", default_value_t = RAYTRACE_PORT)]
    pub port: u16,

    /// Image height in pixels; the width follows the field of view.
    #[arg(long, env = "RAYTRACE_VIS_SIZE", default_value_t = 256,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub size: u16,

    /// Serve Prometheus metrics on this address.
    #[arg(long, env = "RAYTRACE_VIS_METRICS_LISTEN_ADDR")]
    pub metrics_listen_addr: Option<SocketAddr>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["raytrace_visualiser"]).unwrap();
        assert_eq!(cli.port, 17894);
        assert_eq!(cli.size, 256);
        assert!(cli.metrics_listen_addr.is_none());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(Cli::try_parse_from(["raytrace_visualiser", "--size", "0"]).is_err());
        let cli = Cli::try_parse_from(["raytrace_visualiser", "--size", "100"]).unwrap();
        assert_eq!(cli.size, 100);
    }
}
