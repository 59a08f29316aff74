use std::sync::Arc;

use clap::Parser;
use raytrace_visualiser::{width_for, Cli, RaytraceApp};
use tracing_subscriber::{fmt, EnvFilter};
use vis_core::{bind_listener, BoardLink, PacketRouter, PixelAccumulator, ReceiverMetrics};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let height = usize::from(cli.size);
    let width = width_for(height);
    tracing::info!(port = cli.port, width, height, "path tracer display starting");

    let frame = Arc::new(PixelAccumulator::new(width, height));
    let metrics = ReceiverMetrics::new("raytrace_visualiser")?;
    // The tracer is never sent commands, so its address is only recorded.
    let board = Arc::new(BoardLink::new(None));
    let router = PacketRouter::new(frame.clone(), board, metrics);
    let socket = bind_listener(cli.port)?;
    let receiver = vis_core::spawn(socket, router, cli.metrics_listen_addr)?;

    vis_host::run(RaytraceApp::new(frame).with_receiver(receiver))?;
    Ok(())
}
