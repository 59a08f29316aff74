use std::{sync::Arc, time::Instant};

use anyhow::Context;
use clap::Parser;
use heat_visualiser::{layout::Layout, Cli, HeatApp};
use tracing_subscriber::{fmt, EnvFilter};
use vis_core::{
    bind_listener, BoardLink, CommandSender, HeatSink, PacketRouter, ReceiverMetrics, VisConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Initialization ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let config = VisConfig::load(&cli.config)
        .with_context(|| format!("loading parameters from {}", cli.config.display()))?;
    tracing::info!(config = ?config, "heat visualiser starting");

    let metrics = ReceiverMetrics::new("heat_visualiser").context("registering metrics")?;
    let plot_width = Layout::default().plot_width as usize;
    let sink = Arc::new(HeatSink::new(&config, plot_width, Instant::now()));
    let board = Arc::new(BoardLink::new(cli.board_ip));

    // --- 2. Start Receiver ---
    let router = PacketRouter::new(sink.clone(), board.clone(), metrics.clone());
    let socket = bind_listener(config.sdp_port)?;
    let receiver = vis_core::spawn(socket, router, cli.metrics_listen_addr)?;

    // --- 3. Run Display ---
    let grid = config.grid();
    let sender = CommandSender::new(board, grid.x_chips, config.control_chips.clone())
        .with_counter(metrics.commands_sent.clone());
    let app = HeatApp::new(&config, sink, Arc::new(sender)).with_receiver(receiver);
    vis_host::run(app)?;

    tracing::info!("heat visualiser exited");
    Ok(())
}
