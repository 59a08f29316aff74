//! Progressive display for the SpiNNaker path tracer: each pixel shows the
//! running mean of every sample received for it.

pub mod app;
pub mod cli;
pub mod navigation;

pub use app::{width_for, RaytraceApp};
pub use cli::Cli;
