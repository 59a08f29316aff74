//! Heat-map display for the SpiNNaker heat demo: decodes per-chip temperature
//! tiles, draws them with a colour key, and sends edge temperatures and
//! pause/resume commands back to the board.

pub mod app;
pub mod cli;
pub mod controls;
pub mod display;
pub mod input;
pub mod layout;
pub mod palette;

pub use app::{HeatApp, UiState};
pub use cli::Cli;
