use std::{collections::HashMap, sync::Arc, time::Duration, time::Instant};

use rand::Rng;
use vis_core::{Canvas, CommandSender, HeatSink, ReceiverHandle, SendOutcome, VisConfig};
use vis_host::{Flow, Key, KeyState, MenuEntry, MouseButton, MouseEvent, Visualiser};

use crate::{
    controls::{control_box_at, editor_box_at, ControlBox, Direction, Edges},
    display::{self, HeatView},
    input::{default_bindings, menu_entries, HeatAction, MenuItem, MenuState},
    layout::Layout,
};

/// Display toggles and the edge editor.
#[derive(Debug, Clone, Copy)]
pub struct UiState {
    pub grid_lines: bool,
    pub values_in_cells: bool,
    pub edit_mode: bool,
    pub live_box: Option<Direction>,
    pub edges: Edges,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            grid_lines: true,
            values_in_cells: false,
            edit_mode: true,
            live_box: None,
            edges: Edges::default(),
        }
    }
}

pub struct HeatApp {
    sink: Arc<HeatSink>,
    sender: Arc<CommandSender>,
    receiver: Option<ReceiverHandle>,
    layout: Layout,
    ui: UiState,
    alter_step: f32,
    bindings: HashMap<char, HeatAction>,
    title: String,
    frame_rate: f64,
}

impl HeatApp {
    pub fn new(config: &VisConfig, sink: Arc<HeatSink>, sender: Arc<CommandSender>) -> Self {
        Self {
            sink,
            sender,
            receiver: None,
            layout: Layout::default(),
            ui: UiState::default(),
            alter_step: config.alter_step_size,
            bindings: default_bindings(),
            title: config.title.clone(),
            frame_rate: config.max_frame_rate,
        }
    }

    /// Keeps the receive loop alive for as long as the display runs.
    pub fn with_receiver(mut self, receiver: ReceiverHandle) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn perform(&mut self, action: HeatAction) -> Flow {
        match action {
            HeatAction::ToggleFullscreen => self.layout.toggle_fullscreen(),
            HeatAction::Clear => self.sink.clear_all(),
            HeatAction::Quit => return Flow::Exit,
            HeatAction::Pause => self.pause(),
            HeatAction::Resume => self.resume(),
            HeatAction::ToggleGrid => self.ui.grid_lines = !self.ui.grid_lines,
            HeatAction::ToggleValues => self.ui.values_in_cells = !self.ui.values_in_cells,
            HeatAction::Rotate => self.sink.update_orientation(|o| o.rotate = !o.rotate),
            HeatAction::VectorFlip => {
                self.sink.update_orientation(|o| o.vector_flip = !o.vector_flip)
            }
            HeatAction::XFlip => self.sink.update_orientation(|o| o.x_flip = !o.x_flip),
            HeatAction::YFlip => self.sink.update_orientation(|o| o.y_flip = !o.y_flip),
            HeatAction::Increase => self.alter_live(self.alter_step),
            HeatAction::Decrease => self.alter_live(-self.alter_step),
            HeatAction::Select(d) => {
                if self.ui.edit_mode {
                    self.toggle_live(d);
                }
            }
            HeatAction::EditMode => {
                if !self.ui.edit_mode {
                    self.ui.edit_mode = true;
                    self.ui.live_box = None;
                }
            }
            HeatAction::SendSet => {
                if self.ui.edit_mode {
                    self.ui.live_box = None;
                    self.send_edges();
                }
            }
            HeatAction::RandomSet => {
                let (high, low) = self.sink.watermarks();
                let mut rng = rand::thread_rng();
                let mut pick = || if low < high { rng.gen_range(low..high) } else { low };
                self.ui.edges = Edges {
                    north: pick(),
                    east: pick(),
                    south: pick(),
                    west: pick(),
                };
                self.send_edges();
            }
            HeatAction::ZeroEdges => {
                self.ui.live_box = None;
                self.ui.edges = if self.ui.edges.all_below(1.0) {
                    Edges::default()
                } else {
                    Edges::ZERO
                };
                self.send_edges();
            }
        }
        Flow::Continue
    }

    fn pause(&mut self) {
        self.report(self.sender.pause(), "pause");
        self.sink.set_frozen(true);
    }

    fn resume(&mut self) {
        self.report(self.sender.resume(), "resume");
        self.sink.set_frozen(false);
    }

    fn send_edges(&self) {
        let Edges { north, east, south, west } = self.ui.edges;
        self.report(self.sender.set(north, east, south, west), "set");
    }

    fn report(&self, result: vis_core::Result<SendOutcome>, command: &str) {
        match result {
            Ok(SendOutcome::TargetUnknown) => {
                tracing::info!(command, "board not heard from yet, command not sent")
            }
            Ok(SendOutcome::Sent) => {}
            Err(e) => tracing::warn!(command, error = %e, "failed to send control command"),
        }
    }

    fn toggle_live(&mut self, d: Direction) {
        self.ui.live_box = if self.ui.live_box == Some(d) { None } else { Some(d) };
    }

    fn alter_live(&mut self, by: f32) {
        if let Some(d) = self.ui.live_box {
            self.ui.edges.adjust(d, by);
        }
    }

    fn click(&mut self, x: f32, y: f32) -> Flow {
        if let Some(b) = control_box_at(&self.layout, x, y) {
            match b {
                ControlBox::Pause if !self.sink.is_frozen() => {
                    self.pause();
                    return Flow::Continue;
                }
                ControlBox::Resume if self.sink.is_frozen() => {
                    self.resume();
                    return Flow::Continue;
                }
                ControlBox::Quit => return Flow::Exit,
                _ => {}
            }
        }
        match editor_box_at(&self.layout, x, y) {
            Some(Direction::Centre) => {
                self.ui.live_box = None;
                if self.ui.edit_mode {
                    self.send_edges();
                } else {
                    self.ui.edit_mode = true;
                }
            }
            Some(d) => {
                if self.ui.edit_mode {
                    self.toggle_live(d);
                }
            }
            None => self.ui.live_box = None,
        }
        Flow::Continue
    }

    fn menu_state(&self) -> MenuState {
        MenuState {
            grid_lines: self.ui.grid_lines,
            values_in_cells: self.ui.values_in_cells,
            fullscreen: self.layout.fullscreen,
            frozen: self.sink.is_frozen(),
        }
    }
}

impl Visualiser for HeatApp {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn initial_size(&self) -> (u32, u32) {
        Layout::initial_size()
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn reshape(&mut self, width: f32, height: f32) {
        self.layout.reshape(width, height);
    }

    fn render(&mut self, canvas: &mut dyn Canvas, _dt: Duration) {
        let view = HeatView {
            sink: &self.sink,
            layout: &self.layout,
            ui: &self.ui,
            title: &self.title,
            indicator: self.sender.indicator(Instant::now()),
        };
        display::render(&view, canvas);
    }

    fn on_key(&mut self, key: Key, state: KeyState) -> Flow {
        let (Key::Char(c), KeyState::Pressed) = (key, state) else {
            return Flow::Continue;
        };
        match self.bindings.get(&c).copied() {
            Some(action) => self.perform(action),
            None => Flow::Continue,
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) -> Flow {
        match event {
            MouseEvent::Press { button: MouseButton::Left, x, y } => self.click(x, y),
            MouseEvent::Scroll { delta, .. } if delta > 0.0 => self.perform(HeatAction::Increase),
            MouseEvent::Scroll { delta, .. } if delta < 0.0 => self.perform(HeatAction::Decrease),
            _ => Flow::Continue,
        }
    }

    fn menu(&self) -> Vec<MenuEntry> {
        menu_entries(self.menu_state())
    }

    fn on_menu(&mut self, id: usize) -> Flow {
        match MenuItem::from_id(id) {
            Some(item) => self.perform(item.action()),
            None => Flow::Continue,
        }
    }

    fn fullscreen(&self) -> bool {
        self.layout.fullscreen
    }

    fn on_exit(&mut self) {
        match self.sender.stop_once() {
            Ok(Some(outcome)) => tracing::info!(?outcome, "sent stop to control chips"),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to send stop"),
        }
        if let Some(receiver) = self.receiver.take() {
            receiver.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vis_core::BoardLink;

    fn app() -> HeatApp {
        let config = VisConfig {
            dimensions: [8, 8],
            alter_step_size: 2.5,
            ..VisConfig::default()
        };
        let sink = Arc::new(HeatSink::new(&config, 630, Instant::now()));
        let sender = Arc::new(CommandSender::new(Arc::new(BoardLink::new(None)), 2, vec![1]));
        HeatApp::new(&config, sink, sender)
    }

    fn press(app: &mut HeatApp, c: char) -> Flow {
        app.on_key(Key::Char(c), KeyState::Pressed)
    }

    #[test]
    fn quit_key_exits() {
        let mut a = app();
        assert_eq!(press(&mut a, 'q'), Flow::Exit);
        assert_eq!(a.on_key(Key::Char('q'), KeyState::Released), Flow::Continue);
    }

    #[test]
    fn pause_and_resume_freeze_the_sink() {
        let mut a = app();
        press(&mut a, '"');
        assert!(a.sink.is_frozen());
        assert_eq!(a.sender.indicator(Instant::now()), Some(SendOutcome::TargetUnknown));
        press(&mut a, 'p');
        assert!(!a.sink.is_frozen());
    }

    #[test]
    fn selection_toggles_and_adjusts_one_edge() {
        let mut a = app();
        press(&mut a, 'n');
        assert_eq!(a.ui().live_box, Some(Direction::North));
        press(&mut a, '+');
        assert_eq!(a.ui().edges.north, 42.5);
        a.on_mouse(MouseEvent::Scroll { delta: -1.0, x: 0.0, y: 0.0 });
        a.on_mouse(MouseEvent::Scroll { delta: -1.0, x: 0.0, y: 0.0 });
        assert_eq!(a.ui().edges.north, 37.5);
        assert_eq!(a.ui().edges.east, 10.0);
        press(&mut a, 'n');
        assert_eq!(a.ui().live_box, None);
        press(&mut a, '+');
        assert_eq!(a.ui().edges.north, 37.5);
    }

    #[test]
    fn zero_key_alternates_between_zero_and_defaults() {
        let mut a = app();
        press(&mut a, '0');
        assert_eq!(a.ui().edges, Edges::ZERO);
        press(&mut a, '0');
        assert_eq!(a.ui().edges, Edges::default());
    }

    #[test]
    fn random_set_stays_within_watermarks() {
        let mut a = app();
        press(&mut a, '9');
        let (high, low) = a.sink.watermarks();
        for d in [Direction::North, Direction::East, Direction::South, Direction::West] {
            let v = a.ui().edges.get(d).unwrap();
            assert!((low..high).contains(&v), "{v}");
        }
    }

    #[test]
    fn orientation_keys_toggle() {
        let mut a = app();
        press(&mut a, 'x');
        press(&mut a, 'd');
        let o = a.sink.orientation();
        assert!(o.x_flip && o.rotate && !o.y_flip && !o.vector_flip);
        press(&mut a, 'c');
        assert!(!a.sink.orientation().any());
    }

    #[test]
    fn clicks_on_editor_and_grey_space() {
        let mut a = app();
        let l = *a.layout();
        let (x, y) = crate::controls::editor_origin(&l, Direction::West);
        a.on_mouse(MouseEvent::Press { button: MouseButton::Left, x: x + 1.0, y: y + 1.0 });
        assert_eq!(a.ui().live_box, Some(Direction::West));
        a.on_mouse(MouseEvent::Press { button: MouseButton::Left, x: 300.0, y: 300.0 });
        assert_eq!(a.ui().live_box, None);
    }

    #[test]
    fn quit_box_exits_and_pause_box_freezes() {
        let mut a = app();
        let l = *a.layout();
        let (x, y) = crate::controls::control_origin(&l, ControlBox::Pause);
        let left = MouseButton::Left;
        a.on_mouse(MouseEvent::Press { button: left, x: x + 1.0, y: y + 1.0 });
        assert!(a.sink.is_frozen());
        let (x, y) = crate::controls::control_origin(&l, ControlBox::Quit);
        assert_eq!(
            a.on_mouse(MouseEvent::Press { button: left, x: x + 1.0, y: y + 1.0 }),
            Flow::Exit
        );
    }

    #[test]
    fn menu_reflects_state_and_dispatches() {
        let mut a = app();
        assert!(a.menu().iter().any(|e| e.label == "(\") Pause Plot"));
        a.on_menu(MenuItem::Pause as usize);
        assert!(a.menu().iter().any(|e| e.label == "(P)lay / Restart Plot"));
        assert_eq!(a.on_menu(MenuItem::Quit as usize), Flow::Exit);
        assert_eq!(a.on_menu(999), Flow::Continue);
    }

    #[test]
    fn fullscreen_toggle_is_reported_to_the_host() {
        let mut a = app();
        press(&mut a, 'f');
        assert!(a.fullscreen());
        press(&mut a, 'f');
        assert!(!a.fullscreen());
    }
}
