use std::{sync::Arc, time::Duration};

use vis_core::{Canvas, PixelAccumulator, ReceiverHandle, Rgb, SampleSink};
use vis_host::{Flow, Key, KeyState, Visualiser};

use crate::navigation::Navigation;

pub const FRAME_RATE: f64 = 10.0;
pub const VERT_FOV: f64 = 50.0;
pub const HORIZ_FOV: f64 = 60.0;

/// Image width for a given height, keeping the tracer's field-of-view ratio.
pub fn width_for(height: usize) -> usize {
    (HORIZ_FOV * height as f64 / VERT_FOV) as usize
}

pub struct RaytraceApp {
    frame: Arc<PixelAccumulator>,
    receiver: Option<ReceiverHandle>,
    nav: Navigation,
    pixels: Vec<u8>,
}

impl RaytraceApp {
    pub fn new(frame: Arc<PixelAccumulator>) -> Self {
        Self {
            frame,
            receiver: None,
            nav: Navigation::default(),
            pixels: Vec::new(),
        }
    }

    pub fn with_receiver(mut self, receiver: ReceiverHandle) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }
}

impl Visualiser for RaytraceApp {
    fn title(&self) -> String {
        "Path Tracer".into()
    }

    fn initial_size(&self) -> (u32, u32) {
        (self.frame.width() as u32, self.frame.height() as u32)
    }

    fn frame_rate(&self) -> f64 {
        FRAME_RATE
    }

    // The image keeps its native size; a smaller window shows the bottom-left.
    fn reshape(&mut self, _width: f32, _height: f32) {}

    fn render(&mut self, canvas: &mut dyn Canvas, dt: Duration) {
        self.nav.advance(dt.as_secs_f64() * 1000.0);
        canvas.clear(Rgb::WHITE);

        self.frame.take_dirty();
        self.frame.snapshot_into(&mut self.pixels);
        let (w, h) = (self.frame.width(), self.frame.height());
        canvas.image((0.0, 0.0), (w as f32, h as f32), w, h, &self.pixels);
    }

    fn on_key(&mut self, key: Key, state: KeyState) -> Flow {
        if key == Key::Escape && state == KeyState::Pressed {
            return Flow::Exit;
        }
        self.nav.key(key, state);
        Flow::Continue
    }

    fn on_exit(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            receiver.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vis_core::canvas::{DrawOp, Recorder};

    #[test]
    fn width_follows_field_of_view() {
        assert_eq!(width_for(256), 307);
        assert_eq!(width_for(50), 60);
    }

    #[test]
    fn renders_whole_frame_as_one_image() {
        let acc = Arc::new(PixelAccumulator::new(6, 5));
        acc.update(acc.index_of(0, 0).unwrap(), 1, 2, 3);
        let mut app = RaytraceApp::new(acc);
        let mut rec = Recorder::new(6.0, 5.0);
        app.render(&mut rec, Duration::from_millis(100));
        assert!(matches!(rec.ops[0], DrawOp::Clear(c) if c == Rgb::WHITE));
        assert!(rec.ops.iter().any(|op| matches!(
            op,
            DrawOp::Image { width: 6, height: 5, bytes: 90 }
        )));
    }

    #[test]
    fn escape_exits_and_keys_steer() {
        let mut app = RaytraceApp::new(Arc::new(PixelAccumulator::new(6, 5)));
        assert_eq!(app.on_key(Key::Char('w'), KeyState::Pressed), Flow::Continue);
        assert_eq!(app.navigation().motion.moving, 1);
        assert_eq!(app.on_key(Key::Escape, KeyState::Pressed), Flow::Exit);
    }
}
