use glam::{DQuat, DVec3};
use vis_host::{Key, KeyState};

/// Forward/strafe speed in scene units per millisecond.
pub const MOVE_AMOUNT: f64 = 0.00003;
/// Turn rate in radians per millisecond.
pub const TURN_AMOUNT: f64 = 0.0000003;

/// Held-key intent; each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub moving: i8,
    pub strafing: i8,
    /// Positive turns right.
    pub turn_right: i8,
    /// Positive pitches down.
    pub turn_down: i8,
    pub rolling: i8,
}

/// Viewer pose. Local only; nothing is sent to the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    pub position: DVec3,
    pub look: DVec3,
    pub up: DVec3,
    pub motion: Motion,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            position: DVec3::new(-220.0, 50.0, 0.0),
            look: DVec3::X,
            up: DVec3::Y,
            motion: Motion::default(),
        }
    }
}

/// Rotates `v` about `axis` by `theta` and renormalises.
fn rotate(v: DVec3, axis: DVec3, theta: f64) -> DVec3 {
    let Some(axis) = axis.try_normalize() else {
        return v;
    };
    (DQuat::from_axis_angle(axis, theta) * v).normalize_or_zero()
}

impl Navigation {
    /// Updates the held-key state. Returns false for keys that do not steer.
    pub fn key(&mut self, key: Key, state: KeyState) -> bool {
        let on = state == KeyState::Pressed;
        let set = |axis: &mut i8, dir: i8| *axis = if on { dir } else { 0 };
        let m = &mut self.motion;
        match key {
            Key::Char('w') => set(&mut m.moving, 1),
            Key::Char('s') => set(&mut m.moving, -1),
            Key::Char('a') => set(&mut m.turn_right, -1),
            Key::Char('d') => set(&mut m.turn_right, 1),
            Key::Char('q') => set(&mut m.strafing, 1),
            Key::Char('e') => set(&mut m.strafing, -1),
            Key::Up => set(&mut m.turn_down, -1),
            Key::Down => set(&mut m.turn_down, 1),
            Key::Left => set(&mut m.rolling, -1),
            Key::Right => set(&mut m.rolling, 1),
            _ => return false,
        }
        true
    }

    /// Integrates the held keys over `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        let m = self.motion;
        let step = dt_ms * MOVE_AMOUNT;
        let turn = dt_ms * TURN_AMOUNT;

        if m.moving != 0 {
            self.position += self.look * step * f64::from(m.moving);
        }
        let right = self.up.cross(self.look);
        if m.strafing != 0 {
            self.position += right * step * f64::from(m.strafing);
        }
        if m.turn_right != 0 {
            self.look = rotate(self.look, self.up, turn * f64::from(m.turn_right));
        }
        if m.turn_down != 0 {
            let theta = turn * f64::from(m.turn_down);
            self.look = rotate(self.look, right, theta);
            self.up = rotate(self.up, right, theta);
        }
        if m.rolling != 0 {
            self.up = rotate(self.up, self.look, turn * f64::from(m.rolling));
        }
    }
}
