use std::{fs, path::Path};

use sdp::FixedPoint;
use serde::Deserialize;

use crate::{
    error::{ConfigSource, Error, Result},
    grid::Grid,
};

/// Default UDP port for heat-map telemetry.
pub const HEAT_PORT: u16 = 17894;
/// Default UDP port for path-tracer pixels.
pub const RAYTRACE_PORT: u16 = 17894;

/// Visualiser parameters, usually read from `visparam.json`.
///
/// Every key is optional and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub title: String,
    pub dimensions: [usize; 2],
    pub chip_size: [usize; 2],
    /// Derived from `dimensions / chip_size` when absent.
    pub num_chips: Option<[usize; 2]>,
    pub history_size: usize,
    pub max_frame_rate: f64,
    pub sdp_port: u16,
    #[serde(alias = "fixed_point")]
    pub fixed_point_digits: u32,
    pub alter_step_size: f32,
    /// Seconds of history spanned by the plot width.
    pub time_window: f64,
    pub high_water: f32,
    pub low_water: f32,
    /// Chips addressed by control commands.
    pub control_chips: Vec<usize>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            title: "NO SIMULATION TITLE SUPPLIED".into(),
            dimensions: [32, 32],
            chip_size: [4, 4],
            num_chips: None,
            history_size: 3500,
            max_frame_rate: 25.0,
            sdp_port: HEAT_PORT,
            fixed_point_digits: 16,
            alter_step_size: 1.0,
            time_window: 3.5,
            high_water: 10.0,
            low_water: 0.0,
            control_chips: vec![1],
        }
    }
}

impl VisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let err = |source: ConfigSource| Error::ConfigLoad {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path).map_err(|e| err(e.into()))?;
        let config = Self::from_json(&text).map_err(|e| err(e.into()))?;
        config.validate().map_err(|msg| err(ConfigSource::Invalid(msg)))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let grid = self.grid();
        if grid.xdim == 0 || grid.ydim == 0 {
            return Err(format!("dimensions must be non-zero, got {:?}", self.dimensions));
        }
        if grid.each_x == 0 || grid.each_y == 0 {
            return Err(format!("chip_size must be non-zero, got {:?}", self.chip_size));
        }
        if grid.x_chips == 0 || grid.y_chips == 0 {
            return Err(format!(
                "grid of {:?} holds no chips of size {:?}",
                self.dimensions, self.chip_size
            ));
        }
        if self.history_size == 0 {
            return Err("history_size must be non-zero".into());
        }
        if self.max_frame_rate <= 0.0 {
            return Err(format!("max_frame_rate must be positive, got {}", self.max_frame_rate));
        }
        if self.time_window <= 0.0 {
            return Err(format!("time_window must be positive, got {}", self.time_window));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        let [xdim, ydim] = self.dimensions;
        let [each_x, each_y] = self.chip_size;
        let [x_chips, y_chips] = self.num_chips.unwrap_or([
            xdim.checked_div(each_x).unwrap_or(0),
            ydim.checked_div(each_y).unwrap_or(0),
        ]);
        Grid::with_chips(xdim, ydim, each_x, each_y, x_chips, y_chips)
    }

    pub fn fixed_point(&self) -> FixedPoint {
        FixedPoint::new(self.fixed_point_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let c = VisConfig::from_json("{}").unwrap();
        assert_eq!(c, VisConfig::default());
        let g = c.grid();
        assert_eq!((g.x_chips, g.y_chips), (8, 8));
        assert_eq!(c.fixed_point().factor(), 1.0 / 65536.0);
    }

    #[test]
    fn keys_override_and_unknown_keys_are_ignored() {
        let c = VisConfig::from_json(
            r#"{
                "title": "heat demo",
                "dimensions": [48, 48],
                "chip_size": [4, 4],
                "history_size": 700,
                "max_frame_rate": 30,
                "sdp_port": 17895,
                "fixed_point": 8,
                "alter_step_size": 0.5,
                "colour": "ignored"
            }"#,
        )
        .unwrap();
        assert_eq!(c.title, "heat demo");
        assert_eq!(c.grid().x_chips, 12);
        assert_eq!(c.history_size, 700);
        assert_eq!(c.max_frame_rate, 30.0);
        assert_eq!(c.sdp_port, 17895);
        assert_eq!(c.fixed_point_digits, 8);
        assert_eq!(c.alter_step_size, 0.5);
    }

    #[test]
    fn explicit_chip_count_wins() {
        let c = VisConfig::from_json(r#"{"num_chips": [2, 4]}"#).unwrap();
        let g = c.grid();
        assert_eq!((g.x_chips, g.y_chips), (2, 4));
    }

    #[test]
    fn zero_chip_size_is_invalid() {
        let c = VisConfig::from_json(r#"{"chip_size": [0, 4]}"#).unwrap();
        assert!(c.validate().is_err());
        let c = VisConfig::from_json(r#"{"history_size": 0}"#).unwrap();
        assert!(c.validate().is_err());
        assert!(VisConfig::default().validate().is_ok());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = std::env::temp_dir().join(format!("vis_core_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.json");
        let err = VisConfig::load(&missing).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { source: ConfigSource::Io(_), .. }));

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        let err = VisConfig::load(&bad).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { source: ConfigSource::Json(_), .. }));
        assert!(err.to_string().contains("bad.json"));

        let good = dir.join("good.json");
        fs::write(&good, r#"{"dimensions": [16, 16]}"#).unwrap();
        assert_eq!(VisConfig::load(&good).unwrap().dimensions, [16, 16]);
    }
}
