use vis_core::Grid;

pub const WIN_BORDER: f32 = 110.0;
pub const WIN_HEIGHT: f32 = 700.0;
pub const WIN_WIDTH: f32 = 850.0;
pub const KEY_WIDTH: f32 = 50.0;

/// Window geometry in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub border: f32,
    saved_border: f32,
    pub plot_width: f32,
    pub print_labels: bool,
    pub fullscreen: bool,
}

impl Default for Layout {
    fn default() -> Self {
        let width = WIN_WIDTH + KEY_WIDTH;
        Self {
            width,
            height: WIN_HEIGHT,
            border: WIN_BORDER,
            saved_border: 0.0,
            plot_width: width - 2.0 * WIN_BORDER - KEY_WIDTH,
            print_labels: WIN_BORDER >= 100.0,
            fullscreen: false,
        }
    }
}

impl Layout {
    pub fn initial_size() -> (u32, u32) {
        ((WIN_WIDTH + KEY_WIDTH) as u32, WIN_HEIGHT as u32)
    }

    pub fn reshape(&mut self, width: f32, height: f32) {
        self.width = width;
        self.plot_width = width - 2.0 * self.border - KEY_WIDTH;
        if self.fullscreen {
            self.width += KEY_WIDTH;
            self.plot_width = self.width - KEY_WIDTH;
        }
        if self.width < 2.0 * self.border + KEY_WIDTH {
            self.width = 2.0 * self.border + KEY_WIDTH;
            self.plot_width = 0.0;
        }
        self.height = height;
        self.print_labels = !(self.plot_width <= 1.0 || height - 2.0 * self.border <= 1.0);
    }

    /// Full screen drops the border and hands the key's width to the plot.
    pub fn toggle_fullscreen(&mut self) {
        if self.fullscreen {
            self.border = self.saved_border;
            self.width -= KEY_WIDTH;
            self.plot_width = self.width - 2.0 * self.border - KEY_WIDTH;
        } else {
            self.saved_border = self.border;
            self.border = 0.0;
            self.width += KEY_WIDTH;
            self.plot_width = self.width - KEY_WIDTH;
        }
        self.fullscreen = !self.fullscreen;
    }

    /// Size of one grid cell on screen.
    pub fn cell_size(&self, grid: &Grid) -> (f32, f32) {
        let xsize = (self.plot_width / grid.xdim as f32).max(1.0);
        let ysize = (self.height - 2.0 * self.border) / grid.ydim as f32;
        (xsize, ysize)
    }
}
