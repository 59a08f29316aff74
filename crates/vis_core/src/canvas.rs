//! Immediate-mode drawing surface used by the render steps.
//!
//! Coordinates are in window pixels with the origin at the bottom-left and y
//! growing upwards.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 0.6, 0.0);
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);
    pub const GREY: Rgb = Rgb::new(0.8, 0.8, 0.8);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Large,
}

pub type Point = (f32, f32);

pub trait Canvas {
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, colour: Rgb);
    /// Axis-aligned box between two corners.
    fn fill_rect(&mut self, a: Point, b: Point, colour: Rgb);
    fn stroke_rect(&mut self, a: Point, b: Point, width: f32, colour: Rgb);
    fn line(&mut self, a: Point, b: Point, width: f32, colour: Rgb);
    fn triangle(&mut self, pts: [Point; 3], colour: Rgb);
    /// Text with its baseline-left corner at `at`.
    fn text(&mut self, at: Point, text: &str, font: Font, colour: Rgb);
    /// Packed RGB image, top row first, stretched over `(origin, origin + size)`.
    fn image(&mut self, origin: Point, size: Point, width: usize, height: usize, rgb: &[u8]);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rgb),
    FillRect(Point, Point, Rgb),
    StrokeRect(Point, Point, Rgb),
    Line(Point, Point, Rgb),
    Triangle([Point; 3], Rgb),
    Text(Point, String, Rgb),
    Image { width: usize, height: usize, bytes: usize },
}

/// Canvas that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(_, s, _) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (Point, Point, Rgb)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::FillRect(a, b, c) => Some((a, b, c)),
            _ => None,
        })
    }
}

impl Canvas for Recorder {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, colour: Rgb) {
        self.ops.push(DrawOp::Clear(colour));
    }

    fn fill_rect(&mut self, a: Point, b: Point, colour: Rgb) {
        self.ops.push(DrawOp::FillRect(a, b, colour));
    }

    fn stroke_rect(&mut self, a: Point, b: Point, _width: f32, colour: Rgb) {
        self.ops.push(DrawOp::StrokeRect(a, b, colour));
    }

    fn line(&mut self, a: Point, b: Point, _width: f32, colour: Rgb) {
        self.ops.push(DrawOp::Line(a, b, colour));
    }

    fn triangle(&mut self, pts: [Point; 3], colour: Rgb) {
        self.ops.push(DrawOp::Triangle(pts, colour));
    }

    fn text(&mut self, at: Point, text: &str, _font: Font, colour: Rgb) {
        self.ops.push(DrawOp::Text(at, text.to_owned(), colour));
    }

    fn image(&mut self, _origin: Point, _size: Point, width: usize, height: usize, rgb: &[u8]) {
        self.ops.push(DrawOp::Image {
            width,
            height,
            bytes: rgb.len(),
        });
    }
}
