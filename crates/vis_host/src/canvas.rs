use egui::{pos2, Align2, Color32, FontId, Painter, Rect, Shape, Stroke, TextureHandle, TextureOptions};
use vis_core::canvas::{Canvas, Font, Point, Rgb};

/// [`Canvas`] over an egui painter. Flips y so the origin is bottom-left.
pub struct EguiCanvas<'a> {
    painter: Painter,
    height: f32,
    width: f32,
    frame: &'a mut Option<TextureHandle>,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: Painter, frame: &'a mut Option<TextureHandle>) -> Self {
        let rect = painter.clip_rect();
        Self {
            width: rect.width(),
            height: rect.height(),
            painter,
            frame,
        }
    }

    fn pos(&self, (x, y): Point) -> egui::Pos2 {
        pos2(x, self.height - y)
    }

    fn rect(&self, a: Point, b: Point) -> Rect {
        Rect::from_two_pos(self.pos(a), self.pos(b))
    }
}

fn colour(c: Rgb) -> Color32 {
    let [r, g, b] = c.to_u8();
    Color32::from_rgb(r, g, b)
}

fn font(f: Font) -> FontId {
    match f {
        Font::Small => FontId::proportional(10.0),
        Font::Large => FontId::monospace(13.0),
    }
}

impl Canvas for EguiCanvas<'_> {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, c: Rgb) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, colour(c));
    }

    fn fill_rect(&mut self, a: Point, b: Point, c: Rgb) {
        self.painter.rect_filled(self.rect(a, b), 0.0, colour(c));
    }

    fn stroke_rect(&mut self, a: Point, b: Point, width: f32, c: Rgb) {
        self.painter
            .rect_stroke(self.rect(a, b), 0.0, Stroke::new(width, colour(c)));
    }

    fn line(&mut self, a: Point, b: Point, width: f32, c: Rgb) {
        self.painter
            .line_segment([self.pos(a), self.pos(b)], Stroke::new(width, colour(c)));
    }

    fn triangle(&mut self, pts: [Point; 3], c: Rgb) {
        let pts = pts.map(|p| self.pos(p)).to_vec();
        self.painter
            .add(Shape::convex_polygon(pts, colour(c), Stroke::NONE));
    }

    fn text(&mut self, at: Point, text: &str, f: Font, c: Rgb) {
        self.painter
            .text(self.pos(at), Align2::LEFT_BOTTOM, text, font(f), colour(c));
    }

    fn image(&mut self, origin: Point, size: Point, width: usize, height: usize, rgb: &[u8]) {
        if width == 0 || height == 0 || rgb.len() != width * height * 3 {
            return;
        }
        let image = egui::ColorImage::from_rgb([width, height], rgb);
        let reuse = matches!(self.frame.as_ref(), Some(t) if t.size() == [width, height]);
        if reuse {
            if let Some(tex) = self.frame.as_mut() {
                tex.set(image, TextureOptions::NEAREST);
            }
        } else {
            let tex = self
                .painter
                .ctx()
                .load_texture("frame", image, TextureOptions::NEAREST);
            *self.frame = Some(tex);
        }
        let Some(id) = self.frame.as_ref().map(TextureHandle::id) else {
            return;
        };
        let rect = self.rect(origin, (origin.0 + size.0, origin.1 + size.1));
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        self.painter.image(id, rect, uv, Color32::WHITE);
    }
}
