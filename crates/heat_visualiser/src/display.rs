//! Per-frame heat-map drawing.

use vis_core::{
    heat::{is_defined, HeatSink},
    Canvas, Font, Rgb, SampleSink, SendOutcome,
};

use crate::{
    app::UiState,
    controls::{control_origin, editor_origin, ControlBox, Direction, BOX_SIZE, CONTROL_GAP, GAP},
    layout::{Layout, KEY_WIDTH},
    palette::colour_for,
};

const CROSS_WIDTH: f32 = 6.0;

/// Everything one frame reads.
pub struct HeatView<'a> {
    pub sink: &'a HeatSink,
    pub layout: &'a Layout,
    pub ui: &'a UiState,
    pub title: &'a str,
    pub indicator: Option<SendOutcome>,
}

/// Draws a frame and consumes the sink's dirty flag. Returns whether new data
/// had arrived since the previous frame.
pub fn render(view: &HeatView<'_>, canvas: &mut dyn Canvas) -> bool {
    let HeatView { sink, layout, ui, .. } = *view;
    canvas.clear(Rgb::GREY);

    if layout.print_labels && !layout.fullscreen {
        titles_and_labels(view, canvas);
    }

    let grid = sink.grid();
    let (high, low) = sink.watermarks();
    let orientation = sink.orientation();
    let (xsize, ysize) = layout.cell_size(grid);
    let tile_ratio = xsize / ysize;

    for i in 0..grid.cells() {
        let Some(src) = grid.transform(i, orientation) else {
            continue;
        };
        let Some(value) = sink.value(src).filter(|v| is_defined(*v)) else {
            continue;
        };
        let (x, y) = grid.index_to_coord(i);
        let (colour, magnitude) = colour_for(value, high, low);

        if !layout.fullscreen {
            let my = ((layout.border - 6.0 * GAP) / grid.ydim as f32).max(1.0);
            let mx = (my * tile_ratio).max(1.0);
            let o = 2.0 * GAP;
            canvas.fill_rect(
                (o + x as f32 * mx, o + y as f32 * my),
                (o + (x + 1) as f32 * mx, o + (y + 1) as f32 * my),
                colour,
            );
        }

        let b = layout.border;
        canvas.fill_rect(
            (b + x as f32 * xsize, b + y as f32 * ysize),
            (b + (x + 1) as f32 * xsize, b + (y + 1) as f32 * ysize),
            colour,
        );
        if ui.values_in_cells && xsize > 8.0 {
            let ink = if magnitude <= 0.6 { Rgb::WHITE } else { Rgb::BLACK };
            canvas.text(
                (b - 20.0 + (x as f32 + 0.5) * xsize, b - 6.0 + (y as f32 + 0.5) * ysize),
                &format!("{value:.2}"),
                Font::Small,
                ink,
            );
        }
    }

    if ui.grid_lines {
        grid_lines(layout, grid.xdim, grid.ydim, xsize, ysize, canvas);
    }
    if !layout.fullscreen {
        key(layout, high, low, canvas);
        controls(layout, sink.is_frozen(), canvas);
        if let Some(outcome) = view.indicator {
            indicator(layout, outcome, canvas);
        }
        editor(layout, ui, canvas);
    }

    sink.take_dirty()
}

fn titles_and_labels(view: &HeatView<'_>, canvas: &mut dyn Canvas) {
    let l = view.layout;
    let grid = view.sink.grid();
    canvas.text((l.width / 2.0 - 200.0, l.height - 50.0), view.title, Font::Large, Rgb::BLACK);
    canvas.text(
        (l.width / 2.0 - 250.0, l.height - 80.0),
        "Menu: right click.",
        Font::Small,
        Rgb::BLACK,
    );

    canvas.text((l.width / 2.0 - 25.0, 20.0), "X Coord", Font::Small, Rgb::BLACK);
    let delta = l.plot_width / grid.xdim as f32;
    let mut spacing = 24.0;
    let mut last = -100.0;
    for i in 0..grid.xdim {
        if i > 100 {
            spacing = 32.0;
        }
        let at = i as f32 * delta + l.border + ((delta - 8.0) / 2.0).floor() - 3.0;
        if at > last + spacing {
            canvas.text((at, 60.0), &i.to_string(), Font::Large, Rgb::BLACK);
            last = at;
        }
    }

    canvas.text((25.0, l.height / 2.0 - 50.0), "Y Coord", Font::Small, Rgb::BLACK);
    let delta = (l.height - 2.0 * l.border) / grid.ydim as f32;
    let mut last = -100.0;
    for i in 0..grid.ydim {
        let at = i as f32 * delta + l.border + ((delta - 18.0) / 2.0).floor() + 2.0;
        if at > last + 16.0 {
            canvas.text((60.0, at), &i.to_string(), Font::Large, Rgb::BLACK);
            last = at;
        }
    }
}

fn grid_lines(l: &Layout, xdim: usize, ydim: usize, xsize: f32, ysize: f32, canvas: &mut dyn Canvas) {
    // skip when the lines would hide the data
    if xsize > 3.0 {
        for x in 0..xdim {
            let px = l.border + x as f32 * xsize;
            canvas.line((px, l.border), (px, l.height - l.border), 1.0, Rgb::GREY);
        }
    }
    if ysize > 3.0 {
        for y in 0..ydim {
            let py = l.border + y as f32 * ysize;
            canvas.line((l.border, py), (l.width - l.border - KEY_WIDTH, py), 1.0, Rgb::GREY);
        }
    }
}

/// Tick spacing for a key spanning `difference`.
pub fn key_interval(difference: f32) -> f32 {
    let mut interval = 1.0;
    let mut i = 10000.0f32;
    while i >= 0.1 {
        if difference < i {
            interval = i / if difference < i / 2.0 { 20.0 } else { 10.0 };
        }
        i /= 10.0;
    }
    interval
}

fn key(l: &Layout, high: f32, low: f32, canvas: &mut dyn Canvas) {
    let base = l.border + 0.20 * (l.height - l.border);
    let top = l.height - l.border;
    let (right, left) = (l.width - 65.0, l.width - 65.0 - KEY_WIDTH);
    canvas.text((l.width - 55.0, top - 5.0), &format!("{high:.2}"), Font::Small, Rgb::BLACK);
    canvas.text((l.width - 55.0, base - 5.0), &format!("{low:.2}"), Font::Small, Rgb::BLACK);

    let span = top - base;
    if span <= 0.0 {
        return;
    }
    let interval = key_interval(high - low);
    let chunk = if high > low { span / (high - low) } else { 0.0 };
    let mut printed = 1.0;
    for i in 0..span as usize {
        let y = base + i as f32;
        let temperature = if chunk > 0.0 { i as f32 / chunk + low } else { 1.0 };
        canvas.line((right, y), (left, y), 1.0, colour_for(temperature, high, low).0);

        if temperature - low >= interval * printed {
            canvas.line((right, y), (right - 10.0, y), 4.0, Rgb::BLACK);
            canvas.line((left + 10.0, y), (left, y), 4.0, Rgb::BLACK);
            canvas.text(
                (l.width - 55.0, y - 5.0),
                &format!("{:.2}", low + printed * interval),
                Font::Small,
                Rgb::BLACK,
            );
            printed += 1.0;
        }
    }
    canvas.stroke_rect((left, base), (right, top), 2.0, Rgb::BLACK);
}

fn controls(l: &Layout, frozen: bool, canvas: &mut dyn Canvas) {
    let g = CONTROL_GAP;
    let s = BOX_SIZE;
    for b in [ControlBox::Pause, ControlBox::Resume, ControlBox::Quit] {
        let shown = match b {
            ControlBox::Pause => !frozen,
            ControlBox::Resume => frozen,
            ControlBox::Quit => true,
        };
        if !shown {
            continue;
        }
        let (x, y) = control_origin(l, b);
        canvas.fill_rect((x, y + s), (x + s, y), Rgb::BLACK);
        match b {
            ControlBox::Pause => {
                let bar = ((s + g) / 2.0).floor() - g;
                canvas.fill_rect((x + g, y + s - g), (x + bar, y + g), Rgb::RED);
                let start = ((s - g) / 2.0).floor() + g;
                canvas.fill_rect((x + start, y + s - g), (x + s - g, y + g), Rgb::RED);
            }
            ControlBox::Resume => canvas.triangle(
                [(x + g, y + s - g), (x + s - g, y + s / 2.0), (x + g, y + g)],
                Rgb::RED,
            ),
            ControlBox::Quit => {
                canvas.line((x + g, y + s - g), (x + s - g, y + g), CROSS_WIDTH, Rgb::RED);
                canvas.line((x + s - g, y + s - g), (x + g, y + g), CROSS_WIDTH, Rgb::RED);
            }
        }
    }
}

fn indicator(l: &Layout, outcome: SendOutcome, canvas: &mut dyn Canvas) {
    let x = l.width - 3.0 * (BOX_SIZE + GAP);
    let y = l.height - GAP - BOX_SIZE - 25.0;
    match outcome {
        SendOutcome::Sent => canvas.text((x + 5.0, y), "Packet Sent", Font::Large, Rgb::BLACK),
        SendOutcome::TargetUnknown => {
            canvas.text((x - 5.0, y), "Target Unknown", Font::Large, Rgb::BLACK)
        }
    }
}

fn editor(l: &Layout, ui: &UiState, canvas: &mut dyn Canvas) {
    for d in Direction::ALL {
        let (x, y) = editor_origin(l, d);
        let live = ui.live_box == Some(d);
        let fill = if d == Direction::Centre && ui.edit_mode {
            Rgb::GREEN
        } else if live {
            Rgb::CYAN
        } else {
            Rgb::BLACK
        };
        if ui.edit_mode || d == Direction::Centre {
            canvas.fill_rect((x, y + BOX_SIZE), (x + BOX_SIZE, y), fill);
        }
        let label_at = (x, y + BOX_SIZE / 2.0 - 5.0);
        match ui.edges.get(d) {
            None => {
                let label = if ui.edit_mode { " Go!" } else { "Alter" };
                canvas.text(label_at, label, Font::Large, Rgb::WHITE);
            }
            Some(v) => {
                let ink = if ui.edit_mode && !live { Rgb::WHITE } else { Rgb::BLACK };
                canvas.text(label_at, &format!("{v:.1}"), Font::Large, ink);
            }
        }
    }
}
