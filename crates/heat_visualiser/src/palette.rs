use vis_core::Rgb;

/// Colour ramp from cold to hot.
pub const GAMUT: [Rgb; 6] = [
    Rgb::new(0.0, 0.0, 0.0),
    Rgb::new(0.0, 0.0, 1.0),
    Rgb::new(0.0, 1.0, 1.0),
    Rgb::new(0.0, 1.0, 0.0),
    Rgb::new(1.0, 1.0, 0.0),
    Rgb::new(1.0, 0.0, 0.0),
];

fn interpolate(fill: f32) -> Rgb {
    let steps = (GAMUT.len() - 1) as f32;
    let v = fill.clamp(0.0, 1.0) * steps;
    let index = (v as usize).min(GAMUT.len() - 2);
    let offset = (index + 1) as f32 - v;
    let (lo, hi) = (GAMUT[index], GAMUT[index + 1]);
    Rgb::new(
        (1.0 - offset) * hi.r + offset * lo.r,
        (1.0 - offset) * hi.g + offset * lo.g,
        (1.0 - offset) * hi.b + offset * lo.b,
    )
}

/// Colour for `value` scaled between the watermarks, plus its position on the
/// ramp in `[0, 1]`.
pub fn colour_for(value: f32, high: f32, low: f32) -> (Rgb, f32) {
    let diff = high - low;
    let fill = if diff < 0.0001 {
        1.0
    } else {
        (value.clamp(low, high) - low) / diff
    };
    (interpolate(fill), fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn ends_of_the_ramp() {
        assert!(close(colour_for(0.0, 10.0, 0.0).0, GAMUT[0]));
        assert!(close(colour_for(10.0, 10.0, 0.0).0, GAMUT[5]));
        assert!(close(colour_for(99.0, 10.0, 0.0).0, GAMUT[5]));
        assert!(close(colour_for(-5.0, 10.0, 0.0).0, GAMUT[0]));
    }

    #[test]
    fn midpoints_blend_neighbours() {
        // 0.1 is halfway between black and blue
        let (c, fill) = colour_for(1.0, 10.0, 0.0);
        assert!((fill - 0.1).abs() < 1e-6);
        assert!(close(c, Rgb::new(0.0, 0.0, 0.5)));
        // 0.6 sits exactly on green
        assert!(close(colour_for(6.0, 10.0, 0.0).0, GAMUT[3]));
    }

    #[test]
    fn flat_scale_is_hot() {
        let (c, fill) = colour_for(3.0, 5.0, 5.0);
        assert_eq!(fill, 1.0);
        assert!(close(c, GAMUT[5]));
    }
}
