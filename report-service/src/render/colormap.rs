use plotters::style::RGBColor;

/// Anchor colors of the yellow-green-blue sequential scale.
const YLGNBU: [(u8, u8, u8); 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

/// Line colors for per-source series, cycled when there are more sources.
pub const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Map `t` in `[0, 1]` onto the scale; out-of-range and NaN inputs clamp.
pub fn ylgnbu(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (YLGNBU.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(YLGNBU.len() - 2);
    let frac = scaled - idx as f64;

    let (r0, g0, b0) = YLGNBU[idx];
    let (r1, g1, b1) = YLGNBU[idx + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_clamping() {
        assert_eq!(ylgnbu(0.0), RGBColor(255, 255, 217));
        assert_eq!(ylgnbu(1.0), RGBColor(8, 29, 88));
        assert_eq!(ylgnbu(-3.0), ylgnbu(0.0));
        assert_eq!(ylgnbu(7.0), ylgnbu(1.0));
        assert_eq!(ylgnbu(f64::NAN), ylgnbu(0.0));
    }

    #[test]
    fn interpolates_between_anchors() {
        // Halfway between the first two anchors.
        assert_eq!(ylgnbu(0.0625), RGBColor(246, 252, 197));
        assert_eq!(ylgnbu(0.5), RGBColor(65, 182, 196));
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), series_color(10));
        assert_ne!(series_color(0), series_color(1));
    }
}
