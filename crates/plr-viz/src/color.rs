//! Diverging colour scale for correlation coefficients

use plotters::style::RGBColor;

/// Cell colour for an undefined coefficient
pub const MISSING_COLOR: RGBColor = RGBColor(255, 255, 255);

const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

fn lerp(a: (f64, f64, f64), b: (f64, f64, f64), t: f64) -> RGBColor {
    let channel = |x: f64, y: f64| (x + (y - x) * t).round() as u8;
    RGBColor(channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

/// Blue-grey-red colour for a value in [-1, 1]
///
/// Values outside the range are clamped; `NaN` maps to [`MISSING_COLOR`].
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING_COLOR;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(NEUTRAL, COLD, -v)
    } else {
        lerp(NEUTRAL, WARM, v)
    }
}
