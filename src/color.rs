use palette::{Hsl, IntoColor, Srgb};

use crate::chart::model::Rgb;

// ---------------------------------------------------------------------------
// Axis colour families
// ---------------------------------------------------------------------------

/// Left axis (gain-like quantities).
pub const GAIN_BLUE: Rgb = Rgb(31, 119, 180);
/// Right axis (rates and per-trigger values).
pub const RATE_ORANGE: Rgb = Rgb(255, 127, 14);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// The first hue sits on the gain blue so a group's first series still reads
/// as belonging to the left axis family.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    let start = 205.0;
    (0..n)
        .map(|i| {
            let hue = (start + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}
