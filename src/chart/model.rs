//! Backend-neutral description of a dual-axis chart.
//!
//! Nothing in here knows about egui or plotters; the interactive viewer and
//! the PNG renderer both read the same [`Chart`].

use std::fmt;

// ---------------------------------------------------------------------------
// Style descriptors
// ---------------------------------------------------------------------------

/// Which y-axis a series is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Plain sRGB colour, converted to `Color32` / `RGBColor` by the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(128, 128, 128);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::GRAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub pattern: Pattern,
    pub width: f32,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        SeriesStyle {
            color: Rgb::default(),
            pattern: Pattern::Solid,
            width: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Series – one plotted line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub side: Side,
    /// Position within its axis group (0-based). Drives palette assignment.
    pub order: usize,
    /// Left at the default until the chart is composed.
    pub style: SeriesStyle,
}

impl Series {
    /// Contiguous runs of finite `(x, y)` points. A `NaN` in either column
    /// breaks the line.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.x.iter().zip(&self.y) {
            if x.is_finite() && y.is_finite() {
                current.push((x, y));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Closed numeric interval shown on an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Fraction of the data extent added on each side.
    pub const MARGIN: f64 = 0.05;

    /// Padded extent of all finite values, or `None` when there are none.
    pub fn covering<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let (lo, hi) = values
            .into_iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            return None;
        }
        let span = hi - lo;
        let pad = if span.abs() < 1e-12 {
            0.5
        } else {
            span * Self::MARGIN
        };
        Some(AxisRange {
            min: lo - pad,
            max: hi + pad,
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Linearly map `value` from this range onto `other`.
    pub fn map_to(&self, other: &AxisRange, value: f64) -> f64 {
        other.min + (value - self.min) / self.span() * other.span()
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        AxisRange { min: 0.0, max: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XAxis {
    pub title: String,
    pub range: AxisRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YAxis {
    pub title: String,
    /// Colour of the axis title and tick labels.
    pub color: Rgb,
    pub range: AxisRange,
    pub series: Vec<Series>,
}

// ---------------------------------------------------------------------------
// Legend and overlays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperLeft,
    CenterLeft,
    CenterRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendBlock {
    pub title: Option<String>,
    pub corner: Corner,
    pub entries: Vec<LegendEntry>,
}

/// A callout box connected to a data point by an arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The data point the arrow points at, in `side` coordinates.
    pub anchor: (f64, f64),
    /// Where the text box is placed, same coordinates as `anchor`.
    pub text_at: (f64, f64),
    pub text: String,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub pattern: Pattern,
    /// Opacity of the grid lines, 0..=1.
    pub alpha: f64,
    /// Minor lines between consecutive major ticks.
    pub minor_per_major: usize,
}

impl Default for GridStyle {
    fn default() -> Self {
        GridStyle {
            pattern: Pattern::Dashed,
            alpha: 0.5,
            minor_per_major: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_axis: XAxis,
    pub left: YAxis,
    pub right: YAxis,
    pub legend: Vec<LegendBlock>,
    pub annotations: Vec<Annotation>,
    pub grid: GridStyle,
}

impl Chart {
    /// Convert a y-value measured on `side` into left-axis coordinates.
    ///
    /// Both backends draw every series in the left axis' coordinate system
    /// and only label the right axis with the inverse mapping.
    pub fn to_left(&self, side: Side, y: f64) -> f64 {
        match side {
            Side::Left => y,
            Side::Right => self.right.range.map_to(&self.left.range, y),
        }
    }

    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.left.series.iter().chain(self.right.series.iter())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(x: Vec<f64>, y: Vec<f64>) -> Series {
        Series {
            label: "s".into(),
            x,
            y,
            side: Side::Left,
            order: 0,
            style: SeriesStyle::default(),
        }
    }

    #[test]
    fn range_pads_five_percent_each_side() {
        let r = AxisRange::covering(&[0.0, 10.0, f64::NAN]).unwrap();
        assert!((r.min + 0.5).abs() < 1e-12);
        assert!((r.max - 10.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let r = AxisRange::covering(&[2.0, 2.0]).unwrap();
        assert_eq!((r.min, r.max), (1.5, 2.5));
        assert!(AxisRange::covering(&[f64::NAN]).is_none());
    }

    #[test]
    fn map_to_is_affine_between_ranges() {
        let right = AxisRange { min: 0.0, max: 0.1 };
        let left = AxisRange { min: -2.0, max: 8.0 };
        assert!((right.map_to(&left, 0.05) - 3.0).abs() < 1e-12);
        assert!((left.map_to(&right, right.map_to(&left, 0.07)) - 0.07).abs() < 1e-12);
    }

    #[test]
    fn segments_split_at_missing_values() {
        let s = series(vec![1.0, 2.0, 3.0, 4.0], vec![0.1, f64::NAN, 0.3, 0.4]);
        assert_eq!(s.segments(), vec![vec![(1.0, 0.1)], vec![(3.0, 0.3), (4.0, 0.4)]]);
    }
}
