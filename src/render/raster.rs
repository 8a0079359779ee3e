//! PNG export of a [`Chart`] through Plotters.
//!
//! Plotters draws into an `image::RgbImage`; `png` encodes it together with
//! the physical resolution (pHYs chunk). All sizes are specified in typographic points and scaled by the DPI, so a
//! 12 x 7 inch canvas at 300 DPI becomes a 3600 x 2100 pixel image.

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;

use image::RgbImage;

use plotters::coord::Shift;
use plotters::coord::ranged1d::Ranged;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::chart::grid::minor_ticks;
use crate::chart::model::{Annotation, Chart, Corner, LegendBlock, Pattern, Rgb};
use crate::error::RenderError;

const X_LABELS: usize = 10;
const Y_LABELS: usize = 10;
const FONT: &str = "sans-serif";

type DrawResult<T, DB> = Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

// ---------------------------------------------------------------------------
// Canvas settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        RasterSettings {
            width_in: 12.0,
            height_in: 7.0,
            dpi: 300,
        }
    }
}

impl RasterSettings {
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Typographic points to pixels.
    pub fn px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    fn px_u32(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    fn px_i32(&self, points: f64) -> i32 {
        self.px(points).round() as i32
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render `chart` and write it to `path` as PNG.
pub fn save_png(chart: &Chart, path: &Path, settings: &RasterSettings) -> Result<(), RenderError> {
    let (width, height) = settings.pixel_size();
    let mut image = RgbImage::new(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut image, (width, height)).into_drawing_area();
        draw_chart(&root, chart, settings).map_err(|e| RenderError::Draw(e.to_string()))?;
        root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
    }

    write_png(&image, path, settings.dpi).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Saved '{}' ({width}x{height} px, {} dpi)",
        path.display(),
        settings.dpi
    );
    Ok(())
}

/// Encode `image` as 8-bit RGB PNG, recording `dpi` in the pHYs chunk.
fn write_png(image: &RgbImage, path: &Path, dpi: u32) -> Result<(), png::EncodingError> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(pixel_dims(dpi)));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()
}

/// PNG stores resolution in pixels per metre.
fn pixel_dims(dpi: u32) -> png::PixelDimensions {
    let per_metre = (f64::from(dpi) / 0.0254).round() as u32;
    png::PixelDimensions {
        xppu: per_metre,
        yppu: per_metre,
        unit: png::Unit::Meter,
    }
}

/// Draw the whole chart onto any Plotters backend.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    s: &RasterSettings,
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;

    let x = chart.x_axis.range;
    let left = chart.left.range;
    let right = chart.right.range;

    let mut cc = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, s.px(16.0)))
        .margin(s.px_u32(8.0))
        .x_label_area_size(s.px_u32(36.0))
        .y_label_area_size(s.px_u32(56.0))
        .right_y_label_area_size(s.px_u32(56.0))
        .build_cartesian_2d(x.min..x.max, left.min..left.max)?
        .set_secondary_coord(x.min..x.max, right.min..right.max);

    let left_color = to_plotters(chart.left.color);
    let right_color = to_plotters(chart.right.color);

    cc.configure_mesh()
        .disable_mesh()
        .x_desc(chart.x_axis.title.as_str())
        .y_desc(chart.left.title.as_str())
        .x_labels(X_LABELS)
        .y_labels(Y_LABELS)
        .label_style((FONT, s.px(10.0)))
        .y_label_style((FONT, s.px(10.0)).into_font().color(&left_color))
        .axis_desc_style((FONT, s.px(12.0)))
        .draw()?;

    cc.configure_secondary_axes()
        .y_desc(chart.right.title.as_str())
        .y_labels(Y_LABELS)
        .label_style((FONT, s.px(10.0)).into_font().color(&right_color))
        .axis_desc_style((FONT, s.px(12.0)))
        .draw()?;

    // Grid first so every series is drawn over it.
    let x_major = cc.as_coord_spec().x_spec().key_points(X_LABELS);
    let y_major = cc.as_coord_spec().y_spec().key_points(Y_LABELS);
    let x_minor = minor_ticks(&x_major, &x, chart.grid.minor_per_major);
    let y_minor = minor_ticks(&y_major, &left, chart.grid.minor_per_major);

    let major_style = BLACK.mix(chart.grid.alpha * 0.5).stroke_width(s.px_u32(0.6));
    let minor_style = BLACK.mix(chart.grid.alpha * 0.25).stroke_width(s.px_u32(0.4));
    let (dash, gap) = (s.px_u32(3.0), s.px_u32(2.0));

    for (ticks, style) in [(&x_major, major_style), (&x_minor, minor_style)] {
        for &gx in ticks {
            cc.draw_series(DashedLineSeries::new(
                vec![(gx, left.min), (gx, left.max)],
                dash,
                gap,
                style,
            ))?;
        }
    }
    for (ticks, style) in [(&y_major, major_style), (&y_minor, minor_style)] {
        for &gy in ticks {
            cc.draw_series(DashedLineSeries::new(
                vec![(x.min, gy), (x.max, gy)],
                dash,
                gap,
                style,
            ))?;
        }
    }

    for series in chart.series() {
        let width = s.px_u32(f64::from(series.style.width));
        let style = to_plotters(series.style.color).stroke_width(width);
        for run in series.segments() {
            let points: Vec<(f64, f64)> = run
                .into_iter()
                .map(|(px, py)| (px, chart.to_left(series.side, py)))
                .collect();
            match series.style.pattern {
                Pattern::Solid => {
                    cc.draw_series(LineSeries::new(points, style))?;
                }
                Pattern::Dashed => {
                    cc.draw_series(DashedLineSeries::new(
                        points,
                        s.px_u32(7.4),
                        s.px_u32(3.2),
                        style,
                    ))?;
                }
                Pattern::Dotted => {
                    cc.draw_series(DashedLineSeries::new(
                        points,
                        s.px_u32(2.0),
                        s.px_u32(3.3),
                        style,
                    ))?;
                }
            }
        }
    }

    for note in &chart.annotations {
        let anchor = cc.backend_coord(&(note.anchor.0, chart.to_left(note.side, note.anchor.1)));
        let text_at = cc.backend_coord(&(note.text_at.0, chart.to_left(note.side, note.text_at.1)));
        draw_callout(root, note, anchor, text_at, s)?;
    }

    let plot_px = cc.plotting_area().get_pixel_range();
    for block in &chart.legend {
        draw_legend(root, block, &plot_px, s)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Overlays (pixel space)
// ---------------------------------------------------------------------------

fn draw_callout<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    note: &Annotation,
    anchor: (i32, i32),
    text_at: (i32, i32),
    s: &RasterSettings,
) -> DrawResult<(), DB> {
    let style = (FONT, s.px(10.0)).into_font().color(&BLACK);
    let pad = s.px_i32(3.0);
    let line_h = s.px_i32(10.0 * 1.3);

    let lines: Vec<&str> = note.text.lines().collect();
    let mut text_w = 0;
    for line in &lines {
        let (w, _) = root.estimate_text_size(line, &style)?;
        text_w = text_w.max(w as i32);
    }
    let box_w = text_w + 2 * pad;
    let box_h = line_h * lines.len() as i32 + 2 * pad;
    let top_left = (text_at.0, text_at.1 - box_h / 2);
    let bottom_right = (text_at.0 + box_w, text_at.1 + box_h / 2);

    let arrow = arrow_geometry(
        (text_at.0, text_at.1),
        anchor,
        0.05,
        s.px(8.0),
        s.px(3.5),
    );
    root.draw(&PathElement::new(
        vec![arrow.start, arrow.base],
        BLACK.stroke_width(s.px_u32(1.0)),
    ))?;
    root.draw(&Polygon::new(arrow.head.to_vec(), BLACK.filled()))?;

    root.draw(&Rectangle::new([top_left, bottom_right], WHITE.mix(0.8).filled()))?;
    root.draw(&Rectangle::new(
        [top_left, bottom_right],
        BLACK.stroke_width(s.px_u32(0.8)),
    ))?;
    for (i, line) in lines.iter().enumerate() {
        let pos = (top_left.0 + pad, top_left.1 + pad + line_h * i as i32);
        root.draw(&Text::new(line.to_string(), pos, style.clone()))?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    block: &LegendBlock,
    plot_px: &(Range<i32>, Range<i32>),
    s: &RasterSettings,
) -> DrawResult<(), DB> {
    let label_style = (FONT, s.px(10.0)).into_font().color(&BLACK);
    let title_style = (FONT, s.px(10.0))
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK);
    let pad = s.px_i32(5.0);
    let row_h = s.px_i32(10.0 * 1.4);
    let swatch_w = s.px_i32(20.0);
    let swatch_gap = s.px_i32(6.0);

    let mut label_w = 0;
    for entry in &block.entries {
        let (w, _) = root.estimate_text_size(&entry.label, &label_style)?;
        label_w = label_w.max(w as i32);
    }
    let mut content_w = swatch_w + swatch_gap + label_w;
    if let Some(title) = &block.title {
        let (w, _) = root.estimate_text_size(title, &title_style)?;
        content_w = content_w.max(w as i32);
    }
    let rows = block.entries.len() as i32 + i32::from(block.title.is_some());
    let size = (content_w + 2 * pad, rows * row_h + 2 * pad);
    let (x0, y0) = legend_origin(block.corner, plot_px, size, s.px_i32(6.0));

    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + size.0, y0 + size.1)],
        WHITE.mix(0.8).filled(),
    ))?;
    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + size.0, y0 + size.1)],
        BLACK.mix(0.3).stroke_width(s.px_u32(0.8)),
    ))?;

    let mut row_top = y0 + pad;
    if let Some(title) = &block.title {
        let (w, _) = root.estimate_text_size(title, &title_style)?;
        let centered = x0 + (size.0 - w as i32) / 2;
        root.draw(&Text::new(title.clone(), (centered, row_top), title_style.clone()))?;
        row_top += row_h;
    }

    for entry in &block.entries {
        let mid = row_top + row_h / 2;
        let sx = x0 + pad;
        let stroke = to_plotters(entry.color).stroke_width(s.px_u32(2.0));
        let (dash, gap) = match entry.pattern {
            Pattern::Solid => (swatch_w, 0),
            Pattern::Dashed => (s.px_i32(5.0), s.px_i32(2.5)),
            Pattern::Dotted => (s.px_i32(1.5), s.px_i32(2.5)),
        };
        for (a, b) in swatch_dashes(sx, sx + swatch_w, dash, gap) {
            root.draw(&PathElement::new(vec![(a, mid), (b, mid)], stroke))?;
        }
        root.draw(&Text::new(
            entry.label.clone(),
            (sx + swatch_w + swatch_gap, row_top + row_h / 6),
            label_style.clone(),
        ))?;
        row_top += row_h;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

fn to_plotters(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Top-left pixel of a legend box of `size` placed in `corner` of the plot.
fn legend_origin(
    corner: Corner,
    plot_px: &(Range<i32>, Range<i32>),
    size: (i32, i32),
    margin: i32,
) -> (i32, i32) {
    let (xs, ys) = plot_px;
    let mid_y = (ys.start + ys.end) / 2;
    match corner {
        Corner::UpperLeft => (xs.start + margin, ys.start + margin),
        Corner::CenterLeft => (xs.start + margin, mid_y - size.1 / 2),
        Corner::CenterRight => (xs.end - margin - size.0, mid_y - size.1 / 2),
    }
}

/// Dash intervals `[a, b]` covering `x0..x1`. A zero gap yields one solid span.
fn swatch_dashes(x0: i32, x1: i32, dash: i32, gap: i32) -> Vec<(i32, i32)> {
    if gap <= 0 || dash <= 0 {
        return vec![(x0, x1)];
    }
    let mut spans = Vec::new();
    let mut a = x0;
    while a < x1 {
        spans.push((a, (a + dash).min(x1)));
        a += dash + gap;
    }
    spans
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Arrow {
    start: (i32, i32),
    /// Where the shaft meets the head.
    base: (i32, i32),
    /// Tip first, then the two barbs.
    head: [(i32, i32); 3],
}

/// Arrow from `from` to `to`, with both ends pulled in by `shrink` (a
/// fraction of the length) and a triangular head.
fn arrow_geometry(
    from: (i32, i32),
    to: (i32, i32),
    shrink: f64,
    head_len: f64,
    head_half_width: f64,
) -> Arrow {
    let (fx, fy) = (f64::from(from.0), f64::from(from.1));
    let (tx, ty) = (f64::from(to.0), f64::from(to.1));
    let (dx, dy) = (tx - fx, ty - fy);
    let len = dx.hypot(dy);
    if len < 1.0 {
        return Arrow {
            start: from,
            base: to,
            head: [to, to, to],
        };
    }
    let (ux, uy) = (dx / len, dy / len);
    let start = (fx + ux * len * shrink, fy + uy * len * shrink);
    let tip = (tx - ux * len * shrink, ty - uy * len * shrink);
    let head_len = head_len.min(len * (1.0 - 2.0 * shrink));
    let base = (tip.0 - ux * head_len, tip.1 - uy * head_len);
    let (nx, ny) = (-uy * head_half_width, ux * head_half_width);

    let round = |p: (f64, f64)| (p.0.round() as i32, p.1.round() as i32);
    Arrow {
        start: round(start),
        base: round(base),
        head: [
            round(tip),
            round((base.0 + nx, base.1 + ny)),
            round((base.0 - nx, base.1 - ny)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canvas_is_twelve_by_seven_inches_at_300_dpi() {
        let s = RasterSettings::default();
        assert_eq!(s.pixel_size(), (3600, 2100));
        assert!((s.px(72.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_size_follows_dpi() {
        let s = RasterSettings {
            dpi: 100,
            ..RasterSettings::default()
        };
        assert_eq!(s.pixel_size(), (1200, 700));
    }

    #[test]
    fn dpi_is_recorded_in_pixels_per_metre() {
        let dims = pixel_dims(300);
        assert_eq!((dims.xppu, dims.yppu), (11811, 11811));
        assert_eq!(dims.unit, png::Unit::Meter);
        assert_eq!(pixel_dims(72).xppu, 2835);
    }

    #[test]
    fn written_png_carries_its_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let image = RgbImage::from_pixel(4, 3, image::Rgb([255, 255, 255]));
        write_png(&image, &path, 300).unwrap();

        let reader = png::Decoder::new(File::open(&path).unwrap()).read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 3));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        let dims = info.pixel_dims.unwrap();
        assert_eq!((dims.xppu, dims.unit), (11811, png::Unit::Meter));
    }

    #[test]
    fn legend_corners_stay_inside_the_plot() {
        let plot = (100..1100, 50..650);
        assert_eq!(legend_origin(Corner::UpperLeft, &plot, (200, 80), 10), (110, 60));
        assert_eq!(legend_origin(Corner::CenterLeft, &plot, (200, 80), 10), (110, 310));
        assert_eq!(legend_origin(Corner::CenterRight, &plot, (200, 80), 10), (890, 310));
    }

    #[test]
    fn dashes_cover_the_swatch() {
        assert_eq!(swatch_dashes(0, 20, 20, 0), vec![(0, 20)]);
        assert_eq!(swatch_dashes(0, 20, 5, 3), vec![(0, 5), (8, 13), (16, 20)]);
    }

    #[test]
    fn arrow_points_at_the_anchor() {
        let arrow = arrow_geometry((0, 0), (100, 0), 0.05, 10.0, 4.0);
        assert_eq!(arrow.start, (5, 0));
        assert_eq!(arrow.head[0], (95, 0));
        assert_eq!(arrow.base, (85, 0));
        assert_eq!(arrow.head[1], (85, 4));
        assert_eq!(arrow.head[2], (85, -4));
    }

    #[test]
    fn degenerate_arrow_collapses() {
        let arrow = arrow_geometry((3, 3), (3, 3), 0.05, 10.0, 4.0);
        assert_eq!(arrow.head, [(3, 3); 3]);
    }
}
