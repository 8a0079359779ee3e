use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    Arrows, AxisHints, HLine, HPlacement, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points,
    Text, VLine,
};

use super::legend;
use crate::chart::grid::{major_ticks, minor_ticks, tick_label};
use crate::chart::model::{Chart, Pattern, Rgb};

const MAX_TICKS: usize = 10;

// ---------------------------------------------------------------------------
// Dual-axis plot (central panel)
// ---------------------------------------------------------------------------

/// Render `chart` into the central panel.
///
/// Everything is drawn in left-axis coordinates; the right axis is a second
/// set of axis hints whose labels undo that mapping.
pub fn chart_plot(ui: &mut Ui, chart: &Chart) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&chart.title);
    });

    let left_range = chart.left.range;
    let right_range = chart.right.range;
    let right_scale = right_range.span() / left_range.span();

    let left_axis = AxisHints::new_y()
        .label(RichText::new(&chart.left.title).color(to_egui(chart.left.color)));
    let right_axis = AxisHints::new_y()
        .label(RichText::new(&chart.right.title).color(to_egui(chart.right.color)))
        .placement(HPlacement::Right)
        .formatter(move |mark, _range| {
            tick_label(
                left_range.map_to(&right_range, mark.value),
                mark.step_size * right_scale,
            )
        });

    let response = Plot::new("dual_axis_plot")
        .x_axis_label(chart.x_axis.title.as_str())
        .custom_y_axes(vec![left_axis, right_axis])
        .show_grid(false)
        .include_x(chart.x_axis.range.min)
        .include_x(chart.x_axis.range.max)
        .include_y(left_range.min)
        .include_y(left_range.max)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // ---- Grid (beneath everything) ----
            let grid = grid_lines(chart);
            for x in grid.x_major {
                plot_ui.vline(VLine::new(x).color(grid.major).style(grid.style));
            }
            for x in grid.x_minor {
                plot_ui.vline(VLine::new(x).color(grid.minor).style(grid.style));
            }
            for y in grid.y_major {
                plot_ui.hline(HLine::new(y).color(grid.major).style(grid.style));
            }
            for y in grid.y_minor {
                plot_ui.hline(HLine::new(y).color(grid.minor).style(grid.style));
            }

            // ---- Series ----
            for series in chart.series() {
                for run in series.segments() {
                    let points: PlotPoints = run
                        .into_iter()
                        .map(|(x, y)| [x, chart.to_left(series.side, y)])
                        .collect();
                    let line = Line::new(points)
                        .name(&series.label)
                        .color(to_egui(series.style.color))
                        .width(series.style.width)
                        .style(line_style(series.style.pattern));
                    plot_ui.line(line);
                }
            }

            // ---- Annotations ----
            for note in &chart.annotations {
                let anchor = [note.anchor.0, chart.to_left(note.side, note.anchor.1)];
                let text_at = [note.text_at.0, chart.to_left(note.side, note.text_at.1)];

                plot_ui.points(Points::new(vec![anchor]).radius(4.0).color(Color32::BLACK));
                plot_ui.arrows(Arrows::new(vec![text_at], vec![anchor]).color(Color32::BLACK));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(text_at[0], text_at[1]),
                        RichText::new(&note.text)
                            .color(Color32::BLACK)
                            .background_color(Color32::from_white_alpha(220)),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });

    legend::overlay(ui, *response.transform.frame(), &chart.legend);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn to_egui(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn line_style(pattern: Pattern) -> LineStyle {
    match pattern {
        Pattern::Solid => LineStyle::Solid,
        Pattern::Dashed => LineStyle::Dashed { length: 10.0 },
        Pattern::Dotted => LineStyle::Dotted { spacing: 6.0 },
    }
}

struct GridLines {
    x_major: Vec<f64>,
    x_minor: Vec<f64>,
    y_major: Vec<f64>,
    y_minor: Vec<f64>,
    major: Color32,
    minor: Color32,
    style: LineStyle,
}

fn grid_lines(chart: &Chart) -> GridLines {
    let x_range = chart.x_axis.range;
    let y_range = chart.left.range;
    let x_major = major_ticks(&x_range, MAX_TICKS);
    let y_major = major_ticks(&y_range, MAX_TICKS);
    let alpha = chart.grid.alpha as f32;

    GridLines {
        x_minor: minor_ticks(&x_major, &x_range, chart.grid.minor_per_major),
        y_minor: minor_ticks(&y_major, &y_range, chart.grid.minor_per_major),
        x_major,
        y_major,
        major: Color32::GRAY.gamma_multiply(alpha),
        minor: Color32::GRAY.gamma_multiply(alpha * 0.5),
        style: match chart.grid.pattern {
            Pattern::Solid => LineStyle::Solid,
            Pattern::Dashed => LineStyle::dashed_dense(),
            Pattern::Dotted => LineStyle::dotted_dense(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::compose::compose;
    use crate::data::extract::{Plan, extract};
    use crate::data::model::{Column, Table};

    #[test]
    fn grid_lines_stay_inside_the_chart() {
        let table = Table::new(vec![
            Column::new("Trigger/Day", vec![2.0, 4.0, 6.0]),
            Column::new("gain", vec![0.5, 1.5, 2.5]),
            Column::new("value", vec![0.05, 0.06, 0.07]),
        ])
        .unwrap();
        let chart = compose(Plan::Paired, extract(&table, &Plan::Paired.schema()).unwrap());
        let grid = grid_lines(&chart);

        assert!(!grid.x_major.is_empty());
        assert!(!grid.y_minor.is_empty());
        let x = chart.x_axis.range;
        assert!(grid.x_major.iter().chain(&grid.x_minor).all(|v| *v >= x.min && *v <= x.max));
    }

    #[test]
    fn patterns_map_to_plot_styles() {
        assert_eq!(line_style(Pattern::Solid), LineStyle::Solid);
        assert!(matches!(line_style(Pattern::Dashed), LineStyle::Dashed { .. }));
        assert!(matches!(line_style(Pattern::Dotted), LineStyle::Dotted { .. }));
    }
}
