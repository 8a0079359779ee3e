//! Dual-axis composition: assign styles, ranges and legends to extracted series.

use super::model::{
    AxisRange, Chart, Corner, GridStyle, LegendBlock, LegendEntry, Pattern, Rgb, Series,
    SeriesStyle, Side, XAxis, YAxis,
};
use crate::color::{GAIN_BLUE, RATE_ORANGE, generate_palette};
use crate::data::extract::Plan;

/// Titles for one chart variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: &'static str,
    pub x_title: &'static str,
    pub left_title: &'static str,
    pub right_title: &'static str,
    /// Legend block titles, used when the legend is split per axis.
    pub left_legend: &'static str,
    pub right_legend: &'static str,
}

impl Layout {
    pub fn for_plan(plan: Plan) -> Self {
        match plan {
            Plan::Paired => Layout {
                title: "Dedenne Skill Contribution Analysis",
                x_title: "Skill Triggers per Day",
                left_title: "Weekly Net Gain (x Base Meal Energy)",
                right_title: "Value per Trigger (Coefficient)",
                left_legend: "Weekly Net Gain",
                right_legend: "Value per Trigger",
            },
            Plan::Grouped => Layout {
                title: "Dedenne Cap Analysis",
                x_title: "Skill Triggers per Day",
                left_title: "Weekly Net Gain (x Base Meal Energy)",
                right_title: "Dedenne Rest Rate",
                left_legend: "Weekly Net Gain",
                right_legend: "Dedenne Rest Rate",
            },
        }
    }
}

/// Build a [`Chart`] from extracted series.
pub fn compose(plan: Plan, series: Vec<Series>) -> Chart {
    let layout = Layout::for_plan(plan);

    let (left, right): (Vec<Series>, Vec<Series>) =
        series.into_iter().partition(|s| s.side == Side::Left);
    let left = style_group(left, Side::Left);
    let right = style_group(right, Side::Right);

    let x_range = AxisRange::covering(left.iter().chain(&right).flat_map(|s| &s.x))
        .unwrap_or_default();
    let left_range = AxisRange::covering(left.iter().flat_map(|s| &s.y)).unwrap_or_default();
    let right_range = AxisRange::covering(right.iter().flat_map(|s| &s.y)).unwrap_or_default();

    let legend = legend_blocks(&layout, &left, &right);
    log::debug!(
        "{} chart: x {:?}, left {:?}, right {:?}, {} legend block(s)",
        plan.name(),
        x_range,
        left_range,
        right_range,
        legend.len()
    );

    Chart {
        title: layout.title.to_string(),
        x_axis: XAxis {
            title: layout.x_title.to_string(),
            range: x_range,
        },
        left: YAxis {
            title: layout.left_title.to_string(),
            color: GAIN_BLUE,
            range: left_range,
            series: left,
        },
        right: YAxis {
            title: layout.right_title.to_string(),
            color: RATE_ORANGE,
            range: right_range,
            series: right,
        },
        legend,
        annotations: Vec::new(),
        grid: GridStyle::default(),
    }
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// A lone series takes its axis' colour family; a group gets one hue per
/// member. The line pattern always encodes the axis.
fn style_group(mut group: Vec<Series>, side: Side) -> Vec<Series> {
    group.sort_by_key(|s| s.order);

    let (family, pattern) = match side {
        Side::Left => (GAIN_BLUE, Pattern::Solid),
        Side::Right if group.len() > 1 => (RATE_ORANGE, Pattern::Dotted),
        Side::Right => (RATE_ORANGE, Pattern::Dashed),
    };

    let colors: Vec<Rgb> = if group.len() > 1 {
        generate_palette(group.len())
    } else {
        vec![family; group.len()]
    };

    for (series, color) in group.iter_mut().zip(colors) {
        series.style = SeriesStyle {
            color,
            pattern,
            ..SeriesStyle::default()
        };
    }
    group
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// One combined block for a simple chart; one titled block per axis as soon
/// as either axis carries several series.
fn legend_blocks(layout: &Layout, left: &[Series], right: &[Series]) -> Vec<LegendBlock> {
    if left.len() > 1 || right.len() > 1 {
        vec![
            LegendBlock {
                title: Some(layout.left_legend.to_string()),
                corner: Corner::UpperLeft,
                entries: entries(left),
            },
            LegendBlock {
                title: Some(layout.right_legend.to_string()),
                corner: Corner::CenterLeft,
                entries: entries(right),
            },
        ]
    } else {
        vec![LegendBlock {
            title: None,
            corner: Corner::CenterRight,
            entries: entries(left).into_iter().chain(entries(right)).collect(),
        }]
    }
}

fn entries(series: &[Series]) -> Vec<LegendEntry> {
    series
        .iter()
        .map(|s| LegendEntry {
            label: s.label.clone(),
            color: s.style.color,
            pattern: s.style.pattern,
        })
        .collect()
}
