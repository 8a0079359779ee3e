use super::model::{Annotation, Chart, Side};

/// Horizontal distance, in x units, between the data point and its callout.
pub const TEXT_OFFSET_X: f64 = 1.0;

/// Index of the sample closest to `target`. Ties go to the earliest row;
/// non-finite samples are never chosen.
pub fn nearest_row(xs: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in xs.iter().enumerate() {
        let distance = (x - target).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn format_gain(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_value_per_trigger(value: f64) -> String {
    format!("{value:.3}")
}

/// Shortest round-trip form that keeps a decimal point: `3.0`, `2.5`.
pub fn format_target(target: f64) -> String {
    format!("{target:?}")
}

/// Build the callout for the row nearest `target`.
pub fn callout(x: &[f64], gain: &[f64], value: &[f64], target: f64) -> Option<Annotation> {
    let row = nearest_row(x, target)?;
    let (anchor_x, g, v) = (x[row], *gain.get(row)?, *value.get(row)?);

    let text = format!(
        "Target ~{target}/day:\nGain: {sign}{gain}x\nValue: {value}/use",
        target = format_target(target),
        sign = if g >= 0.0 { "+" } else { "" },
        gain = format_gain(g),
        value = format_value_per_trigger(v),
    );

    Some(Annotation {
        anchor: (anchor_x, g),
        text_at: (anchor_x + TEXT_OFFSET_X, g),
        text,
        side: Side::Left,
    })
}

/// Attach a callout to `chart` at the sample nearest `target`, pointing at
/// the first left-axis series and quoting the first right-axis series.
///
/// Returns the chosen row, or `None` when either axis has no series.
pub fn annotate(chart: &mut Chart, target: f64) -> Option<usize> {
    let gain = chart.left.series.first()?;
    let value = chart.right.series.first()?;
    let row = nearest_row(&gain.x, target)?;

    let annotation = callout(&gain.x, &gain.y, &value.y, target)?;
    log::debug!(
        "annotating row {row} at ({}, {})",
        annotation.anchor.0,
        annotation.anchor.1
    );
    chart.annotations.push(annotation);
    Some(row)
}
