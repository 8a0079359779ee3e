use super::model::AxisRange;

/// Round-numbered tick positions (steps of 1, 2 or 5 times a power of ten)
/// inside `range`, at most about `max_ticks` of them.
pub fn major_ticks(range: &AxisRange, max_ticks: usize) -> Vec<f64> {
    let span = range.span();
    if !(span.is_finite() && span > 0.0) || max_ticks == 0 {
        return Vec::new();
    }
    let raw = span / max_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (range.min / step).ceil() as i64;
    let last = (range.max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Minor tick positions between (and beyond) the given major ticks, clipped
/// to `range`. Major positions themselves are not repeated.
pub fn minor_ticks(majors: &[f64], range: &AxisRange, per_major: usize) -> Vec<f64> {
    if majors.len() < 2 || per_major < 2 {
        return Vec::new();
    }
    let step = (majors[1] - majors[0]) / per_major as f64;
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }

    let first = majors[0] - step * per_major as f64;
    let count = ((range.max - first) / step).ceil() as usize;
    (1..=count)
        .map(|k| first + k as f64 * step)
        .filter(|v| *v >= range.min && *v <= range.max)
        .filter(|v| is_minor(*v, majors[0], step, per_major))
        .collect()
}

fn is_minor(value: f64, origin: f64, step: f64, per_major: usize) -> bool {
    let k = ((value - origin) / step).round() as i64;
    k.rem_euclid(per_major as i64) != 0
}

/// Tick label with just enough decimals for the tick spacing `step`.
pub fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).clamp(0.0, 6.0) as usize
    } else {
        2
    };
    // Avoid "-0.00".
    let value = if value.abs() < 0.5 * 10f64.powi(-(decimals as i32)) {
        0.0
    } else {
        value
    };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_ticks_use_round_steps() {
        let ticks = major_ticks(&AxisRange { min: 0.0, max: 1.0 }, 5);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0], 0.0);
        assert!((ticks[5] - 1.0).abs() < 1e-12);

        let ticks = major_ticks(&AxisRange { min: 1.8, max: 6.2 }, 10);
        assert_eq!(ticks.first(), Some(&2.0));
        assert_eq!(ticks.last(), Some(&6.0));
        assert_eq!(ticks.len(), 9);
    }

    #[test]
    fn minor_ticks_fill_between_majors() {
        let range = AxisRange { min: 0.0, max: 2.0 };
        let minors = minor_ticks(&[0.0, 1.0, 2.0], &range, 5);
        assert_eq!(minors.len(), 8);
        assert!((minors[0] - 0.2).abs() < 1e-9);
        assert!((minors[4] - 1.2).abs() < 1e-9);
        assert!(minors.iter().all(|v| (v.fract() - 0.0).abs() > 1e-9));
    }

    #[test]
    fn minor_ticks_extend_to_the_range_edges() {
        let range = AxisRange { min: 1.8, max: 6.2 };
        let minors = minor_ticks(&[2.0, 3.0, 4.0, 5.0, 6.0], &range, 2);
        assert_eq!(minors, vec![2.5, 3.5, 4.5, 5.5]);

        let wide = AxisRange { min: 1.4, max: 6.6 };
        let minors = minor_ticks(&[2.0, 3.0, 4.0, 5.0, 6.0], &wide, 2);
        assert_eq!(minors.first(), Some(&1.5));
        assert_eq!(minors.last(), Some(&6.5));
    }

    #[test]
    fn too_few_majors_give_no_minors() {
        let range = AxisRange { min: 0.0, max: 1.0 };
        assert!(minor_ticks(&[0.5], &range, 5).is_empty());
    }

    #[test]
    fn tick_labels_follow_the_step() {
        assert_eq!(tick_label(0.05, 0.01), "0.05");
        assert_eq!(tick_label(12.0, 5.0), "12");
        assert_eq!(tick_label(0.0626, 0.0025), "0.063");
        assert_eq!(tick_label(-0.0001, 0.1), "0.0");
    }
}
