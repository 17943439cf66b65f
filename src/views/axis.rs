//! Axis helpers shared by the bar views.

use crate::chart::Tick;

/// Round tick spacing for a value axis starting at zero, aiming for about ten ticks.
///
/// Returns the ticks `0, step, ..., upper` where `upper >= max`.
pub fn nice_ticks(max: f64) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 {
        return vec![0.0];
    }
    let raw = max / 10.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = (raw / magnitude).ceil() * magnitude;
    let upper = (max / step).ceil() * step;
    let count = (upper / step).round() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// `1500 -> "1.5K"`, `2000000 -> "2M"`, `950 -> "950"`.
pub fn format_compact(v: f64) -> String {
    let trim = |s: String| s.strip_suffix(".0").map(str::to_string).unwrap_or(s);
    if v >= 1_000_000.0 {
        format!("{}M", trim(format!("{:.1}", v / 1_000_000.0)))
    } else if v >= 1_000.0 {
        format!("{}K", trim(format!("{:.1}", v / 1_000.0)))
    } else {
        format!("{}", v.round() as i64)
    }
}

pub fn compact_ticks(values: &[f64]) -> Vec<Tick> {
    values
        .iter()
        .map(|&value| Tick {
            value,
            label: format_compact(value),
        })
        .collect()
}

/// Five evenly spaced colour-bar ticks from `min` to `max`, rounded to 2 decimals.
pub fn five_ticks(min: f64, max: f64) -> Vec<f64> {
    let step = (max - min) / 4.0;
    (0..5)
        .map(|i| {
            let v = if i == 4 { max } else { min + i as f64 * step };
            (v * 100.0).round() / 100.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_max() {
        let t = nice_ticks(873.0);
        assert_eq!(t.first(), Some(&0.0));
        assert_eq!(t[1], 90.0);
        assert!(*t.last().unwrap() >= 873.0);
        assert_eq!(t.len(), 11);
    }

    #[test]
    fn ticks_for_zero_max() {
        assert_eq!(nice_ticks(0.0), vec![0.0]);
    }

    #[test]
    fn compact_labels() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(1000.0), "1K");
        assert_eq!(format_compact(1500.0), "1.5K");
        assert_eq!(format_compact(2_000_000.0), "2M");
    }

    #[test]
    fn five_ticks_span_range() {
        assert_eq!(five_ticks(1.0, 9.0), vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(five_ticks(0.0, 1.0)[1], 0.25);
    }
}
