//! Colour conversion, locale mapping and axis sizing helpers.

use crate::palette::Rgb8;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

#[inline]
pub fn to_rgba(c: Rgb8, opacity: f64) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, opacity.clamp(0.0, 1.0))
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Integer with locale grouping: `12,345` (en) or `12.345` (de).
pub fn format_count(v: u64, locale: &Locale) -> String {
    v.to_formatted_string(locale)
}

/// Axis value label: whole numbers get grouping, fractions two decimals.
pub fn format_axis_value(v: f64, locale: &Locale) -> String {
    if v.fract().abs() < 1e-9 && v.abs() < 9.0e15 {
        let n = v.round() as i64;
        n.to_formatted_string(locale)
    } else {
        format!("{v:.2}")
    }
}

/// Left label area width that fits the widest y tick label.
pub fn left_label_area_px<S: AsRef<str>>(labels: &[S], font_px: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|l| estimate_text_width_px(l.as_ref(), font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(18).clamp(48, 140)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_grouping() {
        assert_eq!(format_count(12345, map_locale("en")), "12,345");
        assert_eq!(format_count(12345, map_locale("DE")), "12.345");
        assert_eq!(format_axis_value(2.5, map_locale("en")), "2.50");
        assert_eq!(format_axis_value(-1000.0, map_locale("en")), "-1,000");
    }

    #[test]
    fn label_area_is_clamped() {
        assert_eq!(left_label_area_px::<&str>(&[], 12), 48);
        assert_eq!(left_label_area_px(&["x".repeat(100)], 12), 140);
    }
}
