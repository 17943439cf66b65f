//! Fixed colour tables for the dashboard.
//!
//! Categories are matched by exact name. Anything outside a table gets the
//! caller's fallback colour, so the same category always renders the same way
//! across charts.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        c.hex()
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb8::from_hex(&s).ok_or_else(|| format!("invalid colour `{s}`"))
    }
}

/// Unlisted category on a categorical map.
pub const MAP_FALLBACK: Rgb8 = Rgb8::new(0x99, 0x99, 0x99);
/// Unlisted cancer among highlighted scatter points.
pub const LIGHT_GREY: Rgb8 = Rgb8::new(0xD3, 0xD3, 0xD3);
/// CSS `grey`: unlisted countries and non-highlighted points.
pub const GREY: Rgb8 = Rgb8::new(0x80, 0x80, 0x80);
/// "All countries" / "All cancers" totals and single-series bars.
pub const TOTALS: Rgb8 = Rgb8::new(0x46, 0x82, 0xB4);
/// The pair series on the country/cancer comparison chart.
pub const SELECTION: Rgb8 = Rgb8::new(0xFF, 0xA5, 0x00);

/// Colours handed out by rank position to the top-N series.
pub const RANK_COLORS: [Rgb8; 5] = [
    Rgb8::new(0xFF, 0x57, 0x33),
    Rgb8::new(0x19, 0xAD, 0x17),
    Rgb8::new(0x33, 0xE7, 0xFF),
    Rgb8::new(0xFF, 0x33, 0xA1),
    Rgb8::new(0xFF, 0xC3, 0x00),
];

const CANCER_COLORS: [(&str, Rgb8); 19] = [
    ("Breast cancer", Rgb8::new(0x37, 0x7E, 0xB8)),
    ("Prostate cancer", Rgb8::new(0x4D, 0xAF, 0x4A)),
    ("Lung cancer", Rgb8::new(0x98, 0x4E, 0xA3)),
    ("Colorectal cancer", Rgb8::new(0x66, 0xC2, 0xA5)),
    ("Liver cancer", Rgb8::new(0xF7, 0x81, 0xBF)),
    ("Stomach cancer", Rgb8::new(0x8D, 0xA0, 0xCB)),
    ("Cervical cancer", Rgb8::new(0xE7, 0x8A, 0xC3)),
    ("Leukemia", Rgb8::new(0xA6, 0x56, 0x28)),
    ("Esophageal cancer", Rgb8::new(0xFF, 0xBA, 0xBA)),
    ("Skin cancer", Rgb8::new(0xFF, 0x7F, 0x00)),
    ("Anal cancer", Rgb8::new(0xB1, 0x59, 0x28)),
    ("Brain cancer", Rgb8::new(0x1F, 0x78, 0xB4)),
    ("Mesothelioma", Rgb8::new(0x33, 0xA0, 0x2C)),
    ("Kidney cancer", Rgb8::new(0x6A, 0x3D, 0x9A)),
    ("Multiple myeloma", Rgb8::new(0xE3, 0x1A, 0x1C)),
    ("Laryngeal cancer", Rgb8::new(0xFD, 0xBF, 0x6F)),
    ("Ovarian cancer", Rgb8::new(0xCA, 0xB2, 0xD6)),
    ("Colon cancer", Rgb8::new(0xFF, 0xFF, 0x99)),
    ("Penile cancer", Rgb8::new(0xA6, 0xCE, 0xE3)),
];

const COUNTRY_COLORS: [(&str, Rgb8); 15] = [
    ("United States", Rgb8::new(0x1F, 0x77, 0xB4)),
    ("United Kingdom", Rgb8::new(0xFF, 0x7F, 0x0E)),
    ("Germany", Rgb8::new(0x2C, 0xA0, 0x2C)),
    ("France", Rgb8::new(0xD6, 0x27, 0x28)),
    ("Italy", Rgb8::new(0x94, 0x67, 0xBD)),
    ("Canada", Rgb8::new(0x8C, 0x56, 0x4B)),
    ("Japan", Rgb8::new(0xE3, 0x77, 0xC2)),
    ("China", Rgb8::new(0x83, 0x51, 0xC4)),
    ("Australia", Rgb8::new(0xBC, 0xBD, 0x22)),
    ("Netherlands", Rgb8::new(0x17, 0xBE, 0xCF)),
    ("Switzerland", Rgb8::new(0xAE, 0xC7, 0xE8)),
    ("Sweden", Rgb8::new(0xFF, 0xBB, 0x78)),
    ("Spain", Rgb8::new(0x98, 0xDF, 0x8A)),
    ("South Korea", Rgb8::new(0xFF, 0x98, 0x96)),
    ("Belgium", Rgb8::new(0xC5, 0xB0, 0xD5)),
];

/// Incidence map colour scale, low to high.
pub const INCIDENCE_SCALE: [(f64, Rgb8); 5] = [
    (0.0, Rgb8::new(0xFF, 0xFF, 0x66)),
    (0.25, Rgb8::new(0xFF, 0xCC, 0x33)),
    (0.5, Rgb8::new(0xFF, 0x66, 0x00)),
    (0.75, Rgb8::new(0xCC, 0x33, 0x00)),
    (1.0, Rgb8::new(0x80, 0x00, 0x00)),
];

fn lookup(table: &[(&str, Rgb8)], name: &str) -> Option<Rgb8> {
    table.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

pub fn cancer_color(name: &str) -> Option<Rgb8> {
    lookup(&CANCER_COLORS, name)
}

pub fn cancer_color_or(name: &str, fallback: Rgb8) -> Rgb8 {
    cancer_color(name).unwrap_or(fallback)
}

pub fn country_color(name: &str) -> Option<Rgb8> {
    lookup(&COUNTRY_COLORS, name)
}

pub fn country_color_or(name: &str, fallback: Rgb8) -> Rgb8 {
    country_color(name).unwrap_or(fallback)
}

/// Colour for the series at rank position `idx` (0-based), cycling.
#[inline]
pub fn rank_color(idx: usize) -> Rgb8 {
    RANK_COLORS[idx % RANK_COLORS.len()]
}

/// Linear interpolation along a `(position, colour)` scale, `t` clamped to 0..=1.
pub fn sample_scale(scale: &[(f64, Rgb8)], t: f64) -> Rgb8 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let Some(&(_, first)) = scale.first() else {
        return GREY;
    };
    for pair in scale.windows(2) {
        let (p0, c0) = pair[0];
        let (p1, c1) = pair[1];
        if t <= p1 {
            let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return Rgb8::new(mix(c0.r, c1.r), mix(c0.g, c1.g), mix(c0.b, c1.b));
        }
    }
    scale.last().map_or(first, |&(_, c)| c)
}
