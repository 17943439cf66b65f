//! Public types and constants for the rendering module.

use std::fmt;
use std::str::FromStr;

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap bars).
    Inside,
    /// Separate panel on the right side.
    Right,
    /// Separate band above the plot.
    Top,
    /// Separate band below the plot.
    Bottom,
    /// No legend at all.
    Hidden,
}

/// Dashboards read best with the series names under the x axis.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

impl FromStr for LegendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inside" => Ok(LegendMode::Inside),
            "right" => Ok(LegendMode::Right),
            "top" => Ok(LegendMode::Top),
            "bottom" => Ok(LegendMode::Bottom),
            "hidden" | "none" => Ok(LegendMode::Hidden),
            other => Err(format!("unknown legend placement `{other}`")),
        }
    }
}

impl fmt::Display for LegendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LegendMode::Inside => "inside",
            LegendMode::Right => "right",
            LegendMode::Top => "top",
            LegendMode::Bottom => "bottom",
            LegendMode::Hidden => "hidden",
        };
        f.write_str(s)
    }
}

/// Image settings for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Number formatting tag for value labels (`en`, `de`, ...).
    pub locale: String,
    pub legend: LegendMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            locale: "en".into(),
            legend: DEFAULT_LEGEND_MODE,
        }
    }
}

impl From<&crate::config::PlotSettings> for RenderOptions {
    fn from(p: &crate::config::PlotSettings) -> Self {
        Self {
            width: p.width,
            height: p.height,
            locale: p.locale.clone(),
            legend: DEFAULT_LEGEND_MODE,
        }
    }
}
