//! Renderer-independent chart description produced by the views.
//!
//! A [`Chart`] is plain data: it can be serialized to JSON for a web front end,
//! written out as tidy CSV, or drawn with the plotters backend in [`crate::viz`].

use crate::palette::Rgb8;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Stable view identifier, used in file names.
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bar_mode: BarMode,
    /// Explicit y-axis range; `None` lets the renderer fit the data.
    pub y_range: Option<(f64, f64)>,
    /// Explicit y ticks with labels; empty lets the renderer choose.
    pub y_ticks: Vec<Tick>,
    pub traces: Vec<Trace>,
    pub annotations: Vec<Annotation>,
}

impl Chart {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x_title: String::new(),
            y_title: String::new(),
            bar_mode: BarMode::Overlay,
            y_range: None,
            y_ticks: Vec::new(),
            traces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_title = x.into();
        self.y_title = y.into();
        self
    }

    /// True when any trace is a map; such charts have no cartesian axes.
    pub fn is_geo(&self) -> bool {
        self.traces.iter().any(|t| matches!(t, Trace::Choropleth(_)))
    }

    /// True when no trace carries any data point.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(Trace::is_empty)
    }
}

/// How multiple bar traces share an x slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// Every bar starts at zero; later traces draw over earlier ones.
    Overlay,
    /// Bars with `stacked = true` pile up; others start at zero behind them.
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Text placed at a data coordinate (value labels over bars).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Rotated to read bottom-to-top.
    pub vertical: bool,
    /// Place below the anchor instead of above it.
    pub below: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Bar(YearSeries),
    Line(YearSeries),
    Scatter(ScatterTrace),
    Choropleth(ChoroplethTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Bar(s) | Trace::Line(s) => &s.name,
            Trace::Scatter(s) => &s.name,
            Trace::Choropleth(c) => &c.name,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Trace::Bar(s) | Trace::Line(s) => s.years.is_empty(),
            Trace::Scatter(s) => s.points.is_empty(),
            Trace::Choropleth(c) => c.locations.is_empty(),
        }
    }
}

/// One value per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub name: String,
    pub color: Rgb8,
    pub years: Vec<i32>,
    pub values: Vec<u64>,
    /// Only meaningful with [`BarMode::Stack`].
    pub stacked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub points: Vec<ScatterPoint>,
    /// Draw each point's label next to the marker.
    pub labeled: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Incidence (ASR).
    pub x: f64,
    /// Article count.
    pub y: u64,
    pub label: String,
    pub color: Rgb8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    Iso3,
    CountryNames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    pub name: String,
    pub location_mode: LocationMode,
    pub locations: Vec<String>,
    /// Hover text, one per location (the dataset's country name).
    pub text: Vec<String>,
    pub z: Vec<f64>,
    /// `(position, colour)` stops; a single-colour category uses two equal stops.
    pub color_scale: Vec<(f64, Rgb8)>,
    /// Continuous scale with a colour bar; `false` for categorical layers.
    pub show_scale: bool,
    pub color_bar_ticks: Vec<f64>,
}
