use crate::chart::{Chart, Trace};
use anyhow::Result;
use csv::WriterBuilder;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Cells that a spreadsheet would evaluate as a formula.
static FORMULA_LIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[=+\-@]").expect("formula pattern"));

/// Prefix formula-looking text with `'` so spreadsheets show it verbatim.
pub fn sanitize_cell(s: &str) -> String {
    if FORMULA_LIKE.is_match(s) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// One row of the tidy export.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub trace: String,
    pub kind: &'static str,
    pub x: String,
    pub y: String,
    pub label: String,
    pub color: String,
}

/// Flatten every trace of `chart` into `(trace, kind, x, y, label, color)` rows.
///
/// Bar and line traces give one row per year; scatter traces one row per
/// point (x = ASR); map traces one row per location (x = location, y = z).
pub fn series_rows(chart: &Chart) -> Vec<SeriesRow> {
    let mut rows = Vec::new();
    for trace in &chart.traces {
        match trace {
            Trace::Bar(s) | Trace::Line(s) => {
                let kind = if matches!(trace, Trace::Bar(_)) { "bar" } else { "line" };
                for (year, v) in s.years.iter().zip(&s.values) {
                    rows.push(SeriesRow {
                        trace: s.name.clone(),
                        kind,
                        x: year.to_string(),
                        y: v.to_string(),
                        label: String::new(),
                        color: s.color.hex(),
                    });
                }
            }
            Trace::Scatter(s) => {
                for p in &s.points {
                    rows.push(SeriesRow {
                        trace: s.name.clone(),
                        kind: "scatter",
                        x: p.x.to_string(),
                        y: p.y.to_string(),
                        label: p.label.replace('\n', " "),
                        color: p.color.hex(),
                    });
                }
            }
            Trace::Choropleth(c) => {
                let color = c.color_scale.first().map(|(_, c)| c.hex()).unwrap_or_default();
                for ((loc, z), text) in c.locations.iter().zip(&c.z).zip(&c.text) {
                    rows.push(SeriesRow {
                        trace: c.name.clone(),
                        kind: "choropleth",
                        x: loc.clone(),
                        y: z.to_string(),
                        label: text.clone(),
                        color: color.clone(),
                    });
                }
            }
        }
    }
    rows
}

/// Save the chart's data as tidy CSV with header.
pub fn save_series_csv<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["trace", "kind", "x", "y", "label", "color"])?;
    for r in series_rows(chart) {
        wtr.write_record([
            sanitize_cell(&r.trace).as_str(),
            r.kind,
            sanitize_cell(&r.x).as_str(),
            r.y.as_str(),
            sanitize_cell(&r.label).as_str(),
            r.color.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the chart model as pretty JSON.
pub fn save_chart_json<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(chart)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
