//! Rendering: draw a [`Chart`] to **SVG** or **PNG** with plotters.
//!
//! - Bars in overlay or stack mode, value labels (optionally rotated)
//! - Line series with markers, labelled scatter markers with opacity
//! - Compact (`1.2K`) or locale-grouped (`12,345`) tick and value labels
//! - Legend placement: `Inside`, `Right`, `Top`, `Bottom`, `Hidden`
//!
//! Maps are not drawn here; [`render_chart`] rejects them with
//! [`DashboardError::GeoRender`] so callers can fall back to JSON export.

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{DEFAULT_LEGEND_MODE, LegendMode, RenderOptions};

use crate::chart::{Annotation, BarMode, Chart, ScatterTrace, Trace, YearSeries};
use crate::error::DashboardError;
use crate::views::axis::format_compact;
use ahash::AHashMap;
use anyhow::Result;
use log::info;
use num_format::Locale;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::{LegendItem, Swatch, draw_legend_panel, estimate_band_height_px};
use text::estimate_text_width_px;
use util::{format_axis_value, format_count, left_label_area_px, map_locale, to_rgba};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Share of a year slot a bar occupies.
const BAR_W: f64 = 0.8;
const MARGIN: i32 = 16;
const TICK_FONT_PX: u32 = 12;

/// Render with default options (1000x600, `en`, legend at the bottom).
pub fn render_default<P: AsRef<Path>>(chart: &Chart, out_path: P) -> Result<()> {
    render_chart(chart, out_path, &RenderOptions::default())
}

/// Render `chart` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn render_chart<P: AsRef<Path>>(chart: &Chart, out_path: P, opts: &RenderOptions) -> Result<()> {
    if chart.is_geo() {
        return Err(DashboardError::GeoRender(chart.id.clone()).into());
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (opts.width.max(200), opts.height.max(150));

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, chart, opts)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, chart, opts)?;
    }
    info!("rendered {} to {}", chart.id, out_path.display());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    /// Integer years, one slot per year.
    Years,
    Continuous,
}

/// Data extent of the cartesian traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub x_axis: XAxis,
}

/// Axis extents for `chart`: stacked bar sums count, an explicit `y_range` wins.
pub fn frame(chart: &Chart) -> Frame {
    let mut xs: Vec<f64> = Vec::new();
    let mut y_max = 0.0f64;
    let mut stacked: AHashMap<i32, f64> = AHashMap::new();
    let mut x_axis = XAxis::Years;

    for t in &chart.traces {
        match t {
            Trace::Bar(s) | Trace::Line(s) => {
                xs.extend(s.years.iter().map(|y| *y as f64));
                let stacks = matches!(t, Trace::Bar(_)) && chart.bar_mode == BarMode::Stack && s.stacked;
                for (y, v) in s.years.iter().zip(&s.values) {
                    let v = *v as f64;
                    if stacks {
                        let acc = stacked.entry(*y).or_insert(0.0);
                        *acc += v;
                        y_max = y_max.max(*acc);
                    } else {
                        y_max = y_max.max(v);
                    }
                }
            }
            Trace::Scatter(s) => {
                x_axis = XAxis::Continuous;
                xs.extend(s.points.iter().map(|p| p.x));
                y_max = s.points.iter().fold(y_max, |m, p| m.max(p.y as f64));
            }
            Trace::Choropleth(_) => {}
        }
    }

    let x = match (
        xs.iter().copied().reduce(f64::min),
        xs.iter().copied().reduce(f64::max),
    ) {
        (Some(lo), Some(hi)) if x_axis == XAxis::Years => (lo - 0.6, hi + 0.6),
        (Some(lo), Some(hi)) => {
            let pad = if hi > lo { (hi - lo) * 0.08 } else { 1.0 };
            (lo - pad, hi + pad)
        }
        _ => (0.0, 1.0),
    };

    let y = match chart.y_range {
        Some((lo, hi)) if hi > lo => (lo, hi),
        _ if y_max > 0.0 => {
            let head = if x_axis == XAxis::Continuous { 1.15 } else { 1.1 };
            (0.0, y_max * head)
        }
        _ => (0.0, 1.0),
    };

    Frame { x, y, x_axis }
}

fn legend_items(chart: &Chart) -> Vec<LegendItem> {
    chart
        .traces
        .iter()
        .filter_map(|t| match t {
            Trace::Bar(s) => Some(LegendItem {
                label: s.name.clone(),
                color: to_rgba(s.color, 1.0),
                swatch: Swatch::Block,
            }),
            Trace::Line(s) => Some(LegendItem {
                label: s.name.clone(),
                color: to_rgba(s.color, 1.0),
                swatch: Swatch::Line,
            }),
            // Highlighted points carry their own labels; the rest are one grey group.
            Trace::Scatter(s) if !s.labeled && !s.points.is_empty() => Some(LegendItem {
                label: s.name.clone(),
                color: to_rgba(s.points[0].color, s.opacity),
                swatch: Swatch::Dot,
            }),
            _ => None,
        })
        .collect()
}

/// Re-format plain integer labels with locale grouping; leave other text alone.
fn localize(text: &str, locale: &Locale) -> String {
    text.parse::<u64>()
        .map(|v| format_count(v, locale))
        .unwrap_or_else(|_| text.to_string())
}

/// Y positions that carry a tick label. Explicit `chart.y_ticks` inside the
/// frame win; otherwise the frame is split into ten even steps.
pub fn y_tick_values(chart: &Chart, fr: &Frame) -> Vec<f64> {
    let (lo, hi) = fr.y;
    let explicit: Vec<f64> = chart
        .y_ticks
        .iter()
        .map(|t| t.value)
        .filter(|v| *v >= lo && *v <= hi)
        .collect();
    if !explicit.is_empty() {
        return explicit;
    }
    (0..=10).map(|i| lo + (hi - lo) * i as f64 / 10.0).collect()
}

/// Label for a y tick: the chart's own label when one sits at `v`.
pub fn y_tick_label(chart: &Chart, v: f64) -> String {
    chart
        .y_ticks
        .iter()
        .find(|t| (t.value - v).abs() < 1e-9)
        .map(|t| t.label.clone())
        .unwrap_or_else(|| format_compact(v))
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, chart: &Chart, opts: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
{
    let locale = map_locale(&opts.locale);
    let fr = frame(chart);
    let compact_y = !chart.y_ticks.is_empty();

    // ----------------------------
    // 1) Gutters and legend band
    // ----------------------------
    let y_ticks = y_tick_values(chart, &fr);
    let y_label_fmt = |v: &f64| {
        if compact_y {
            y_tick_label(chart, *v)
        } else {
            format_axis_value(*v, locale)
        }
    };
    let sample_labels: Vec<String> = y_ticks.iter().map(|v| y_label_fmt(v)).collect();
    let left_label_width_px = left_label_area_px(&sample_labels, TICK_FONT_PX);
    let axis_x_start_px = MARGIN + left_label_width_px as i32;

    let items = legend_items(chart);
    let placement = if items.is_empty() { LegendMode::Hidden } else { opts.legend };

    let (root_w, root_h) = root.dim_in_pixel();
    let (root_w, root_h) = (root_w as i32, root_h as i32);

    let (plot_area, legend_area) = match placement {
        LegendMode::Right => {
            let (plot, legend) = root.split_horizontally((80).percent_width());
            (plot, Some(legend))
        }
        LegendMode::Top | LegendMode::Bottom => {
            let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
            let h = estimate_band_height_px(&labels, axis_x_start_px, root_w).max(40);
            if placement == LegendMode::Top {
                let (legend, plot) = root.split_vertically(h);
                (plot, Some(legend))
            } else {
                let (plot, legend) = root.split_vertically((root_h - h).max(40));
                (plot, Some(legend))
            }
        }
        LegendMode::Inside | LegendMode::Hidden => (root, None),
    };

    plot_area
        .fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // ----------------------------
    // 2) Axes
    // ----------------------------
    let x_label_fmt = |x: &f64| match fr.x_axis {
        XAxis::Years => (x.round() as i64).to_string(),
        XAxis::Continuous => format!("{x:.1}"),
    };
    let x_label_count = match fr.x_axis {
        XAxis::Years => ((fr.x.1 - fr.x.0).round() as usize).clamp(2, 20),
        XAxis::Continuous => 10,
    };

    let mut ctx = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(chart.title.as_str(), (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(fr.x.0..fr.x.1, (fr.y.0..fr.y.1).with_key_points(y_ticks))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_title.as_str())
        .y_desc(chart.y_title.as_str())
        .x_labels(x_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if chart.is_empty() {
        let (w, h) = plot_area.dim_in_pixel();
        let style = TextStyle::from((FontFamily::SansSerif, 18)).pos(Pos::new(HPos::Center, VPos::Center));
        plot_area
            .draw(&Text::new("No data", (w as i32 / 2, h as i32 / 2), style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    // ----------------------------
    // 3) Traces
    // ----------------------------
    let inside = placement == LegendMode::Inside;
    let mut stack_base: AHashMap<i32, f64> = AHashMap::new();

    for t in &chart.traces {
        match t {
            Trace::Bar(s) => {
                let stacks = chart.bar_mode == BarMode::Stack && s.stacked;
                let rects = bar_rects(s, stacks.then_some(&mut stack_base));
                let color = to_rgba(s.color, 1.0);
                let anno = ctx
                    .draw_series(
                        rects
                            .into_iter()
                            .map(|(x0, y0, x1, y1)| Rectangle::new([(x0, y0), (x1, y1)], color.filled())),
                    )
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                if inside {
                    anno.label(s.name.as_str())
                        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
                }
            }
            Trace::Line(s) => {
                let color = to_rgba(s.color, 1.0);
                let pts: Vec<(f64, f64)> = s
                    .years
                    .iter()
                    .zip(&s.values)
                    .map(|(y, v)| (*y as f64, *v as f64))
                    .collect();
                let anno = ctx
                    .draw_series(LineSeries::new(pts.clone(), color.stroke_width(3)))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                if inside {
                    anno.label(s.name.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 14, y)], color.stroke_width(3))
                    });
                }
                ctx.draw_series(pts.iter().map(|p| Circle::new(*p, 3, color.filled())))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
            Trace::Scatter(s) => draw_scatter(&mut ctx, s)?,
            Trace::Choropleth(_) => {}
        }
    }

    draw_annotations(&mut ctx, &chart.annotations, locale)?;

    // ----------------------------
    // 4) Legend
    // ----------------------------
    if inside {
        ctx.configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    } else if let Some(ref area) = legend_area {
        draw_legend_panel(area, &items, placement, axis_x_start_px)?;
    }

    plot_area
        .present()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if let Some(ref area) = legend_area {
        area.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// `(x0, y0, x1, y1)` per non-zero bar; stacked bars start on `base` and raise it.
pub fn bar_rects(s: &YearSeries, mut base: Option<&mut AHashMap<i32, f64>>) -> Vec<(f64, f64, f64, f64)> {
    s.years
        .iter()
        .zip(&s.values)
        .filter(|(_, v)| **v > 0)
        .map(|(year, v)| {
            let x = *year as f64;
            let y0 = match base.as_deref_mut() {
                Some(b) => {
                    let slot = b.entry(*year).or_insert(0.0);
                    let y0 = *slot;
                    *slot += *v as f64;
                    y0
                }
                None => 0.0,
            };
            (x - BAR_W / 2.0, y0, x + BAR_W / 2.0, y0 + *v as f64)
        })
        .collect()
}

type Ctx<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, WithKeyPoints<RangedCoordf64>>>;

fn draw_scatter<DB: DrawingBackend>(ctx: &mut Ctx<'_, DB>, s: &ScatterTrace) -> Result<()> {
    let radius: i32 = if s.labeled { 7 } else { 5 };
    ctx.draw_series(s.points.iter().map(|p| {
        let c = to_rgba(p.color, s.opacity);
        EmptyElement::at((p.x, p.y as f64))
            + Circle::new((0, 0), radius, c.filled())
            + Circle::new((0, 0), radius, RGBColor(0x33, 0x33, 0x33).stroke_width(1))
    }))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if !s.labeled {
        return Ok(());
    }
    let style = TextStyle::from((FontFamily::SansSerif, 12)).pos(Pos::new(HPos::Center, VPos::Bottom));
    for p in &s.points {
        let lines: Vec<&str> = p.label.lines().collect();
        let n = lines.len() as i32;
        ctx.draw_series(lines.iter().enumerate().map(|(i, line)| {
            let dy = -radius - 4 - (n - 1 - i as i32) * 14;
            EmptyElement::at((p.x, p.y as f64)) + Text::new(line.to_string(), (0, dy), style.clone())
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_annotations<DB: DrawingBackend>(ctx: &mut Ctx<'_, DB>, anns: &[Annotation], locale: &Locale) -> Result<()> {
    let rotated = (FontFamily::SansSerif, 12)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let flat = TextStyle::from((FontFamily::SansSerif, 12)).pos(Pos::new(HPos::Center, VPos::Bottom));

    ctx.draw_series(anns.iter().map(|a| {
        let text = localize(&a.text, locale);
        let (dy, style) = if a.vertical {
            // Rotated text runs upward from its anchor.
            let w = estimate_text_width_px(&text, 12) as i32;
            (if a.below { 4 + w } else { -4 }, rotated.clone())
        } else {
            (if a.below { 16 } else { -4 }, flat.clone())
        };
        EmptyElement::at((a.x, a.y)) + Text::new(text, (0, dy), style)
    }))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
