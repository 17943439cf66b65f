//! Legend layout and drawing for legends outside the plot area.
//!
//! `Right` is a single wrapped column. `Top`/`Bottom` flow items into rows
//! that start at the plot's x axis, so the band lines up with the bars.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, wrap_text_to_width};
use super::types::LegendMode;

/// Swatch drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    /// Filled square, for bars.
    Block,
    /// Short line with a dot, for line series.
    Line,
    /// Dot, for scatter markers.
    Dot,
}

#[derive(Debug, Clone)]
pub struct LegendItem {
    pub label: String,
    pub color: RGBAColor,
    pub swatch: Swatch,
}

const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD: i32 = 8;
const SWATCH_W: i32 = 14;
const SWATCH_GAP: i32 = 6;
const TRAILING_GAP: i32 = 16;

/// Longest label a band item may show on one line before wrapping.
fn band_text_cap(start_x: i32, total_w: i32) -> u32 {
    (((total_w - start_x - PAD) as f32) * 0.35).max(120.0) as u32
}

/// Rows of `(x offset, wrapped lines)` for the Top/Bottom flow layout.
fn flow_rows(labels: &[&str], start_x: i32, total_w: i32) -> Vec<Vec<(i32, Vec<String>)>> {
    let cap = band_text_cap(start_x, total_w);
    let mut rows: Vec<Vec<(i32, Vec<String>)>> = Vec::new();
    let mut cur: Vec<(i32, Vec<String>)> = Vec::new();
    let mut x = start_x;
    for label in labels {
        let lines = wrap_text_to_width(label, FONT_PX, cap);
        let text_w = lines
            .iter()
            .map(|l| estimate_text_width_px(l, FONT_PX) as i32)
            .max()
            .unwrap_or(0);
        let block_w = SWATCH_W + SWATCH_GAP + text_w + TRAILING_GAP;
        if x + block_w > total_w - PAD && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
        }
        cur.push((x, lines));
        x += block_w;
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

fn row_height(row: &[(i32, Vec<String>)]) -> i32 {
    row.iter()
        .map(|(_, lines)| lines.len().max(1) as i32 * LINE_H)
        .max()
        .unwrap_or(LINE_H)
}

/// Height in pixels the Top/Bottom band needs for `labels`.
pub fn estimate_band_height_px(labels: &[&str], start_x: i32, total_w: i32) -> i32 {
    let rows = flow_rows(labels, start_x, total_w);
    let body: i32 = rows.iter().map(|r| row_height(r)).sum::<i32>()
        + ROW_GAP * (rows.len().saturating_sub(1) as i32);
    body + 2 * PAD
}

fn draw_swatch<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    item: &LegendItem,
    x: i32,
    y_center: i32,
) -> Result<()> {
    let color = item.color;
    match item.swatch {
        Swatch::Block => area
            .draw(&Rectangle::new(
                [(x, y_center - 5), (x + SWATCH_W - 4, y_center + 5)],
                color.filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
        Swatch::Line => {
            area.draw(&PathElement::new(
                vec![(x, y_center), (x + SWATCH_W, y_center)],
                color.stroke_width(3),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            area.draw(&Circle::new((x + SWATCH_W / 2, y_center), 3, color.filled()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?
        }
        Swatch::Dot => area
            .draw(&Circle::new((x + SWATCH_W / 2, y_center), 5, color.filled()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
    }
    Ok(())
}

fn draw_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    item: &LegendItem,
    lines: &[String],
    x: i32,
    top: i32,
) -> Result<()> {
    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));
    let block_h = lines.len().max(1) as i32 * LINE_H;
    draw_swatch(area, item, x, top + block_h / 2)?;
    for (i, line) in lines.iter().enumerate() {
        let y = top + i as i32 * LINE_H + LINE_H / 2;
        area.draw(&Text::new(line.as_str(), (x + SWATCH_W + SWATCH_GAP, y), style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Draw `items` into `area` (already split off the root for `placement`).
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let (w, _) = area.dim_in_pixel();
    let w = w as i32;

    match placement {
        LegendMode::Right => {
            let cap = (w - 2 * PAD - SWATCH_W - SWATCH_GAP).max(40) as u32;
            let mut y = PAD * 2;
            for item in items {
                let lines = wrap_text_to_width(&item.label, FONT_PX, cap);
                draw_block(area, item, &lines, PAD, y)?;
                y += lines.len().max(1) as i32 * LINE_H + ROW_GAP;
            }
        }
        LegendMode::Top | LegendMode::Bottom => {
            let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
            let mut y = PAD;
            let mut next = items.iter();
            for row in flow_rows(&labels, axis_x_start_px, w) {
                for (x, lines) in &row {
                    if let Some(item) = next.next() {
                        draw_block(area, item, lines, *x, y)?;
                    }
                }
                y += row_height(&row) + ROW_GAP;
            }
        }
        LegendMode::Inside | LegendMode::Hidden => {}
    }
    Ok(())
}
