/*!
 * Desktop dashboard for oncoviz-rs
 *
 * One panel per view. Each panel loads its CSV on a background thread the
 * first time it is shown (or when the data directory changes), regroups
 * synchronously when a dropdown changes, and can export the current chart.
 */

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use log::{debug, error, info};
use oncoviz_rs::chart::{BarMode, Chart, Trace};
use oncoviz_rs::palette::Rgb8;
use oncoviz_rs::viz::{LegendMode, RenderOptions, XAxis};
use oncoviz_rs::{DashboardConfig, Dataset, Selection, ViewId, ingest, storage, viz};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let cfg = match std::env::args_os().nth(1) {
        Some(path) => DashboardConfig::load(&path).unwrap_or_else(|err| {
            error!("{err}; using the default configuration");
            DashboardConfig::default()
        }),
        None => DashboardConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([700.0, 480.0])
            .with_title("Oncology dashboard - oncoviz"),
        ..Default::default()
    };

    eframe::run_native(
        "oncoviz",
        options,
        Box::new(|_cc| Ok(Box::new(OncovizApp::new(cfg)))),
    )
}

/// A finished background load, tagged with the file it was issued for.
struct Loaded {
    path: PathBuf,
    result: Result<Dataset, String>,
}

struct ViewPanel {
    view: ViewId,
    /// File the panel currently wants; results for any other path are stale.
    wanted: Option<PathBuf>,
    dataset: Option<Dataset>,
    selection: Selection,
    chart: Option<Chart>,
    error: Option<String>,
    tx: mpsc::Sender<Loaded>,
    rx: mpsc::Receiver<Loaded>,
}

impl ViewPanel {
    fn new(view: ViewId) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            view,
            wanted: None,
            dataset: None,
            selection: Selection::default(),
            chart: None,
            error: None,
            tx,
            rx,
        }
    }

    fn is_loading(&self) -> bool {
        self.wanted.is_some() && self.dataset.is_none() && self.error.is_none()
    }

    /// Issue a load unless one for `path` was already requested.
    fn ensure_loaded(&mut self, path: PathBuf, cfg: &DashboardConfig) {
        if self.wanted.as_ref() == Some(&path) {
            return;
        }
        debug!("{}: loading {}", self.view, path.display());
        self.wanted = Some(path.clone());
        self.dataset = None;
        self.chart = None;
        self.error = None;

        let tx = self.tx.clone();
        let view = self.view;
        let cfg = cfg.clone();
        thread::spawn(move || {
            let result = ingest::load_csv(&path)
                .map(|table| Dataset::new(view, &table, &cfg))
                .map_err(|e| e.to_string());
            let _ = tx.send(Loaded { path, result });
        });
    }

    fn poll(&mut self, cfg: &DashboardConfig) {
        while let Ok(done) = self.rx.try_recv() {
            if self.wanted.as_ref() != Some(&done.path) {
                debug!("{}: discarding stale result for {}", self.view, done.path.display());
                continue;
            }
            match done.result {
                Ok(ds) => {
                    info!("{}: {} usable records", self.view, ds.records.len());
                    self.chart = Some(ds.chart(&self.selection, cfg));
                    self.dataset = Some(ds);
                }
                Err(err) => {
                    error!("{}: {err}", self.view);
                    self.error = Some(err);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Svg,
    Png,
    Json,
    Csv,
}

impl ExportFormat {
    fn ext(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

struct OncovizApp {
    cfg: DashboardConfig,
    data_dir: String,
    panels: Vec<ViewPanel>,
    current: usize,

    export_dir: String,
    export_format: ExportFormat,
    legend: LegendMode,

    status_message: String,
    error_message: String,
}

impl OncovizApp {
    fn new(cfg: DashboardConfig) -> Self {
        let export_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();
        Self {
            data_dir: cfg.data_dir.to_string_lossy().to_string(),
            cfg,
            panels: ViewId::ALL.into_iter().map(ViewPanel::new).collect(),
            current: 0,
            export_dir,
            export_format: ExportFormat::Svg,
            legend: LegendMode::Bottom,
            status_message: String::new(),
            error_message: String::new(),
        }
    }

    fn export_current(&mut self) {
        let panel = &self.panels[self.current];
        let Some(chart) = &panel.chart else {
            self.error_message = "Nothing to export yet".to_string();
            return;
        };
        let out = PathBuf::from(&self.export_dir).join(format!("{}.{}", panel.view.slug(), self.export_format.ext()));
        let mut opts = RenderOptions::from(&self.cfg.plot);
        opts.legend = self.legend;
        let result = match self.export_format {
            ExportFormat::Svg | ExportFormat::Png => viz::render_chart(chart, &out, &opts),
            ExportFormat::Json => storage::save_chart_json(chart, &out),
            ExportFormat::Csv => storage::save_series_csv(chart, &out),
        };
        match result {
            Ok(()) => {
                self.status_message = format!("Wrote {}", out.display());
                self.error_message.clear();
            }
            Err(err) => {
                self.error_message = format!("Export failed: {err}");
                self.status_message.clear();
            }
        }
    }
}

impl eframe::App for OncovizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for panel in &mut self.panels {
            panel.poll(&self.cfg);
        }

        let current = &mut self.panels[self.current];
        let path = self.cfg.dataset_path(current.view.dataset());
        current.ensure_loaded(path, &self.cfg);
        if current.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("data_dir").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Data directory:");
                if ui.text_edit_singleline(&mut self.data_dir).lost_focus() {
                    self.cfg.data_dir = PathBuf::from(&self.data_dir);
                }
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new().pick_folder()
                {
                    self.data_dir = path.to_string_lossy().to_string();
                    self.cfg.data_dir = path;
                }
            });
        });

        egui::SidePanel::left("views").resizable(false).show(ctx, |ui| {
            ui.heading("Views");
            ui.add_space(6.0);
            for (i, panel) in self.panels.iter().enumerate() {
                if ui.selectable_label(i == self.current, panel.view.heading()).clicked() {
                    self.current = i;
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let cfg = &self.cfg;
                let panel = &mut self.panels[self.current];
                ui.heading(panel.view.heading());
                ui.add_space(8.0);

                if let Some(err) = &panel.error {
                    ui.colored_label(Color32::RED, format!("Could not load data: {err}"));
                } else if let Some(ds) = &panel.dataset {
                    if selectors(ui, ds, &mut panel.selection, cfg) || panel.chart.is_none() {
                        panel.chart = Some(ds.chart(&panel.selection, cfg));
                    }
                    if let Some(chart) = &panel.chart {
                        ui.add_space(6.0);
                        ui.label(egui::RichText::new(&chart.title).strong());
                        if chart.is_geo() {
                            geo_table(ui, chart);
                        } else {
                            paint_chart(ui, chart);
                        }
                    }
                } else {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading…");
                    });
                }

                ui.add_space(12.0);
                ui.group(|ui| {
                    ui.label("Export");
                    ui.horizontal(|ui| {
                        ui.label("Format:");
                        ui.radio_value(&mut self.export_format, ExportFormat::Svg, "SVG");
                        ui.radio_value(&mut self.export_format, ExportFormat::Png, "PNG");
                        ui.radio_value(&mut self.export_format, ExportFormat::Json, "JSON");
                        ui.radio_value(&mut self.export_format, ExportFormat::Csv, "CSV");
                    });
                    ui.horizontal(|ui| {
                        ui.label("Legend:");
                        egui::ComboBox::from_id_salt("legend")
                            .selected_text(self.legend.to_string())
                            .show_ui(ui, |ui| {
                                for mode in [
                                    LegendMode::Bottom,
                                    LegendMode::Right,
                                    LegendMode::Top,
                                    LegendMode::Inside,
                                    LegendMode::Hidden,
                                ] {
                                    ui.selectable_value(&mut self.legend, mode, mode.to_string());
                                }
                            });
                    });
                    ui.horizontal(|ui| {
                        ui.label("Output directory:");
                        ui.text_edit_singleline(&mut self.export_dir);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder()
                        {
                            self.export_dir = path.to_string_lossy().to_string();
                        }
                    });
                    if ui.button("Export chart").clicked() {
                        self.export_current();
                    }
                });

                if !self.status_message.is_empty() {
                    ui.colored_label(Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(Color32::RED, &self.error_message);
                }
            });
        });
    }
}

/// Country/Cancer dropdowns for the view. Returns true when a value changed.
fn selectors(ui: &mut egui::Ui, ds: &Dataset, sel: &mut Selection, cfg: &DashboardConfig) -> bool {
    let wanted = ds.view.selectors();
    let resolved = ds.resolve(sel, cfg);
    let mut changed = false;
    ui.horizontal(|ui| {
        if wanted.country {
            changed |= dropdown(ui, "Country", &ds.countries, resolved.country.as_deref(), &mut sel.country);
        }
        if wanted.cancer {
            changed |= dropdown(ui, "Cancer", &ds.cancers, resolved.cancer.as_deref(), &mut sel.cancer);
        }
    });
    changed
}

fn dropdown(
    ui: &mut egui::Ui,
    label: &str,
    options: &[String],
    shown: Option<&str>,
    slot: &mut Option<String>,
) -> bool {
    let mut changed = false;
    ui.label(format!("{label}:"));
    egui::ComboBox::from_id_salt(label)
        .selected_text(shown.unwrap_or("-"))
        .width(220.0)
        .show_ui(ui, |ui| {
            for opt in options {
                if ui.selectable_label(shown == Some(opt.as_str()), opt.as_str()).clicked() {
                    *slot = Some(opt.clone());
                    changed = true;
                }
            }
        });
    changed
}

fn color(c: Rgb8, opacity: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

fn paint_chart(ui: &mut egui::Ui, chart: &Chart) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 380.0), Sense::hover());
    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(rect.min + Vec2::new(64.0, 12.0), rect.max - Vec2::new(12.0, 28.0));
    let axis = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    if chart.is_empty() {
        painter.text(plot.center(), Align2::CENTER_CENTER, "No data", FontId::proportional(16.0), axis);
        return;
    }

    let fr = viz::frame(chart);
    let to_screen = |x: f64, y: f64| {
        let tx = ((x - fr.x.0) / (fr.x.1 - fr.x.0)) as f32;
        let ty = ((y - fr.y.0) / (fr.y.1 - fr.y.0)) as f32;
        Pos2::new(plot.left() + tx * plot.width(), plot.bottom() - ty * plot.height())
    };

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], Stroke::new(1.0, axis));
    painter.line_segment([plot.left_bottom(), plot.left_top()], Stroke::new(1.0, axis));
    for v in viz::y_tick_values(chart, &fr) {
        let label = if chart.y_ticks.is_empty() { format!("{v:.0}") } else { viz::y_tick_label(chart, v) };
        let p = to_screen(fr.x.0, v);
        painter.text(p - Vec2::new(4.0, 0.0), Align2::RIGHT_CENTER, label, font.clone(), axis);
    }

    let mut x_labels: Vec<f64> = Vec::new();
    let mut stack_base = ahash::AHashMap::new();
    for t in &chart.traces {
        match t {
            Trace::Bar(s) => {
                let stacks = chart.bar_mode == BarMode::Stack && s.stacked;
                for (x0, y0, x1, y1) in viz::bar_rects(s, stacks.then_some(&mut stack_base)) {
                    let r = Rect::from_two_pos(to_screen(x0, y0), to_screen(x1, y1));
                    painter.rect_filled(r, 0.0, color(s.color, 1.0));
                }
                x_labels.extend(s.years.iter().map(|y| *y as f64));
            }
            Trace::Line(s) => {
                let pts: Vec<Pos2> = s
                    .years
                    .iter()
                    .zip(&s.values)
                    .map(|(y, v)| to_screen(*y as f64, *v as f64))
                    .collect();
                painter.add(egui::Shape::line(pts, Stroke::new(2.5, color(s.color, 1.0))));
                x_labels.extend(s.years.iter().map(|y| *y as f64));
            }
            Trace::Scatter(s) => {
                for p in &s.points {
                    let at = to_screen(p.x, p.y as f64);
                    painter.circle_filled(at, if s.labeled { 6.0 } else { 4.0 }, color(p.color, s.opacity));
                    if s.labeled {
                        painter.text(at + Vec2::new(8.0, 0.0), Align2::LEFT_CENTER, &p.label, font.clone(), axis);
                    }
                }
            }
            Trace::Choropleth(_) => {}
        }
    }

    match fr.x_axis {
        XAxis::Years => {
            x_labels.sort_by(f64::total_cmp);
            x_labels.dedup();
            let stride = (x_labels.len() / 12).max(1);
            for x in x_labels.iter().step_by(stride) {
                let p = to_screen(*x, fr.y.0);
                painter.text(p + Vec2::new(0.0, 4.0), Align2::CENTER_TOP, format!("{x:.0}"), font.clone(), axis);
            }
        }
        XAxis::Continuous => {
            for i in 0..=4 {
                let v = fr.x.0 + (fr.x.1 - fr.x.0) * i as f64 / 4.0;
                let p = to_screen(v, fr.y.0);
                painter.text(p + Vec2::new(0.0, 4.0), Align2::CENTER_TOP, format!("{v:.1}"), font.clone(), axis);
            }
        }
    }

    ui.horizontal_wrapped(|ui| {
        for t in &chart.traces {
            let swatch = match t {
                Trace::Bar(s) | Trace::Line(s) => color(s.color, 1.0),
                Trace::Scatter(s) if !s.labeled => match s.points.first() {
                    Some(p) => color(p.color, s.opacity),
                    None => continue,
                },
                _ => continue,
            };
            ui.colored_label(swatch, "■");
            ui.label(t.name());
            ui.add_space(10.0);
        }
    });
}

/// Maps are exported as JSON; in the dashboard they show as a table.
fn geo_table(ui: &mut egui::Ui, chart: &Chart) {
    let mut rows: HashMap<&str, Vec<(&str, f64)>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for t in &chart.traces {
        let Trace::Choropleth(c) = t else { continue };
        for (text, z) in c.text.iter().zip(&c.z) {
            let entry = rows.entry(text.as_str()).or_insert_with(|| {
                order.push(text.as_str());
                Vec::new()
            });
            entry.push((c.name.as_str(), *z));
        }
    }
    if order.is_empty() {
        ui.label("No data");
        return;
    }
    egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
        egui::Grid::new("geo_rows").striped(true).show(ui, |ui| {
            ui.strong("Country");
            ui.strong("Layer");
            ui.strong("Value");
            ui.end_row();
            for country in &order {
                for (layer, z) in &rows[country] {
                    ui.label(*country);
                    ui.label(*layer);
                    ui.label(format!("{z:.2}"));
                    ui.end_row();
                }
            }
        });
    });
}
