use oncoviz_rs::chart::{Annotation, BarMode, Chart, ScatterPoint, ScatterTrace, Trace, YearSeries};
use oncoviz_rs::palette::{GREY, Rgb8, TOTALS};
use oncoviz_rs::viz::{self, LegendMode, RenderOptions};
use oncoviz_rs::{DashboardConfig, DashboardError, Dataset, Selection, ViewId, ingest};
use std::fs;
use std::path::{Path, PathBuf};

fn series(name: &str, color: Rgb8, values: Vec<u64>, stacked: bool) -> YearSeries {
    YearSeries {
        name: name.into(),
        color,
        years: vec![2019, 2020, 2021],
        values,
        stacked,
    }
}

fn stacked_chart() -> Chart {
    let mut chart = Chart::new("country-top-cancers", "Most studied cancers in Switzerland").axes("Year", "Number of studies");
    chart.bar_mode = BarMode::Stack;
    chart.traces.push(Trace::Bar(series("All cancers", TOTALS, vec![12, 30, 1500], false)));
    chart.traces.push(Trace::Bar(series("Breast cancer", Rgb8::new(0xff, 0x69, 0xb4), vec![8, 20, 900], true)));
    chart.traces.push(Trace::Bar(series("Lung cancer", Rgb8::new(0x1f, 0x77, 0xb4), vec![2, 6, 400], true)));
    chart.annotations.push(Annotation {
        x: 2021.0,
        y: 1500.0,
        text: "1500".into(),
        vertical: true,
        below: false,
    });
    chart
}

fn scatter_chart() -> Chart {
    let mut chart = Chart::new("scatter-cancer-countries", "ASR vs Articles for Breast cancer");
    chart.traces.push(Trace::Scatter(ScatterTrace {
        name: "Top 5".into(),
        points: vec![ScatterPoint {
            x: 95.9,
            y: 250,
            label: "United States".into(),
            color: Rgb8::new(0x3c, 0x3b, 0x6e),
        }],
        labeled: true,
        opacity: 0.9,
    }));
    chart.traces.push(Trace::Scatter(ScatterTrace {
        name: "Others".into(),
        points: vec![ScatterPoint {
            x: 41.5,
            y: 12,
            label: "Chile".into(),
            color: GREY,
        }],
        labeled: false,
        opacity: 0.75,
    }));
    chart
}

fn assert_written(path: &Path) {
    let meta = fs::metadata(path).expect("file created");
    assert!(meta.len() > 0, "{} has content", path.display());
}

#[test]
fn stacked_bars_to_svg_with_every_legend_mode() {
    let dir = tempfile::tempdir().unwrap();
    for legend in [
        LegendMode::Inside,
        LegendMode::Right,
        LegendMode::Top,
        LegendMode::Bottom,
        LegendMode::Hidden,
    ] {
        let path = dir.path().join(format!("stacked_{legend}.svg"));
        let opts = RenderOptions {
            legend,
            ..RenderOptions::default()
        };
        viz::render_chart(&stacked_chart(), &path, &opts).unwrap();
        assert_written(&path);
    }
    let svg = fs::read_to_string(dir.path().join("stacked_bottom.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Breast cancer"));
}

#[test]
fn scatter_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scatter.png");
    viz::render_default(&scatter_chart(), &path).unwrap();
    assert_written(&path);
}

#[test]
fn empty_chart_renders_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let chart = Chart::new("studies-per-year", "Number of studies per year");
    viz::render_default(&chart, &path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("No data"));
}

#[test]
fn maps_are_rejected_with_a_typed_error() {
    let cfg = DashboardConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
        ..DashboardConfig::default()
    };
    let view = ViewId::IncidenceMap;
    let table = ingest::load_csv(cfg.dataset_path(view.dataset())).unwrap();
    let chart = Dataset::new(view, &table, &cfg).chart(&Selection::default(), &cfg);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.svg");
    let err = viz::render_default(&chart, &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::GeoRender(id)) if id == "incidence-map"
    ));
    assert!(!path.exists());
}

#[test]
fn compact_y_ticks_are_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticks.svg");
    let mut chart = stacked_chart();
    chart.y_ticks = oncoviz_rs::views::axis::compact_ticks(&[0.0, 500.0, 1000.0, 1500.0]);
    viz::render_default(&chart, &path).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("1.5K"));
}
