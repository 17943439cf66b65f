use oncoviz_rs::chart::{BarMode, Chart, Trace, YearSeries};
use oncoviz_rs::{DashboardConfig, Dataset, Selection, ViewId, ingest};
use std::path::PathBuf;

fn config() -> DashboardConfig {
    DashboardConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
        ..DashboardConfig::default()
    }
}

fn build(view: ViewId, sel: &Selection) -> Chart {
    let cfg = config();
    let table = ingest::load_csv(cfg.dataset_path(view.dataset())).unwrap();
    Dataset::new(view, &table, &cfg).chart(sel, &cfg)
}

fn bars(chart: &Chart) -> Vec<&YearSeries> {
    chart
        .traces
        .iter()
        .filter_map(|t| match t {
            Trace::Bar(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[test]
fn every_view_builds_from_the_fixture_data() {
    for view in ViewId::ALL {
        let chart = build(view, &Selection::default());
        assert_eq!(chart.id, view.slug());
        assert!(!chart.is_empty(), "{view} is empty");
        assert_eq!(chart.is_geo(), view.is_map(), "{view}");
    }
}

#[test]
fn studies_per_year_skips_the_short_row() {
    let chart = build(ViewId::StudiesPerYear, &Selection::default());
    let b = bars(&chart);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].years, vec![2019, 2020, 2021, 2022]);
    assert_eq!(b[0].values, vec![120, 135, 160, 171]);
    assert_eq!(chart.annotations.len(), 4);
}

#[test]
fn pair_view_defaults_to_united_states_breast_cancer() {
    let chart = build(ViewId::SelectedCountryCancer, &Selection::default());
    let b = bars(&chart);
    assert_eq!(b[0].name, "Total Breast cancer studies");
    assert_eq!(b[0].values, vec![33, 40]);
    assert_eq!(b[1].name, "United States Breast cancer studies");
    assert_eq!(b[1].values, vec![20, 25]);
    let (lo, _) = chart.y_range.unwrap();
    assert!(lo < 0.0);
}

#[test]
fn country_top_cancers_hides_excluded_categories() {
    let chart = build(ViewId::CountryTopCancers, &Selection::default());
    assert_eq!(chart.bar_mode, BarMode::Stack);
    let b = bars(&chart);
    let names: Vec<&str> = b.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["All cancers", "Breast cancer", "Lung cancer"]);
    assert_eq!(b[0].values, vec![9, 4]);
    assert!(!b[0].stacked);
    assert!(b[1].stacked);
}

#[test]
fn cancer_top_countries_keeps_five_and_totals_everything() {
    let sel = Selection {
        country: None,
        cancer: Some("Breast cancer".into()),
    };
    let chart = build(ViewId::CancerTopCountries, &sel);
    let b = bars(&chart);
    // "All countries" plus the five highlighted ones.
    assert_eq!(b.len(), 6);
    assert_eq!(b[0].values, vec![33, 40]);
    assert_eq!(b[1].name, "United States");
    let highlighted: u64 = b[1..].iter().flat_map(|s| &s.values).sum();
    assert!(highlighted < 73);
}

#[test]
fn lines_view_has_no_totals_trace() {
    let chart = build(ViewId::CancerTopCountriesLines, &Selection::default());
    assert!(chart.traces.iter().all(|t| matches!(t, Trace::Line(_))));
    assert_eq!(chart.traces.len(), 5);
}

#[test]
fn explicit_unknown_selection_gives_empty_series() {
    let sel = Selection {
        country: Some("Narnia".into()),
        cancer: None,
    };
    let chart = build(ViewId::CountryTopCancers, &sel);
    let b = bars(&chart);
    assert_eq!(b.len(), 1);
    assert!(b[0].values.iter().all(|v| *v == 0));
}

#[test]
fn scatter_excludes_rows_without_asr() {
    let chart = build(ViewId::ScatterCancerCountries, &Selection::default());
    let labels: Vec<&str> = chart
        .traces
        .iter()
        .filter_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            _ => None,
        })
        .flat_map(|s| s.points.iter().map(|p| p.label.as_str()))
        .collect();
    assert_eq!(labels.len(), 6);
    assert!(!labels.contains(&"Brazil"));
}

#[test]
fn incidence_map_drops_unmapped_countries() {
    let chart = build(ViewId::IncidenceMap, &Selection::default());
    let Trace::Choropleth(c) = &chart.traces[0] else {
        panic!("expected a map trace");
    };
    assert_eq!(c.locations.len(), 6);
    assert!(c.locations.contains(&"CHE".to_string()));
    assert!(!c.text.contains(&"Atlantis".to_string()));
}
