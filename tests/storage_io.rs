use oncoviz_rs::chart::{Chart, Trace, YearSeries};
use oncoviz_rs::palette::Rgb8;
use oncoviz_rs::storage;
use std::fs;

fn sample() -> Chart {
    let mut chart = Chart::new("studies-per-year", "Number of studies per year").axes("Year", "Number of studies");
    chart.traces.push(Trace::Bar(YearSeries {
        name: "=SUM(A1)".into(),
        color: Rgb8::new(0x1f, 0x77, 0xb4),
        years: vec![2020, 2021, 2022],
        values: vec![3, 0, 7],
        stacked: false,
    }));
    chart
}

#[test]
fn save_series_csv_and_chart_json() {
    let chart = sample();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("series.csv");
    storage::save_series_csv(&chart, &csv_path).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(header, vec!["trace", "kind", "x", "y", "label", "color"]);
    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "'=SUM(A1)");
    assert_eq!(&rows[0][1], "bar");
    assert_eq!(&rows[2][2], "2022");
    assert_eq!(&rows[2][3], "7");

    let json_path = dir.path().join("chart.json");
    storage::save_chart_json(&chart, &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v["id"], "studies-per-year");
    assert_eq!(v["traces"][0]["type"], "bar");
    assert_eq!(v["traces"][0]["values"].as_array().unwrap().len(), 3);
}

#[test]
fn saving_into_a_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("chart.json");
    assert!(storage::save_chart_json(&sample(), &path).is_err());
}
