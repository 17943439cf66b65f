use oncoviz_rs::ingest::{self, parse_csv_text};
use oncoviz_rs::{DashboardError, Field};
use std::path::PathBuf;

const CYC: &str = "Country,Cancer,Year,Articles
Switzerland,Breast cancer,2020,6

Switzerland,Lung cancer,2020,3
United States,Breast cancer,2021,25
France,Breast cancer,2021
switzerland,Breast cancer,2020,1
";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn record_count_matches_well_formed_lines() {
    let t = parse_csv_text(CYC);
    // Six non-blank data lines, one of which has three cells.
    assert_eq!(t.len(), 5);
    assert_eq!(t.dropped, 1);
    assert!(t.has_column(Field::Articles));
    assert!(!t.has_column(Field::Asr));
}

#[test]
fn short_row_is_dropped_not_padded() {
    let t = parse_csv_text(CYC);
    assert!(t.records.iter().all(|r| r.country() != Some("France")));
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(parse_csv_text(CYC), parse_csv_text(CYC));
}

#[test]
fn country_matching_is_case_sensitive() {
    let t = parse_csv_text(CYC);
    let upper = t.records.iter().filter(|r| r.country() == Some("Switzerland")).count();
    let lower = t.records.iter().filter(|r| r.country() == Some("switzerland")).count();
    assert_eq!((upper, lower), (2, 1));
}

#[test]
fn unparsable_numbers_become_missing_fields() {
    let t = parse_csv_text("Country,ASR\nChile,n/a\nPeru,NaN\nCuba,120.5\n");
    assert_eq!(t.len(), 3);
    let asr: Vec<Option<f64>> = t.records.iter().map(|r| r.asr).collect();
    assert_eq!(asr, vec![None, None, Some(120.5)]);
}

#[test]
fn load_from_disk_counts_blank_and_short_lines() {
    let t = ingest::load_csv(fixture("articles_year.csv")).unwrap();
    assert_eq!(t.header, vec!["Year", "Articles"]);
    assert_eq!(t.len(), 4);
    assert_eq!(t.dropped, 1);
}

#[test]
fn missing_file_is_a_typed_error() {
    let err = ingest::load_csv(fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DashboardError::DatasetRead { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
