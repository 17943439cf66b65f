use oncoviz_rs::aggregate::{distinct_years, sum_by, totals_in_encounter_order};
use oncoviz_rs::ingest::parse_csv_text;
use oncoviz_rs::rank::{top_n, yearly_top_n};

const CYC: &str = "Country,Cancer,Year,Articles
CH,Lung cancer,2020,4
US,Lung cancer,2020,10
CH,Lung cancer,2021,6
FR,Lung cancer,2021,5
US,Lung cancer,2021,20
CH,Breast cancer,2020,9
DE,Lung cancer,2022,2
";

#[test]
fn top_two_with_residual() {
    let t = parse_csv_text(CYC);
    let lung: Vec<_> = t.records.iter().filter(|r| r.cancer() == Some("Lung cancer")).collect();
    let totals = totals_in_encounter_order(lung.iter().copied(), |r| r.country.clone(), |r| r.articles);
    assert_eq!(
        totals,
        vec![("CH".to_string(), 10), ("US".to_string(), 30), ("FR".to_string(), 5), ("DE".to_string(), 2)]
    );

    let ranked = top_n(totals, 2);
    assert_eq!(ranked.top, vec![("US".to_string(), 30), ("CH".to_string(), 10)]);
    assert_eq!(ranked.residual(), 7);
}

#[test]
fn grouped_sum_equals_filtered_sum() {
    let t = parse_csv_text(CYC);
    let grouped = sum_by(
        t.records
            .iter()
            .filter(|r| r.cancer() == Some("Lung cancer") && r.year == Some(2021)),
        |r| r.country.clone(),
        |r| r.articles,
    );
    for (country, sum) in &grouped {
        let direct: u64 = t
            .records
            .iter()
            .filter(|r| {
                r.country() == Some(country.as_str()) && r.cancer() == Some("Lung cancer") && r.year == Some(2021)
            })
            .filter_map(|r| r.articles)
            .sum();
        assert_eq!(*sum, direct, "{country}");
    }
    assert_eq!(grouped.len(), 3);
}

#[test]
fn highlighted_plus_residual_is_total_every_year() {
    let t = parse_csv_text(CYC);
    let years = distinct_years(&t.records);
    for n in 0..=5 {
        let b = yearly_top_n(t.records.iter(), &years, |r| r.country.clone(), n);
        assert_eq!(b.highlighted.len(), n.min(4));
        for i in 0..years.len() {
            let top: u64 = b.highlighted.iter().map(|s| s.values[i]).sum();
            assert_eq!(top + b.residual[i], b.totals[i], "n={n} year={}", years[i]);
        }
    }
}

#[test]
fn years_without_records_read_as_zero() {
    let t = parse_csv_text(CYC);
    let years = [2019, 2020, 2021, 2022];
    let b = yearly_top_n(
        t.records.iter().filter(|r| r.cancer() == Some("Breast cancer")),
        &years,
        |r| r.country.clone(),
        5,
    );
    assert_eq!(b.totals, vec![0, 9, 0, 0]);
    assert_eq!(b.highlighted[0].key, "CH");
}
