use super::Dataset;
use super::axis::{compact_ticks, nice_ticks};
use crate::aggregate::{align_to_years, articles_per_year};
use crate::chart::{Annotation, BarMode, Chart, Trace, YearSeries};
use crate::filter::{by_cancer, by_country};
use crate::models::Record;
use crate::palette::{Rgb8, SELECTION, TOTALS, rank_color};
use crate::rank::{YearlyBreakdown, yearly_top_n};

const TOP_N: usize = 5;

fn series(name: impl Into<String>, color: Rgb8, years: &[i32], values: Vec<u64>) -> YearSeries {
    YearSeries {
        name: name.into(),
        color,
        years: years.to_vec(),
        values,
        stacked: false,
    }
}

fn max_of<'a>(values: impl IntoIterator<Item = &'a u64>) -> f64 {
    values.into_iter().copied().max().unwrap_or(0) as f64
}

/// Vertical value labels for non-zero bars, above the bar or under the axis.
fn value_labels(years: &[i32], values: &[u64], below: bool) -> Vec<Annotation> {
    years
        .iter()
        .zip(values)
        .filter(|(_, v)| **v > 0)
        .map(move |(y, v)| Annotation {
            x: *y as f64,
            y: if below { 0.0 } else { *v as f64 },
            text: v.to_string(),
            vertical: true,
            below,
        })
        .collect()
}

pub(super) fn studies_per_year(ds: &Dataset) -> Chart {
    let values = align_to_years(&articles_per_year(&ds.records), &ds.years);
    let max = max_of(&values);

    let mut chart = Chart::new(ds.view.slug(), "Number of studies per year").axes("Year", "Number of studies");
    chart.annotations.extend(value_labels(&ds.years, &values, false));
    chart.y_range = Some((0.0, max * 1.25));
    chart.traces.push(Trace::Bar(series("Studies", TOTALS, &ds.years, values)));
    chart
}

/// Studies of `cancer` in every country against the `(country, cancer)` pair.
pub(super) fn selected_country_cancer(ds: &Dataset, country: &str, cancer: &str) -> Chart {
    let of_cancer: Vec<&Record> = by_cancer(&ds.records, cancer).collect();
    let totals = align_to_years(&articles_per_year(of_cancer.iter().copied()), &ds.years);
    let pair = align_to_years(
        &articles_per_year(of_cancer.iter().copied().filter(|r| r.country() == Some(country))),
        &ds.years,
    );

    let max = max_of(&totals);
    let ticks = nice_ticks(max);
    let upper = ticks.last().copied().unwrap_or(0.0);

    let mut chart = Chart::new(ds.view.slug(), "Studies per year for selected country and cancer type")
        .axes("Year", "Number of studies");
    chart.annotations.extend(value_labels(&ds.years, &totals, false));
    chart.annotations.extend(value_labels(&ds.years, &pair, true));
    chart.y_range = Some((-max * 0.24, upper * 1.25));
    chart.y_ticks = compact_ticks(&ticks);
    chart.traces.push(Trace::Bar(series(
        format!("Total {cancer} studies"),
        TOTALS,
        &ds.years,
        totals,
    )));
    chart.traces.push(Trace::Bar(series(
        format!("{country} {cancer} studies"),
        SELECTION,
        &ds.years,
        pair,
    )));
    chart
}

/// "All" totals behind the top-N entities stacked per year.
fn stacked_top(ds: &Dataset, title: String, all_label: &str, breakdown: YearlyBreakdown<String>) -> Chart {
    let max = max_of(&breakdown.totals);
    let ticks = nice_ticks(max);

    let mut chart = Chart::new(ds.view.slug(), title).axes("Year", "Number of studies");
    chart.bar_mode = BarMode::Stack;
    chart.y_range = Some((0.0, max * 1.2));
    chart.y_ticks = compact_ticks(&ticks);
    chart.annotations.extend(value_labels(&ds.years, &breakdown.totals, false));
    chart.traces.push(Trace::Bar(series(all_label, TOTALS, &ds.years, breakdown.totals)));
    for (i, s) in breakdown.highlighted.into_iter().enumerate() {
        let mut bar = series(s.key, rank_color(i), &ds.years, s.values);
        bar.stacked = true;
        chart.traces.push(Trace::Bar(bar));
    }
    chart
}

pub(super) fn country_top_cancers(ds: &Dataset, country: &str) -> Chart {
    let breakdown = yearly_top_n(by_country(&ds.records, country), &ds.years, |r| r.cancer.clone(), TOP_N);
    stacked_top(ds, format!("Most studied cancers in {country}"), "All cancers", breakdown)
}

pub(super) fn cancer_top_countries(ds: &Dataset, cancer: &str) -> Chart {
    let breakdown = yearly_top_n(by_cancer(&ds.records, cancer), &ds.years, |r| r.country.clone(), TOP_N);
    stacked_top(
        ds,
        format!("Countries with the highest number of {cancer} studies"),
        "All countries",
        breakdown,
    )
}

pub(super) fn cancer_top_countries_lines(ds: &Dataset, cancer: &str) -> Chart {
    let breakdown = yearly_top_n(by_cancer(&ds.records, cancer), &ds.years, |r| r.country.clone(), TOP_N);
    let max = max_of(breakdown.highlighted.iter().flat_map(|s| &s.values));

    let mut chart = Chart::new(ds.view.slug(), format!("Top countries over time for {cancer}"))
        .axes("Year", "Number of articles");
    chart.y_range = Some((0.0, max * 1.2));
    for (i, s) in breakdown.highlighted.into_iter().enumerate() {
        chart
            .traces
            .push(Trace::Line(series(s.key, rank_color(i), &ds.years, s.values)));
    }
    chart
}

#[cfg(test)]
mod tests {
    use crate::chart::{BarMode, Chart, Trace, YearSeries};
    use crate::config::DashboardConfig;
    use crate::ingest::parse_csv_text;
    use crate::views::{Dataset, Selection, ViewId};

    const CYC: &str = "Country,Cancer,Year,Articles
United States,Breast cancer,2000,30
Switzerland,Breast cancer,2000,10
France,Breast cancer,2000,5
France,Breast cancer,2001,7
United States,Breast cancer,2001,1
Switzerland,Lung cancer,2001,4
Switzerland,Other cancer,2001,100
";

    fn build(view: ViewId, sel: Selection) -> Chart {
        let cfg = DashboardConfig::default();
        Dataset::new(view, &parse_csv_text(CYC), &cfg).chart(&sel, &cfg)
    }

    fn bars(chart: &Chart) -> Vec<&YearSeries> {
        chart
            .traces
            .iter()
            .filter_map(|t| match t {
                Trace::Bar(s) | Trace::Line(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pair_view_uses_defaults() {
        let chart = build(ViewId::SelectedCountryCancer, Selection::default());
        let b = bars(&chart);
        assert_eq!(b[0].name, "Total Breast cancer studies");
        assert_eq!(b[0].values, vec![45, 8]);
        assert_eq!(b[1].name, "United States Breast cancer studies");
        assert_eq!(b[1].values, vec![30, 1]);
        assert_eq!(chart.bar_mode, BarMode::Overlay);
        // Ticks go 0, 5, ..., 45, so the axis tops out at 45 * 1.25.
        let (lo, hi) = chart.y_range.unwrap();
        assert!((lo + 45.0 * 0.24).abs() < 1e-9);
        assert!((hi - 56.25).abs() < 1e-9);
    }

    #[test]
    fn country_view_excludes_configured_cancers() {
        let chart = build(
            ViewId::CountryTopCancers,
            Selection {
                country: Some("Switzerland".into()),
                cancer: None,
            },
        );
        let b = bars(&chart);
        let names: Vec<&str> = b.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["All cancers", "Breast cancer", "Lung cancer"]);
        assert_eq!(b[0].values, vec![10, 4]);
        assert!(b[1].stacked && !b[0].stacked);
        assert_eq!(chart.bar_mode, BarMode::Stack);
    }

    #[test]
    fn cancer_view_keeps_per_year_totals() {
        let chart = build(ViewId::CancerTopCountries, Selection::default());
        let b = bars(&chart);
        assert_eq!(b[0].name, "All countries");
        for i in 0..b[0].values.len() {
            let top: u64 = b[1..].iter().map(|s| s.values[i]).sum();
            assert!(top <= b[0].values[i]);
        }
        assert_eq!(b[1].name, "United States");
    }

    #[test]
    fn lines_view_has_no_totals_trace() {
        let chart = build(ViewId::CancerTopCountriesLines, Selection::default());
        assert!(chart.traces.iter().all(|t| matches!(t, Trace::Line(_))));
        assert_eq!(chart.traces.len(), 3);
    }

    #[test]
    fn unknown_selection_yields_zero_series() {
        let chart = build(
            ViewId::CancerTopCountries,
            Selection {
                country: None,
                cancer: Some("breast cancer".into()),
            },
        );
        let b = bars(&chart);
        assert_eq!(b.len(), 1);
        assert!(b[0].values.iter().all(|v| *v == 0));
    }
}
