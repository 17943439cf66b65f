use super::Dataset;
use crate::chart::{Chart, ScatterPoint, ScatterTrace, Trace};
use crate::filter::{by_cancer, by_country};
use crate::models::Record;
use crate::palette::{GREY, LIGHT_GREY, Rgb8, cancer_color_or, country_color_or};
use crate::rank::rank_by;

fn point(r: &Record, label: String, color: Rgb8) -> ScatterPoint {
    ScatterPoint {
        x: r.asr.unwrap_or_default(),
        y: r.articles.unwrap_or_default(),
        label,
        color,
    }
}

/// Split rows into the `n` most studied (coloured, labelled) and the rest (grey).
fn split_scatter<'a>(
    rows: Vec<&'a Record>,
    n: usize,
    label: impl Fn(&Record) -> String,
    highlight: impl Fn(&Record) -> Rgb8,
    rest_opacity: f64,
) -> [ScatterTrace; 2] {
    let ranked = rank_by(rows, n, |r| r.articles.unwrap_or_default());
    let top = ScatterTrace {
        name: format!("Top {n}"),
        points: ranked.top.iter().map(|&r| point(r, label(r), highlight(r))).collect(),
        labeled: true,
        opacity: 0.9,
    };
    let rest = ScatterTrace {
        name: "Others".into(),
        points: ranked.rest.iter().map(|&r| point(r, label(r), GREY)).collect(),
        labeled: false,
        opacity: rest_opacity,
    };
    [top, rest]
}

pub(super) fn cancer_countries(ds: &Dataset, cancer: &str) -> Chart {
    let rows: Vec<&Record> = by_cancer(&ds.records, cancer).collect();
    let country = |r: &Record| r.country().unwrap_or_default().to_string();
    let traces = split_scatter(
        rows,
        5,
        country,
        |r| country_color_or(r.country().unwrap_or_default(), GREY),
        0.75,
    );

    let mut chart =
        Chart::new(ds.view.slug(), format!("ASR vs Articles for {cancer}")).axes("Incidence (ASR)", "Number of Articles");
    chart.traces.extend(traces.into_iter().map(Trace::Scatter));
    chart
}

/// Highlighted labels break at spaces so multi-word cancer names stack.
pub(super) fn country_cancers(ds: &Dataset, country: &str) -> Chart {
    let rows: Vec<&Record> = by_country(&ds.records, country).collect();
    let [mut top, rest] = split_scatter(
        rows,
        3,
        |r| r.cancer().unwrap_or_default().to_string(),
        |r| cancer_color_or(r.cancer().unwrap_or_default(), LIGHT_GREY),
        0.5,
    );
    top.name = "Top 3 cancers".into();
    for p in &mut top.points {
        p.label = p.label.replace(' ', "\n");
    }

    let mut chart = Chart::new(ds.view.slug(), format!("Cancer research vs incidence in {country}"))
        .axes("Incidence", "Number of Articles");
    chart.traces.push(Trace::Scatter(top));
    chart.traces.push(Trace::Scatter(ScatterTrace {
        name: "Other cancers".into(),
        ..rest
    }));
    chart
}

#[cfg(test)]
mod tests {
    use crate::chart::{Chart, ScatterTrace, Trace};
    use crate::config::DashboardConfig;
    use crate::ingest::parse_csv_text;
    use crate::palette::GREY;
    use crate::views::{Dataset, Selection, ViewId};

    const CCAA: &str = "Cancer,Country,Articles,ASR
Breast cancer,Chile,40,50.1
Breast cancer,United States,900,120.5
Breast cancer,Atlantis,700,10
Breast cancer,Peru,3,44
Breast cancer,Bolivia,2,40
Breast cancer,Ecuador,1,39
Breast cancer,Uruguay,5,
Lung cancer,Chile,20,30
Prostate cancer,Chile,60,70
Bone cancer,Chile,8,2
";

    fn build(view: ViewId) -> Chart {
        let cfg = DashboardConfig::default();
        let sel = Selection {
            country: Some("Chile".into()),
            cancer: None,
        };
        Dataset::new(view, &parse_csv_text(CCAA), &cfg).chart(&sel, &cfg)
    }

    fn scatters(chart: &Chart) -> Vec<&ScatterTrace> {
        chart
            .traces
            .iter()
            .filter_map(|t| match t {
                Trace::Scatter(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn top_five_rows_are_coloured() {
        let chart = build(ViewId::ScatterCancerCountries);
        let s = scatters(&chart);
        let labels: Vec<&str> = s[0].points.iter().map(|p| p.label.as_str()).collect();
        // Uruguay has no ASR and is excluded.
        assert_eq!(labels, vec!["United States", "Atlantis", "Chile", "Peru", "Bolivia"]);
        assert_eq!(s[0].points[0].color.hex(), "#1F77B4");
        assert_eq!(s[0].points[1].color, GREY);
        assert_eq!(s[1].points.len(), 1);
        assert_eq!(s[1].opacity, 0.75);
    }

    #[test]
    fn top_three_cancer_labels_wrap() {
        let chart = build(ViewId::ScatterCountryCancers);
        let s = scatters(&chart);
        let labels: Vec<&str> = s[0].points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Prostate\ncancer", "Breast\ncancer", "Lung\ncancer"]);
        assert_eq!(s[1].name, "Other cancers");
        assert_eq!(s[1].points[0].label, "Bone cancer");
        assert!(s[1].points.iter().all(|p| p.color == GREY));
    }
}
