use super::Dataset;
use super::axis::five_ticks;
use crate::aggregate::asr_summary;
use crate::chart::{Chart, ChoroplethTrace, LocationMode, Trace};
use crate::filter::by_cancer;
use crate::geo::iso3;
use crate::models::Record;
use crate::palette::{INCIDENCE_SCALE, MAP_FALLBACK, cancer_color_or};
use log::debug;

/// Pair each record with its country's ISO-3 code, skipping records
/// without one.
fn iso3_locations<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<(&'static str, &'a Record)> {
    records
        .filter_map(|r| {
            let name = r.country()?;
            match iso3(name) {
                Some(code) => Some((code, r)),
                None => {
                    debug!("no ISO-3 code for country `{name}`, skipped");
                    None
                }
            }
        })
        .collect()
}

pub(super) fn incidence(ds: &Dataset) -> Chart {
    let rows = iso3_locations(ds.records.iter());
    let color_bar_ticks = asr_summary(&ds.records)
        .map(|s| five_ticks(s.min, s.max))
        .unwrap_or_default();

    let trace = ChoroplethTrace {
        name: "Incidence (per 100,000)".into(),
        location_mode: LocationMode::Iso3,
        locations: rows.iter().map(|(code, _)| code.to_string()).collect(),
        text: rows.iter().map(|(_, r)| r.country().unwrap_or_default().to_string()).collect(),
        z: rows.iter().map(|(_, r)| r.asr.unwrap_or_default()).collect(),
        color_scale: INCIDENCE_SCALE.to_vec(),
        show_scale: true,
        color_bar_ticks,
    };

    let mut chart = Chart::new(ds.view.slug(), "Cancer Incidence per Country");
    chart.traces.push(Trace::Choropleth(trace));
    chart
}

/// One single-colour layer per cancer, located by country name.
///
/// `z` alternates 0/1 so each layer has two distinct values and gets a legend
/// entry; the two colour stops are equal, so the alternation is invisible.
pub(super) fn predominant_cancer(ds: &Dataset) -> Chart {
    let mut chart = Chart::new(ds.view.slug(), "Predominant Cancer Type per Country");
    for cancer in &ds.cancers {
        let rows: Vec<&Record> = by_cancer(&ds.records, cancer).collect();
        let color = cancer_color_or(cancer, MAP_FALLBACK);
        let names: Vec<String> = rows
            .iter()
            .filter_map(|r| r.country().map(str::to_string))
            .collect();
        chart.traces.push(Trace::Choropleth(ChoroplethTrace {
            name: cancer.clone(),
            location_mode: LocationMode::CountryNames,
            z: (0..names.len()).map(|i| (i % 2) as f64).collect(),
            text: names.clone(),
            locations: names,
            color_scale: vec![(0.0, color), (1.0, color)],
            show_scale: false,
            color_bar_ticks: Vec::new(),
        }));
    }
    chart
}

pub(super) fn most_studied(ds: &Dataset) -> Chart {
    let mut chart = Chart::new(ds.view.slug(), "Most studied cancer type per country");
    for cancer in &ds.cancers {
        let rows = iso3_locations(by_cancer(&ds.records, cancer));
        let color = cancer_color_or(cancer, MAP_FALLBACK);
        chart.traces.push(Trace::Choropleth(ChoroplethTrace {
            name: cancer.clone(),
            location_mode: LocationMode::Iso3,
            locations: rows.iter().map(|(code, _)| code.to_string()).collect(),
            text: rows.iter().map(|(_, r)| r.country().unwrap_or_default().to_string()).collect(),
            z: rows.iter().map(|(_, r)| r.articles.unwrap_or_default() as f64).collect(),
            color_scale: vec![(0.0, color), (1.0, color)],
            show_scale: false,
            color_bar_ticks: Vec::new(),
        }));
    }
    chart
}

#[cfg(test)]
mod tests {
    use crate::config::DashboardConfig;
    use crate::chart::Trace;
    use crate::ingest::parse_csv_text;
    use crate::views::{Dataset, Selection, ViewId};

    fn build(view: ViewId, csv: &str) -> crate::chart::Chart {
        let cfg = DashboardConfig::default();
        let ds = Dataset::new(view, &parse_csv_text(csv), &cfg);
        ds.chart(&Selection::default(), &cfg)
    }

    #[test]
    fn incidence_drops_unknown_countries() {
        let chart = build(
            ViewId::IncidenceMap,
            "Country,ASR\nSwitzerland,300.5\nAtlantis,12\nChile,NaN\nPeru,100\n",
        );
        let Trace::Choropleth(t) = &chart.traces[0] else { panic!("not a map") };
        assert_eq!(t.locations, vec!["CHE", "PER"]);
        assert_eq!(t.z, vec![300.5, 100.0]);
        // Atlantis has a valid ASR, so it still shapes the colour bar.
        assert_eq!(t.color_bar_ticks.first(), Some(&12.0));
        assert_eq!(t.color_bar_ticks.last(), Some(&300.5));
        assert!(chart.is_geo());
    }

    #[test]
    fn one_layer_per_cancer_sorted() {
        let chart = build(
            ViewId::PredominantCancerMap,
            "Country,Cancer,ASR\nChile,Lung cancer,1\nPeru,Breast cancer,2\nBolivia,Lung cancer,3\n",
        );
        let names: Vec<&str> = chart.traces.iter().map(Trace::name).collect();
        assert_eq!(names, vec!["Breast cancer", "Lung cancer"]);
        let Trace::Choropleth(lung) = &chart.traces[1] else { panic!("not a map") };
        assert_eq!(lung.locations, vec!["Chile", "Bolivia"]);
        assert_eq!(lung.z, vec![0.0, 1.0]);
        assert_eq!(lung.color_scale[0].1.hex(), "#984EA3");
    }

    #[test]
    fn empty_dataset_gives_empty_map() {
        let chart = build(ViewId::IncidenceMap, "Country,ASR\n");
        assert!(chart.is_empty());
    }
}
