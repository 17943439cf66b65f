//! Dashboard views: one builder per chart.
//!
//! A view owns nothing but its dataset. [`Dataset::new`] filters a parsed
//! [`Table`] down to the records the view can use and collects the dropdown
//! options; [`Dataset::chart`] regroups for a [`Selection`] and returns a
//! [`Chart`]. Building a chart never mutates the dataset, so a selection change
//! is just another call.

pub mod axis;
mod bars;
mod maps;
mod scatter;

use crate::aggregate::{distinct_cancers, distinct_countries, distinct_years};
use crate::chart::Chart;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::filter::{Requirement, select};
use crate::ingest::Table;
use crate::models::{Field, FieldSet, Record};
use std::fmt;
use std::str::FromStr;

/// The CSV files the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// `Country,ASR`
    CumulativeAsr,
    /// `Country,Cancer,ASR`
    MaxAsr,
    /// `Year,Articles`
    ArticlesYear,
    /// `Country,Cancer,Articles`
    MostStudied,
    /// `Country,Cancer,Year,Articles`
    CountryYearCancer,
    /// `Cancer,Country,Articles,ASR`
    AsrArticles,
}

/// Which dropdowns a view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors {
    pub country: bool,
    pub cancer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    IncidenceMap,
    PredominantCancerMap,
    StudiesPerYear,
    MostStudiedMap,
    SelectedCountryCancer,
    CountryTopCancers,
    CancerTopCountries,
    CancerTopCountriesLines,
    ScatterCancerCountries,
    ScatterCountryCancers,
}

impl ViewId {
    pub const ALL: [ViewId; 10] = [
        ViewId::IncidenceMap,
        ViewId::PredominantCancerMap,
        ViewId::StudiesPerYear,
        ViewId::MostStudiedMap,
        ViewId::SelectedCountryCancer,
        ViewId::CountryTopCancers,
        ViewId::CancerTopCountries,
        ViewId::CancerTopCountriesLines,
        ViewId::ScatterCancerCountries,
        ViewId::ScatterCountryCancers,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ViewId::IncidenceMap => "incidence-map",
            ViewId::PredominantCancerMap => "predominant-cancer-map",
            ViewId::StudiesPerYear => "studies-per-year",
            ViewId::MostStudiedMap => "most-studied-map",
            ViewId::SelectedCountryCancer => "selected-country-cancer",
            ViewId::CountryTopCancers => "country-top-cancers",
            ViewId::CancerTopCountries => "cancer-top-countries",
            ViewId::CancerTopCountriesLines => "cancer-top-countries-lines",
            ViewId::ScatterCancerCountries => "scatter-cancer-countries",
            ViewId::ScatterCountryCancers => "scatter-country-cancers",
        }
    }

    /// Section heading shown above the chart.
    pub fn heading(self) -> &'static str {
        match self {
            ViewId::IncidenceMap => "Global Cancer Incidence",
            ViewId::PredominantCancerMap => "Predominant Cancer Type by Country",
            ViewId::StudiesPerYear => "Published Cancer Studies",
            ViewId::MostStudiedMap => "Most Studied Cancer Type per Country",
            ViewId::SelectedCountryCancer => "Selected Country Cancer Studies",
            ViewId::CountryTopCancers => "Most Studied Cancers by Country",
            ViewId::CancerTopCountries => "Leading Countries by Cancer Type",
            ViewId::CancerTopCountriesLines => "Leading Countries over Time",
            ViewId::ScatterCancerCountries => "Incidence vs. Research by Country",
            ViewId::ScatterCountryCancers => "Incidence vs. Research by Cancer",
        }
    }

    pub fn dataset(self) -> DatasetKind {
        match self {
            ViewId::IncidenceMap => DatasetKind::CumulativeAsr,
            ViewId::PredominantCancerMap => DatasetKind::MaxAsr,
            ViewId::StudiesPerYear => DatasetKind::ArticlesYear,
            ViewId::MostStudiedMap => DatasetKind::MostStudied,
            ViewId::SelectedCountryCancer
            | ViewId::CountryTopCancers
            | ViewId::CancerTopCountries
            | ViewId::CancerTopCountriesLines => DatasetKind::CountryYearCancer,
            ViewId::ScatterCancerCountries | ViewId::ScatterCountryCancers => {
                DatasetKind::AsrArticles
            }
        }
    }

    /// Fields a record must carry to appear in this view.
    pub fn required(self) -> FieldSet {
        use Field::*;
        match self {
            ViewId::IncidenceMap => FieldSet::of(&[Country, Asr]),
            ViewId::PredominantCancerMap => FieldSet::of(&[Country, Cancer, Asr]),
            ViewId::StudiesPerYear => FieldSet::of(&[Year, Articles]),
            ViewId::MostStudiedMap => FieldSet::of(&[Country, Cancer, Articles]),
            ViewId::SelectedCountryCancer
            | ViewId::CountryTopCancers
            | ViewId::CancerTopCountries
            | ViewId::CancerTopCountriesLines => FieldSet::of(&[Country, Cancer, Year, Articles]),
            ViewId::ScatterCancerCountries | ViewId::ScatterCountryCancers => {
                FieldSet::of(&[Country, Cancer, Articles, Asr])
            }
        }
    }

    pub fn selectors(self) -> Selectors {
        let (country, cancer) = match self {
            ViewId::SelectedCountryCancer => (true, true),
            ViewId::CountryTopCancers | ViewId::ScatterCountryCancers => (true, false),
            ViewId::CancerTopCountries
            | ViewId::CancerTopCountriesLines
            | ViewId::ScatterCancerCountries => (false, true),
            _ => (false, false),
        };
        Selectors { country, cancer }
    }

    pub fn is_map(self) -> bool {
        matches!(
            self,
            ViewId::IncidenceMap | ViewId::PredominantCancerMap | ViewId::MostStudiedMap
        )
    }

    fn requirement(self, cfg: &DashboardConfig) -> Requirement {
        let req = Requirement::new(self.required());
        if self == ViewId::CountryTopCancers {
            req.excluding(cfg.excluded_cancers.iter().cloned())
        } else {
            req
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ViewId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewId::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| DashboardError::UnknownView(s.to_string()))
    }
}

/// Current dropdown values. `None` means "use the view's default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub country: Option<String>,
    pub cancer: Option<String>,
}

/// A view's filtered records plus the values its dropdowns offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub view: ViewId,
    pub records: Vec<Record>,
    /// Sorted distinct countries (dropdown options).
    pub countries: Vec<String>,
    /// Sorted distinct cancers (dropdown options).
    pub cancers: Vec<String>,
    /// Sorted distinct years (x axis).
    pub years: Vec<i32>,
}

impl Dataset {
    pub fn new(view: ViewId, table: &Table, cfg: &DashboardConfig) -> Self {
        let records = select(&table.records, &view.requirement(cfg));
        Self {
            view,
            countries: distinct_countries(&records),
            cancers: distinct_cancers(&records),
            years: distinct_years(&records),
            records,
        }
    }

    /// Fill unset selectors with the configured preference when it exists in
    /// the data, else the first option.
    pub fn resolve(&self, sel: &Selection, cfg: &DashboardConfig) -> Selection {
        let selectors = self.view.selectors();
        let preferred_country = if self.view == ViewId::SelectedCountryCancer {
            &cfg.defaults.pair_country
        } else {
            &cfg.defaults.country
        };
        Selection {
            country: selectors
                .country
                .then(|| pick(sel.country.as_ref(), preferred_country, &self.countries))
                .flatten(),
            cancer: selectors
                .cancer
                .then(|| pick(sel.cancer.as_ref(), &cfg.defaults.cancer, &self.cancers))
                .flatten(),
        }
    }

    /// Build the chart for `sel` (unset selectors resolved first).
    pub fn chart(&self, sel: &Selection, cfg: &DashboardConfig) -> Chart {
        let sel = self.resolve(sel, cfg);
        let country = sel.country.as_deref().unwrap_or_default();
        let cancer = sel.cancer.as_deref().unwrap_or_default();
        match self.view {
            ViewId::IncidenceMap => maps::incidence(self),
            ViewId::PredominantCancerMap => maps::predominant_cancer(self),
            ViewId::MostStudiedMap => maps::most_studied(self),
            ViewId::StudiesPerYear => bars::studies_per_year(self),
            ViewId::SelectedCountryCancer => bars::selected_country_cancer(self, country, cancer),
            ViewId::CountryTopCancers => bars::country_top_cancers(self, country),
            ViewId::CancerTopCountries => bars::cancer_top_countries(self, cancer),
            ViewId::CancerTopCountriesLines => bars::cancer_top_countries_lines(self, cancer),
            ViewId::ScatterCancerCountries => scatter::cancer_countries(self, cancer),
            ViewId::ScatterCountryCancers => scatter::country_cancers(self, country),
        }
    }
}

/// An explicit choice wins even if absent from the data (the chart is then empty).
fn pick(explicit: Option<&String>, preferred: &str, options: &[String]) -> Option<String> {
    if let Some(v) = explicit {
        return Some(v.clone());
    }
    if options.iter().any(|o| o == preferred) {
        return Some(preferred.to_string());
    }
    options.first().cloned()
}
