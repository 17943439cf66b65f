//! Dashboard configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) yields
//! the stock dashboard reading from `./data`. Example:
//!
//! ```json
//! {
//!   "data_dir": "/srv/oncology/data",
//!   "datasets": { "articles_year": "articles_per_year_2024.csv" },
//!   "defaults": { "country": "Germany" },
//!   "plot": { "width": 1200, "height": 700, "locale": "de" }
//! }
//! ```

use crate::error::{DashboardError, Result};
use crate::views::DatasetKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub datasets: DatasetFiles,
    pub defaults: Defaults,
    /// Cancer categories hidden from the per-country top-cancers chart.
    pub excluded_cancers: Vec<String>,
    pub plot: PlotSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            datasets: DatasetFiles::default(),
            defaults: Defaults::default(),
            excluded_cancers: vec!["Undetermined cancer".into(), "Other cancer".into()],
            plot: PlotSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DashboardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full path of the file backing `kind`.
    pub fn dataset_path(&self, kind: DatasetKind) -> PathBuf {
        self.data_dir.join(self.datasets.file_name(kind))
    }
}

/// File names inside `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub cumulative_asr: String,
    pub max_asr: String,
    pub articles_year: String,
    pub most_studied: String,
    pub country_year_cancer: String,
    pub asr_articles: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            cumulative_asr: "Globocan_dataset_cummulative_ASR_country.csv".into(),
            max_asr: "Globocan_dataset_max_ASR_country.csv".into(),
            articles_year: "articles_year.csv".into(),
            most_studied: "articles_cancer_most_studied_country.csv".into(),
            country_year_cancer: "articles_country_year_cancer.csv".into(),
            asr_articles: "articles_asr_country_cancer.csv".into(),
        }
    }
}

impl DatasetFiles {
    pub fn file_name(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::CumulativeAsr => &self.cumulative_asr,
            DatasetKind::MaxAsr => &self.max_asr,
            DatasetKind::ArticlesYear => &self.articles_year,
            DatasetKind::MostStudied => &self.most_studied,
            DatasetKind::CountryYearCancer => &self.country_year_cancer,
            DatasetKind::AsrArticles => &self.asr_articles,
        }
    }
}

/// Preferred initial dropdown values; used only when present in the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub country: String,
    /// Country preselected on the country/cancer comparison chart.
    pub pair_country: String,
    pub cancer: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            country: "Switzerland".into(),
            pair_country: "United States".into(),
            cancer: "Breast cancer".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    /// Number formatting for value labels (`en`, `de`, `fr`, ...).
    pub locale: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            locale: "en".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{ "datasets": { "articles_year": "y.csv" } }"#).unwrap();
        assert_eq!(cfg.datasets.articles_year, "y.csv");
        assert_eq!(cfg.datasets.max_asr, "Globocan_dataset_max_ASR_country.csv");
        assert_eq!(cfg.defaults.cancer, "Breast cancer");
        assert_eq!(
            cfg.dataset_path(DatasetKind::ArticlesYear),
            PathBuf::from("data").join("y.csv")
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = DashboardConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigRead { .. }));
    }
}
