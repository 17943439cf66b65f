//! oncoviz_rs
//!
//! Aggregate, rank, and chart cancer incidence (ASR) and research-article
//! datasets. Pairs with the `oncoviz` CLI and the `oncoviz-gui` dashboard.
//!
//! ### Features
//! - Lenient CSV ingestion: blank lines skipped, malformed rows dropped and counted
//! - Per-view record selection on required fields, grouping and per-year totals
//! - Top-N rankings with a per-year residual, fixed colour tables
//! - Ten dashboard views producing a renderer-independent [`Chart`]
//! - SVG/PNG rendering, JSON chart export, tidy CSV series export
//!
//! ### Example
//! ```no_run
//! use oncoviz_rs::{Dataset, DashboardConfig, Selection, ViewId, ingest};
//!
//! let cfg = DashboardConfig::default();
//! let view = ViewId::CountryTopCancers;
//! let table = ingest::load_csv(cfg.dataset_path(view.dataset()))?;
//! let dataset = Dataset::new(view, &table, &cfg);
//! let sel = Selection { country: Some("Chile".into()), cancer: None };
//! let chart = dataset.chart(&sel, &cfg);
//! oncoviz_rs::viz::render_default(&chart, "chile.svg")?;
//! oncoviz_rs::storage::save_series_csv(&chart, "chile.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod ingest;
pub mod models;
pub mod palette;
pub mod rank;
pub mod storage;
pub mod views;
pub mod viz;

pub use chart::Chart;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use ingest::Table;
pub use models::{Field, FieldSet, Record};
pub use views::{Dataset, DatasetKind, Selection, ViewId};
