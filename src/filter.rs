//! Per-chart record selection.

use crate::models::{FieldSet, Record};
use log::debug;

/// What a chart needs from a record before it may be aggregated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirement {
    pub fields: FieldSet,
    /// Cancer categories removed from the chart entirely (exact match).
    pub excluded_cancers: Vec<String>,
}

impl Requirement {
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            excluded_cancers: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, cancers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_cancers
            .extend(cancers.into_iter().map(Into::into));
        self
    }

    pub fn accepts(&self, rec: &Record) -> bool {
        if !rec.satisfies(self.fields) {
            return false;
        }
        match rec.cancer() {
            Some(c) => !self.excluded_cancers.iter().any(|x| x == c),
            None => true,
        }
    }
}

/// Keep the records that satisfy `req`, in input order.
pub fn select(records: &[Record], req: &Requirement) -> Vec<Record> {
    let kept: Vec<Record> = records.iter().filter(|r| req.accepts(r)).cloned().collect();
    if kept.len() != records.len() {
        debug!(
            "excluded {} of {} records lacking {}",
            records.len() - kept.len(),
            records.len(),
            req.fields
        );
    }
    kept
}

/// Records whose country equals `country` exactly.
pub fn by_country<'a>(records: &'a [Record], country: &'a str) -> impl Iterator<Item = &'a Record> + Clone {
    records.iter().filter(move |r| r.country() == Some(country))
}

/// Records whose cancer equals `cancer` exactly.
pub fn by_cancer<'a>(records: &'a [Record], cancer: &'a str) -> impl Iterator<Item = &'a Record> + Clone {
    records.iter().filter(move |r| r.cancer() == Some(cancer))
}
