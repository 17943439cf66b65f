//! Grouped Articles sums, distinct field values and ASR statistics.
//!
//! Sums saturate at `u64::MAX` instead of overflowing.

use crate::models::Record;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

/// Sum `value` per `key`, iterating keys in their natural order.
///
/// Records for which either extractor returns `None` are skipped.
pub fn sum_by<'a, K, I, FK, FV>(records: I, key: FK, value: FV) -> BTreeMap<K, u64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    FK: Fn(&Record) -> Option<K>,
    FV: Fn(&Record) -> Option<u64>,
{
    let mut out = BTreeMap::new();
    for r in records {
        if let (Some(k), Some(v)) = (key(r), value(r)) {
            let slot = out.entry(k).or_insert(0u64);
            *slot = slot.saturating_add(v);
        }
    }
    out
}

/// Same sums as [`sum_by`], in the order each key was first encountered.
///
/// This is the input order for ranking, where ties keep encounter order.
pub fn totals_in_encounter_order<'a, K, I, FK, FV>(records: I, key: FK, value: FV) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a Record>,
    FK: Fn(&Record) -> Option<K>,
    FV: Fn(&Record) -> Option<u64>,
{
    let mut index: AHashMap<K, usize> = AHashMap::new();
    let mut out: Vec<(K, u64)> = Vec::new();
    for r in records {
        let (Some(k), Some(v)) = (key(r), value(r)) else {
            continue;
        };
        match index.get(&k) {
            Some(&i) => out[i].1 = out[i].1.saturating_add(v),
            None => {
                index.insert(k.clone(), out.len());
                out.push((k, v));
            }
        }
    }
    out
}

/// Sorted distinct values of a field, for axes and dropdowns.
pub fn distinct<'a, K, I, FK>(records: I, key: FK) -> Vec<K>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    FK: Fn(&Record) -> Option<K>,
{
    records
        .into_iter()
        .filter_map(key)
        .collect::<BTreeSet<K>>()
        .into_iter()
        .collect()
}

pub fn distinct_countries(records: &[Record]) -> Vec<String> {
    distinct(records, |r| r.country.clone())
}

pub fn distinct_cancers(records: &[Record]) -> Vec<String> {
    distinct(records, |r| r.cancer.clone())
}

pub fn distinct_years(records: &[Record]) -> Vec<i32> {
    distinct(records, |r| r.year)
}

/// Articles summed per year.
pub fn articles_per_year<'a, I>(records: I) -> BTreeMap<i32, u64>
where
    I: IntoIterator<Item = &'a Record>,
{
    sum_by(records, |r| r.year, |r| r.articles)
}

/// Lay a year→value map onto a fixed year axis; missing years read as zero.
pub fn align_to_years(values: &BTreeMap<i32, u64>, years: &[i32]) -> Vec<u64> {
    years
        .iter()
        .map(|y| values.get(y).copied().unwrap_or(0))
        .collect()
}

/// Summary statistics over the ASR column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AsrSummary {
    pub count: usize,
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Compute ASR statistics; `None` when no record carries an ASR value.
pub fn asr_summary(records: &[Record]) -> Option<AsrSummary> {
    let mut vals: Vec<f64> = records.iter().filter_map(|r| r.asr).collect();
    let missing = records.len() - vals.len();
    if vals.is_empty() {
        return None;
    }
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let median = if count % 2 == 1 {
        vals[count / 2]
    } else {
        (vals[count / 2 - 1] + vals[count / 2]) / 2.0
    };
    Some(AsrSummary {
        count,
        missing,
        min: vals[0],
        max: vals[count - 1],
        mean: vals.iter().sum::<f64>() / count as f64,
        median,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CountryYear;

    fn rec(country: &str, year: i32, articles: u64) -> Record {
        Record {
            country: Some(country.into()),
            cancer: Some("Lung cancer".into()),
            year: Some(year),
            articles: Some(articles),
            asr: None,
        }
    }

    #[test]
    fn sum_by_composite_key() {
        let rows = vec![rec("Chile", 2001, 2), rec("Chile", 2001, 3), rec("Chile", 2002, 1)];
        let sums = sum_by(
            &rows,
            |r| {
                Some(CountryYear {
                    country: r.country.clone()?,
                    year: r.year?,
                })
            },
            |r| r.articles,
        );
        let key = CountryYear {
            country: "Chile".into(),
            year: 2001,
        };
        assert_eq!(sums.get(&key), Some(&5));
        assert_eq!(sums.len(), 2);
    }

    #[test]
    fn encounter_order_is_preserved() {
        let rows = vec![rec("Peru", 2001, 1), rec("Chile", 2001, 1), rec("Peru", 2002, 4)];
        let totals = totals_in_encounter_order(&rows, |r| r.country.clone(), |r| r.articles);
        assert_eq!(totals, vec![("Peru".to_string(), 5), ("Chile".to_string(), 1)]);
    }

    #[test]
    fn huge_counts_saturate() {
        let rows = vec![rec("Chile", 2001, u64::MAX), rec("Chile", 2002, 1), rec("Peru", 2001, 4)];
        let sums = sum_by(&rows, |r| r.country.clone(), |r| r.articles);
        assert_eq!(sums["Chile"], u64::MAX);
        let totals = totals_in_encounter_order(&rows, |r| r.country.clone(), |r| r.articles);
        assert_eq!(totals[0], ("Chile".to_string(), u64::MAX));
        assert_eq!(totals[1], ("Peru".to_string(), 4));
    }

    #[test]
    fn years_sort_numerically() {
        let rows = vec![rec("A", 2010, 1), rec("A", 999, 1), rec("A", 2010, 1)];
        assert_eq!(distinct_years(&rows), vec![999, 2010]);
    }

    #[test]
    fn asr_summary_even_count_median() {
        let rows: Vec<Record> = [1.0, 4.0, 2.0, 3.0]
            .iter()
            .map(|v| Record {
                asr: Some(*v),
                ..Default::default()
            })
            .chain(std::iter::once(Record::default()))
            .collect();
        let s = asr_summary(&rows).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.missing, 1);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.median - 2.5).abs() < 1e-9);
        assert!((s.mean - 2.5).abs() < 1e-9);
    }
}
