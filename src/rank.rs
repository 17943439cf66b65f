//! Top-N ranking with a residual bucket.
//!
//! Rankings sort descending by total with a stable sort, so equal totals keep
//! their input order and the first-encountered key wins a tie at the N-th slot.

use crate::aggregate::totals_in_encounter_order;
use crate::models::Record;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Items split into the highlighted head and the remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub top: Vec<T>,
    pub rest: Vec<T>,
}

/// Ranking over grouped totals.
pub type RankedTopN<K> = Ranked<(K, u64)>;

/// Sort `items` descending by `metric` (stable) and split after `n`.
pub fn rank_by<T, F>(mut items: Vec<T>, n: usize, metric: F) -> Ranked<T>
where
    F: Fn(&T) -> u64,
{
    items.sort_by(|a, b| metric(b).cmp(&metric(a)));
    let rest = items.split_off(n.min(items.len()));
    Ranked { top: items, rest }
}

/// Rank `(key, total)` pairs.
pub fn top_n<K>(totals: Vec<(K, u64)>, n: usize) -> RankedTopN<K> {
    rank_by(totals, n, |(_, t)| *t)
}

impl<K> Ranked<(K, u64)> {
    /// Sum of everything beyond the first N.
    pub fn residual(&self) -> u64 {
        self.rest.iter().fold(0u64, |acc, (_, t)| acc.saturating_add(*t))
    }

    pub fn total(&self) -> u64 {
        self.top
            .iter()
            .fold(self.residual(), |acc, (_, t)| acc.saturating_add(*t))
    }

    pub fn top_keys(&self) -> impl Iterator<Item = &K> {
        self.top.iter().map(|(k, _)| k)
    }
}

/// Per-year view of a top-N ranking.
///
/// For every index `i`: `sum(highlighted[*].values[i]) + residual[i] == totals[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdown<K> {
    pub years: Vec<i32>,
    pub highlighted: Vec<YearlySeries<K>>,
    pub residual: Vec<u64>,
    pub totals: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySeries<K> {
    pub key: K,
    /// Sum over all years, the value the ranking was made on.
    pub total: u64,
    pub values: Vec<u64>,
}

/// Rank entities by their Articles total over `records`, then split every year
/// of `years` into the highlighted entities and the residual.
///
/// `records` is the already-selected slice (e.g. one cancer type); `years` is
/// the axis, which may include years with no records at all.
pub fn yearly_top_n<'a, K, I, FE>(records: I, years: &[i32], entity: FE, n: usize) -> YearlyBreakdown<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a Record>,
    I::IntoIter: Clone,
    FE: Fn(&Record) -> Option<K>,
{
    let records = records.into_iter();
    let ranking = top_n(
        totals_in_encounter_order(records.clone(), &entity, |r| r.articles),
        n,
    );

    let slot: AHashMap<&i32, usize> = years.iter().enumerate().map(|(i, y)| (y, i)).collect();
    let lane: AHashMap<&K, usize> = ranking.top_keys().enumerate().map(|(i, k)| (k, i)).collect();

    let mut highlighted: Vec<YearlySeries<K>> = ranking
        .top
        .iter()
        .map(|(k, total)| YearlySeries {
            key: k.clone(),
            total: *total,
            values: vec![0; years.len()],
        })
        .collect();
    let mut residual = vec![0u64; years.len()];
    let mut totals = vec![0u64; years.len()];

    for r in records {
        let (Some(year), Some(articles), Some(key)) = (r.year, r.articles, entity(r)) else {
            continue;
        };
        let Some(&i) = slot.get(&year) else { continue };
        totals[i] = totals[i].saturating_add(articles);
        let slot = match lane.get(&key) {
            Some(&l) => &mut highlighted[l].values[i],
            None => &mut residual[i],
        };
        *slot = slot.saturating_add(articles);
    }

    YearlyBreakdown {
        years: years.to_vec(),
        highlighted,
        residual,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_two_with_residual() {
        let totals = vec![
            ("CH".to_string(), 10),
            ("US".to_string(), 30),
            ("FR".to_string(), 5),
        ];
        let r = top_n(totals, 2);
        assert_eq!(r.top, vec![("US".to_string(), 30), ("CH".to_string(), 10)]);
        assert_eq!(r.residual(), 5);
        assert_eq!(r.total(), 45);
    }

    #[test]
    fn ties_keep_first_encountered() {
        let r = top_n(vec![("b", 3), ("a", 3), ("c", 3)], 1);
        assert_eq!(r.top, vec![("b", 3)]);
        assert_eq!(r.rest, vec![("a", 3), ("c", 3)]);
    }

    #[test]
    fn n_larger_than_input() {
        let r = top_n(vec![("a", 1)], 5);
        assert_eq!(r.top.len(), 1);
        assert!(r.rest.is_empty());
        assert_eq!(r.residual(), 0);
    }

    #[test]
    fn residual_and_total_saturate() {
        let r = top_n(vec![("a", u64::MAX), ("b", 2), ("c", u64::MAX)], 1);
        assert_eq!(r.residual(), u64::MAX);
        assert_eq!(r.total(), u64::MAX);
    }

    #[test]
    fn yearly_buckets_saturate() {
        let rows = vec![rec("US", 2000, u64::MAX), rec("US", 2000, 9), rec("CH", 2000, 1)];
        let b = yearly_top_n(&rows, &[2000], |r| r.country.clone(), 1);
        assert_eq!(b.highlighted[0].values, vec![u64::MAX]);
        assert_eq!(b.totals, vec![u64::MAX]);
        assert_eq!(b.residual, vec![1]);
    }

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
    fn residual_is_computed_per_year() {
        let rows = vec![
            rec("US", 2000, 30),
            rec("CH", 2000, 10),
            rec("FR", 2000, 5),
            rec("FR", 2001, 7),
            rec("US", 2001, 1),
        ];
        let b = yearly_top_n(&rows, &[2000, 2001, 2002], |r| r.country.clone(), 2);
        assert_eq!(b.highlighted[0].key, "US");
        assert_eq!(b.highlighted[0].values, vec![30, 1, 0]);
        // FR (12) outranks CH (10) overall.
        assert_eq!(b.highlighted[1].key, "FR");
        assert_eq!(b.residual, vec![10, 0, 0]);
        assert_eq!(b.totals, vec![45, 8, 0]);
        for i in 0..b.years.len() {
            let top: u64 = b.highlighted.iter().map(|s| s.values[i]).sum();
            assert_eq!(top + b.residual[i], b.totals[i]);
        }
    }
}
