//! Descriptive statistics over numeric samples and categorical counts.

use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic mean; `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// Quantile of an ascending sample using linear interpolation between order
/// statistics (`h = (n - 1) * p`, R's default type 7).
///
/// ```
/// use listingview::stats::quantile_sorted;
///
/// let sample = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&sample, 0.25), Some(1.75));
/// assert_eq!(quantile_sorted(&sample, 0.5), Some(2.5));
/// assert_eq!(quantile_sorted(&sample, 0.75), Some(3.25));
/// ```
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let h = last as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(last);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Five-number summary plus mean over the present values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Summarise a column; absent values only count towards `missing`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut missing = 0;
        let mut present = Vec::new();
        for value in values {
            match value {
                Some(v) if !v.is_nan() => present.push(v),
                _ => missing += 1,
            }
        }
        present.sort_by(f64::total_cmp);

        NumericSummary {
            count: present.len(),
            missing,
            mean: mean(&present),
            min: present.first().copied(),
            q1: quantile_sorted(&present, 0.25),
            median: quantile_sorted(&present, 0.5),
            q3: quantile_sorted(&present, 0.75),
            max: present.last().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Counts of each distinct value, sorted by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
    /// Absent cells, not listed as an entry.
    pub missing: usize,
}

impl FrequencyTable {
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut missing = 0;
        for value in values {
            match value {
                Some(v) => *counts.entry(v).or_insert(0) += 1,
                None => missing += 1,
            }
        }

        FrequencyTable {
            entries: counts
                .into_iter()
                .map(|(value, count)| FrequencyEntry {
                    value: value.to_string(),
                    count,
                })
                .collect(),
            missing,
        }
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.count)
    }

    /// Present cells counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[100.0, 300.0]), Some(200.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_quantiles_single_value() {
        assert_eq!(quantile_sorted(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile_sorted(&[7.0], 0.75), Some(7.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_numeric_summary() {
        let summary =
            NumericSummary::from_values(vec![Some(4.0), None, Some(1.0), Some(3.0), Some(2.0)]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.mean, Some(2.5));
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q1, Some(1.75));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.q3, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn test_numeric_summary_all_missing() {
        let summary = NumericSummary::from_values(vec![None, Some(f64::NAN)]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.median, None);
    }

    #[test]
    fn test_frequency_table() {
        let table = FrequencyTable::from_values(vec![Some("A"), Some("B"), None, Some("A")]);
        assert_eq!(table.get("A"), Some(2));
        assert_eq!(table.get("B"), Some(1));
        assert_eq!(table.get("C"), None);
        assert_eq!(table.missing, 1);
        assert_eq!(table.total(), 3);
        assert_eq!(table.entries[0].value, "A");
    }
}
