//! Group-by aggregation over listing rows.
//!
//! Rows are partitioned by the exact text of a categorical key column and a
//! numeric column is reduced per group. Groups are emitted in the order their
//! key first appears in the row source; use [`sort_groups`] for any other
//! order.

use crate::error::Result;
use crate::interner::StringId;
use crate::listing::{ListingField, ListingTable};
use crate::stats;
use crate::view::{compare_keys, compare_nullable, RowSource, SortOrder};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Key of the group collecting rows whose key value is absent.
pub const NA_KEY: &str = "NA";

/// How a group's numeric values are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Median,
    /// Rows in the group; the value column is not read.
    Count,
}

/// One group of a [`group_by`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupValue {
    pub key: String,
    /// `None` when no row of the group has a present value.
    pub value: Option<f64>,
    pub rows: usize,
}

/// Per-key price and size summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub avg_price: Option<f64>,
    pub median_size: Option<f64>,
    pub count: usize,
}

/// Ordering applied by [`sort_groups`] and [`sort_summaries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// By the reduced value (or `avg_price`); absent values last.
    Value(SortOrder),
    /// By `count`.
    Count(SortOrder),
    /// By key text.
    Key(SortOrder),
}

/// Row positions of each group, keyed by interned id; absent keys collect
/// under `None`. Order is first appearance.
struct Partition {
    keys: Vec<Option<StringId>>,
    members: Vec<Vec<usize>>,
}

fn partition<S: RowSource>(rows: &S, key_col: usize) -> Partition {
    let table = rows.table();
    let mut slots: HashMap<Option<StringId>, usize> = HashMap::new();
    let mut keys = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();

    for row in rows.parent_rows() {
        let key = table.string_id(row, key_col);
        let slot = *slots.entry(key).or_insert_with(|| {
            keys.push(key);
            members.push(Vec::new());
            keys.len() - 1
        });
        members[slot].push(row);
    }

    Partition { keys, members }
}

fn key_text<S: RowSource>(rows: &S, key: Option<StringId>) -> String {
    key.and_then(|id| rows.table().interner().resolve(id))
        .unwrap_or(NA_KEY)
        .to_string()
}

/// Group `rows` by `key_field` and reduce `value_field` per group.
///
/// `key_field` must be a categorical column and `value_field` a numeric one.
/// Absent values are left out of a group's reduction but still count as
/// group rows.
///
/// ```
/// use listingview::{group_by, LoadOptions, Reducer, Table};
///
/// let csv = "state,price\nCA,100\nCA,300\nTX,200\n";
/// let table = Table::from_csv_reader("listings", csv.as_bytes(), &LoadOptions::default()).unwrap();
///
/// let groups = group_by(&table, "state", "price", Reducer::Mean).unwrap();
/// assert_eq!(groups[0].key, "CA");
/// assert_eq!(groups[0].value, Some(200.0));
/// assert_eq!(groups[1].value, Some(200.0));
/// ```
pub fn group_by<S: RowSource>(
    rows: &S,
    key_field: &str,
    value_field: &str,
    reducer: Reducer,
) -> Result<Vec<GroupValue>> {
    let table = rows.table();
    let key_col = table.categorical_column(key_field)?;
    let value_col = table.numeric_column(value_field)?;
    let parts = partition(rows, key_col);

    let groups: Vec<GroupValue> = parts
        .keys
        .iter()
        .zip(&parts.members)
        .map(|(&key, members)| {
            let value = match reducer {
                Reducer::Count => Some(members.len() as f64),
                Reducer::Mean | Reducer::Median => {
                    let values: Vec<f64> = members
                        .iter()
                        .filter_map(|&row| table.get_f64(row, value_col))
                        .collect();
                    if reducer == Reducer::Mean {
                        stats::mean(&values)
                    } else {
                        stats::median(&values)
                    }
                }
            };
            GroupValue {
                key: key_text(rows, key),
                value,
                rows: members.len(),
            }
        })
        .collect();

    debug!(
        "group_by({}, {}, {:?}) over {} rows -> {} groups",
        key_field,
        value_field,
        reducer,
        rows.len(),
        groups.len()
    );
    Ok(groups)
}

/// Average price, median house size and row count per key, in one pass over
/// the listings.
pub fn summarize_groups(listings: &ListingTable, key_field: ListingField) -> Result<Vec<GroupSummary>> {
    let table = listings.table();
    let key_col = table.categorical_column(key_field.name())?;
    let parts = partition(listings, key_col);

    Ok(parts
        .keys
        .iter()
        .zip(&parts.members)
        .map(|(&key, members)| {
            let prices: Vec<f64> = members
                .iter()
                .filter_map(|&row| listings.numeric(row, ListingField::Price))
                .collect();
            let sizes: Vec<f64> = members
                .iter()
                .filter_map(|&row| listings.numeric(row, ListingField::HouseSize))
                .collect();
            GroupSummary {
                key: key_text(listings, key),
                avg_price: stats::mean(&prices),
                median_size: stats::median(&sizes),
                count: members.len(),
            }
        })
        .collect())
}

/// Stable sort of groups; ties keep their current order.
pub fn sort_groups(groups: &mut [GroupValue], key: SortKey) {
    match key {
        SortKey::Value(order) => groups.sort_by(|a, b| compare_nullable(a.value, b.value, order)),
        SortKey::Count(order) => groups.sort_by(|a, b| {
            compare_nullable(Some(a.rows as f64), Some(b.rows as f64), order)
        }),
        SortKey::Key(order) => groups.sort_by(|a, b| compare_keys(&a.key, &b.key, order)),
    }
}

/// Stable sort of summaries; `Value` orders by average price.
pub fn sort_summaries(summaries: &mut [GroupSummary], key: SortKey) {
    match key {
        SortKey::Value(order) => {
            summaries.sort_by(|a, b| compare_nullable(a.avg_price, b.avg_price, order))
        }
        SortKey::Count(order) => summaries.sort_by(|a, b| {
            compare_nullable(Some(a.count as f64), Some(b.count as f64), order)
        }),
        SortKey::Key(order) => summaries.sort_by(|a, b| compare_keys(&a.key, &b.key, order)),
    }
}

/// Summary by state, most expensive first.
pub fn state_summary(cleaned: &ListingTable) -> Result<Vec<GroupSummary>> {
    let mut summaries = summarize_groups(cleaned, ListingField::State)?;
    sort_summaries(&mut summaries, SortKey::Value(SortOrder::Descending));
    Ok(summaries)
}

/// Summary by listing status, most common first.
pub fn status_summary(cleaned: &ListingTable) -> Result<Vec<GroupSummary>> {
    let mut summaries = summarize_groups(cleaned, ListingField::Status)?;
    sort_summaries(&mut summaries, SortKey::Count(SortOrder::Descending));
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::error::ListingError;
    use crate::table::Table;
    use crate::view::FilterView;

    fn table(csv: &str) -> Table {
        Table::from_csv_reader("t", csv.as_bytes(), &LoadOptions::default()).unwrap()
    }

    const LISTINGS: &str = "\
status,price,bed,bath,acre_lot,city,state,house_size
for_sale,100,3,2,0.1,Fresno,CA,1000
sold,300,3,2,0.1,Fresno,CA,3000
for_sale,200,3,2,0.1,Austin,TX,2000
for_sale,50,3,2,0.1,Boise,,500
";

    #[test]
    fn test_mean_by_state_then_stable_descending() {
        let t = table("state,price\nCA,100\nCA,300\nTX,200\n");
        let mut groups = group_by(&t, "state", "price", Reducer::Mean).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].key.as_str(), groups[0].value), ("CA", Some(200.0)));
        assert_eq!((groups[1].key.as_str(), groups[1].value), ("TX", Some(200.0)));

        sort_groups(&mut groups, SortKey::Value(SortOrder::Descending));
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["CA", "TX"]);
    }

    #[test]
    fn test_partition_counts_sum_to_rows() {
        let t = table("state,price\nCA,1\n,2\nTX,\nCA,4\nca,5\n,6\n");
        let groups = group_by(&t, "state", "price", Reducer::Count).unwrap();

        let total: usize = groups.iter().map(|g| g.rows).sum();
        assert_eq!(total, t.len());

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["CA", NA_KEY, "TX", "ca"]);
        assert_eq!(groups[1].value, Some(2.0));
    }

    #[test]
    fn test_absent_values_excluded_from_reduction_only() {
        let t = table("state,price\nTX,\nTX,\nCA,3\nCA,\nCA,5\n");
        let groups = group_by(&t, "state", "price", Reducer::Median).unwrap();
        assert_eq!(groups[0].key, "TX");
        assert_eq!(groups[0].value, None);
        assert_eq!(groups[0].rows, 2);
        assert_eq!(groups[1].value, Some(4.0));
        assert_eq!(groups[1].rows, 3);
    }

    #[test]
    fn test_group_by_field_errors() {
        let t = table("state,price\nCA,1\n");
        assert!(matches!(
            group_by(&t, "region", "price", Reducer::Mean),
            Err(ListingError::FieldNotFound { .. })
        ));
        assert!(matches!(
            group_by(&t, "price", "price", Reducer::Mean),
            Err(ListingError::FieldType { .. })
        ));
        assert!(matches!(
            group_by(&t, "state", "state", Reducer::Count),
            Err(ListingError::FieldType { .. })
        ));
    }

    #[test]
    fn test_group_by_over_filter_view() {
        let t = table("state,price\nCA,100\nTX,200\nCA,300\nNY,50\n");
        let view = FilterView::new("no_ny", &t, |t, row| t.get_str(row, 0) != Some("NY"));
        let groups = group_by(&view, "state", "price", Reducer::Mean).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].value, Some(200.0));
    }

    #[test]
    fn test_empty_source() {
        let t = table("state,price\nCA,1\n");
        let nothing = FilterView::new("nothing", &t, |_, _| false);
        assert!(group_by(&nothing, "state", "price", Reducer::Mean).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_key_and_nulls_last() {
        let mut groups = vec![
            GroupValue { key: "b".into(), value: None, rows: 1 },
            GroupValue { key: "c".into(), value: Some(1.0), rows: 1 },
            GroupValue { key: "a".into(), value: Some(2.0), rows: 1 },
        ];
        sort_groups(&mut groups, SortKey::Value(SortOrder::Ascending));
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);

        sort_groups(&mut groups, SortKey::Key(SortOrder::Ascending));
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_state_and_status_summaries() {
        let listings = ListingTable::from_csv_reader("listings", LISTINGS.as_bytes()).unwrap();

        let states = state_summary(&listings).unwrap();
        let keys: Vec<&str> = states.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["CA", "TX", NA_KEY]);
        assert_eq!(states[0].avg_price, Some(200.0));
        assert_eq!(states[0].median_size, Some(2000.0));
        assert_eq!(states[0].count, 2);
        assert_eq!(states.iter().map(|s| s.count).sum::<usize>(), listings.len());

        let statuses = status_summary(&listings).unwrap();
        assert_eq!(statuses[0].key, "for_sale");
        assert_eq!(statuses[0].count, 3);
        assert_eq!(statuses[1].key, "sold");
    }
}
