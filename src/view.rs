//! Row views over loaded tables
//!
//! Views are read-only row selections over a parent table. Loaded tables never
//! change, so a view is built once and holds only an index mapping from view
//! rows to parent rows; reading a cell goes straight to the parent's columns.
//!
//! Also holds the ordering helpers shared by the aggregate views and the
//! left-join index used to attach per-state values to map polygons.

use crate::listing::ListingTable;
use crate::table::Table;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Anything that yields rows of a `Table`: the table itself or a view over it.
pub trait RowSource {
    /// The table holding the column data.
    fn table(&self) -> &Table;

    /// Number of rows visible through this source.
    fn len(&self) -> usize;

    /// Parent table row backing view row `index`.
    fn parent_row(&self, index: usize) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parent rows in view order.
    fn parent_rows(&self) -> ParentRows<'_, Self>
    where
        Self: Sized,
    {
        ParentRows {
            source: self,
            next: 0,
        }
    }
}

/// Iterator over the parent rows of a `RowSource`.
pub struct ParentRows<'a, S> {
    source: &'a S,
    next: usize,
}

impl<S: RowSource> Iterator for ParentRows<'_, S> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.next < self.source.len() {
            let index = self.next;
            self.next += 1;
            if let Some(row) = self.source.parent_row(index) {
                return Some(row);
            }
        }
        None
    }
}

impl RowSource for Table {
    fn table(&self) -> &Table {
        self
    }

    fn len(&self) -> usize {
        Table::len(self)
    }

    fn parent_row(&self, index: usize) -> Option<usize> {
        (index < Table::len(self)).then_some(index)
    }
}

impl RowSource for ListingTable {
    fn table(&self) -> &Table {
        ListingTable::table(self)
    }

    fn len(&self) -> usize {
        ListingTable::len(self)
    }

    fn parent_row(&self, index: usize) -> Option<usize> {
        (index < ListingTable::len(self)).then_some(index)
    }
}

/// A FilterView selects rows from the parent table with a predicate.
/// Maintains a mapping from view indices to parent indices.
///
/// # Examples
///
/// ```
/// use listingview::{FilterView, LoadOptions, RowSource, Table};
///
/// let csv = "state,price\nOhio,100\nIowa,200\nOhio,300\n";
/// let table = Table::from_csv_reader("listings", csv.as_bytes(), &LoadOptions::default()).unwrap();
///
/// let ohio = FilterView::new("ohio", &table, |t, row| t.get_str(row, 0) == Some("Ohio"));
/// assert_eq!(ohio.len(), 2);
/// assert_eq!(ohio.parent_rows().collect::<Vec<_>>(), vec![0, 2]);
/// ```
pub struct FilterView<'a> {
    name: String,
    parent: &'a Table,
    index_mapping: Vec<usize>,
}

impl<'a> FilterView<'a> {
    pub fn new<F>(name: impl Into<String>, parent: &'a Table, predicate: F) -> Self
    where
        F: Fn(&Table, usize) -> bool,
    {
        let index_mapping = (0..parent.len())
            .filter(|&row| predicate(parent, row))
            .collect();

        FilterView {
            name: name.into(),
            parent,
            index_mapping,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.index_mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_mapping.is_empty()
    }

}

impl RowSource for FilterView<'_> {
    fn table(&self) -> &Table {
        self.parent
    }

    fn len(&self) -> usize {
        self.index_mapping.len()
    }

    fn parent_row(&self, index: usize) -> Option<usize> {
        self.index_mapping.get(index).copied()
    }
}

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Compare two optional numbers; absent values sort last in either order.
pub fn compare_nullable(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => order.apply(a.total_cmp(&b)),
    }
}

/// Compare two strings in the given order.
pub fn compare_keys(a: &str, b: &str, order: SortOrder) -> Ordering {
    order.apply(a.cmp(b))
}

/// Left join index: one `(left, Some(right))` or `(left, None)` pair per left
/// row, in left order.
///
/// When several right rows share a key, the first one wins, so the output
/// always has exactly as many entries as `left` has rows.
///
/// ```
/// use listingview::left_join_index;
///
/// let regions = ["ohio", "iowa", "ohio", "utah"];
/// let averages = [("ohio", 1.0), ("utah", 2.0), ("ohio", 9.0)];
///
/// let joined = left_join_index(&regions, &averages, |r| *r, |a| a.0);
/// assert_eq!(joined, vec![(0, Some(0)), (1, None), (2, Some(0)), (3, Some(1))]);
/// ```
pub fn left_join_index<'l, 'r, L, R, K, FL, FR>(
    left: &'l [L],
    right: &'r [R],
    left_key: FL,
    right_key: FR,
) -> Vec<(usize, Option<usize>)>
where
    K: Eq + Hash,
    FL: Fn(&'l L) -> K,
    FR: Fn(&'r R) -> K,
{
    let mut right_index: HashMap<K, usize> = HashMap::with_capacity(right.len());
    for (i, row) in right.iter().enumerate() {
        right_index.entry(right_key(row)).or_insert(i);
    }

    left.iter()
        .enumerate()
        .map(|(i, row)| (i, right_index.get(&left_key(row)).copied()))
        .collect()
}
