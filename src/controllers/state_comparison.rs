//! Average listing price of a chosen set of states.

use super::ViewController;
use crate::aggregate::{group_by, sort_groups, Reducer, SortKey};
use crate::error::Result;
use crate::listing::{ListingField, ListingTable};
use crate::view::{FilterView, SortOrder};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparisonState {
    /// Ordered, duplicate-free.
    pub selected_states: Vec<String>,
}

/// One bar of the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub state: String,
    pub avg_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutput {
    pub selected_states: Vec<String>,
    /// Highest average price first.
    pub bars: Vec<PriceBar>,
    /// Every state the selector offers, in encounter order.
    pub state_choices: Vec<String>,
}

/// Mean price per selected state over `raw`, highest first; ties keep
/// first-appearance order.
pub fn compare_states(raw: &ListingTable, states: &[String]) -> Result<Vec<PriceBar>> {
    let table = raw.table();
    let state_col = raw.column(ListingField::State);
    let wanted: HashSet<_> = states
        .iter()
        .filter_map(|s| table.interner().lookup(s))
        .collect();

    let selected = FilterView::new("selected_states", table, |t, row| {
        t.string_id(row, state_col)
            .map_or(false, |id| wanted.contains(&id))
    });

    let mut groups = group_by(
        &selected,
        ListingField::State.name(),
        ListingField::Price.name(),
        Reducer::Mean,
    )?;
    sort_groups(&mut groups, SortKey::Value(SortOrder::Descending));

    Ok(groups
        .into_iter()
        .map(|g| PriceBar {
            state: g.key,
            avg_price: g.value,
        })
        .collect())
}

pub struct StateComparisonController {
    raw: Arc<ListingTable>,
    state: ComparisonState,
}

impl StateComparisonController {
    /// Starts with the first `initial_states` distinct states of `raw`.
    pub fn new(raw: Arc<ListingTable>, initial_states: usize) -> Self {
        let selected_states = raw
            .distinct(ListingField::State)
            .into_iter()
            .take(initial_states)
            .collect();
        StateComparisonController {
            raw,
            state: ComparisonState { selected_states },
        }
    }

    /// Every state of the raw table in encounter order.
    pub fn state_choices(&self) -> Vec<String> {
        self.raw.distinct(ListingField::State)
    }

    pub fn select_states<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let selected_states = states
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| seen.insert(s.clone()))
            .collect();
        self.state = ComparisonState { selected_states };
    }
}

impl ViewController for StateComparisonController {
    type State = ComparisonState;
    type Output = ComparisonOutput;

    fn state(&self) -> &ComparisonState {
        &self.state
    }

    fn recompute(&self) -> Result<ComparisonOutput> {
        debug!(
            "Recomputing state comparison for {} states",
            self.state.selected_states.len()
        );
        Ok(ComparisonOutput {
            selected_states: self.state.selected_states.clone(),
            bars: compare_states(&self.raw, &self.state.selected_states)?,
            state_choices: self.state_choices(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = "\
status,price,bed,bath,acre_lot,city,state,house_size
for_sale,100,,,,Fresno,CA,
for_sale,200,,,,Austin,TX,
for_sale,300,,,,Fresno,CA,
for_sale,900,,,,Albany,NY,
for_sale,,,,,Albany,NY,
for_sale,50,,,,Boise,ID,
for_sale,70,,,,Reno,NV,
for_sale,10,,,,Provo,UT,
";

    fn controller(initial: usize) -> StateComparisonController {
        let raw = ListingTable::from_csv_reader("listings", LISTINGS.as_bytes()).unwrap();
        StateComparisonController::new(Arc::new(raw), initial)
    }

    #[test]
    fn test_default_selection_is_first_distinct_states() {
        let comparison = controller(5);
        assert_eq!(
            comparison.state().selected_states,
            vec!["CA", "TX", "NY", "ID", "NV"]
        );
        assert_eq!(comparison.state_choices().len(), 6);
    }

    #[test]
    fn test_bars_sorted_descending_with_stable_ties() {
        let mut comparison = controller(5);
        comparison.select_states(vec!["TX", "CA", "NY"]);
        let output = comparison.recompute().unwrap();

        let bars: Vec<(&str, Option<f64>)> = output
            .bars
            .iter()
            .map(|b| (b.state.as_str(), b.avg_price))
            .collect();
        // CA and TX tie at 200; CA appears first in the table
        assert_eq!(
            bars,
            vec![("NY", Some(900.0)), ("CA", Some(200.0)), ("TX", Some(200.0))]
        );
    }

    #[test]
    fn test_empty_selection_gives_empty_bars() {
        let mut comparison = controller(5);
        comparison.select_states(Vec::<String>::new());
        let output = comparison.recompute().unwrap();
        assert!(output.bars.is_empty());
        assert_eq!(output.state_choices.len(), 6);
    }

    #[test]
    fn test_unknown_and_duplicate_states() {
        let mut comparison = controller(0);
        assert!(comparison.state().selected_states.is_empty());

        comparison.select_states(vec!["UT", "Atlantis", "UT"]);
        assert_eq!(comparison.state().selected_states, vec!["UT", "Atlantis"]);

        let output = comparison.recompute().unwrap();
        assert_eq!(output.bars.len(), 1);
        assert_eq!(output.bars[0].state, "UT");
    }
}
