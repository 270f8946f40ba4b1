//! Dataset overview: a summary of any one column of the raw listings.

use super::ViewController;
use crate::column::ColumnType;
use crate::error::{ListingError, Result};
use crate::listing::{ListingField, ListingTable};
use crate::stats::{FrequencyTable, NumericSummary};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewState {
    pub selected_field: String,
}

impl Default for OverviewState {
    fn default() -> Self {
        OverviewState {
            selected_field: ListingField::Price.name().to_string(),
        }
    }
}

/// Summary of one column, by column kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverviewSummary {
    Numeric(NumericSummary),
    Categorical(FrequencyTable),
    /// Columns that are neither numeric nor text (bool, date).
    Unsupported { column_type: ColumnType },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewOutput {
    pub field: String,
    pub summary: OverviewSummary,
    /// Columns the field selector offers.
    pub field_choices: Vec<String>,
}

/// Summarise column `field` of `raw` over all its rows.
pub fn summarize_field(raw: &ListingTable, field: &str) -> Result<OverviewSummary> {
    let table = raw.table();
    let col = table.column_index(field)?;
    let column_type = table
        .column(col)
        .map(|c| c.column_type())
        .ok_or_else(|| ListingError::field_not_found(field))?;
    let rows = 0..table.len();

    let summary = if column_type.is_numeric() {
        OverviewSummary::Numeric(NumericSummary::from_values(
            rows.map(|row| table.get_f64(row, col)),
        ))
    } else if column_type.is_categorical() {
        OverviewSummary::Categorical(FrequencyTable::from_values(
            rows.map(|row| table.get_str(row, col)),
        ))
    } else {
        OverviewSummary::Unsupported { column_type }
    };
    Ok(summary)
}

pub struct OverviewController {
    raw: Arc<ListingTable>,
    state: OverviewState,
}

impl OverviewController {
    pub fn new(raw: Arc<ListingTable>) -> Self {
        OverviewController {
            raw,
            state: OverviewState::default(),
        }
    }

    /// Every column of the raw table, in schema order.
    pub fn field_choices(&self) -> Vec<String> {
        self.raw
            .table()
            .schema()
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn select_field(&mut self, field: impl Into<String>) {
        self.state = OverviewState {
            selected_field: field.into(),
        };
    }
}

impl ViewController for OverviewController {
    type State = OverviewState;
    type Output = OverviewOutput;

    fn state(&self) -> &OverviewState {
        &self.state
    }

    fn recompute(&self) -> Result<OverviewOutput> {
        let field = &self.state.selected_field;
        debug!("Recomputing overview of '{}'", field);
        Ok(OverviewOutput {
            field: field.clone(),
            summary: summarize_field(&self.raw, field)?,
            field_choices: self.field_choices(),
        })
    }
}
