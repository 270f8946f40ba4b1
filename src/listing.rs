//! Listing dataset: the field registry and a validated listings table.

use crate::column::{ColumnType, ColumnValue};
use crate::config::LoadOptions;
use crate::error::{ListingError, Result};
use crate::interner::StringId;
use crate::table::Table;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Whether a listing field is summarised numerically or by frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// The known columns of a listings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingField {
    Price,
    Bed,
    Bath,
    AcreLot,
    HouseSize,
    State,
    City,
    Status,
}

impl ListingField {
    pub const ALL: [ListingField; 8] = [
        ListingField::Price,
        ListingField::Bed,
        ListingField::Bath,
        ListingField::AcreLot,
        ListingField::HouseSize,
        ListingField::State,
        ListingField::City,
        ListingField::Status,
    ];

    /// Fields a listing needs for analysis; the cleaner drops rows missing any.
    pub const ANALYSIS: [ListingField; 5] = [
        ListingField::Price,
        ListingField::Bed,
        ListingField::Bath,
        ListingField::AcreLot,
        ListingField::HouseSize,
    ];

    /// Column name in the listings file.
    pub fn name(self) -> &'static str {
        match self {
            ListingField::Price => "price",
            ListingField::Bed => "bed",
            ListingField::Bath => "bath",
            ListingField::AcreLot => "acre_lot",
            ListingField::HouseSize => "house_size",
            ListingField::State => "state",
            ListingField::City => "city",
            ListingField::Status => "status",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ListingField::State | ListingField::City | ListingField::Status => {
                FieldKind::Categorical
            }
            _ => FieldKind::Numeric,
        }
    }

    pub fn from_name(name: &str) -> Option<ListingField> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ListingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One listing materialised from a table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub price: Option<f64>,
    pub bed: Option<f64>,
    pub bath: Option<f64>,
    pub acre_lot: Option<f64>,
    pub house_size: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
    /// Columns outside the listing registry, kept verbatim.
    #[serde(flatten)]
    pub extras: BTreeMap<String, ColumnValue>,
}

/// A table known to carry every listing field with the right column kind.
#[derive(Debug, Clone)]
pub struct ListingTable {
    table: Table,
    columns: [usize; 8],
}

impl ListingTable {
    /// Validate that `table` carries every listing field.
    ///
    /// Numeric fields must be Int64 or Float64 columns and categorical fields
    /// String columns.
    pub fn new(table: Table) -> Result<Self> {
        let mut columns = [0; 8];
        for field in ListingField::ALL {
            columns[field.slot()] = match field.kind() {
                FieldKind::Numeric => table.numeric_column(field.name())?,
                FieldKind::Categorical => table.categorical_column(field.name())?,
            };
        }
        Ok(ListingTable { table, columns })
    }

    /// Load options for listing files: all-empty listing columns keep their
    /// declared kind instead of falling back to text.
    pub fn load_options() -> LoadOptions {
        ListingField::ALL
            .into_iter()
            .fold(LoadOptions::default(), |opts, field| {
                let hint = match field.kind() {
                    FieldKind::Numeric => ColumnType::Float64,
                    FieldKind::Categorical => ColumnType::String,
                };
                opts.with_type_hint(field.name(), hint)
            })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let table = Table::from_csv_path(path.as_ref(), &Self::load_options())?;
        info!(
            "Loaded {} listings with {} columns from {}",
            table.len(),
            table.schema().len(),
            path.as_ref().display()
        );
        Self::new(table)
    }

    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        Self::new(Table::from_csv_reader(name, reader, &Self::load_options())?)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Column index of a listing field.
    #[inline]
    pub fn column(&self, field: ListingField) -> usize {
        self.columns[field.slot()]
    }

    /// Numeric value of a field (categorical fields read as absent).
    #[inline]
    pub fn numeric(&self, row: usize, field: ListingField) -> Option<f64> {
        self.table.get_f64(row, self.column(field))
    }

    /// Text of a categorical field (numeric fields read as absent).
    #[inline]
    pub fn categorical(&self, row: usize, field: ListingField) -> Option<&str> {
        self.table.get_str(row, self.column(field))
    }

    #[inline]
    pub fn categorical_id(&self, row: usize, field: ListingField) -> Option<StringId> {
        self.table.string_id(row, self.column(field))
    }

    pub fn record(&self, row: usize) -> Result<ListingRecord> {
        if row >= self.len() {
            return Err(ListingError::RowOutOfRange {
                row,
                len: self.len(),
            });
        }

        let text = |field| self.categorical(row, field).map(str::to_string);
        let mut extras = BTreeMap::new();
        for (col_idx, name) in self.table.schema().get_column_names().into_iter().enumerate() {
            if ListingField::from_name(name).is_none() {
                extras.insert(name.to_string(), self.table.get_value_by_index(row, col_idx)?);
            }
        }

        Ok(ListingRecord {
            price: self.numeric(row, ListingField::Price),
            bed: self.numeric(row, ListingField::Bed),
            bath: self.numeric(row, ListingField::Bath),
            acre_lot: self.numeric(row, ListingField::AcreLot),
            house_size: self.numeric(row, ListingField::HouseSize),
            state: text(ListingField::State),
            city: text(ListingField::City),
            status: text(ListingField::Status),
            extras,
        })
    }

    /// Distinct present values of a categorical field in encounter order.
    pub fn distinct(&self, field: ListingField) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in 0..self.len() {
            if let Some(id) = self.categorical_id(row, field) {
                if seen.insert(id) {
                    if let Some(s) = self.table.interner().resolve(id) {
                        values.push(s.to_string());
                    }
                }
            }
        }
        values
    }

    /// Keep the given rows; column positions and the interner carry over.
    pub fn take(&self, name: &str, indices: &[usize]) -> ListingTable {
        ListingTable {
            table: self.table.take(name, indices),
            columns: self.columns,
        }
    }

    /// Write the rows as comma-separated data with a header row.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        self.table.write_csv(writer)
    }

    /// Materialise the first `limit` rows as records.
    pub fn head(&self, limit: usize) -> Result<Vec<ListingRecord>> {
        (0..self.len().min(limit)).map(|row| self.record(row)).collect()
    }
}
