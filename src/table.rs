//! Table Implementation
//!
//! A Table is a collection of typed columns with a schema, loaded once and
//! read many times. Provides typed cell access, row materialisation, subset
//! materialisation and CSV import/export.
//!
//! # Examples
//!
//! ```
//! use listingview::{Table, Schema, ColumnType, ColumnValue};
//! use std::collections::HashMap;
//!
//! let schema = Schema::new(vec![
//!     ("state".to_string(), ColumnType::String, true),
//!     ("price".to_string(), ColumnType::Float64, true),
//! ]);
//!
//! let mut table = Table::new("listings".to_string(), schema);
//!
//! let mut row = HashMap::new();
//! row.insert("state".to_string(), ColumnValue::String("Vermont".to_string()));
//! row.insert("price".to_string(), ColumnValue::Float64(349000.0));
//! table.append_row(row).unwrap();
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.get_value(0, "state").unwrap().as_string(), Some("Vermont"));
//! ```

use crate::column::{Column, ColumnType, ColumnValue};
use crate::config::LoadOptions;
use crate::error::{ListingError, Result};
use crate::interner::{InternerStats, StringId, StringInterner};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Schema definition with column names and types.
///
/// ```
/// use listingview::{Schema, ColumnType};
///
/// let schema = Schema::new(vec![
///     ("price".to_string(), ColumnType::Float64, true),
///     ("state".to_string(), ColumnType::String, true),
/// ]);
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_column_index("state"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<(String, ColumnType, bool)>, // (name, type, nullable)
}

impl Schema {
    /// Creates a new schema from (column_name, column_type, is_nullable) tuples.
    pub fn new(columns: Vec<(String, ColumnType, bool)>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _, _)| name.as_str()).collect()
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _, _)| n == name)
    }

    pub fn get_column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, ty, _)| *ty)
    }
}

/// Root table owning its data.
///
/// String columns share one interner. Tables derived with [`Table::take`]
/// share the interner of their source, so string IDs compare across them.
#[derive(Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
    interner: Arc<StringInterner>,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        Self::with_capacity(name, schema, 0)
    }

    pub fn with_capacity(name: String, schema: Schema, capacity: usize) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|(col_name, col_type, _)| Column::with_capacity(col_name.clone(), *col_type, capacity))
            .collect();

        Table {
            name,
            schema,
            columns,
            row_count: 0,
            interner: Arc::new(StringInterner::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_stats(&self) -> InternerStats {
        self.interner.stats()
    }

    pub fn column(&self, col_idx: usize) -> Option<&Column> {
        self.columns.get(col_idx)
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .get_column_index(column)
            .ok_or_else(|| ListingError::field_not_found(column))
    }

    /// Resolve a column that must hold numbers.
    pub fn numeric_column(&self, column: &str) -> Result<usize> {
        self.typed_column(column, "numeric", ColumnType::is_numeric)
    }

    /// Resolve a column that must hold categorical strings.
    pub fn categorical_column(&self, column: &str) -> Result<usize> {
        self.typed_column(column, "categorical", ColumnType::is_categorical)
    }

    fn typed_column(
        &self,
        column: &str,
        expected: &'static str,
        accepts: fn(ColumnType) -> bool,
    ) -> Result<usize> {
        let col_idx = self.column_index(column)?;
        let actual = self.columns[col_idx].column_type();
        if accepts(actual) {
            Ok(col_idx)
        } else {
            Err(ListingError::FieldType {
                field: column.to_string(),
                expected,
                actual,
            })
        }
    }

    pub fn get_value(&self, row: usize, column: &str) -> Result<ColumnValue> {
        let col_idx = self.column_index(column)?;
        self.get_value_by_index(row, col_idx)
    }

    /// Get a value by column index (faster than get_value when column index is known).
    pub fn get_value_by_index(&self, row: usize, col_idx: usize) -> Result<ColumnValue> {
        let col = self.columns.get(col_idx).ok_or_else(|| {
            ListingError::field_not_found(format!("#{}", col_idx))
        })?;
        col.get(row, &self.interner).ok_or(ListingError::RowOutOfRange {
            row,
            len: self.row_count,
        })
    }

    #[inline]
    pub fn get_f64(&self, row: usize, col_idx: usize) -> Option<f64> {
        self.columns.get(col_idx)?.get_f64(row)
    }

    #[inline]
    pub fn get_str(&self, row: usize, col_idx: usize) -> Option<&str> {
        self.columns.get(col_idx)?.get_str(row, &self.interner)
    }

    #[inline]
    pub fn string_id(&self, row: usize, col_idx: usize) -> Option<StringId> {
        self.columns.get(col_idx)?.string_id(row)
    }

    pub fn append_row(&mut self, row: HashMap<String, ColumnValue>) -> Result<()> {
        let mut values = Vec::with_capacity(self.columns.len());
        for col_name in self.schema.get_column_names() {
            let value = row
                .get(col_name)
                .cloned()
                .ok_or_else(|| ListingError::field_not_found(col_name))?;
            values.push(value);
        }
        self.append_values(values)
    }

    /// Append one row given values in schema order.
    pub fn append_values(&mut self, values: Vec<ColumnValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(ListingError::FieldNotFound {
                field: format!(
                    "row has {} values but schema has {} columns",
                    values.len(),
                    self.columns.len()
                ),
            });
        }

        let interner = Arc::make_mut(&mut self.interner);
        for (col, value) in self.columns.iter_mut().zip(values) {
            col.append(value, interner)?;
        }
        self.row_count += 1;
        Ok(())
    }

    /// Materialise the given rows (in the given order) as a new table that
    /// shares this table's string interner.
    pub fn take(&self, name: &str, indices: &[usize]) -> Table {
        let indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.row_count)
            .collect();

        Table {
            name: name.to_string(),
            schema: self.schema.clone(),
            columns: self.columns.iter().map(|c| c.take(&indices)).collect(),
            row_count: indices.len(),
            interner: Arc::clone(&self.interner),
        }
    }

    /// Count the number of present values in a column.
    pub fn count_non_null(&self, column: &str) -> Result<usize> {
        let col_idx = self.column_index(column)?;
        Ok(self.columns[col_idx].count_non_null())
    }

    // ========================================================================
    // Serialization Methods
    // ========================================================================

    /// Read a comma-separated file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ListingError::MissingInputFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string();
        Self::from_csv_reader(&name, file, options)
    }

    /// Create a table from comma-separated data with a header row.
    ///
    /// Column types are inferred across all data rows, widening as needed:
    /// - integers → INT64, widened to FLOAT64 when any value has decimals
    /// - "true"/"false" (case-insensitive) → BOOL
    /// - YYYY-MM-DD → DATE
    /// - anything else (or a mix) → STRING
    ///
    /// Empty cells and configured NA tokens are absent. A column with no
    /// present value takes its type hint, or STRING.
    ///
    /// ```
    /// use listingview::{Table, ColumnType, LoadOptions};
    ///
    /// let csv = "state,price,bed\nOhio,120000,3\nIowa,NA,2.5\n";
    /// let table = Table::from_csv_reader("listings", csv.as_bytes(), &LoadOptions::default()).unwrap();
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.schema().get_column_type("price"), Some(ColumnType::Int64));
    /// assert_eq!(table.schema().get_column_type("bed"), Some(ColumnType::Float64));
    /// assert!(table.get_value(1, "price").unwrap().is_null());
    /// ```
    pub fn from_csv_reader<R: Read>(name: &str, reader: R, options: &LoadOptions) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let records = csv_reader
            .records()
            .collect::<std::result::Result<Vec<csv::StringRecord>, csv::Error>>()?;

        let mut inferred = vec![Inferred::Empty; headers.len()];
        for record in &records {
            for (slot, cell) in inferred.iter_mut().zip(record.iter()) {
                if !options.is_na(cell) {
                    *slot = slot.widen(classify_cell(cell));
                }
            }
        }

        let schema_cols: Vec<(String, ColumnType, bool)> = headers
            .iter()
            .zip(&inferred)
            .map(|(col_name, inferred)| {
                let hint = options.type_hints.get(col_name).copied();
                (col_name.clone(), inferred.resolve(hint), true)
            })
            .collect();

        let mut table = Table::with_capacity(name.to_string(), Schema::new(schema_cols), records.len());
        for (row_idx, record) in records.iter().enumerate() {
            let mut values = Vec::with_capacity(headers.len());
            for (col_idx, cell) in record.iter().enumerate() {
                let col_type = table.columns[col_idx].column_type();
                let value = parse_cell(cell, col_type, options).ok_or_else(|| ListingError::Parse {
                    row: row_idx + 1,
                    column: headers[col_idx].clone(),
                    value: cell.to_string(),
                    expected: col_type,
                })?;
                values.push(value);
            }
            table.append_values(values)?;
        }

        Ok(table)
    }

    /// Write the table as comma-separated data with a header row.
    /// Absent values become empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.schema.get_column_names())?;

        for row in 0..self.row_count {
            let record: Vec<String> = (0..self.columns.len())
                .map(|col_idx| match self.get_value_by_index(row, col_idx) {
                    Ok(ColumnValue::Int64(n)) => n.to_string(),
                    Ok(ColumnValue::Float64(f)) => f.to_string(),
                    Ok(ColumnValue::String(s)) => s,
                    Ok(ColumnValue::Bool(b)) => b.to_string(),
                    Ok(ColumnValue::Date(days)) => format_date(days),
                    Ok(ColumnValue::Null) | Err(_) => String::new(),
                })
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Running type inference state of one CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inferred {
    Empty,
    Known(ColumnType),
}

impl Inferred {
    fn widen(self, cell: ColumnType) -> Inferred {
        let next = match self {
            Inferred::Empty => cell,
            Inferred::Known(current) if current == cell => current,
            Inferred::Known(ColumnType::Int64) if cell == ColumnType::Float64 => ColumnType::Float64,
            Inferred::Known(ColumnType::Float64) if cell == ColumnType::Int64 => ColumnType::Float64,
            Inferred::Known(_) => ColumnType::String,
        };
        Inferred::Known(next)
    }

    fn resolve(self, hint: Option<ColumnType>) -> ColumnType {
        match self {
            Inferred::Known(t) => t,
            Inferred::Empty => hint.unwrap_or(ColumnType::String),
        }
    }
}

/// Infer the type of a single present CSV value
fn classify_cell(value: &str) -> ColumnType {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return ColumnType::Bool;
    }
    if value.len() == 10 && value.as_bytes()[4] == b'-' && parse_date(value).is_some() {
        return ColumnType::Date;
    }
    if value.parse::<i64>().is_ok() {
        return ColumnType::Int64;
    }
    if value.parse::<f64>().is_ok() {
        return ColumnType::Float64;
    }
    ColumnType::String
}

/// Parse a CSV cell into a ColumnValue of the column's type
fn parse_cell(value: &str, col_type: ColumnType, options: &LoadOptions) -> Option<ColumnValue> {
    if options.is_na(value) {
        return Some(ColumnValue::Null);
    }

    match col_type {
        ColumnType::Int64 => value.parse().ok().map(ColumnValue::Int64),
        ColumnType::Float64 => value.parse().ok().map(ColumnValue::Float64),
        ColumnType::Bool => {
            if value.eq_ignore_ascii_case("true") {
                Some(ColumnValue::Bool(true))
            } else if value.eq_ignore_ascii_case("false") {
                Some(ColumnValue::Bool(false))
            } else {
                None
            }
        }
        ColumnType::Date => parse_date(value).map(ColumnValue::Date),
        ColumnType::String => Some(ColumnValue::String(value.to_string())),
    }
}

/// Convert days since Unix epoch (1970-01-01) to (year, month, day)
fn ymd_from_days(days: i32) -> (i32, u32, u32) {
    // https://howardhinnant.github.io/date_algorithms.html
    let z = days + 719468;
    let era = if z >= 0 { z / 146097 } else { (z - 146096) / 146097 };
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = (yoe as i32) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

fn days_from_ymd(year: i32, month: u32, day: u32) -> i32 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y / 400 } else { (y - 399) / 400 };
    let yoe = (y - era * 400) as u32;
    let doy = (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    (era * 146097 + doe as i32) - 719468
}

/// Format a date (days since epoch) as YYYY-MM-DD
pub(crate) fn format_date(days: i32) -> String {
    let (year, month, day) = ymd_from_days(days);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Parse a YYYY-MM-DD string to days since epoch
fn parse_date(s: &str) -> Option<i32> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(days_from_ymd(year, month, day))
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Table {{ name: '{}', columns: {}, rows: {} }}",
            self.name,
            self.schema.len(),
            self.row_count
        )
    }
}
