//! Listing cleaner: drops rows missing any analysis field.

use crate::error::Result;
use crate::listing::{ListingField, ListingTable};
use log::{info, warn};
use serde::Serialize;

/// Keep the rows whose price, bed, bath, acre_lot and house_size are all
/// present, in source order. NaN cells are stored as absent.
///
/// The result shares the source's string interner, and cleaning a cleaned
/// table returns the same rows.
pub fn clean(listings: &ListingTable) -> ListingTable {
    let keep: Vec<usize> = (0..listings.len())
        .filter(|&row| is_complete(listings, row))
        .collect();

    let cleaned = listings.take(&format!("{}_cleaned", listings.name()), &keep);
    info!(
        "Cleaned listings: kept {} of {} rows",
        cleaned.len(),
        listings.len()
    );
    if cleaned.is_empty() {
        warn!("No listing has every analysis field present; cleaned table is empty");
    }
    cleaned
}

fn is_complete(listings: &ListingTable, row: usize) -> bool {
    ListingField::ANALYSIS
        .iter()
        .all(|&field| listings.numeric(row, field).is_some())
}

/// Missing-value counts of one analysis field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMissing {
    pub field: ListingField,
    pub missing: usize,
}

/// What cleaning removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing: Vec<FieldMissing>,
}

impl CleaningReport {
    pub fn new(raw: &ListingTable, cleaned: &ListingTable) -> Result<Self> {
        let missing = ListingField::ANALYSIS
            .iter()
            .map(|&field| {
                let present = raw.table().count_non_null(field.name())?;
                Ok(FieldMissing {
                    field,
                    missing: raw.len() - present,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CleaningReport {
            rows_before: raw.len(),
            rows_after: cleaned.len(),
            missing,
        })
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

impl std::fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "rows: {} -> {} ({} dropped)",
            self.rows_before,
            self.rows_after,
            self.rows_dropped()
        )?;
        for entry in &self.missing {
            writeln!(f, "  {:<12} {:>10} missing", entry.field.name(), entry.missing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = "\
status,price,bed,bath,acre_lot,city,state,house_size
for_sale,105000,3,2,0.12,Adjuntas,Puerto Rico,920
for_sale,80000,4,2,0.08,Adjuntas,Puerto Rico,
sold,,2,1,0.1,Juana Diaz,Puerto Rico,748
for_sale,145000,4,2,0.1,Ponce,Puerto Rico,1800
for_sale,65000,NA,1,0.05,Mayaguez,Puerto Rico,680
";

    fn listings() -> ListingTable {
        ListingTable::from_csv_reader("listings", LISTINGS.as_bytes()).unwrap()
    }

    #[test]
    fn test_clean_keeps_complete_rows_in_order() {
        let cleaned = clean(&listings());
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.numeric(0, ListingField::Price), Some(105000.0));
        assert_eq!(cleaned.numeric(1, ListingField::Price), Some(145000.0));
        assert_eq!(cleaned.name(), "listings_cleaned");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean(&listings());
        let twice = clean(&once);
        assert_eq!(twice.len(), once.len());
        for row in 0..once.len() {
            assert_eq!(once.record(row).unwrap(), twice.record(row).unwrap());
        }
    }

    #[test]
    fn test_clean_empty_result_is_not_an_error() {
        let csv = "price,bed,bath,acre_lot,house_size,state,city,status\n1,,1,1,1,Ohio,Akron,sold\n";
        let listings = ListingTable::from_csv_reader("listings", csv.as_bytes()).unwrap();
        assert!(clean(&listings).is_empty());
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let csv = "price,bed,bath,acre_lot,house_size,state,city,status\n\
                   1,1,1,NaN,1,Ohio,Akron,sold\n\
                   1,1,1,0.5,1,Ohio,Akron,sold\n";
        let listings = ListingTable::from_csv_reader("listings", csv.as_bytes()).unwrap();
        assert_eq!(clean(&listings).len(), 1);
    }

    #[test]
    fn test_infinite_values_are_present() {
        let csv = "price,bed,bath,acre_lot,house_size,state,city,status\n\
                   inf,1,1,0.5,1,Ohio,Akron,sold\n\
                   1,1,1,0.5,Infinity,Ohio,Akron,sold\n\
                   1,1,1,0.5,1,Ohio,Akron,sold\n";
        let raw = ListingTable::from_csv_reader("listings", csv.as_bytes()).unwrap();
        let cleaned = clean(&raw);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned.numeric(0, ListingField::Price), Some(f64::INFINITY));

        let report = CleaningReport::new(&raw, &cleaned).unwrap();
        assert!(report.missing.iter().all(|m| m.missing == 0));
    }

    #[test]
    fn test_cleaning_report() {
        let raw = listings();
        let cleaned = clean(&raw);
        let report = CleaningReport::new(&raw, &cleaned).unwrap();

        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 2);
        assert_eq!(report.rows_dropped(), 3);
        let missing: Vec<usize> = report.missing.iter().map(|m| m.missing).collect();
        assert_eq!(missing, vec![1, 1, 0, 0, 1]);
        assert!(report.to_string().contains("house_size"));
    }
}
