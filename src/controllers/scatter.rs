//! House size against price for the listings of one state.

use super::ViewController;
use crate::error::Result;
use crate::listing::{ListingField, ListingTable};
use crate::view::{FilterView, RowSource};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterState {
    pub selected_state: Option<String>,
    pub log_scale: bool,
}

/// One listing; absent coordinates stay absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterOutput {
    pub state: Option<String>,
    pub log_scale: bool,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    /// Points dropped because a coordinate had no logarithm.
    pub excluded: usize,
    /// Every state the selector offers, in encounter order.
    pub state_choices: Vec<String>,
}

/// Natural log of both present coordinates; `None` when a present
/// coordinate is zero or negative.
fn log_point(point: ScatterPoint) -> Option<ScatterPoint> {
    let ln = |v: Option<f64>| match v {
        Some(v) if v > 0.0 => Some(Some(v.ln())),
        Some(_) => None,
        None => Some(None),
    };
    Some(ScatterPoint {
        x: ln(point.x)?,
        y: ln(point.y)?,
    })
}

fn axis_label(field: ListingField, log_scale: bool) -> String {
    if log_scale {
        format!("log({})", field.name())
    } else {
        field.name().to_string()
    }
}

/// `(house_size, price)` of every `raw` listing in `state`.
pub fn scatter_points(raw: &ListingTable, state: Option<&str>, log_scale: bool) -> ScatterOutput {
    let table = raw.table();
    let state_col = raw.column(ListingField::State);
    let state_id = state.and_then(|s| table.interner().lookup(s));

    let rows = FilterView::new("scatter_state", table, |t, row| {
        state_id.is_some() && t.string_id(row, state_col) == state_id
    });

    let mut points = Vec::with_capacity(rows.len());
    let mut excluded = 0;
    for row in rows.parent_rows() {
        let point = ScatterPoint {
            x: raw.numeric(row, ListingField::HouseSize),
            y: raw.numeric(row, ListingField::Price),
        };
        if !log_scale {
            points.push(point);
            continue;
        }
        match log_point(point) {
            Some(p) => points.push(p),
            None => excluded += 1,
        }
    }

    ScatterOutput {
        state: state.map(str::to_string),
        log_scale,
        x_label: axis_label(ListingField::HouseSize, log_scale),
        y_label: axis_label(ListingField::Price, log_scale),
        points,
        excluded,
        state_choices: raw.distinct(ListingField::State),
    }
}

pub struct ScatterController {
    raw: Arc<ListingTable>,
    state: ScatterState,
}

impl ScatterController {
    /// Starts on the first state of `raw`, linear axes.
    pub fn new(raw: Arc<ListingTable>) -> Self {
        let selected_state = raw.distinct(ListingField::State).into_iter().next();
        ScatterController {
            raw,
            state: ScatterState {
                selected_state,
                log_scale: false,
            },
        }
    }

    pub fn state_choices(&self) -> Vec<String> {
        self.raw.distinct(ListingField::State)
    }

    pub fn select_state(&mut self, state: impl Into<String>) {
        self.state = ScatterState {
            selected_state: Some(state.into()),
            log_scale: self.state.log_scale,
        };
    }

    pub fn set_log_scale(&mut self, enabled: bool) {
        self.state = ScatterState {
            selected_state: self.state.selected_state.take(),
            log_scale: enabled,
        };
    }
}

impl ViewController for ScatterController {
    type State = ScatterState;
    type Output = ScatterOutput;

    fn state(&self) -> &ScatterState {
        &self.state
    }

    fn recompute(&self) -> Result<ScatterOutput> {
        debug!(
            "Recomputing scatter for {:?} (log scale: {})",
            self.state.selected_state, self.state.log_scale
        );
        Ok(scatter_points(
            &self.raw,
            self.state.selected_state.as_deref(),
            self.state.log_scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = "\
status,price,bed,bath,acre_lot,city,state,house_size
for_sale,100000,,,,Reno,NV,1000
for_sale,250000,,,,Austin,TX,2000
for_sale,90000,,,,Reno,NV,0
for_sale,,,,,Reno,NV,1500
for_sale,120000,,,,Reno,NV,
";

    fn controller() -> ScatterController {
        let raw = ListingTable::from_csv_reader("listings", LISTINGS.as_bytes()).unwrap();
        ScatterController::new(Arc::new(raw))
    }

    #[test]
    fn test_default_state_and_linear_points() {
        let scatter = controller();
        assert_eq!(scatter.state().selected_state.as_deref(), Some("NV"));
        assert!(!scatter.state().log_scale);

        let output = scatter.recompute().unwrap();
        assert_eq!(output.points.len(), 4);
        assert_eq!(output.excluded, 0);
        assert_eq!(output.points[3], ScatterPoint { x: None, y: Some(120000.0) });
        assert_eq!(output.x_label, "house_size");
        assert_eq!(output.y_label, "price");
    }

    #[test]
    fn test_log_scale_excludes_only_zero_size() {
        let mut scatter = controller();
        scatter.set_log_scale(true);
        assert_eq!(scatter.state().selected_state.as_deref(), Some("NV"));

        let output = scatter.recompute().unwrap();
        assert_eq!(output.excluded, 1);
        assert_eq!(output.points.len(), 3);
        assert_eq!(output.points[0].x, Some(1000f64.ln()));
        assert_eq!(output.points[0].y, Some(100000f64.ln()));
        assert_eq!(output.points[1], ScatterPoint { x: Some(1500f64.ln()), y: None });
        assert_eq!(output.x_label, "log(house_size)");
    }

    #[test]
    fn test_select_state_keeps_log_flag() {
        let mut scatter = controller();
        scatter.set_log_scale(true);
        scatter.select_state("TX");
        assert!(scatter.state().log_scale);

        let output = scatter.recompute().unwrap();
        assert_eq!(output.state.as_deref(), Some("TX"));
        assert_eq!(output.points.len(), 1);
    }

    #[test]
    fn test_unknown_state_is_empty() {
        let mut scatter = controller();
        scatter.select_state("Atlantis");
        let output = scatter.recompute().unwrap();
        assert!(output.points.is_empty());
        assert_eq!(output.excluded, 0);
        assert_eq!(output.state_choices, vec!["NV", "TX"]);
    }
}
