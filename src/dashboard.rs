//! One user's dashboard: the four view controllers and action dispatch.
//!
//! Tables are loaded once and shared read-only between dashboards; each
//! dashboard owns only its controllers' view state.
//!
//! ```
//! use listingview::{Action, Dashboard, DashboardConfig, RenderOutput, SharedTables};
//! use listingview::{Geometry, ListingTable};
//!
//! let csv = "price,bed,bath,acre_lot,house_size,state,city,status\n\
//!            100,3,2,0.1,1000,Ohio,Akron,for_sale\n\
//!            300,3,2,0.1,2000,Iowa,Ames,sold\n";
//! let raw = ListingTable::from_csv_reader("listings", csv.as_bytes()).unwrap();
//! let tables = SharedTables::new(raw, Geometry::default());
//!
//! let mut dashboard = Dashboard::new(&tables, &DashboardConfig::default()).unwrap();
//! dashboard.dispatch(Action::SelectStates { states: vec!["Iowa".into()] }).unwrap();
//!
//! match dashboard.dispatch(Action::RefreshComparison).unwrap() {
//!     Some(RenderOutput::StateComparison(output)) => assert_eq!(output.bars[0].state, "Iowa"),
//!     other => panic!("unexpected render {:?}", other),
//! }
//! ```

use crate::clean::clean;
use crate::config::DashboardConfig;
use crate::controllers::{
    ComparisonOutput, GeoMapController, GeoMapOutput, OverviewController, OverviewOutput,
    ScatterController, ScatterOutput, StateComparisonController, ViewController,
};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::listing::ListingTable;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// The read-only data every dashboard works from.
#[derive(Debug, Clone)]
pub struct SharedTables {
    pub raw: Arc<ListingTable>,
    pub cleaned: Arc<ListingTable>,
    pub geometry: Arc<Geometry>,
}

impl SharedTables {
    /// Clean `raw` and bundle it with the map geometry.
    pub fn new(raw: ListingTable, geometry: Geometry) -> Self {
        let cleaned = clean(&raw);
        SharedTables {
            raw: Arc::new(raw),
            cleaned: Arc::new(cleaned),
            geometry: Arc::new(geometry),
        }
    }

    /// Load listings and, when given, the polygon file.
    pub fn load(listings: impl AsRef<Path>, geometry: Option<&Path>) -> Result<Self> {
        let raw = ListingTable::from_csv_path(listings)?;
        let geometry = match geometry {
            Some(path) => Geometry::from_csv_path(path)?,
            None => {
                warn!("No geometry file given; the map view will have no polygons");
                Geometry::default()
            }
        };
        Ok(Self::new(raw, geometry))
    }
}

/// A user interaction with one of the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    SelectField { field: String },
    RefreshOverview,
    SelectStates { states: Vec<String> },
    RefreshComparison,
    SelectState { state: String },
    SetLogScale { enabled: bool },
    RefreshScatter,
    SetPriceRange { min: f64, max: f64 },
    SetShowNa { enabled: bool },
}

/// Render data of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum RenderOutput {
    Overview(OverviewOutput),
    StateComparison(ComparisonOutput),
    Scatter(ScatterOutput),
    GeoMap(GeoMapOutput),
}

pub struct Dashboard {
    overview: OverviewController,
    comparison: StateComparisonController,
    scatter: ScatterController,
    geo_map: GeoMapController,
}

impl Dashboard {
    pub fn new(tables: &SharedTables, config: &DashboardConfig) -> Result<Self> {
        Ok(Dashboard {
            overview: OverviewController::new(Arc::clone(&tables.raw)),
            comparison: StateComparisonController::new(
                Arc::clone(&tables.raw),
                config.compared_states,
            ),
            scatter: ScatterController::new(Arc::clone(&tables.raw)),
            geo_map: GeoMapController::new(
                Arc::clone(&tables.cleaned),
                Arc::clone(&tables.geometry),
                config.placeholder_color.clone(),
            )?,
        })
    }

    pub fn overview(&self) -> &OverviewController {
        &self.overview
    }

    pub fn comparison(&self) -> &StateComparisonController {
        &self.comparison
    }

    pub fn scatter(&self) -> &ScatterController {
        &self.scatter
    }

    pub fn geo_map(&self) -> &GeoMapController {
        &self.geo_map
    }

    /// Apply an action to its view.
    ///
    /// Selections only update state and return `None`; refreshes and map
    /// changes return the recomputed view. A failed recompute leaves every
    /// view's state as the action set it.
    pub fn dispatch(&mut self, action: Action) -> Result<Option<RenderOutput>> {
        debug!("Dispatching {:?}", action);
        let rendered = match action {
            Action::SelectField { field } => {
                self.overview.select_field(field);
                None
            }
            Action::RefreshOverview => Some(RenderOutput::Overview(self.overview.recompute()?)),
            Action::SelectStates { states } => {
                self.comparison.select_states(states);
                None
            }
            Action::RefreshComparison => {
                Some(RenderOutput::StateComparison(self.comparison.recompute()?))
            }
            Action::SelectState { state } => {
                self.scatter.select_state(state);
                None
            }
            Action::SetLogScale { enabled } => {
                self.scatter.set_log_scale(enabled);
                None
            }
            Action::RefreshScatter => Some(RenderOutput::Scatter(self.scatter.recompute()?)),
            Action::SetPriceRange { min, max } => {
                self.geo_map.set_price_range(min, max);
                Some(RenderOutput::GeoMap(self.geo_map.recompute()?))
            }
            Action::SetShowNa { enabled } => {
                self.geo_map.set_show_na(enabled);
                Some(RenderOutput::GeoMap(self.geo_map.recompute()?))
            }
        };
        Ok(rendered)
    }

    /// Every view for the current state, overview first.
    pub fn render_all(&self) -> Vec<Result<RenderOutput>> {
        vec![
            self.overview.recompute().map(RenderOutput::Overview),
            self.comparison.recompute().map(RenderOutput::StateComparison),
            self.scatter.recompute().map(RenderOutput::Scatter),
            self.geo_map.recompute().map(RenderOutput::GeoMap),
        ]
    }
}
