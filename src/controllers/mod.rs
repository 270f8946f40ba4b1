//! Reactive view controllers.
//!
//! Each controller owns the state of one dashboard view and derives that
//! view's render data from the shared tables. State only changes through the
//! controller's setters; [`ViewController::recompute`] never mutates anything.

use crate::error::Result;
use serde::Serialize;

pub mod geo_map;
pub mod overview;
pub mod scatter;
pub mod state_comparison;

pub use geo_map::{
    ChoroplethVertex, Fill, GeoMapController, GeoMapOutput, GeoMapState, PriceRange,
};
pub use overview::{OverviewController, OverviewOutput, OverviewState, OverviewSummary};
pub use scatter::{ScatterController, ScatterOutput, ScatterPoint, ScatterState};
pub use state_comparison::{
    ComparisonOutput, ComparisonState, PriceBar, StateComparisonController,
};

/// A dashboard view: state plus a pure derivation of its render data.
pub trait ViewController {
    type State;
    type Output: Serialize;

    fn state(&self) -> &Self::State;

    /// Derive the render data for the current state.
    fn recompute(&self) -> Result<Self::Output>;
}
