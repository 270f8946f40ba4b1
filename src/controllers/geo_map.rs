//! State choropleth: average price per state painted onto map polygons.

use super::ViewController;
use crate::aggregate::{group_by, sort_groups, GroupValue, Reducer, SortKey, NA_KEY};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::listing::{ListingField, ListingTable};
use crate::view::{left_join_index, SortOrder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inclusive price interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            PriceRange { min: max, max: min }
        } else {
            PriceRange { min, max }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoMapState {
    pub price_range: PriceRange,
    pub show_na: bool,
}

/// How the renderer paints a vertex's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Colour scale by `avg_price`.
    Value,
    /// No value; painted with the placeholder colour.
    Placeholder,
    /// No value and placeholders are hidden.
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethVertex {
    pub long: f64,
    pub lat: f64,
    pub group: i64,
    pub order: i64,
    pub region: String,
    pub avg_price: Option<f64>,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMapOutput {
    pub price_range: PriceRange,
    pub show_na: bool,
    pub placeholder_color: String,
    /// Per-state averages inside the price range, lower-case keys.
    pub regions: Vec<GroupValue>,
    pub vertices: Vec<ChoroplethVertex>,
}

/// Mean price per state of `cleaned`, keyed by lower-case state name and
/// ordered by key. Listings without a state have no region and are left out.
pub fn geo_summary(cleaned: &ListingTable) -> Result<Vec<GroupValue>> {
    let mut groups = group_by(
        cleaned,
        ListingField::State.name(),
        ListingField::Price.name(),
        Reducer::Mean,
    )?;
    groups.retain(|g| g.key != NA_KEY);
    for group in &mut groups {
        group.key = group.key.to_lowercase();
    }
    sort_groups(&mut groups, SortKey::Key(SortOrder::Ascending));
    Ok(groups)
}

/// Lowest and highest per-state average, or `None` when no state has one.
pub fn observed_range(summary: &[GroupValue]) -> Option<PriceRange> {
    let mut values = summary.iter().filter_map(|g| g.value);
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(PriceRange { min, max })
}

/// Join the in-range state averages onto every polygon vertex.
///
/// The result has exactly one vertex per input vertex whatever the range.
pub fn choropleth(
    summary: &[GroupValue],
    geometry: &Geometry,
    state: &GeoMapState,
    placeholder_color: &str,
) -> GeoMapOutput {
    let regions: Vec<GroupValue> = summary
        .iter()
        .filter(|g| g.value.map_or(false, |v| state.price_range.contains(v)))
        .cloned()
        .collect();

    let joined = left_join_index(
        geometry.vertices(),
        &regions,
        |v| v.region.as_str(),
        |g| g.key.as_str(),
    );

    let vertices = joined
        .into_iter()
        .map(|(i, matched)| {
            let vertex = &geometry.vertices()[i];
            let avg_price = matched.and_then(|r| regions[r].value);
            let fill = match (avg_price, state.show_na) {
                (Some(_), _) => Fill::Value,
                (None, true) => Fill::Placeholder,
                (None, false) => Fill::Transparent,
            };
            ChoroplethVertex {
                long: vertex.long,
                lat: vertex.lat,
                group: vertex.group,
                order: vertex.order,
                region: vertex.region.clone(),
                avg_price,
                fill,
            }
        })
        .collect();

    GeoMapOutput {
        price_range: state.price_range,
        show_na: state.show_na,
        placeholder_color: placeholder_color.to_string(),
        regions,
        vertices,
    }
}

pub struct GeoMapController {
    cleaned: Arc<ListingTable>,
    geometry: Arc<Geometry>,
    placeholder_color: String,
    state: GeoMapState,
}

impl GeoMapController {
    /// Starts with the full observed range of state averages and
    /// placeholders shown.
    pub fn new(
        cleaned: Arc<ListingTable>,
        geometry: Arc<Geometry>,
        placeholder_color: impl Into<String>,
    ) -> Result<Self> {
        let price_range = observed_range(&geo_summary(&cleaned)?)
            .unwrap_or(PriceRange { min: 0.0, max: 0.0 });
        Ok(GeoMapController {
            cleaned,
            geometry,
            placeholder_color: placeholder_color.into(),
            state: GeoMapState {
                price_range,
                show_na: true,
            },
        })
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.state = GeoMapState {
            price_range: PriceRange::new(min, max),
            show_na: self.state.show_na,
        };
    }

    pub fn set_show_na(&mut self, enabled: bool) {
        self.state = GeoMapState {
            price_range: self.state.price_range,
            show_na: enabled,
        };
    }
}

impl ViewController for GeoMapController {
    type State = GeoMapState;
    type Output = GeoMapOutput;

    fn state(&self) -> &GeoMapState {
        &self.state
    }

    fn recompute(&self) -> Result<GeoMapOutput> {
        debug!(
            "Recomputing map for [{}, {}] (show NA: {})",
            self.state.price_range.min, self.state.price_range.max, self.state.show_na
        );
        let summary = geo_summary(&self.cleaned)?;
        Ok(choropleth(
            &summary,
            &self.geometry,
            &self.state,
            &self.placeholder_color,
        ))
    }
}
