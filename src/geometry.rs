//! Polygon vertex table for the state choropleth.
//!
//! The layout matches ggplot2's `map_data("state")` export:
//! `long,lat,group,order,region[,subregion]`, one row per polygon vertex.
//! `region` holds the lower-case state name.

use crate::error::{ListingError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One vertex of a state outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonVertex {
    pub long: f64,
    pub lat: f64,
    /// Polygon the vertex belongs to; a state may have several.
    pub group: i64,
    /// Drawing order within the polygon.
    pub order: i64,
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
}

/// Vertices of every polygon, in file order.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<PolygonVertex>,
}

impl Geometry {
    pub fn new(vertices: Vec<PolygonVertex>) -> Self {
        Geometry { vertices }
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ListingError::MissingInputFile {
            path: path.to_path_buf(),
            source,
        })?;
        let geometry = Self::from_csv_reader(file)?;
        info!(
            "Loaded {} polygon vertices ({} regions) from {}",
            geometry.len(),
            geometry.regions().len(),
            path.display()
        );
        Ok(geometry)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut vertices = Vec::new();
        for record in csv_reader.deserialize() {
            let mut vertex: PolygonVertex = record?;
            if matches!(vertex.subregion.as_deref(), Some("") | Some("NA")) {
                vertex.subregion = None;
            }
            vertices.push(vertex);
        }
        Ok(Geometry { vertices })
    }

    pub fn vertices(&self) -> &[PolygonVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Distinct region names in file order.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for vertex in &self.vertices {
            if regions.last() != Some(&vertex.region.as_str())
                && !regions.contains(&vertex.region.as_str())
            {
                regions.push(&vertex.region);
            }
        }
        regions
    }
}
