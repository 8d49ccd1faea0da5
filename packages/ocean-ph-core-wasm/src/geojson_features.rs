use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

// A GeoJSON FeatureCollection as read from the static data files. Features
// are kept as raw JSON so they reach the chart spec exactly as served.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<serde_json::Value>,
}

impl FeatureCollection {
    /// Build from a parsed document. Only the presence of a `features` array
    /// is checked; individual features are not inspected.
    pub fn from_value(path: &str, value: serde_json::Value) -> Result<Self, PipelineError> {
        serde_json::from_value(value).map_err(|e| PipelineError::parse(path, e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// The three collections one map render needs
#[derive(Clone, Debug, PartialEq)]
pub struct MapDatasets {
    pub acidification: FeatureCollection,
    pub ocean: FeatureCollection,
    pub graticule: FeatureCollection,
}
