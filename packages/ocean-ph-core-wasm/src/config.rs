// Map configuration. Defaults are the fixed resource paths and page target
// the map has always used; JS may override them with a JSON object.
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const ACIDIFICATION_URL: &str = "/GeoJSON/ocean_acidification_geo.json";
pub const OCEAN_URL: &str = "/GeoJSON/ne_110m_ocean.json";
pub const GRATICULE_URL: &str = "/GeoJSON/ne_110m_graticules_30.json";
pub const TARGET_ELEMENT: &str = "#ph-map";
pub const CHART_TITLE: &str =
    "pH values deviation from global average of Ocean Water near Australia in 2013";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub acidification_url: String,
    pub ocean_url: String,
    pub graticule_url: String,
    // CSS selector handed to the renderer
    pub target: String,
    pub title: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            acidification_url: ACIDIFICATION_URL.to_string(),
            ocean_url: OCEAN_URL.to_string(),
            graticule_url: GRATICULE_URL.to_string(),
            target: TARGET_ELEMENT.to_string(),
            title: CHART_TITLE.to_string(),
        }
    }
}

impl MapConfig {
    /// Parse an optional JSON override. Blank input yields the defaults and
    /// any field left out keeps its default.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        if json.trim().is_empty() {
            return Ok(MapConfig::default());
        }
        serde_json::from_str(json).map_err(|e| PipelineError::parse("config", e.to_string()))
    }

    /// Resource paths in fetch order: acidification, ocean, graticule.
    pub fn resource_paths(&self) -> [&str; 3] {
        [
            self.acidification_url.as_str(),
            self.ocean_url.as_str(),
            self.graticule_url.as_str(),
        ]
    }
}
