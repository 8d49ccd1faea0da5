// Vega-Lite specification for the pH deviation map.
//
// The spec is plain data: three layers over a fixed conic equal-area
// projection framing the waters around Australia. Feature arrays are moved
// into the layers unchanged and in source order.
use serde::Serialize;

use crate::error::PipelineError;
use crate::geojson_features::{FeatureCollection, MapDatasets};
use crate::models::ChartDimensions;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

// Diverging scale: acidic (red) through neutral gray to basic (blue)
pub const PH_DOMAIN: [f64; 5] = [-0.1, -0.05, 0.0, 0.05, 0.1];
pub const PH_RANGE: [&str; 5] = ["#d73027", "#fc8d59", "#e0e0e0", "#91bfdb", "#4575b4"];

pub const POINT_SIZE: u32 = 50;
pub const GRATICULE_STROKE_WIDTH: f64 = 1.5;

const LATITUDE_FIELD: &str = "geometry.coordinates.1";
const LONGITUDE_FIELD: &str = "geometry.coordinates.0";
const PH_FIELD: &str = "properties.pH_deviation";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub projection: Projection,
    pub layer: Vec<Layer>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
    pub center: [f64; 2],
    pub rotate: [f64; 3],
    pub parallels: [f64; 2],
    pub scale: f64,
}

impl Projection {
    /// Conic equal-area centred on Australia.
    pub fn australia() -> Self {
        Projection {
            kind: "conicEqualArea".to_string(),
            center: [0.0, -25.0],
            rotate: [-133.0, 0.0, 0.0],
            parallels: [-18.0, -36.0],
            scale: 850.0,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Layer {
    pub data: LayerData,
    pub mark: Mark,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LayerData {
    pub values: Vec<serde_json::Value>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Geoshape,
    Circle,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Mark {
    fn plain(kind: MarkType) -> Self {
        Mark {
            kind,
            fill: None,
            stroke: None,
            filled: None,
            stroke_width: None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Encoding {
    pub latitude: FieldDef,
    pub longitude: FieldDef,
    pub color: ColorDef,
    pub size: ValueDef,
    pub tooltip: Vec<FieldDef>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FieldDef {
    fn quantitative(field: &str, title: Option<&str>) -> Self {
        FieldDef {
            field: field.to_string(),
            kind: "quantitative".to_string(),
            title: title.map(str::to_string),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ColorDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub scale: Scale,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Scale {
    pub domain: Vec<f64>,
    pub range: Vec<String>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueDef {
    pub value: u32,
}

fn basemap_layer(features: Vec<serde_json::Value>) -> Layer {
    Layer {
        data: LayerData { values: features },
        mark: Mark {
            fill: Some("lightgray".to_string()),
            ..Mark::plain(MarkType::Geoshape)
        },
        encoding: None,
    }
}

fn graticule_layer(features: Vec<serde_json::Value>) -> Layer {
    Layer {
        data: LayerData { values: features },
        mark: Mark {
            stroke: Some("gray".to_string()),
            filled: Some(false),
            stroke_width: Some(GRATICULE_STROKE_WIDTH),
            ..Mark::plain(MarkType::Geoshape)
        },
        encoding: None,
    }
}

fn point_layer(features: Vec<serde_json::Value>) -> Layer {
    // The scale is fixed so colours mean the same thing on every render,
    // whatever range the data happens to cover
    let color = ColorDef {
        field: PH_FIELD.to_string(),
        kind: "quantitative".to_string(),
        title: "pH Deviation from Global Avg".to_string(),
        scale: Scale {
            domain: PH_DOMAIN.to_vec(),
            range: PH_RANGE.iter().map(|c| c.to_string()).collect(),
        },
    };

    Layer {
        data: LayerData { values: features },
        mark: Mark::plain(MarkType::Circle),
        encoding: Some(Encoding {
            latitude: FieldDef::quantitative(LATITUDE_FIELD, None),
            longitude: FieldDef::quantitative(LONGITUDE_FIELD, None),
            color,
            size: ValueDef { value: POINT_SIZE },
            tooltip: vec![
                FieldDef::quantitative(LATITUDE_FIELD, Some("Latitude")),
                FieldDef::quantitative(LONGITUDE_FIELD, Some("Longitude")),
                FieldDef::quantitative(PH_FIELD, Some("pH deviation")),
            ],
        }),
    }
}

/// Assemble the layered map: ocean basemap, graticule, then the
/// acidification points on top.
pub fn build_chart_spec(datasets: MapDatasets, dimensions: ChartDimensions, title: &str) -> ChartSpec {
    let MapDatasets {
        acidification,
        ocean,
        graticule,
    } = datasets;

    ChartSpec {
        schema: VEGA_LITE_SCHEMA.to_string(),
        width: dimensions.width,
        height: dimensions.height,
        title: title.to_string(),
        projection: Projection::australia(),
        layer: vec![
            basemap_layer(ocean.features),
            graticule_layer(graticule.features),
            point_layer(acidification.features),
        ],
    }
}

/// Build the spec from three raw GeoJSON documents and return it as JSON text.
pub fn spec_json_from_documents(
    acidification: &str,
    ocean: &str,
    graticule: &str,
    dimensions: ChartDimensions,
    title: &str,
) -> Result<String, PipelineError> {
    let parse = |name: &str, text: &str| -> Result<FeatureCollection, PipelineError> {
        let value = serde_json::from_str(text).map_err(|e| PipelineError::parse(name, e.to_string()))?;
        FeatureCollection::from_value(name, value)
    };
    let datasets = MapDatasets {
        acidification: parse("acidification", acidification)?,
        ocean: parse("ocean", ocean)?,
        graticule: parse("graticule", graticule)?,
    };
    let spec = build_chart_spec(datasets, dimensions, title);
    serde_json::to_string(&spec).map_err(|e| PipelineError::Serialize(e.to_string()))
}
