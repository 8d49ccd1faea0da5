// This is the models module containing shared data structures
use serde::{Deserialize, Serialize};

/// Target canvas size for one render cycle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
}

/// What became of a pipeline run that did not fail.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RenderOutcome {
    Rendered { generation: u64 },
    // A newer generation was drawn before this one reached the renderer
    Superseded { generation: u64, rendered: u64 },
}
