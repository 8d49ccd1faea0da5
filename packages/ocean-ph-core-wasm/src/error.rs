use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of one fetch-size-build-render run.
///
/// Fetch and parse failures come from loading the GeoJSON resources and are
/// kept apart from renderer failures, which mean the chart engine rejected
/// the specification we handed it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("failed to serialize chart specification: {0}")]
    Serialize(String),

    #[error("renderer rejected chart specification: {0}")]
    Render(String),

    #[error("browser environment unavailable: {0}")]
    Browser(String),
}

impl PipelineError {
    pub fn fetch(path: &str, reason: impl Into<String>) -> Self {
        PipelineError::Fetch {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(path: &str, reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures that happened while loading data, before any spec existed.
    pub fn is_data_error(&self) -> bool {
        matches!(self, PipelineError::Fetch { .. } | PipelineError::Parse { .. })
    }
}

impl From<PipelineError> for JsValue {
    fn from(err: PipelineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Render a JS exception value as text for error messages.
pub fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
