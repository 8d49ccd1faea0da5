use std::rc::Rc;

use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Create a console module for logging
pub mod console;
// Typed pipeline errors
pub mod error;
// Map configuration and fixed resource paths
pub mod config;
// Shared data structures
pub mod models;
// GeoJSON feature collections
pub mod geojson_features;
// Resource fetching
pub mod fetcher;
// Viewport sizing
pub mod viewport;
// Vega-Lite spec assembly
pub mod chart_spec;
// Render generations
pub mod cancellation;
// Rendering engine and resize events
pub mod renderer;
// Fetch, size, build, render
pub mod pipeline;

use cancellation::global_generations;
use config::MapConfig;
use fetcher::BrowserFetcher;
use pipeline::MapPipeline;
use renderer::{BrowserResize, VegaEmbedRenderer};
use viewport::BrowserViewport;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => ($crate::console::warn(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => ($crate::console::error(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("pH map module initialized");
    });
}

pub type BrowserPipeline = MapPipeline<BrowserFetcher, BrowserViewport, VegaEmbedRenderer>;

fn browser_pipeline(config_json: Option<String>) -> Result<BrowserPipeline, JsValue> {
    let config = MapConfig::from_json(config_json.as_deref().unwrap_or(""))?;
    Ok(MapPipeline::new(
        config,
        BrowserFetcher,
        BrowserViewport,
        VegaEmbedRenderer,
        global_generations(),
    ))
}

/// Render the map once and re-render it on every window resize.
#[wasm_bindgen]
pub fn start_ph_map(config_json: Option<String>) -> Result<(), JsValue> {
    let pipeline = Rc::new(browser_pipeline(config_json)?);
    console_log!("Starting pH map in {}", pipeline.config.target);

    spawn_local(Rc::clone(&pipeline).detached_run());
    pipeline.subscribe_resize(&BrowserResize, |fut| spawn_local(fut))?;
    Ok(())
}

/// Run the pipeline once; resolves to `{status, generation, ...}`.
#[wasm_bindgen]
pub async fn render_ph_map(config_json: Option<String>) -> Result<JsValue, JsValue> {
    let pipeline = browser_pipeline(config_json)?;
    let outcome = pipeline.trigger().await?;
    Ok(to_value(&outcome)?)
}

#[wasm_bindgen]
pub fn get_chart_dimensions(inner_width: f64, inner_height: f64) -> Result<JsValue, JsValue> {
    Ok(to_value(&viewport::chart_dimensions(inner_width, inner_height))?)
}

/// Build the chart spec from three GeoJSON documents passed as JSON strings.
/// `title` defaults to the standard map title.
#[wasm_bindgen]
pub fn build_chart_spec(
    acidification_json: &str,
    ocean_json: &str,
    graticule_json: &str,
    width: f64,
    height: f64,
    title: Option<String>,
) -> Result<String, JsValue> {
    let dimensions = models::ChartDimensions { width, height };
    Ok(chart_spec::spec_json_from_documents(
        acidification_json,
        ocean_json,
        graticule_json,
        dimensions,
        title.as_deref().unwrap_or(config::CHART_TITLE),
    )?)
}
