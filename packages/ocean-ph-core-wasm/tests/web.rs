//! Browser tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use ocean_ph_core_wasm::chart_spec::ChartSpec;
use ocean_ph_core_wasm::error::PipelineError;
use ocean_ph_core_wasm::fetcher::{BrowserFetcher, ResourceFetcher};
use ocean_ph_core_wasm::renderer::spec_to_js;
use ocean_ph_core_wasm::viewport::{dimensions_for, BrowserViewport, MIN_HEIGHT, MIN_WIDTH};
use ocean_ph_core_wasm::{build_chart_spec, get_chart_dimensions};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const EMPTY: &str = r#"{"type":"FeatureCollection","features":[]}"#;

fn empty_spec() -> ChartSpec {
    ChartSpec {
        schema: "https://vega.github.io/schema/vega-lite/v5.json".to_string(),
        width: 300.0,
        height: 200.0,
        title: "test".to_string(),
        projection: ocean_ph_core_wasm::chart_spec::Projection::australia(),
        layer: Vec::new(),
    }
}

#[wasm_bindgen_test]
fn browser_viewport_respects_floor() {
    let dims = dimensions_for(&BrowserViewport);
    assert!(dims.width >= MIN_WIDTH);
    assert!(dims.height >= MIN_HEIGHT);
}

#[wasm_bindgen_test]
fn exported_dimensions_are_plain_object() {
    let value = get_chart_dimensions(1000.0, 500.0).unwrap();
    let width = js_sys::Reflect::get(&value, &JsValue::from_str("width")).unwrap();
    assert_eq!(width.as_f64(), Some(800.0));
}

#[wasm_bindgen_test]
fn exported_builder_returns_spec_json() {
    let json = build_chart_spec(EMPTY, EMPTY, EMPTY, 640.0, 480.0, None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["layer"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["width"], serde_json::json!(640.0));
}

#[wasm_bindgen_test]
fn spec_converts_to_plain_js_object() {
    let js = spec_to_js(&empty_spec()).unwrap();
    assert!(js.is_object());
    let schema = js_sys::Reflect::get(&js, &JsValue::from_str("$schema")).unwrap();
    assert_eq!(
        schema.as_string().as_deref(),
        Some("https://vega.github.io/schema/vega-lite/v5.json")
    );
}

#[wasm_bindgen_test]
async fn missing_resource_is_fetch_error() {
    let path = "/GeoJSON/does-not-exist.json";
    let err = BrowserFetcher.fetch_json(path).await.unwrap_err();
    assert_eq!(err, PipelineError::fetch(path, "HTTP status 404"));
    assert!(err.is_data_error());
}

#[wasm_bindgen_test]
async fn non_json_resource_is_parse_error() {
    // The test runner serves its HTML harness at the root
    let err = BrowserFetcher.fetch_json("/").await.unwrap_err();
    match err {
        PipelineError::Parse { path, .. } => assert_eq!(path, "/"),
        other => panic!("unexpected error: {:?}", other),
    }
}
