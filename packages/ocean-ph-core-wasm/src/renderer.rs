use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::chart_spec::ChartSpec;
use crate::error::{describe_js_error, PipelineError};

#[wasm_bindgen]
extern "C" {
    // vega-embed's global entry point, loaded by the host page
    #[wasm_bindgen(js_name = vegaEmbed, catch)]
    fn vega_embed(target: &str, spec: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Hands a finished chart specification to a rendering engine.
#[async_trait(?Send)]
pub trait ChartRenderer {
    async fn render(&self, target: &str, spec: &ChartSpec) -> Result<(), PipelineError>;
}

#[derive(Default, Clone, Copy, Debug)]
pub struct VegaEmbedRenderer;

/// Convert the spec into a plain JS object (no `Map`s) as vega-embed expects.
pub fn spec_to_js(spec: &ChartSpec) -> Result<JsValue, PipelineError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    spec.serialize(&serializer)
        .map_err(|e| PipelineError::Serialize(e.to_string()))
}

#[async_trait(?Send)]
impl ChartRenderer for VegaEmbedRenderer {
    async fn render(&self, target: &str, spec: &ChartSpec) -> Result<(), PipelineError> {
        let js_spec = spec_to_js(spec)?;
        let promise = vega_embed(target, &js_spec)
            .map_err(|e| PipelineError::Render(describe_js_error(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| PipelineError::Render(describe_js_error(&e)))?;
        Ok(())
    }
}

/// Subscription to viewport resize notifications.
pub trait ResizeSubscriber {
    fn subscribe(&self, handler: Box<dyn FnMut()>) -> Result<(), PipelineError>;
}

// Listens for `resize` on the window. Every event is forwarded, no debounce.
#[derive(Default, Clone, Copy, Debug)]
pub struct BrowserResize;

impl ResizeSubscriber for BrowserResize {
    fn subscribe(&self, mut handler: Box<dyn FnMut()>) -> Result<(), PipelineError> {
        let window = web_sys::window()
            .ok_or_else(|| PipelineError::Browser("no global window".to_string()))?;

        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| handler());
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| PipelineError::Browser(describe_js_error(&e)))?;

        // The listener lives as long as the page
        closure.forget();
        Ok(())
    }
}
