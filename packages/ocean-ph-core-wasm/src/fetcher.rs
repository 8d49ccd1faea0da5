use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::MapConfig;
use crate::{console_log, console_warn};
use crate::error::{describe_js_error, PipelineError};
use crate::geojson_features::{FeatureCollection, MapDatasets};

/// Source of JSON documents addressed by path.
#[async_trait(?Send)]
pub trait ResourceFetcher {
    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value, PipelineError>;
}

// Fetches same-origin resources with `window.fetch`. Every call goes to the
// network; there is no cache, retry or timeout.
#[derive(Default, Clone, Copy, Debug)]
pub struct BrowserFetcher;

#[async_trait(?Send)]
impl ResourceFetcher for BrowserFetcher {
    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value, PipelineError> {
        let window = web_sys::window()
            .ok_or_else(|| PipelineError::Browser("no global window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(path, &opts)
            .map_err(|e| PipelineError::fetch(path, describe_js_error(&e)))?;

        let response_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| PipelineError::fetch(path, describe_js_error(&e)))?;

        let response: Response = response_value
            .dyn_into()
            .map_err(|_| PipelineError::fetch(path, "fetch did not yield a Response"))?;

        if !response.ok() {
            return Err(PipelineError::fetch(
                path,
                format!("HTTP status {}", response.status()),
            ));
        }

        let body_promise = response
            .json()
            .map_err(|e| PipelineError::parse(path, describe_js_error(&e)))?;
        let body = JsFuture::from(body_promise)
            .await
            .map_err(|e| PipelineError::parse(path, describe_js_error(&e)))?;

        serde_wasm_bindgen::from_value(body).map_err(|e| PipelineError::parse(path, e.to_string()))
    }
}

/// Fetch one resource and read it as a FeatureCollection.
pub async fn load_feature_collection<F>(
    fetcher: &F,
    path: &str,
) -> Result<FeatureCollection, PipelineError>
where
    F: ResourceFetcher + ?Sized,
{
    console_log!("Fetching {}", path);
    let value = fetcher.fetch_json(path).await?;
    let collection = FeatureCollection::from_value(path, value)?;
    if collection.is_empty() {
        console_warn!("{} contains no features", path);
    } else {
        console_log!("Loaded {} features from {}", collection.len(), path);
    }
    Ok(collection)
}

/// Load acidification points, ocean basemap and graticule, in that order.
/// Each fetch completes before the next one starts.
pub async fn load_datasets<F>(fetcher: &F, config: &MapConfig) -> Result<MapDatasets, PipelineError>
where
    F: ResourceFetcher + ?Sized,
{
    let acidification = load_feature_collection(fetcher, &config.acidification_url).await?;
    let ocean = load_feature_collection(fetcher, &config.ocean_url).await?;
    let graticule = load_feature_collection(fetcher, &config.graticule_url).await?;

    Ok(MapDatasets {
        acidification,
        ocean,
        graticule,
    })
}
