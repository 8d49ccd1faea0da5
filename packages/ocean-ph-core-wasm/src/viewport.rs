// Chart sizing from the browser viewport
use crate::models::ChartDimensions;

pub const MIN_WIDTH: f64 = 300.0;
pub const MIN_HEIGHT: f64 = 200.0;
pub const WIDTH_FACTOR: f64 = 0.8;
pub const HEIGHT_FACTOR: f64 = 0.84;

/// Supplies the current inner size of the display surface.
pub trait ViewportProvider {
    fn inner_size(&self) -> (f64, f64);
}

// Reads `window.innerWidth` / `window.innerHeight`. Anything unreadable
// counts as 0 so the result falls back to the minimum canvas.
#[derive(Default, Clone, Copy, Debug)]
pub struct BrowserViewport;

impl ViewportProvider for BrowserViewport {
    fn inner_size(&self) -> (f64, f64) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width, height)
    }
}

// Fixed viewport, for tests and non-browser callers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedViewport {
    pub width: f64,
    pub height: f64,
}

impl ViewportProvider for FixedViewport {
    fn inner_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Canvas size for a window of the given inner size: 80% of the width and
/// 84% of the height, never smaller than 300x200.
pub fn chart_dimensions(inner_width: f64, inner_height: f64) -> ChartDimensions {
    ChartDimensions {
        width: MIN_WIDTH.max(inner_width * WIDTH_FACTOR),
        height: MIN_HEIGHT.max(inner_height * HEIGHT_FACTOR),
    }
}

pub fn dimensions_for<V: ViewportProvider + ?Sized>(viewport: &V) -> ChartDimensions {
    let (width, height) = viewport.inner_size();
    chart_dimensions(width, height)
}
