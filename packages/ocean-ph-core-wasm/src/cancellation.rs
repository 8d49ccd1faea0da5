// Render generations.
//
// Every pipeline run takes a token when it is triggered. Before drawing, a
// run claims the render watermark; it is dropped only when a newer
// generation has already been drawn. A newer run that fails therefore
// leaves the page to whichever older run did succeed.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

#[derive(Clone, Debug)]
pub struct RenderToken {
    pub generation: u64,
    rendered: Arc<AtomicU64>,
}

impl RenderToken {
    /// Record this generation as drawn. Returns the newer generation that
    /// already owns the page if this run is stale.
    pub fn claim_render(&self) -> Result<(), u64> {
        let previous = self.rendered.fetch_max(self.generation, Ordering::SeqCst);
        if previous > self.generation {
            Err(previous)
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GenerationTracker {
    latest: Arc<AtomicU64>,
    rendered: Arc<AtomicU64>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RenderToken {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RenderToken {
            generation,
            rendered: Arc::clone(&self.rendered),
        }
    }

    /// Invalidate outstanding runs without starting a new one.
    pub fn cancel_all(&self) {
        let barrier = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.rendered.fetch_max(barrier, Ordering::SeqCst);
    }

    /// Newest generation handed out.
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Newest generation that reached the renderer (or the cancel barrier).
    pub fn rendered(&self) -> u64 {
        self.rendered.load(Ordering::SeqCst)
    }
}

lazy_static! {
    static ref GLOBAL_GENERATIONS: GenerationTracker = GenerationTracker::new();
}

pub fn global_generations() -> GenerationTracker {
    GLOBAL_GENERATIONS.clone()
}

#[wasm_bindgen]
pub fn current_render_generation() -> f64 {
    GLOBAL_GENERATIONS.current() as f64
}

/// Drop any renders still waiting on their data.
#[wasm_bindgen]
pub fn cancel_pending_renders() {
    GLOBAL_GENERATIONS.cancel_all();
}
