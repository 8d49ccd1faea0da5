// The fetch, size, build, render cycle behind the map.
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::cancellation::{GenerationTracker, RenderToken};
use crate::chart_spec::build_chart_spec;
use crate::config::MapConfig;
use crate::error::PipelineError;
use crate::fetcher::{load_datasets, ResourceFetcher};
use crate::models::RenderOutcome;
use crate::renderer::{ChartRenderer, ResizeSubscriber};
use crate::viewport::{dimensions_for, ViewportProvider};
use crate::{console_error, console_log, console_warn};

pub struct MapPipeline<F, V, R> {
    pub config: MapConfig,
    fetcher: F,
    viewport: V,
    renderer: R,
    generations: GenerationTracker,
}

impl<F, V, R> MapPipeline<F, V, R>
where
    F: ResourceFetcher,
    V: ViewportProvider,
    R: ChartRenderer,
{
    pub fn new(
        config: MapConfig,
        fetcher: F,
        viewport: V,
        renderer: R,
        generations: GenerationTracker,
    ) -> Self {
        MapPipeline {
            config,
            fetcher,
            viewport,
            renderer,
            generations,
        }
    }

    /// Start a run now. The generation is taken immediately, before the
    /// returned future is first polled, so trigger order decides which run
    /// counts as newer.
    pub fn trigger(&self) -> impl Future<Output = Result<RenderOutcome, PipelineError>> + '_ {
        let token = self.generations.begin();
        self.run(token)
    }

    /// One full cycle under the given token. All three datasets are fetched
    /// fresh; nothing is rendered if a newer run has already been drawn.
    pub async fn run(&self, token: RenderToken) -> Result<RenderOutcome, PipelineError> {
        console_log!("Render generation {} started", token.generation);

        let datasets = load_datasets(&self.fetcher, &self.config).await?;
        let dimensions = dimensions_for(&self.viewport);
        console_log!(
            "Chart dimensions {}x{} for generation {}",
            dimensions.width,
            dimensions.height,
            token.generation
        );

        let spec = build_chart_spec(datasets, dimensions, &self.config.title);

        if let Err(rendered) = token.claim_render() {
            console_warn!(
                "Dropping render generation {}: generation {} is already drawn",
                token.generation,
                rendered
            );
            return Ok(RenderOutcome::Superseded {
                generation: token.generation,
                rendered,
            });
        }

        self.renderer.render(&self.config.target, &spec).await?;
        console_log!("Rendered generation {} into {}", token.generation, self.config.target);
        Ok(RenderOutcome::Rendered {
            generation: token.generation,
        })
    }

    /// A triggered run that reports its own failure, for event handlers
    /// that have nobody to return an error to.
    pub fn detached_run(self: Rc<Self>) -> LocalBoxFuture<'static, ()>
    where
        F: 'static,
        V: 'static,
        R: 'static,
    {
        let token = self.generations.begin();
        async move {
            if let Err(e) = self.run(token).await {
                if e.is_data_error() {
                    console_error!("Map data unavailable: {}", e);
                } else {
                    console_error!("Map render failed: {}", e);
                }
            }
        }
        .boxed_local()
    }

    /// Re-run the whole cycle on every resize notification.
    pub fn subscribe_resize<S, Sp>(self: Rc<Self>, subscriber: &S, spawn: Sp) -> Result<(), PipelineError>
    where
        S: ResizeSubscriber + ?Sized,
        Sp: Fn(LocalBoxFuture<'static, ()>) + 'static,
        F: 'static,
        V: 'static,
        R: 'static,
    {
        subscriber.subscribe(Box::new(move || spawn(Rc::clone(&self).detached_run())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_spec::ChartSpec;
    use crate::config::{CHART_TITLE, GRATICULE_URL, OCEAN_URL};
    use crate::fetcher::test_support::StubFetcher;
    use crate::viewport::FixedViewport;
    use async_trait::async_trait;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: RefCell<Vec<(String, ChartSpec)>>,
        reject: bool,
    }

    #[async_trait(?Send)]
    impl ChartRenderer for RecordingRenderer {
        async fn render(&self, target: &str, spec: &ChartSpec) -> Result<(), PipelineError> {
            if self.reject {
                return Err(PipelineError::Render("unsupported mark".to_string()));
            }
            self.rendered.borrow_mut().push((target.to_string(), spec.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct ManualResize {
        handler: RefCell<Option<Box<dyn FnMut()>>>,
    }

    impl ManualResize {
        fn fire(&self) {
            let mut handler = self.handler.borrow_mut();
            (handler.as_mut().expect("handler registered"))();
        }
    }

    impl ResizeSubscriber for ManualResize {
        fn subscribe(&self, handler: Box<dyn FnMut()>) -> Result<(), PipelineError> {
            *self.handler.borrow_mut() = Some(handler);
            Ok(())
        }
    }

    type TestPipeline = MapPipeline<StubFetcher, FixedViewport, RecordingRenderer>;

    fn pipeline(fetcher: StubFetcher, renderer: RecordingRenderer) -> TestPipeline {
        MapPipeline::new(
            MapConfig::default(),
            fetcher,
            FixedViewport { width: 1000.0, height: 500.0 },
            renderer,
            GenerationTracker::new(),
        )
    }

    #[test]
    fn test_end_to_end_render() {
        let pipeline = pipeline(StubFetcher::standard(4, 2, 3), RecordingRenderer::default());
        let outcome = block_on(pipeline.trigger()).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered { generation: 1 });

        let rendered = pipeline.renderer.rendered.borrow();
        assert_eq!(rendered.len(), 1);
        let (target, spec) = &rendered[0];
        assert_eq!(target, "#ph-map");
        assert_eq!(
            spec.title,
            "pH values deviation from global average of Ocean Water near Australia in 2013"
        );
        assert_eq!(spec.title, CHART_TITLE);
        assert_eq!((spec.width, spec.height), (800.0, 420.0));
        let counts: Vec<usize> = spec.layer.iter().map(|l| l.data.values.len()).collect();
        assert_eq!(counts, vec![2, 3, 4]);
    }

    #[test]
    fn test_stale_run_does_not_overwrite_newer_render() {
        let pipeline = pipeline(StubFetcher::standard(1, 1, 1), RecordingRenderer::default());

        // Two resizes in quick succession; the second finishes first
        let first = pipeline.trigger();
        let second = pipeline.trigger();

        assert_eq!(block_on(second).unwrap(), RenderOutcome::Rendered { generation: 2 });
        assert_eq!(
            block_on(first).unwrap(),
            RenderOutcome::Superseded { generation: 1, rendered: 2 }
        );
        assert_eq!(pipeline.renderer.rendered.borrow().len(), 1);
    }

    #[test]
    fn test_fetch_failure_aborts_before_render() {
        let fetcher = StubFetcher::default().with_features(crate::config::ACIDIFICATION_URL, 2);
        let pipeline = pipeline(fetcher, RecordingRenderer::default());

        let err = block_on(pipeline.trigger()).unwrap_err();
        assert!(err.is_data_error());
        assert!(matches!(err, PipelineError::Fetch { ref path, .. } if path == OCEAN_URL));
        assert!(pipeline.renderer.rendered.borrow().is_empty());
    }

    #[test]
    fn test_renderer_rejection_is_render_error() {
        let renderer = RecordingRenderer {
            reject: true,
            ..Default::default()
        };
        let pipeline = pipeline(StubFetcher::standard(1, 1, 1), renderer);

        let err = block_on(pipeline.trigger()).unwrap_err();
        assert_eq!(err, PipelineError::Render("unsupported mark".to_string()));
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_each_resize_refetches_and_latest_wins() {
        let pipeline = Rc::new(pipeline(StubFetcher::standard(2, 1, 1), RecordingRenderer::default()));
        let resize = ManualResize::default();
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        Rc::clone(&pipeline)
            .subscribe_resize(&resize, move |fut| {
                spawner.spawn_local(fut).expect("spawn render");
            })
            .unwrap();

        resize.fire();
        resize.fire();
        pool.run();

        // Both cycles fetched everything again
        let requested = pipeline.fetcher.requested.borrow();
        assert_eq!(requested.len(), 6);
        assert_eq!(requested.iter().filter(|p| p.as_str() == GRATICULE_URL).count(), 2);

        // The most recent resize owns the page, whichever task ran first
        let rendered = pipeline.renderer.rendered.borrow();
        assert!((1..=2).contains(&rendered.len()));
        assert_eq!(pipeline.generations.current(), 2);
        assert_eq!(pipeline.generations.rendered(), 2);
    }

    #[test]
    fn test_failed_newer_run_leaves_older_chart() {
        let generations = GenerationTracker::new();
        let good = MapPipeline::new(
            MapConfig::default(),
            StubFetcher::standard(3, 1, 1),
            FixedViewport { width: 1000.0, height: 500.0 },
            RecordingRenderer::default(),
            generations.clone(),
        );
        let broken = MapPipeline::new(
            MapConfig::default(),
            StubFetcher::standard(3, 1, 1).with(OCEAN_URL, serde_json::json!({"features": "oops"})),
            FixedViewport { width: 1000.0, height: 500.0 },
            RecordingRenderer::default(),
            generations.clone(),
        );

        let first = good.trigger();
        let second = broken.trigger();

        let err = block_on(second).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { ref path, .. } if path == OCEAN_URL));
        assert_eq!(block_on(first).unwrap(), RenderOutcome::Rendered { generation: 1 });

        assert_eq!(good.renderer.rendered.borrow().len(), 1);
        assert!(broken.renderer.rendered.borrow().is_empty());
        assert_eq!(generations.rendered(), 1);
    }
}
