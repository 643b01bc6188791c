//! Surface: owns one view tree and drives it frame by frame.
//!
//! [`Surface`] ties together the tree, the style context, the layout engine,
//! the scheduler and the task handoff. The host calls [`Surface::tick`] once
//! per frame and then [`Surface::paint`].

use std::future::Future;

use crate::geometry::{Point, Size};
use crate::handoff::{HandoffQueue, HandoffSender};
use crate::layout::spatial::{PointerTracker, SpatialMap};
use crate::layout::{Layout, LayoutEngine, LayoutStats};
use crate::render::{self, RenderContext};
use crate::scheduler::Scheduler;
use crate::style::context::{StyleContext, StyleError};
use crate::style::metric::MetricContext;
use crate::view::{ViewBuilder, ViewConfig, ViewId, ViewTree};

// ---------------------------------------------------------------------------
// SurfaceConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub size: Size,
    pub dpi_scale: f32,
    /// Stylesheet source compiled when the surface is created.
    pub stylesheet: Option<String>,
    /// Context to share with other surfaces. A private one is created if unset.
    pub style_context: Option<StyleContext>,
    pub root: Option<ViewConfig>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: Size::new(800, 600),
            dpi_scale: 1.0,
            stylesheet: None,
            style_context: None,
            root: None,
        }
    }
}

impl SurfaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_dpi_scale(mut self, scale: f32) -> Self {
        self.dpi_scale = scale;
        self
    }

    pub fn with_stylesheet(mut self, source: impl Into<String>) -> Self {
        self.stylesheet = Some(source.into());
        self
    }

    pub fn with_style_context(mut self, context: StyleContext) -> Self {
        self.style_context = Some(context);
        self
    }

    /// Root view. Defaults to a stacked `Window`.
    pub fn with_root(mut self, root: ViewConfig) -> Self {
        self.root = Some(root);
        self
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Surface {
    tree: ViewTree,
    root: ViewId,
    viewport: Size,
    style: StyleContext,
    generation: u64,
    engine: LayoutEngine,
    scheduler: Scheduler,
    handoff: HandoffQueue,
    spatial: SpatialMap,
    pointer: PointerTracker,
}

impl Surface {
    /// Create a surface, compiling the configured stylesheet if there is one.
    pub fn new(config: SurfaceConfig) -> Result<Self, StyleError> {
        let style = config.style_context.unwrap_or_default();
        if let Some(source) = &config.stylesheet {
            if style.is_initialized() {
                style.reload(source)?;
            } else {
                style.init(source)?;
            }
        }

        let mut tree = ViewTree::new();
        let root_config = config
            .root
            .unwrap_or_else(|| ViewBuilder::new("Window").with_layout(Layout::Stacked).build());
        let root = tree.insert(root_config);
        tree.set_root(root);

        Ok(Self {
            tree,
            root,
            viewport: config.size.non_negative(),
            generation: style.generation(),
            style,
            engine: LayoutEngine::new(MetricContext::new(config.dpi_scale)),
            scheduler: Scheduler::new(),
            handoff: HandoffQueue::new(),
            spatial: SpatialMap::new(),
            pointer: PointerTracker::new(),
        })
    }

    /// Run one frame: apply task completions, restyle after a stylesheet
    /// change, then at most one restyle/layout pass.
    pub fn tick(&mut self) -> LayoutStats {
        let delivered = self.handoff.drain(&mut self.tree);
        if delivered > 0 {
            tracing::trace!(delivered, "applied task completions");
        }

        let generation = self.style.generation();
        if generation != self.generation {
            self.generation = generation;
            self.tree.restyle_all();
        }

        let sheet = self.style.snapshot();
        let stats = self.scheduler.run_pass(&mut self.tree, &sheet, &mut self.engine, self.viewport);
        if stats.passes > 0 {
            self.spatial.rebuild(&self.tree, self.root);
        }
        stats
    }

    /// Paint the tree as of the last tick.
    pub fn paint(&self, canvas: &mut dyn RenderContext) {
        render::paint(&self.tree, self.root, self.engine.metrics(), canvas);
    }

    /// Views that need repainting since the last call.
    pub fn take_redraw(&mut self) -> Vec<ViewId> {
        self.tree.take_redraw()
    }

    /// New viewport size; applied on the next tick.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport = Size::new(width, height).non_negative();
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Change the DPI scale. Every view is re-measured on the next tick.
    pub fn set_dpi_scale(&mut self, scale: f32) {
        self.engine.set_metrics(MetricContext::new(scale));
        for id in self.tree.walk_depth_first(self.root) {
            self.tree.mark_relayout(id);
        }
    }

    pub fn pointer_moved(&mut self, point: Point) {
        self.pointer.pointer_moved(&mut self.tree, &self.spatial, point);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.pointer_left(&mut self.tree);
    }

    /// Frontmost visible view at `point` as of the last pass.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        self.spatial.view_at(point)
    }

    pub fn spatial(&self) -> &SpatialMap {
        &self.spatial
    }

    /// A sender for background work to deliver results through.
    pub fn handoff(&self) -> HandoffSender {
        self.handoff.sender()
    }

    /// Run `future` on the tokio runtime and apply its output to `view` on a
    /// later tick. Dropped if the view is removed first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_for<Fut, T, F>(&self, view: ViewId, future: Fut, apply: F) -> tokio::task::JoinHandle<()>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        F: FnOnce(&mut ViewTree, ViewId, T) + Send + 'static,
    {
        let sender = self.handoff.sender();
        tokio::spawn(async move {
            let output = future.await;
            if !sender.deliver(view, move |tree, id| apply(tree, id, output)) {
                tracing::debug!(?view, "surface gone before task completed");
            }
        })
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn style_context(&self) -> &StyleContext {
        &self.style
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }
}
