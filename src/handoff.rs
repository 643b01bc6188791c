//! Marshal background results back onto the UI thread.
//!
//! Background tasks hold a [`HandoffSender`] and deliver a closure addressed
//! to a view. The owning [`HandoffQueue`] applies queued closures when the
//! surface ticks. A closure whose view was removed in the meantime is
//! dropped; slotmap keys are generational, so a stale [`ViewId`] never
//! resolves to a newer view.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::view::{ViewId, ViewTree};

/// A completion applied to the tree on the UI thread.
pub type Completion = Box<dyn FnOnce(&mut ViewTree, ViewId) + Send>;

/// Cloneable, thread-safe sending half.
#[derive(Clone)]
pub struct HandoffSender {
    tx: UnboundedSender<(ViewId, Completion)>,
}

impl HandoffSender {
    /// Queue `apply` for `view`. Returns `false` if the queue was dropped.
    pub fn deliver<F>(&self, view: ViewId, apply: F) -> bool
    where
        F: FnOnce(&mut ViewTree, ViewId) + Send + 'static,
    {
        self.tx.send((view, Box::new(apply))).is_ok()
    }
}

impl std::fmt::Debug for HandoffSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffSender").field("closed", &self.tx.is_closed()).finish()
    }
}

/// Receiving half, owned by the surface.
pub struct HandoffQueue {
    tx: UnboundedSender<(ViewId, Completion)>,
    rx: UnboundedReceiver<(ViewId, Completion)>,
}

impl HandoffQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> HandoffSender {
        HandoffSender { tx: self.tx.clone() }
    }

    /// Apply every queued completion whose view still exists.
    ///
    /// Returns how many were applied.
    pub fn drain(&mut self, tree: &mut ViewTree) -> usize {
        let mut applied = 0;
        while let Ok((view, apply)) = self.rx.try_recv() {
            if !tree.contains(view) {
                tracing::debug!(?view, "discarding completion for removed view");
                continue;
            }
            apply(tree, view);
            applied += 1;
        }
        applied
    }
}

impl Default for HandoffQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandoffQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffQueue").field("queued", &self.rx.len()).finish()
    }
}
