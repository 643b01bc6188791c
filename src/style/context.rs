//! Shared stylesheet handle with an explicit lifecycle.
//!
//! A [`StyleContext`] owns the active [`Stylesheet`] behind a lock. Readers
//! take an `Arc` snapshot; [`StyleContext::reload`] parses the new source
//! completely before swapping, so a bad reload leaves the old sheet active.
//! Every successful load bumps a generation counter that surfaces compare
//! against to know when to restyle everything.

use std::io::Read;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::style::parser::ParseError;
use crate::style::stylesheet::Stylesheet;

#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("stylesheet parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to read stylesheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("a stylesheet is already loaded; use reload to replace it")]
    AlreadyInitialized,
}

#[derive(Debug, Default)]
struct Inner {
    sheet: Option<Arc<Stylesheet>>,
    generation: u64,
}

/// Cloneable handle to the active stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    inner: Arc<RwLock<Inner>>,
}

static GLOBAL: OnceLock<StyleContext> = OnceLock::new();

impl StyleContext {
    /// An independent context with no stylesheet loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide context.
    pub fn global() -> &'static StyleContext {
        GLOBAL.get_or_init(StyleContext::new)
    }

    /// Load the first stylesheet.
    pub fn init(&self, source: &str) -> Result<(), StyleError> {
        let sheet = Stylesheet::parse(source)?;
        let mut inner = self.write();
        if inner.sheet.is_some() {
            return Err(StyleError::AlreadyInitialized);
        }
        inner.sheet = Some(Arc::new(sheet));
        inner.generation += 1;
        tracing::info!(generation = inner.generation, "stylesheet loaded");
        Ok(())
    }

    pub fn init_from_reader(&self, mut reader: impl Read) -> Result<(), StyleError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.init(&source)
    }

    /// Replace the active stylesheet.
    ///
    /// On error the previous sheet stays active and the generation is unchanged.
    pub fn reload(&self, source: &str) -> Result<(), StyleError> {
        let sheet = match Stylesheet::parse(source) {
            Ok(sheet) => sheet,
            Err(error) => {
                tracing::warn!(%error, "stylesheet reload rejected, keeping previous sheet");
                return Err(error.into());
            }
        };
        let mut inner = self.write();
        inner.sheet = Some(Arc::new(sheet));
        inner.generation += 1;
        tracing::info!(generation = inner.generation, rules = inner.sheet.as_ref().map_or(0, |s| s.len()), "stylesheet reloaded");
        Ok(())
    }

    pub fn reload_from_reader(&self, mut reader: impl Read) -> Result<(), StyleError> {
        let mut source = String::new();
        if let Err(error) = reader.read_to_string(&mut source) {
            tracing::warn!(%error, "stylesheet reload rejected, keeping previous sheet");
            return Err(error.into());
        }
        self.reload(&source)
    }

    /// Drop the active stylesheet. Views then resolve to their inline style.
    pub fn teardown(&self) {
        let mut inner = self.write();
        if inner.sheet.take().is_some() {
            inner.generation += 1;
            tracing::info!(generation = inner.generation, "stylesheet torn down");
        }
    }

    /// The active stylesheet, or an empty one when none is loaded.
    pub fn snapshot(&self) -> Arc<Stylesheet> {
        self.read().sheet.clone().unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.read().sheet.is_some()
    }

    /// Bumped by every successful init, reload and teardown.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    // The guarded state is replaced wholesale, never left half-written, so a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
