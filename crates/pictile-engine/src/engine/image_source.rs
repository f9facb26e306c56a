use std::fmt;

use image::RgbaImage;

use crate::{AllSourcesExhaustedError, SourceError};

/// Something that can produce a decoded source image.
///
/// Implementations may block (reading a file, downloading a URL); callers
/// that must stay responsive run the chain on a worker thread.
pub trait ImageSource: fmt::Debug + Send {
    /// Short human-readable name, used in messages and logs.
    fn name(&self) -> String;

    fn load(&self) -> Result<RgbaImage, SourceError>;
}

/// Outcome of one attempt of a [`SourceChain`].
#[derive(Debug, derive_more::IsVariant)]
pub enum LoadStep {
    /// Source `index` produced an image. The chain is finished.
    Ready { index: usize, image: RgbaImage },
    /// Source `index` failed; the next call tries the following source.
    Failed { index: usize, error: SourceError },
    /// Every source failed. The chain is finished.
    Exhausted(AllSourcesExhaustedError),
}

/// Ordered list of image sources tried one after another until one works.
///
/// Each call to [`attempt`](Self::attempt) advances the chain by exactly
/// one source, so progress can be reported between attempts:
///
/// ```text
/// attempt(i) ── ok ──→ Ready
///      │
///      └─ err ─→ Failed ─→ attempt(i + 1) ... ─→ Exhausted
/// ```
#[derive(Debug)]
pub struct SourceChain {
    sources: Vec<Box<dyn ImageSource>>,
    next: usize,
    finished: bool,
}

impl SourceChain {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ImageSource>>) -> Self {
        Self {
            sources,
            next: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Name of the source the next attempt will use.
    #[must_use]
    pub fn next_source_name(&self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.sources.get(self.next).map(|source| source.name())
    }

    /// Tries the next source.
    ///
    /// # Panics
    ///
    /// Panics if called again after `Ready` or `Exhausted` was returned.
    pub fn attempt(&mut self) -> LoadStep {
        assert!(!self.finished, "source chain already finished");
        let Some(source) = self.sources.get(self.next) else {
            self.finished = true;
            tracing::warn!(attempts = self.next, "all image sources failed");
            return LoadStep::Exhausted(AllSourcesExhaustedError {
                attempts: self.next,
            });
        };

        let index = self.next;
        self.next += 1;
        match source.load() {
            Ok(image) => {
                self.finished = true;
                tracing::info!(
                    source = %source.name(),
                    width = image.width(),
                    height = image.height(),
                    "image loaded"
                );
                LoadStep::Ready { index, image }
            }
            Err(error) => {
                tracing::warn!(%error, "image source failed");
                LoadStep::Failed { index, error }
            }
        }
    }
}
