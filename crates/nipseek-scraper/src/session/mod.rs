//! Browser session management.
//!
//! [`SessionFactory`] and [`PageSession`] are the seams between the pipeline
//! and the automation engine: the pipeline never sees chromiumoxide types,
//! and lifecycle tests substitute scripted fakes. The chromium
//! implementation lives in [`chromium`].
//!
//! One session maps to one isolated browser process bound to exactly one
//! request. Sessions are never pooled or reused; the admission limit bounds
//! how many are alive at once.

pub mod chromium;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::ScrapeError;

pub use chromium::ChromiumFactory;

/// An exclusively-owned browser page bound to one request's lifetime.
///
/// Callers must invoke [`close`](PageSession::close) on every exit path;
/// implementations additionally carry a drop backstop so an abandoned
/// session cannot leak its browser process.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to `url`, bounded by the session's navigation timeout.
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Snapshot of the current DOM as HTML, after client-side rendering.
    async fn content(&mut self) -> Result<String, ScrapeError>;

    /// Releases the session and its browser process.
    async fn close(self: Box<Self>) -> Result<(), ScrapeError>;
}

/// Creates fresh, fully isolated sessions, enforcing the admission limit.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Acquires a new session.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Capacity`] when the admission limit is saturated.
    /// - [`ScrapeError::SessionInit`] when the automation engine fails to start.
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError>;

    /// Number of currently live sessions.
    fn live_sessions(&self) -> usize;
}

/// Admission gate sized to the configured maximum of concurrently live
/// sessions. Saturation rejects immediately rather than queueing.
#[derive(Debug, Clone)]
pub(crate) struct SessionLimiter {
    permits: Arc<Semaphore>,
    max_sessions: usize,
}

impl SessionLimiter {
    pub(crate) fn new(max_sessions: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_sessions)),
            max_sessions,
        }
    }

    /// Claims one session slot. The slot frees when the permit drops.
    pub(crate) fn try_acquire(&self) -> Result<OwnedSemaphorePermit, ScrapeError> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| ScrapeError::Capacity {
                max_sessions: self.max_sessions,
            })
    }
}
