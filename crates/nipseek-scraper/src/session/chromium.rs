//! Chromium-backed sessions via chromiumoxide.
//!
//! Every acquire launches a dedicated headless Chromium process with its own
//! profile, so no cookies or cache survive between requests. The process is
//! torn down in [`PageSession::close`]; if a session is dropped without
//! closing (panic, cancelled request), the CDP handler task is aborted and
//! chromiumoxide kills the child process when the `Browser` handle drops.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;

use nipseek_core::AppConfig;

use super::{PageSession, SessionFactory, SessionLimiter};
use crate::error::ScrapeError;

/// Locates the Chromium binary: explicit override first, then PATH.
pub fn find_chromium(override_path: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(p) = override_path {
        if p.exists() {
            return Some(p.clone());
        }
    }
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}

/// Launches one isolated Chromium per acquire, behind the admission limit.
pub struct ChromiumFactory {
    chromium_path: Option<PathBuf>,
    headless: bool,
    nav_timeout_ms: u64,
    limiter: SessionLimiter,
    live: Arc<AtomicUsize>,
}

impl ChromiumFactory {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chromium_path: config.chromium_path.clone(),
            headless: config.headless,
            nav_timeout_ms: config.nav_timeout_ms,
            limiter: SessionLimiter::new(config.max_concurrent_sessions),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn browser_config(&self, chrome_path: PathBuf) -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--window-size=1920,1080");
        if self.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        builder.build().map_err(|e| ScrapeError::SessionInit {
            reason: format!("failed to build browser config: {e}"),
        })
    }
}

#[async_trait]
impl SessionFactory for ChromiumFactory {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
        let permit = self.limiter.try_acquire()?;

        let chrome_path =
            find_chromium(self.chromium_path.as_ref()).ok_or_else(|| ScrapeError::SessionInit {
                reason: "no chromium binary found; set NIPSEEK_CHROMIUM_PATH".to_owned(),
            })?;
        let config = self.browser_config(chrome_path)?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScrapeError::SessionInit {
                    reason: format!("failed to launch chromium: {e}"),
                })?;

        // Drive CDP events for this browser until the session closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(ScrapeError::SessionInit {
                    reason: format!("failed to open page: {e}"),
                });
            }
        };

        self.live.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(live = self.live_sessions(), "browser session acquired");

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            nav_timeout_ms: self.nav_timeout_ms,
            live: Arc::clone(&self.live),
            released: false,
            _permit: permit,
        }))
    }

    fn live_sessions(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout_ms: u64,
    live: Arc<AtomicUsize>,
    released: bool,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        let navigation = tokio::time::timeout(
            Duration::from_millis(self.nav_timeout_ms),
            self.page.goto(url),
        )
        .await;

        match navigation {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ScrapeError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScrapeError::Navigation {
                url: url.to_owned(),
                reason: format!("timed out after {}ms", self.nav_timeout_ms),
            }),
        }
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        self.page
            .content()
            .await
            .map_err(|e| ScrapeError::Browser {
                reason: format!("failed to read page content: {e}"),
            })
    }

    async fn close(mut self: Box<Self>) -> Result<(), ScrapeError> {
        self.released = true;
        let result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        self.live.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(live = self.live.load(Ordering::Relaxed), "browser session released");
        result.map(|_| ()).map_err(|e| ScrapeError::Browser {
            reason: format!("failed to close browser: {e}"),
        })
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // Backstop for abandoned sessions: stop the handler task and let the
        // Browser handle kill its child process on drop.
        self.handler_task.abort();
        if !self.released {
            self.live.fetch_sub(1, Ordering::Relaxed);
            tracing::warn!("browser session dropped without close; killing process");
        }
    }
}
