// Session - Browser lifecycle for a test run
//
// One Playwright server and browser per session; every test gets its own
// browser context and page, closed when the test ends whether it passed,
// failed or panicked.

use futures_util::FutureExt;
use playwright_rs::{Browser, BrowserContext, Page, Playwright};
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BrowserKind, DevicePreset, SuiteConfig};
use crate::driver::{Driver, PlaywrightDriver, Viewport};
use crate::error::Result;
use crate::support::artifacts::timestamped_name;

/// A launched browser plus the configuration it was launched with.
pub struct Session {
    playwright: Playwright,
    browser: Browser,
    config: SuiteConfig,
}

/// An exclusively owned context and page for one test.
pub struct PageSession {
    context: BrowserContext,
    page: Page,
    driver: Arc<PlaywrightDriver>,
}

impl PageSession {
    /// Driver shared by the page objects of this test.
    pub fn driver(&self) -> Arc<dyn Driver> {
        self.driver.clone()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn close(self) -> Result<()> {
        self.context.close().await?;
        Ok(())
    }
}

impl Session {
    /// Starts Playwright and launches the configured browser.
    pub async fn launch(config: SuiteConfig) -> Result<Self> {
        config.prepare_directories()?;

        tracing::info!(
            "Launching {} (headless: {}, slow_mo: {}ms)",
            config.browser,
            config.headless,
            config.slow_mo_ms
        );
        let playwright = Playwright::launch().await?;
        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let browser = browser_type
            .launch_with_options(config.launch_options())
            .await?;

        Ok(Self {
            playwright,
            browser,
            config,
        })
    }

    /// Launches with the configuration from the environment.
    pub async fn from_env() -> Result<Self> {
        Self::launch(SuiteConfig::from_env()?).await
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// New context and page at the configured viewport.
    pub async fn new_page(&self) -> Result<PageSession> {
        self.new_page_at(self.config.viewport).await
    }

    /// New context and page sized like `device`.
    pub async fn new_device_page(&self, device: DevicePreset) -> Result<PageSession> {
        self.new_page_at(device.viewport()).await
    }

    async fn new_page_at(&self, viewport: Viewport) -> Result<PageSession> {
        tracing::debug!("Creating browser context at {}", viewport);
        let context = self
            .browser
            .new_context_with_options(self.config.context_options_for(viewport))
            .await?;
        let page = context.new_page().await?;
        let driver = Arc::new(PlaywrightDriver::new(
            page.clone(),
            self.config.default_timeout(),
        ));
        Ok(PageSession {
            context,
            page,
            driver,
        })
    }

    /// Runs `test` against a fresh page at the configured viewport.
    pub async fn run<T, E, F, Fut>(&self, name: &str, test: F) -> std::result::Result<T, E>
    where
        F: FnOnce(Arc<dyn Driver>) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display + From<crate::Error>,
    {
        self.run_with(name, None, test).await
    }

    /// Runs `test` against a fresh page, sized like `device` when given.
    ///
    /// On error or panic a screenshot is saved (when enabled). The context is
    /// closed on every path; a panic is resumed after cleanup.
    pub async fn run_with<T, E, F, Fut>(
        &self,
        name: &str,
        device: Option<DevicePreset>,
        test: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(Arc<dyn Driver>) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display + From<crate::Error>,
    {
        let session = match device {
            Some(device) => self.new_device_page(device).await?,
            None => self.new_page().await?,
        };
        tracing::info!("Running {}", name);

        let outcome = AssertUnwindSafe(test(session.driver())).catch_unwind().await;

        let failed = match &outcome {
            Ok(Ok(_)) => false,
            Ok(Err(e)) => {
                tracing::warn!("{} failed: {}", name, e);
                true
            }
            Err(_) => {
                tracing::warn!("{} panicked", name);
                true
            }
        };
        if failed && self.config.screenshot_on_failure {
            let path = self.failure_screenshot_path(name);
            match session.driver.screenshot(&path).await {
                Ok(_) => tracing::info!("Saved failure screenshot to {}", path.display()),
                Err(e) => tracing::warn!("Could not save failure screenshot: {}", e),
            }
        }

        if let Err(e) = session.close().await {
            tracing::warn!("Closing context for {} failed: {}", name, e);
        }

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    fn failure_screenshot_path(&self, name: &str) -> PathBuf {
        self.config
            .screenshots_dir()
            .join(timestamped_name(name, "png", chrono::Local::now()))
    }

    /// Closes the browser and stops the Playwright server.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish()
    }
}
