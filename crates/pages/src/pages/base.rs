// BasePage - Shared primitives for every page object
//
// Holds the driver shared by all page objects of a test and exposes the thin
// operations they build on. Everything except `is_element_visible` propagates
// driver failures unchanged.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::{BoundingBox, Driver, ElementState, LoadState, Viewport, nth};
use crate::error::Result;

/// Reference to one element of a multi-element query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    /// Selector the element was found by
    pub selector: String,
    /// Position among the matches, in document order
    pub index: usize,
}

impl ElementRef {
    /// Selector addressing exactly this element.
    pub fn selector(&self) -> String {
        nth(&self.selector, self.index)
    }
}

/// Page object foundation wrapping a shared [`Driver`].
#[derive(Clone)]
pub struct BasePage {
    driver: Arc<dyn Driver>,
}

impl BasePage {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Navigates to `url` and waits for the `load` event.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        self.driver.goto(url, LoadState::Load).await
    }

    pub async fn get_title(&self) -> Result<String> {
        self.driver.title().await
    }

    pub fn get_url(&self) -> String {
        self.driver.current_url()
    }

    /// True when `selector` becomes visible within `timeout`.
    ///
    /// Any failure (timeout, bad selector, closed page) counts as not visible.
    pub async fn is_element_visible(&self, selector: &str, timeout: Option<Duration>) -> bool {
        match self
            .driver
            .wait_for(selector, ElementState::Visible, timeout)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("'{}' not visible: {}", selector, e);
                false
            }
        }
    }

    pub async fn click(&self, selector: &str) -> Result<()> {
        tracing::debug!("Clicking {}", selector);
        self.driver.click(selector).await
    }

    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        tracing::debug!("Filling {}", selector);
        self.driver.fill(selector, text).await
    }

    /// Text content of the first match, empty when it has none.
    pub async fn get_text(&self, selector: &str) -> Result<String> {
        Ok(self
            .driver
            .text_content(selector)
            .await?
            .unwrap_or_default())
    }

    /// One reference per element currently matching `selector`.
    pub async fn get_elements(&self, selector: &str) -> Result<Vec<ElementRef>> {
        let count = self.driver.count(selector).await?;
        Ok((0..count)
            .map(|index| ElementRef {
                selector: selector.to_string(),
                index,
            })
            .collect())
    }

    /// Waits until the page has no network activity.
    pub async fn wait_for_navigation(&self) -> Result<()> {
        self.driver.wait_for_load_state(LoadState::NetworkIdle).await
    }

    pub async fn screenshot(&self, path: &Path) -> Result<Vec<u8>> {
        tracing::debug!("Saving screenshot to {}", path.display());
        self.driver.screenshot(path).await
    }

    pub async fn get_viewport_size(&self) -> Result<Viewport> {
        self.driver.viewport_size().await
    }

    pub async fn content(&self) -> Result<String> {
        self.driver.content().await
    }

    pub async fn bounding_box(&self, css: &str) -> Result<Option<BoundingBox>> {
        self.driver.bounding_box(css).await
    }
}

impl std::fmt::Debug for BasePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasePage")
            .field("url", &self.driver.current_url())
            .finish()
    }
}
