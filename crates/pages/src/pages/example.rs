// ExamplePage - Page object for the static example.com page

use serde::Serialize;
use std::sync::Arc;

use crate::EXAMPLE_URL;
use crate::config::SuiteConfig;
use crate::driver::{Driver, LoadState, Viewport};
use crate::error::Result;
use crate::pages::BasePage;

pub const HEADING: &str = "h1";
pub const PARAGRAPH: &str = "p";
pub const MORE_INFO_LINK: &str = "a";

/// Which of the page's elements are visible at the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponsiveCheck {
    pub viewport: Viewport,
    pub heading_visible: bool,
    pub paragraph_visible: bool,
    pub link_visible: bool,
}

impl ResponsiveCheck {
    pub fn all_visible(&self) -> bool {
        self.heading_visible && self.paragraph_visible && self.link_visible
    }
}

#[derive(Debug, Clone)]
pub struct ExamplePage {
    base: BasePage,
    url: String,
}

impl ExamplePage {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self::with_url(driver, EXAMPLE_URL)
    }

    /// Page object for a copy of the page served at `url`.
    pub fn with_url(driver: Arc<dyn Driver>, url: impl Into<String>) -> Self {
        Self {
            base: BasePage::new(driver),
            url: url.into(),
        }
    }

    /// Page object for the site configured by `BASE_URL`.
    pub fn from_config(driver: Arc<dyn Driver>, config: &SuiteConfig) -> Self {
        Self::with_url(driver, config.base_url.clone())
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn navigate_to_home(&self) -> Result<()> {
        self.base.navigate(&self.url).await
    }

    pub async fn main_heading(&self) -> Result<String> {
        self.base.get_text(HEADING).await
    }

    pub async fn main_paragraph(&self) -> Result<String> {
        self.base.get_text(PARAGRAPH).await
    }

    /// Follows the "More information..." link.
    pub async fn click_more_info(&self) -> Result<()> {
        self.base.click(MORE_INFO_LINK).await?;
        self.base
            .driver()
            .wait_for_load_state(LoadState::Load)
            .await
    }

    /// True when heading, paragraph and link are all visible.
    pub async fn verify_page_loaded(&self) -> bool {
        self.base.is_element_visible(HEADING, None).await
            && self.base.is_element_visible(PARAGRAPH, None).await
            && self.base.is_element_visible(MORE_INFO_LINK, None).await
    }

    pub async fn verify_responsive_elements(&self) -> Result<ResponsiveCheck> {
        let viewport = self.base.get_viewport_size().await?;
        let check = ResponsiveCheck {
            viewport,
            heading_visible: self.base.is_element_visible(HEADING, None).await,
            paragraph_visible: self.base.is_element_visible(PARAGRAPH, None).await,
            link_visible: self.base.is_element_visible(MORE_INFO_LINK, None).await,
        };
        tracing::debug!("Responsive check at {}: {:?}", viewport, check);
        Ok(check)
    }

    /// True when the first match of `css` lies entirely inside the viewport.
    pub async fn element_within_viewport(&self, css: &str) -> Result<bool> {
        let viewport = self.base.get_viewport_size().await?;
        Ok(self
            .base
            .bounding_box(css)
            .await?
            .is_some_and(|b| b.fits_within(viewport)))
    }
}
