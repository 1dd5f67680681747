// Driver - Browser automation capability consumed by the page objects
//
// The page objects never talk to Playwright directly. They go through the
// `Driver` trait, which exposes only the primitives they need (navigate, click,
// fill, query, wait, screenshot, dialogs and frame content).
//
// Architecture:
// - `PlaywrightDriver` is the production implementation over `playwright_rs::Page`
// - Single-element operations act on the first match, like Playwright's page-level API
// - Indexed elements are addressed with the chained `selector >> nth=<i>` form
// - Script helpers (`evaluate_on`, `bounding_box`, frame content) take CSS selectors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

#[cfg(test)]
pub(crate) mod memory;
pub mod playwright;

pub use playwright::PlaywrightDriver;

/// Page load milestone to wait for after navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The `load` event fired
    #[default]
    Load,
    /// The `DOMContentLoaded` event fired
    DomContentLoaded,
    /// No network connections for at least 500ms
    NetworkIdle,
}

/// Element condition for [`Driver::wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// At least one element matches the selector
    Attached,
    /// The first match is visible
    Visible,
    /// No match is visible (or nothing matches)
    Hidden,
}

/// How an armed dialog handler answers the next native dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    /// Accept the dialog; `prompt_text` is only sent to prompt dialogs
    Accept { prompt_text: Option<String> },
    /// Dismiss the dialog ("Cancel")
    Dismiss,
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<Viewport> for playwright_rs::Viewport {
    fn from(viewport: Viewport) -> Self {
        playwright_rs::Viewport {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Element box relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Center point of the box
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the whole box lies inside the viewport
    pub fn fits_within(&self, viewport: Viewport) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= f64::from(viewport.width)
            && self.y + self.height <= f64::from(viewport.height)
    }
}

/// Builds the selector for the `index`-th (0-based) element matching `selector`.
pub fn nth(selector: &str, index: usize) -> String {
    format!("{selector} >> nth={index}")
}

/// Browser automation primitives used by the page objects.
///
/// Failures are reported as [`crate::Error`]; implementations must not swallow
/// element-not-found or timeout conditions.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigates to `url` and waits for the given load milestone.
    async fn goto(&self, url: &str, wait_until: LoadState) -> Result<()>;

    /// Returns the document title.
    async fn title(&self) -> Result<String>;

    /// Returns the URL of the current page.
    fn current_url(&self) -> String;

    /// Returns the full HTML of the current page.
    async fn content(&self) -> Result<String>;

    /// Waits until `selector` reaches `state`, or the timeout (driver default when `None`) elapses.
    async fn wait_for(
        &self,
        selector: &str,
        state: ElementState,
        timeout: Option<Duration>,
    ) -> Result<()>;

    /// Waits until the current page reaches the load milestone.
    async fn wait_for_load_state(&self, state: LoadState) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Presses a key (e.g. `"Enter"`, `"Control+A"`) with `selector` focused.
    async fn press(&self, selector: &str, key: &str) -> Result<()>;

    /// Text content of the first match, `None` when the element has no text node.
    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Text content of every match, in document order.
    async fn all_text_contents(&self, selector: &str) -> Result<Vec<String>>;

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    async fn is_checked(&self, selector: &str) -> Result<bool>;

    /// Sets the file of a file input.
    async fn set_input_files(&self, selector: &str, file: &Path) -> Result<()>;

    /// Drags the first `source` match onto the first `target` match.
    async fn drag_and_drop(&self, source: &str, target: &str) -> Result<()>;

    /// Runs `script` as `(element, arg) => ...` against the first CSS match.
    ///
    /// Returns the script's JSON result; fails with `ElementNotFound` when nothing matches.
    async fn evaluate_on(&self, css: &str, script: &str, arg: Value) -> Result<Value>;

    /// Bounding box of the first CSS match, `None` when nothing matches.
    async fn bounding_box(&self, css: &str) -> Result<Option<BoundingBox>>;

    /// Current viewport size.
    async fn viewport_size(&self) -> Result<Viewport>;

    /// Arms a one-shot handler for the next native dialog.
    ///
    /// Must be called before the action that opens the dialog. Dialogs that
    /// arrive while nothing is armed are dismissed.
    async fn arm_dialog(&self, response: DialogResponse) -> Result<()>;

    /// Waits until `selector` exists inside the document of iframe `frame`.
    async fn wait_for_frame_element(
        &self,
        frame: &str,
        selector: &str,
        timeout: Option<Duration>,
    ) -> Result<()>;

    /// Replaces the content of `selector` inside iframe `frame` with `text`.
    async fn replace_frame_text(&self, frame: &str, selector: &str, text: &str) -> Result<()>;

    /// Text content of `selector` inside iframe `frame`.
    async fn frame_text(&self, frame: &str, selector: &str) -> Result<Option<String>>;

    /// Captures the page as PNG, writes it to `path` and returns the bytes.
    async fn screenshot(&self, path: &Path) -> Result<Vec<u8>>;
}
