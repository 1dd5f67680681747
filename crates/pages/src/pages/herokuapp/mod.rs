// HerokuappPage - Page object for the-internet.herokuapp.com
//
// Every feature helper first enters its example through `enter_example`,
// which resolves the example name against the home page's link list
// (see `catalog`) unless the browser is already on that example.
//
// Selectors live here as constants; the helpers are thin sequences of driver
// calls except for the slider (value quantization), the tables (positional
// header/cell zip) and status codes (typed outcome).

mod catalog;
mod dialog;
mod slider;
mod status;
mod table;

pub use catalog::{ExampleCatalog, ExampleEntry, Resolution};
pub use dialog::DialogKind;
pub use slider::SliderRange;
pub use status::StatusCheck;
pub use table::TableRow;

use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::HEROKUAPP_URL;
use crate::driver::{DialogResponse, Driver, ElementState, LoadState, nth};
use crate::error::{Error, Result};
use crate::pages::BasePage;

/// Links of the example index on the home page.
pub const EXAMPLE_LINKS: &str = "ul li a";
pub const PAGE_HEADING: &str = "h1";

pub const USERNAME_INPUT: &str = "#username";
pub const PASSWORD_INPUT: &str = "#password";
pub const LOGIN_BUTTON: &str = "button[type='submit']";
pub const FLASH_MESSAGE: &str = "#flash";
pub const SECURE_HEADING: &str = "h2";

pub const DYNAMIC_EXAMPLE_1: &str = "text=Example 1";
pub const START_BUTTON: &str = "#start button";
pub const LOADING_INDICATOR: &str = "#loading";
pub const FINISH_TEXT: &str = "#finish h4";

pub const CHECKBOXES: &str = "input[type='checkbox']";

pub const COLUMN_A: &str = "#column-a";
pub const COLUMN_B: &str = "#column-b";

pub const FILE_INPUT: &str = "#file-upload";
pub const FILE_SUBMIT: &str = "#file-submit";
pub const UPLOADED_FILES: &str = "#uploaded-files";

pub const IFRAME_LINK: &str = "text=iFrame";
pub const EDITOR_IFRAME: &str = "#mce_0_ifr";
pub const EDITOR_BODY: &str = "body#tinymce";

/// Result line shared by the dialog and key press examples.
pub const RESULT_TEXT: &str = "#result";
pub const KEY_TARGET: &str = "#target";

pub const SLIDER: &str = "input[type='range']";
pub const SLIDER_VALUE: &str = "span#range";

pub const TABLE: &str = "#table1";
pub const TABLE_HEADERS: &str = "#table1 th";
pub const TABLE_ROWS: &str = "#table1 tbody tr";
/// Cells of one row, chained after a row selector.
pub const TABLE_CELLS: &str = "td";

pub const STATUS_MESSAGE: &str = "#content p";

/// Time the slider page needs to render a new value.
const SLIDER_SETTLE: Duration = Duration::from_millis(500);

/// Page object for the multi-feature demo site.
#[derive(Debug, Clone)]
pub struct HerokuappPage {
    base: BasePage,
    base_url: String,
    catalog: ExampleCatalog,
}

impl HerokuappPage {
    /// Page object for the public site.
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self::with_base_url(driver, HEROKUAPP_URL)
    }

    /// Page object for a mirror of the site at `base_url`.
    pub fn with_base_url(driver: Arc<dyn Driver>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base: BasePage::new(driver),
            base_url: base_url.trim_end_matches('/').to_string(),
            catalog: ExampleCatalog::default(),
        }
    }

    /// Replaces the example catalog used for name resolution.
    pub fn with_catalog(mut self, catalog: ExampleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalog(&self) -> &ExampleCatalog {
        &self.catalog
    }

    /// Absolute URL of `path` on the site.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn driver(&self) -> &Arc<dyn Driver> {
        self.base.driver()
    }

    /// True when the current URL, ignoring query and fragment, is `path`.
    fn is_on(&self, path: &str) -> bool {
        let Ok(mut current) = Url::parse(&self.base.get_url()) else {
            return false;
        };
        current.set_query(None);
        current.set_fragment(None);
        current.as_str().trim_end_matches('/') == self.url(path).trim_end_matches('/')
    }

    async fn trimmed_text(&self, selector: &str) -> Result<String> {
        Ok(self.base.get_text(selector).await?.trim().to_string())
    }

    // ---- navigation -------------------------------------------------------

    pub async fn navigate_to_home(&self) -> Result<()> {
        self.base.navigate(&self.url("/")).await
    }

    /// True when the home page heading is shown.
    pub async fn verify_page_loaded(&self) -> Result<bool> {
        if !self.base.is_element_visible(PAGE_HEADING, None).await {
            return Ok(false);
        }
        let heading = self.base.get_text(PAGE_HEADING).await?;
        Ok(heading.contains("Welcome to the-internet"))
    }

    /// Trimmed texts of the example index links, in page order.
    pub async fn available_examples(&self) -> Result<Vec<String>> {
        if !self.is_on("/") {
            self.navigate_to_home().await?;
        }
        let links = self.driver().all_text_contents(EXAMPLE_LINKS).await?;
        Ok(links.into_iter().map(|l| l.trim().to_string()).collect())
    }

    /// Opens the example called `name` from the current (home) page.
    pub async fn navigate_to_example(&self, name: &str) -> Result<()> {
        let links = self.driver().all_text_contents(EXAMPLE_LINKS).await?;
        let resolution = match self.catalog.resolve(name, &links) {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!("Could not resolve example '{}' among {} links", name, links.len());
                return Err(e);
            }
        };

        match resolution {
            Resolution::Link { index, text } => {
                tracing::info!("Opening example '{}' via link '{}'", name, text);
                self.base.click(&nth(EXAMPLE_LINKS, index)).await?;
                self.driver().wait_for_load_state(LoadState::Load).await
            }
            Resolution::Path(path) => {
                tracing::info!("Opening example '{}' directly at {}", name, path);
                self.base.navigate(&self.url(&path)).await
            }
        }
    }

    /// Makes the example called `name` the current page.
    ///
    /// Does nothing when the browser already shows that example, so state
    /// changed by earlier helpers (checkbox toggles, sort order) is kept.
    pub async fn enter_example(&self, name: &str) -> Result<()> {
        if let Some(path) = self.catalog.path_of(name)
            && self.is_on(path)
        {
            tracing::debug!("Already on example '{}'", name);
            return Ok(());
        }
        if !self.is_on("/") {
            self.navigate_to_home().await?;
        }
        self.navigate_to_example(name).await
    }

    // ---- form authentication ---------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.enter_example("Form Authentication").await?;
        self.base.fill(USERNAME_INPUT, username).await?;
        self.base.fill(PASSWORD_INPUT, password).await?;
        self.base.click(LOGIN_BUTTON).await?;
        self.driver().wait_for_load_state(LoadState::Load).await
    }

    /// Trimmed text of the flash banner shown after a login attempt.
    pub async fn flash_message(&self) -> Result<String> {
        self.driver()
            .wait_for(FLASH_MESSAGE, ElementState::Visible, None)
            .await?;
        self.trimmed_text(FLASH_MESSAGE).await
    }

    pub async fn verify_secure_page(&self) -> Result<bool> {
        if !self.base.get_url().contains("secure") {
            return Ok(false);
        }
        if !self.base.is_element_visible(SECURE_HEADING, None).await {
            return Ok(false);
        }
        Ok(self.base.get_text(SECURE_HEADING).await?.contains("Secure Area"))
    }

    // ---- dynamic loading --------------------------------------------------

    /// Starts "Example 1" and returns the text revealed once loading ends.
    pub async fn wait_for_dynamic_text(&self) -> Result<String> {
        self.enter_example("Dynamic Loading").await?;
        self.base.click(DYNAMIC_EXAMPLE_1).await?;
        self.driver()
            .wait_for(START_BUTTON, ElementState::Visible, None)
            .await?;
        self.base.click(START_BUTTON).await?;
        self.driver()
            .wait_for(LOADING_INDICATOR, ElementState::Hidden, None)
            .await?;
        self.driver()
            .wait_for(FINISH_TEXT, ElementState::Visible, None)
            .await?;
        self.trimmed_text(FINISH_TEXT).await
    }

    // ---- checkboxes -------------------------------------------------------

    async fn checkbox(&self, index: usize) -> Result<String> {
        self.enter_example("Checkboxes").await?;
        let count = self.driver().count(CHECKBOXES).await?;
        if index >= count {
            return Err(Error::ElementNotFound(nth(CHECKBOXES, index)));
        }
        Ok(nth(CHECKBOXES, index))
    }

    pub async fn toggle_checkbox(&self, index: usize) -> Result<()> {
        let checkbox = self.checkbox(index).await?;
        self.base.click(&checkbox).await
    }

    pub async fn is_checkbox_checked(&self, index: usize) -> Result<bool> {
        let checkbox = self.checkbox(index).await?;
        self.driver().is_checked(&checkbox).await
    }

    // ---- drag and drop ----------------------------------------------------

    /// Drags column A onto column B.
    pub async fn perform_drag_and_drop(&self) -> Result<()> {
        self.enter_example("Drag and Drop").await?;
        self.driver().drag_and_drop(COLUMN_A, COLUMN_B).await
    }

    /// Header texts of the two columns, left to right.
    pub async fn column_headers(&self) -> Result<Vec<String>> {
        self.enter_example("Drag and Drop").await?;
        let mut headers = Vec::with_capacity(2);
        for column in [COLUMN_A, COLUMN_B] {
            headers.push(self.trimmed_text(&format!("{column} header")).await?);
        }
        Ok(headers)
    }

    // ---- file upload ------------------------------------------------------

    pub async fn upload_file(&self, file: &Path) -> Result<()> {
        self.enter_example("File Upload").await?;
        self.driver().set_input_files(FILE_INPUT, file).await?;
        self.base.click(FILE_SUBMIT).await?;
        self.driver().wait_for_load_state(LoadState::Load).await
    }

    /// File names listed on the upload confirmation page.
    pub async fn uploaded_files(&self) -> Result<String> {
        self.trimmed_text(UPLOADED_FILES).await
    }

    // ---- frames -----------------------------------------------------------

    /// Opens the iFrame example and replaces the editor content with `text`.
    pub async fn switch_to_frame_and_type(&self, text: &str) -> Result<()> {
        self.enter_example("Frames").await?;
        self.base.click(IFRAME_LINK).await?;
        self.driver()
            .wait_for(EDITOR_IFRAME, ElementState::Attached, None)
            .await?;
        self.driver()
            .wait_for_frame_element(EDITOR_IFRAME, EDITOR_BODY, None)
            .await?;
        self.driver()
            .replace_frame_text(EDITOR_IFRAME, EDITOR_BODY, text)
            .await
    }

    /// Current text of the editor body.
    pub async fn frame_text(&self) -> Result<String> {
        let text = self.driver().frame_text(EDITOR_IFRAME, EDITOR_BODY).await?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    // ---- javascript alerts ------------------------------------------------

    /// Opens a dialog of `kind`, accepts it (answering prompts with `text`)
    /// and returns the page's result line.
    pub async fn handle_javascript_alert(
        &self,
        kind: DialogKind,
        text: Option<&str>,
    ) -> Result<String> {
        self.handle_javascript_dialog(kind, kind.accept_with(text))
            .await
    }

    /// Opens a dialog of `kind`, answers it with `response` and returns the
    /// page's result line.
    pub async fn handle_javascript_dialog(
        &self,
        kind: DialogKind,
        response: DialogResponse,
    ) -> Result<String> {
        self.enter_example("JavaScript Alerts").await?;
        tracing::debug!("Arming {} dialog handler: {:?}", kind, response);
        self.driver().arm_dialog(response).await?;
        self.base.click(kind.trigger_selector()).await?;
        self.driver()
            .wait_for(RESULT_TEXT, ElementState::Visible, None)
            .await?;
        self.trimmed_text(RESULT_TEXT).await
    }

    // ---- key presses ------------------------------------------------------

    /// Presses `key` in the target input and returns the echoed result.
    pub async fn press_key(&self, key: &str) -> Result<String> {
        self.enter_example("Key Presses").await?;
        self.driver().press(KEY_TARGET, key).await?;
        self.trimmed_text(RESULT_TEXT).await
    }

    // ---- horizontal slider ------------------------------------------------

    /// Bounds and step read from the slider's attributes.
    pub async fn slider_range(&self) -> Result<SliderRange> {
        self.enter_example("Horizontal Slider").await?;
        let min = self.driver().attribute(SLIDER, "min").await?;
        let max = self.driver().attribute(SLIDER, "max").await?;
        let step = self.driver().attribute(SLIDER, "step").await?;
        Ok(SliderRange::from_attributes(
            min.as_deref(),
            max.as_deref(),
            step.as_deref(),
        ))
    }

    /// Moves the slider to the legal value closest to `value` and returns it.
    pub async fn set_slider_value(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "slider value must be finite, got {value}"
            )));
        }
        let range = self.slider_range().await?;
        let target = range.quantize(value);
        tracing::debug!("Setting slider to {} (requested {}, {:?})", target, value, range);

        self.driver()
            .evaluate_on(SLIDER, slider::SET_VALUE_SCRIPT, json!(target))
            .await?;
        tokio::time::sleep(SLIDER_SETTLE).await;
        Ok(target)
    }

    /// Value shown next to the slider, 0 when it is not a number.
    pub async fn get_slider_value(&self) -> Result<f64> {
        self.enter_example("Horizontal Slider").await?;
        let shown = self.trimmed_text(SLIDER_VALUE).await?;
        Ok(shown.parse().unwrap_or(0.0))
    }

    // ---- sortable data tables ---------------------------------------------

    async fn table_headers(&self) -> Result<Vec<String>> {
        self.enter_example("Sortable Data Tables").await?;
        self.driver()
            .wait_for(TABLE, ElementState::Attached, None)
            .await?;
        let headers = self.driver().all_text_contents(TABLE_HEADERS).await?;
        Ok(headers.into_iter().map(|h| h.trim().to_string()).collect())
    }

    /// Rows of the first table, each keyed by column header.
    pub async fn get_table_data(&self) -> Result<Vec<TableRow>> {
        let headers = self.table_headers().await?;
        let row_count = self.driver().count(TABLE_ROWS).await?;

        let mut rows = Vec::with_capacity(row_count);
        for index in 0..row_count {
            let selector = format!("{} >> {}", nth(TABLE_ROWS, index), TABLE_CELLS);
            let cells: Vec<String> = self
                .driver()
                .all_text_contents(&selector)
                .await?
                .into_iter()
                .map(|c| c.trim().to_string())
                .collect();
            rows.push(TableRow::zip(&headers, &cells));
        }
        tracing::debug!("Read {} table rows with {} columns", rows.len(), headers.len());
        Ok(rows)
    }

    /// Clicks the header of `column`; the page decides the resulting order.
    pub async fn sort_table_by_column(&self, column: &str) -> Result<()> {
        let headers = self.table_headers().await?;
        let index = table::column_index(&headers, column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        tracing::info!("Sorting table by '{}'", column);
        self.base.click(&nth(TABLE_HEADERS, index)).await
    }

    // ---- status codes -----------------------------------------------------

    /// Visits the page for `code` and reports where the browser ended up.
    pub async fn check_status_code(&self, code: u16) -> StatusCheck {
        let url = self.url(&format!("/status_codes/{code}"));
        tracing::info!("Checking status code page {}", url);

        if let Err(e) = self.driver().goto(&url, LoadState::NetworkIdle).await {
            tracing::warn!("Navigation to status code {} page failed: {}", code, e);
            return StatusCheck::NavigationFailed {
                reason: e.to_string(),
            };
        }

        let check = StatusCheck::from_url(&self.base.get_url(), code);
        if !check.is_reached() {
            tracing::warn!("Status code {} page not reached: {}", code, check);
        }
        check
    }

    /// Explanation paragraph of the status code page for `code`.
    pub async fn status_code_message(&self, code: u16) -> Result<String> {
        let check = self.check_status_code(code).await;
        if !check.is_reached() {
            return Err(Error::StatusCheck { code, check });
        }
        self.trimmed_text(&nth(STATUS_MESSAGE, 0)).await
    }
}
