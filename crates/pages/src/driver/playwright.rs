// PlaywrightDriver - Driver implementation over a playwright-rs Page
//
// Single-element actions go through `locator(selector).first()` so selectors
// matching several elements behave like Playwright's non-strict page API.
//
// Primitives playwright-rs does not expose directly are composed:
// - wait_for_load_state polls `document.readyState`, then waits out a quiet period
// - drag_and_drop moves the mouse between element centers
// - frame content is reached through the iframe's `contentDocument`
//
// Dialogs: a single `on_dialog` listener is registered lazily and answers
// from a one-shot slot. `arm_dialog` fills the slot before the triggering click.

use async_trait::async_trait;
use parking_lot::Mutex;
use playwright_rs::protocol::{Dialog, MouseOptions};
use playwright_rs::{ClickOptions, FillOptions, GotoOptions, Locator, Page, PressOptions, WaitUntil};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::driver::{BoundingBox, DialogResponse, Driver, ElementState, LoadState, Viewport};
use crate::error::{Error, Result};

/// Quiet period treated as "network idle" once the document is complete.
const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);

/// Interval between polls of page state.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Mouse move steps used while dragging, so intermediate drag events fire.
const DRAG_STEPS: u32 = 10;

type DialogSlot = Arc<Mutex<Option<DialogResponse>>>;

/// Driver over a single Playwright page.
#[derive(Clone)]
pub struct PlaywrightDriver {
    page: Page,
    timeout: Duration,
    dialog_slot: DialogSlot,
    dialog_listener: Arc<AtomicBool>,
}

impl PlaywrightDriver {
    /// Wraps `page`; `timeout` bounds every wait and action.
    pub fn new(page: Page, timeout: Duration) -> Self {
        Self {
            page,
            timeout,
            dialog_slot: Arc::new(Mutex::new(None)),
            dialog_listener: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Underlying Playwright page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Default timeout applied to waits and actions
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> f64 {
        self.timeout.as_millis() as f64
    }

    async fn first(&self, selector: &str) -> Locator {
        self.page.locator(selector).await.first()
    }

    async fn poll_until<F, Fut>(&self, what: &str, timeout: Duration, mut check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<bool>>,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if check().await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(format!(
                    "{what} not reached after {}ms",
                    timeout.as_millis()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn ready_state(&self) -> Result<String> {
        let state: String = self
            .page
            .evaluate("() => document.readyState", None::<&()>)
            .await?;
        Ok(state)
    }

    async fn register_dialog_listener(&self) -> Result<()> {
        if self.dialog_listener.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let slot = Arc::clone(&self.dialog_slot);
        self.page
            .on_dialog(move |dialog: Dialog| {
                let response = slot.lock().take();
                async move {
                    match response {
                        Some(DialogResponse::Accept { prompt_text }) => {
                            let text = if dialog.type_() == "prompt" {
                                prompt_text
                            } else {
                                None
                            };
                            tracing::debug!(kind = dialog.type_(), "Accepting dialog");
                            dialog.accept(text.as_deref()).await
                        }
                        Some(DialogResponse::Dismiss) => {
                            tracing::debug!(kind = dialog.type_(), "Dismissing dialog");
                            dialog.dismiss().await
                        }
                        None => {
                            tracing::warn!(
                                kind = dialog.type_(),
                                message = dialog.message(),
                                "Dialog arrived with no armed handler, dismissing"
                            );
                            dialog.dismiss().await
                        }
                    }
                }
            })
            .await?;

        Ok(())
    }
}

impl From<LoadState> for WaitUntil {
    fn from(state: LoadState) -> Self {
        match state {
            LoadState::Load => WaitUntil::Load,
            LoadState::DomContentLoaded => WaitUntil::DomContentLoaded,
            LoadState::NetworkIdle => WaitUntil::NetworkIdle,
        }
    }
}

/// Wraps an element script so a missing element is reported instead of throwing.
fn element_script(script: &str) -> String {
    format!(
        "({{ selector, arg }}) => {{ \
            const el = document.querySelector(selector); \
            if (!el) return {{ found: false, value: null }}; \
            const value = ({script})(el, arg); \
            return {{ found: true, value: value === undefined ? null : value }}; \
        }}"
    )
}

const BOUNDING_BOX_SCRIPT: &str = "(el) => { \
    const r = el.getBoundingClientRect(); \
    return { x: r.x, y: r.y, width: r.width, height: r.height }; \
}";

const FRAME_READY_SCRIPT: &str = "(frame, selector) => { \
    const doc = frame.contentDocument; \
    return !!(doc && doc.querySelector(selector)); \
}";

const FRAME_REPLACE_SCRIPT: &str = "(frame, { selector, text }) => { \
    const doc = frame.contentDocument; \
    const body = doc && doc.querySelector(selector); \
    if (!body) return false; \
    body.focus(); \
    body.innerHTML = ''; \
    const p = doc.createElement('p'); \
    p.textContent = text; \
    body.appendChild(p); \
    body.dispatchEvent(new Event('input', { bubbles: true })); \
    return true; \
}";

const FRAME_TEXT_SCRIPT: &str = "(frame, selector) => { \
    const doc = frame.contentDocument; \
    const el = doc && doc.querySelector(selector); \
    return el ? el.textContent : null; \
}";

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn goto(&self, url: &str, wait_until: LoadState) -> Result<()> {
        tracing::debug!(url, ?wait_until, "Navigating");
        let options = GotoOptions::new()
            .timeout(self.timeout)
            .wait_until(wait_until.into());
        self.page.goto(url, Some(options)).await?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    fn current_url(&self) -> String {
        self.page.url()
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn wait_for(
        &self,
        selector: &str,
        state: ElementState,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or(self.timeout);
        match state {
            ElementState::Visible => {
                let locator = self.first(selector).await;
                playwright_rs::expect(locator)
                    .with_timeout(timeout)
                    .to_be_visible()
                    .await?;
            }
            ElementState::Hidden => {
                let locator = self.first(selector).await;
                playwright_rs::expect(locator)
                    .with_timeout(timeout)
                    .to_be_hidden()
                    .await?;
            }
            ElementState::Attached => {
                let locator = self.page.locator(selector).await;
                self.poll_until(&format!("'{selector}' attached"), timeout, || {
                    let locator = locator.clone();
                    async move { Ok(locator.count().await? > 0) }
                })
                .await?;
            }
        }
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState) -> Result<()> {
        self.poll_until(&format!("load state {state:?}"), self.timeout, move || async move {
            let ready = self.ready_state().await?;
            Ok(match state {
                LoadState::DomContentLoaded => ready == "interactive" || ready == "complete",
                LoadState::Load | LoadState::NetworkIdle => ready == "complete",
            })
        })
        .await?;

        if state == LoadState::NetworkIdle {
            tokio::time::sleep(NETWORK_IDLE_QUIET).await;
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        tracing::debug!(selector, "Clicking");
        let options = ClickOptions::builder().timeout(self.timeout_ms()).build();
        self.first(selector).await.click(Some(options)).await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        tracing::debug!(selector, "Filling");
        let options = FillOptions::builder().timeout(self.timeout_ms()).build();
        self.first(selector).await.fill(value, Some(options)).await?;
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        tracing::debug!(selector, key, "Pressing key");
        let options = PressOptions::builder().timeout(self.timeout_ms()).build();
        self.first(selector).await.press(key, Some(options)).await?;
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.first(selector).await.text_content().await?)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.locator(selector).await.count().await?)
    }

    async fn all_text_contents(&self, selector: &str) -> Result<Vec<String>> {
        let locator = self.page.locator(selector).await;
        let count = locator.count().await?;
        let mut texts = Vec::with_capacity(count);
        for index in 0..count {
            let text = locator.nth(index as i32).text_content().await?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self.first(selector).await.get_attribute(name).await?)
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        Ok(self.first(selector).await.is_checked().await?)
    }

    async fn set_input_files(&self, selector: &str, file: &Path) -> Result<()> {
        if !file.exists() {
            return Err(Error::InvalidArgument(format!(
                "upload file does not exist: {}",
                file.display()
            )));
        }
        tracing::debug!(selector, file = %file.display(), "Setting input file");
        self.first(selector)
            .await
            .set_input_files(&file.to_path_buf(), None)
            .await?;
        Ok(())
    }

    async fn drag_and_drop(&self, source: &str, target: &str) -> Result<()> {
        let from = self
            .bounding_box(source)
            .await?
            .ok_or_else(|| Error::ElementNotFound(source.to_string()))?;
        let to = self
            .bounding_box(target)
            .await?
            .ok_or_else(|| Error::ElementNotFound(target.to_string()))?;

        let (from_x, from_y) = from.center();
        let (to_x, to_y) = to.center();
        tracing::debug!(source, target, "Dragging");

        let mouse = self.page.mouse();
        mouse.move_to(from_x as i32, from_y as i32, None).await?;
        mouse.down(None).await?;
        let steps = MouseOptions::builder().steps(DRAG_STEPS).build();
        mouse.move_to(to_x as i32, to_y as i32, Some(steps)).await?;
        mouse.up(None).await?;
        Ok(())
    }

    async fn evaluate_on(&self, css: &str, script: &str, arg: Value) -> Result<Value> {
        let wrapped = element_script(script);
        let envelope: Value = self
            .page
            .evaluate(&wrapped, Some(&json!({ "selector": css, "arg": arg })))
            .await?;

        if envelope.get("found").and_then(Value::as_bool) != Some(true) {
            return Err(Error::ElementNotFound(css.to_string()));
        }
        Ok(envelope.get("value").cloned().unwrap_or(Value::Null))
    }

    async fn bounding_box(&self, css: &str) -> Result<Option<BoundingBox>> {
        match self.evaluate_on(css, BOUNDING_BOX_SCRIPT, Value::Null).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(Error::ElementNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn viewport_size(&self) -> Result<Viewport> {
        let viewport: Viewport = self
            .page
            .evaluate(
                "() => ({ width: window.innerWidth, height: window.innerHeight })",
                None::<&()>,
            )
            .await?;
        Ok(viewport)
    }

    async fn arm_dialog(&self, response: DialogResponse) -> Result<()> {
        *self.dialog_slot.lock() = Some(response);
        self.register_dialog_listener().await
    }

    async fn wait_for_frame_element(
        &self,
        frame: &str,
        selector: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or(self.timeout);
        self.poll_until(&format!("'{selector}' inside '{frame}'"), timeout, move || async move {
            match self
                .evaluate_on(frame, FRAME_READY_SCRIPT, json!(selector))
                .await
            {
                Ok(value) => Ok(value.as_bool().unwrap_or(false)),
                Err(Error::ElementNotFound(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn replace_frame_text(&self, frame: &str, selector: &str, text: &str) -> Result<()> {
        tracing::debug!(frame, selector, "Replacing frame content");
        let replaced = self
            .evaluate_on(
                frame,
                FRAME_REPLACE_SCRIPT,
                json!({ "selector": selector, "text": text }),
            )
            .await?;

        if replaced.as_bool() != Some(true) {
            return Err(Error::ElementNotFound(format!("{frame} >> {selector}")));
        }
        Ok(())
    }

    async fn frame_text(&self, frame: &str, selector: &str) -> Result<Option<String>> {
        let value = self
            .evaluate_on(frame, FRAME_TEXT_SCRIPT, json!(selector))
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn screenshot(&self, path: &Path) -> Result<Vec<u8>> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::debug!(path = %path.display(), "Capturing screenshot");
        Ok(self.page.screenshot_to_file(path, None).await?)
    }
}

impl std::fmt::Debug for PlaywrightDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightDriver")
            .field("url", &self.page.url())
            .field("timeout", &self.timeout)
            .finish()
    }
}
