// MemoryDriver - In-memory Driver for unit tests
//
// Models just enough of a browser for the page objects: pages keyed by URL,
// elements keyed by exact selector (with `>> nth=` indexing), click effects,
// native dialogs, iframe bodies and a sortable table.
//
// Navigation loads a fresh copy of the target page, so state changed by
// clicks is lost when leaving the page, as in a real browser.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use crate::driver::{BoundingBox, DialogResponse, Driver, ElementState, LoadState, Viewport, nth};
use crate::error::{Error, Result};
use crate::pages::herokuapp::{DialogKind, TABLE_CELLS, TABLE_HEADERS, TABLE_ROWS};

/// What happens when an element is clicked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ClickEffect {
    Navigate(String),
    Dialog(DialogKind),
    Toggle,
    SortColumn(usize),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryElement {
    pub text: Option<String>,
    pub attributes: HashMap<String, String>,
    pub checked: bool,
    pub hidden: bool,
    pub bounding_box: Option<BoundingBox>,
    pub on_click: Option<ClickEffect>,
}

impl MemoryElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn boxed(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }

    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click = Some(effect);
        self
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    sorted: Option<(usize, bool)>,
}

impl MemoryTable {
    fn sort_by(&mut self, column: usize) {
        let ascending = match self.sorted {
            Some((current, ascending)) if current == column => !ascending,
            _ => true,
        };
        self.rows.sort_by(|a, b| {
            let ordering = a.get(column).cmp(&b.get(column));
            if ascending { ordering } else { ordering.reverse() }
        });
        self.sorted = Some((column, ascending));
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryPage {
    pub title: String,
    elements: HashMap<String, Vec<MemoryElement>>,
    frames: HashMap<String, HashMap<String, String>>,
    echoes: HashMap<String, String>,
    table: Option<MemoryTable>,
}

impl MemoryPage {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn element(mut self, selector: &str, element: MemoryElement) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(element);
        self
    }

    pub fn text(self, selector: &str, text: &str) -> Self {
        self.element(selector, MemoryElement::with_text(text))
    }

    /// Adds one link per `(text, url)` pair under `selector`, in order.
    pub fn links(mut self, selector: &str, links: &[(&str, &str)]) -> Self {
        for (text, url) in links {
            self = self.element(
                selector,
                MemoryElement::with_text(text).on_click(ClickEffect::Navigate(url.to_string())),
            );
        }
        self
    }

    pub fn frame(mut self, frame: &str, selector: &str, text: &str) -> Self {
        self.frames
            .entry(frame.to_string())
            .or_default()
            .insert(selector.to_string(), text.to_string());
        self
    }

    /// Mirrors value changes and key presses on `input` into the text of `display`.
    pub fn echo(mut self, input: &str, display: &str) -> Self {
        self.echoes.insert(input.to_string(), display.to_string());
        self
    }

    pub fn table(mut self, headers: &[&str], rows: &[&[&str]]) -> Self {
        self.table = Some(MemoryTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            sorted: None,
        });
        self.sync_table();
        self
    }

    fn sync_table(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        let headers = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| MemoryElement::with_text(h).on_click(ClickEffect::SortColumn(i)))
            .collect();
        let rows: Vec<MemoryElement> = table
            .rows
            .iter()
            .map(|row| MemoryElement::with_text(&row.join(" ")))
            .collect();
        let cells: Vec<(String, Vec<MemoryElement>)> = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let key = format!("{} >> {}", nth(TABLE_ROWS, i), TABLE_CELLS);
                (key, row.iter().map(|c| MemoryElement::with_text(c)).collect())
            })
            .collect();

        self.elements.insert(TABLE_HEADERS.to_string(), headers);
        self.elements.insert(TABLE_ROWS.to_string(), rows);
        self.elements.insert("#table1".to_string(), vec![MemoryElement::default()]);
        for (key, row) in cells {
            self.elements.insert(key, row);
        }
    }

    fn locate(&self, selector: &str) -> Option<(String, usize)> {
        if self.elements.get(selector).is_some_and(|e| !e.is_empty()) {
            return Some((selector.to_string(), 0));
        }
        let (prefix, index) = selector.rsplit_once(" >> nth=")?;
        let index: usize = index.parse().ok()?;
        let elements = self.elements.get(prefix)?;
        (index < elements.len()).then(|| (prefix.to_string(), index))
    }

    fn get(&self, selector: &str) -> Option<&MemoryElement> {
        let (key, index) = self.locate(selector)?;
        self.elements.get(&key).and_then(|e| e.get(index))
    }

    fn get_mut(&mut self, selector: &str) -> Option<&mut MemoryElement> {
        let (key, index) = self.locate(selector)?;
        self.elements.get_mut(&key).and_then(|e| e.get_mut(index))
    }

    fn set_text(&mut self, selector: &str, text: String) {
        match self.get_mut(selector) {
            Some(element) => element.text = Some(text),
            None => {
                self.elements
                    .insert(selector.to_string(), vec![MemoryElement {
                        text: Some(text),
                        ..MemoryElement::default()
                    }]);
            }
        }
    }
}

#[derive(Default)]
struct State {
    url: String,
    pages: HashMap<String, MemoryPage>,
    current: MemoryPage,
    armed_dialog: Option<DialogResponse>,
    unreachable: HashSet<String>,
    redirects: HashMap<String, String>,
    viewport: Option<Viewport>,
    actions: Vec<String>,
}

impl State {
    fn load(&mut self, url: &str) {
        let target = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        self.current = self.pages.get(&target).cloned().unwrap_or_default();
        self.url = target;
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        let response = self.armed_dialog.take().unwrap_or(DialogResponse::Dismiss);
        let result = match (kind, response) {
            (DialogKind::Alert, _) => "You successfully clicked an alert".to_string(),
            (DialogKind::Confirm, DialogResponse::Accept { .. }) => "You clicked: Ok".to_string(),
            (DialogKind::Confirm, DialogResponse::Dismiss) => "You clicked: Cancel".to_string(),
            (DialogKind::Prompt, DialogResponse::Accept { prompt_text }) => {
                format!("You entered: {}", prompt_text.unwrap_or_default())
            }
            (DialogKind::Prompt, DialogResponse::Dismiss) => "You entered: null".to_string(),
        };
        self.current.set_text("#result", result);
    }
}

/// In-memory [`Driver`].
#[derive(Default)]
pub(crate) struct MemoryDriver {
    state: Mutex<State>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, page: MemoryPage) -> Self {
        self.state.lock().pages.insert(url.to_string(), page);
        self
    }

    pub fn start_at(self, url: &str) -> Self {
        self.state.lock().load(url);
        self
    }

    pub fn unreachable(self, url: &str) -> Self {
        self.state.lock().unreachable.insert(url.to_string());
        self
    }

    pub fn redirect(self, from: &str, to: &str) -> Self {
        self.state
            .lock()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_viewport(self, viewport: Viewport) -> Self {
        self.state.lock().viewport = Some(viewport);
        self
    }

    /// Recorded driver calls, e.g. `"goto http://host/"` or `"click #btn"`.
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    fn record(&self, action: String) {
        self.state.lock().actions.push(action);
    }

    fn missing(selector: &str) -> Error {
        Error::ElementNotFound(selector.to_string())
    }
}

fn js_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn goto(&self, url: &str, _wait_until: LoadState) -> Result<()> {
        self.record(format!("goto {url}"));
        let mut state = self.state.lock();
        if state.unreachable.contains(url) {
            return Err(Error::Timeout(format!("navigating to '{url}'")));
        }
        state.load(url);
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state.lock().current.title.clone())
    }

    fn current_url(&self) -> String {
        self.state.lock().url.clone()
    }

    async fn content(&self) -> Result<String> {
        let state = self.state.lock();
        let mut texts: Vec<&str> = state
            .current
            .elements
            .values()
            .flatten()
            .filter_map(|e| e.text.as_deref())
            .collect();
        texts.sort_unstable();
        Ok(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            state.current.title,
            texts.join("\n")
        ))
    }

    async fn wait_for(
        &self,
        selector: &str,
        state: ElementState,
        _timeout: Option<Duration>,
    ) -> Result<()> {
        let guard = self.state.lock();
        let element = guard.current.get(selector);
        let satisfied = match state {
            ElementState::Attached => element.is_some(),
            ElementState::Visible => element.is_some_and(|e| !e.hidden),
            ElementState::Hidden => element.is_none_or(|e| e.hidden),
        };
        if satisfied {
            Ok(())
        } else {
            Err(Error::Timeout(format!("waiting for '{selector}' to be {state:?}")))
        }
    }

    async fn wait_for_load_state(&self, _state: LoadState) -> Result<()> {
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click {selector}"));
        let mut state = self.state.lock();
        let effect = {
            let element = state
                .current
                .get(selector)
                .ok_or_else(|| Self::missing(selector))?;
            if element.hidden {
                return Err(Error::Timeout(format!("'{selector}' is not visible")));
            }
            element.on_click.clone()
        };

        match effect {
            Some(ClickEffect::Navigate(url)) => state.load(&url),
            Some(ClickEffect::Dialog(kind)) => state.open_dialog(kind),
            Some(ClickEffect::Toggle) => {
                if let Some(element) = state.current.get_mut(selector) {
                    element.checked = !element.checked;
                }
            }
            Some(ClickEffect::SortColumn(column)) => {
                if let Some(table) = state.current.table.as_mut() {
                    table.sort_by(column);
                }
                state.current.sync_table();
            }
            None => {}
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("fill {selector} {value}"));
        let mut state = self.state.lock();
        let element = state
            .current
            .get_mut(selector)
            .ok_or_else(|| Self::missing(selector))?;
        element.attributes.insert("value".to_string(), value.to_string());
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.record(format!("press {selector} {key}"));
        let mut state = self.state.lock();
        if state.current.get(selector).is_none() {
            return Err(Self::missing(selector));
        }
        if let Some(display) = state.current.echoes.get(selector).cloned() {
            state
                .current
                .set_text(&display, format!("You entered: {}", key.to_uppercase()));
        }
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        let state = self.state.lock();
        let element = state
            .current
            .get(selector)
            .ok_or_else(|| Self::missing(selector))?;
        Ok(element.text.clone())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let state = self.state.lock();
        Ok(match state.current.elements.get(selector) {
            Some(elements) => elements.len(),
            None => usize::from(state.current.get(selector).is_some()),
        })
    }

    async fn all_text_contents(&self, selector: &str) -> Result<Vec<String>> {
        let state = self.state.lock();
        Ok(state
            .current
            .elements
            .get(selector)
            .map(|elements| {
                elements
                    .iter()
                    .map(|e| e.text.clone().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let state = self.state.lock();
        let element = state
            .current
            .get(selector)
            .ok_or_else(|| Self::missing(selector))?;
        Ok(element.attributes.get(name).cloned())
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        let state = self.state.lock();
        let element = state
            .current
            .get(selector)
            .ok_or_else(|| Self::missing(selector))?;
        Ok(element.checked)
    }

    async fn set_input_files(&self, selector: &str, file: &Path) -> Result<()> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(format!("upload {selector} {name}"));
        let mut state = self.state.lock();
        let element = state
            .current
            .get_mut(selector)
            .ok_or_else(|| Self::missing(selector))?;
        element.attributes.insert("value".to_string(), name);
        Ok(())
    }

    async fn drag_and_drop(&self, source: &str, target: &str) -> Result<()> {
        self.record(format!("drag {source} {target}"));
        let mut state = self.state.lock();
        let page = &mut state.current;
        if page.get(source).is_none() {
            return Err(Self::missing(source));
        }
        if page.get(target).is_none() {
            return Err(Self::missing(target));
        }

        let source_header = format!("{source} header");
        let target_header = format!("{target} header");
        let source_text = page.get(&source_header).and_then(|e| e.text.clone());
        let target_text = page.get(&target_header).and_then(|e| e.text.clone());
        if let (Some(a), Some(b)) = (source_text, target_text) {
            page.set_text(&source_header, b);
            page.set_text(&target_header, a);
        }
        Ok(())
    }

    async fn evaluate_on(&self, css: &str, _script: &str, arg: Value) -> Result<Value> {
        self.record(format!("evaluate {css} {arg}"));
        let mut state = self.state.lock();
        let page = &mut state.current;
        if page.get(css).is_none() {
            return Err(Self::missing(css));
        }

        if let Some(value) = arg.as_f64() {
            let shown = js_number(value);
            if let Some(element) = page.get_mut(css) {
                element.attributes.insert("value".to_string(), shown.clone());
            }
            if let Some(display) = page.echoes.get(css).cloned() {
                page.set_text(&display, shown);
            }
        }
        Ok(Value::Null)
    }

    async fn bounding_box(&self, css: &str) -> Result<Option<BoundingBox>> {
        let state = self.state.lock();
        Ok(state.current.get(css).and_then(|e| e.bounding_box))
    }

    async fn viewport_size(&self) -> Result<Viewport> {
        Ok(self
            .state
            .lock()
            .viewport
            .unwrap_or(Viewport::new(1920, 1080)))
    }

    async fn arm_dialog(&self, response: DialogResponse) -> Result<()> {
        self.record("arm dialog".to_string());
        self.state.lock().armed_dialog = Some(response);
        Ok(())
    }

    async fn wait_for_frame_element(
        &self,
        frame: &str,
        selector: &str,
        _timeout: Option<Duration>,
    ) -> Result<()> {
        let state = self.state.lock();
        let found = state
            .current
            .frames
            .get(frame)
            .is_some_and(|f| f.contains_key(selector));
        if found {
            Ok(())
        } else {
            Err(Error::Timeout(format!("waiting for '{selector}' inside '{frame}'")))
        }
    }

    async fn replace_frame_text(&self, frame: &str, selector: &str, text: &str) -> Result<()> {
        self.record(format!("frame {frame} {selector}"));
        let mut state = self.state.lock();
        let body = state
            .current
            .frames
            .get_mut(frame)
            .and_then(|f| f.get_mut(selector))
            .ok_or_else(|| Self::missing(&format!("{frame} >> {selector}")))?;
        *body = text.to_string();
        Ok(())
    }

    async fn frame_text(&self, frame: &str, selector: &str) -> Result<Option<String>> {
        let state = self.state.lock();
        Ok(state
            .current
            .frames
            .get(frame)
            .and_then(|f| f.get(selector))
            .cloned())
    }

    async fn screenshot(&self, path: &Path) -> Result<Vec<u8>> {
        self.record(format!("screenshot {}", path.display()));
        let bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;
        Ok(bytes)
    }
}
