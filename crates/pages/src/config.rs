// SuiteConfig - Environment-driven settings for a test run
//
// Read once per session. A `.env` file in the working directory (or an
// ancestor) supplies values the process environment does not set.
// Environment variables:
// - BROWSER: chromium | firefox | webkit (default chromium)
// - HEADLESS: "true" to hide the browser (default false)
// - SLOW_MO: delay between actions in ms (default 0)
// - TIMEOUT: default action/navigation timeout in ms (default 30000)
// - BASE_URL: default site (default https://example.com)
// - VIEWPORT_WIDTH / VIEWPORT_HEIGHT (default 1920x1080)
// - VIDEO_ON_FAILURE / SCREENSHOT_ON_FAILURE: "true" to enable (default true)
// - REPORTS_DIR: root of all run output (default "reports")

use playwright_rs::{BrowserContextOptions, LaunchOptions, RecordVideo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::EXAMPLE_URL;
use crate::driver::Viewport;
use crate::error::{Error, Result};

/// Browser engine to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(Error::Config(format!(
                "BROWSER must be chromium, firefox or webkit, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        })
    }
}

/// Viewport presets for responsive checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreset {
    Mobile,
    Tablet,
    Desktop,
}

impl DevicePreset {
    pub const ALL: [DevicePreset; 3] = [
        DevicePreset::Mobile,
        DevicePreset::Tablet,
        DevicePreset::Desktop,
    ];

    pub const fn viewport(self) -> Viewport {
        match self {
            DevicePreset::Mobile => Viewport::new(375, 667),
            DevicePreset::Tablet => Viewport::new(768, 1024),
            DevicePreset::Desktop => Viewport::new(1920, 1080),
        }
    }
}

/// Settings for one test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub browser: BrowserKind,
    pub headless: bool,
    pub slow_mo_ms: u64,
    pub timeout_ms: u64,
    pub base_url: String,
    pub viewport: Viewport,
    pub video_on_failure: bool,
    pub screenshot_on_failure: bool,
    pub reports_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: false,
            slow_mo_ms: 0,
            timeout_ms: 30_000,
            base_url: EXAMPLE_URL.to_string(),
            viewport: DevicePreset::Desktop.viewport(),
            video_on_failure: true,
            screenshot_on_failure: true,
            reports_dir: PathBuf::from("reports"),
        }
    }
}

/// Boolean flags are on only for a case-insensitive "true".
fn flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn collect_dotenv<R: std::io::Read>(iter: dotenvy::Iter<R>) -> Result<HashMap<String, String>> {
    iter.collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Config(format!("parsing .env: {e}")))
}

/// Looks `name` up in `primary` first, then in the `.env` values.
fn layered<F>(file: HashMap<String, String>, primary: F) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |name| primary(name).or_else(|| file.get(name).cloned())
}

fn number<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got '{raw}'")))
}

impl SuiteConfig {
    /// Reads the configuration from the process environment, falling back to
    /// a `.env` file when one is found.
    pub fn from_env() -> Result<Self> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(Error::Config(format!("reading .env: {e}"))),
        };
        Self::from_lookup(layered(file, |name| std::env::var(name).ok()))
    }

    /// Reads `path` as a `.env` file beneath the variables `lookup` provides.
    ///
    /// Values from `lookup` win over the file.
    pub fn from_env_file<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
        tracing::debug!("Loading environment file {}", path.display());
        Self::from_lookup(layered(collect_dotenv(iter)?, lookup))
    }

    /// Reads the configuration through `lookup`; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BROWSER") {
            config.browser = raw.parse()?;
        }
        if let Some(raw) = lookup("HEADLESS") {
            config.headless = flag(&raw);
        }
        if let Some(raw) = lookup("SLOW_MO") {
            config.slow_mo_ms = number("SLOW_MO", &raw)?;
        }
        if let Some(raw) = lookup("TIMEOUT") {
            config.timeout_ms = number("TIMEOUT", &raw)?;
        }
        if let Some(raw) = lookup("BASE_URL") {
            config.base_url = raw.trim().to_string();
        }
        if let Some(raw) = lookup("VIEWPORT_WIDTH") {
            config.viewport.width = number("VIEWPORT_WIDTH", &raw)?;
        }
        if let Some(raw) = lookup("VIEWPORT_HEIGHT") {
            config.viewport.height = number("VIEWPORT_HEIGHT", &raw)?;
        }
        if let Some(raw) = lookup("VIDEO_ON_FAILURE") {
            config.video_on_failure = flag(&raw);
        }
        if let Some(raw) = lookup("SCREENSHOT_ON_FAILURE") {
            config.screenshot_on_failure = flag(&raw);
        }
        if let Some(raw) = lookup("REPORTS_DIR") {
            config.reports_dir = PathBuf::from(raw.trim());
        }

        tracing::debug!("Loaded suite configuration: {:?}", config);
        Ok(config)
    }

    pub fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn video_on_failure(mut self, enabled: bool) -> Self {
        self.video_on_failure = enabled;
        self
    }

    pub fn screenshot_on_failure(mut self, enabled: bool) -> Self {
        self.screenshot_on_failure = enabled;
        self
    }

    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }

    /// Default timeout for driver actions.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.reports_dir.join("artifacts")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.reports_dir.join("videos")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.reports_dir.join("screenshots")
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions::new()
            .headless(self.headless)
            .slow_mo(self.slow_mo_ms as f64)
            .timeout(self.timeout_ms as f64)
    }

    /// Context options at the configured viewport.
    pub fn context_options(&self) -> BrowserContextOptions {
        self.context_options_for(self.viewport)
    }

    /// Context options at `viewport`, recording video when enabled.
    pub fn context_options_for(&self, viewport: Viewport) -> BrowserContextOptions {
        let builder = BrowserContextOptions::builder().viewport(viewport.into());
        if self.video_on_failure {
            builder
                .record_video(RecordVideo {
                    dir: self.videos_dir().to_string_lossy().into_owned(),
                    size: None,
                })
                .build()
        } else {
            builder.build()
        }
    }

    /// Creates the report directory tree.
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in [
            self.reports_dir.clone(),
            self.artifacts_dir(),
            self.videos_dir(),
            self.screenshots_dir(),
        ] {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::from(e).context(format!("creating {}", dir.display())))
}
