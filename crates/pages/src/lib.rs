//! site-pages: Page objects and a browser UI suite for two demo sites
//!
//! Wraps [`playwright-rs`](https://crates.io/crates/playwright-rs) in page
//! objects for `https://example.com` and `http://the-internet.herokuapp.com`.
//!
//! # Examples
//!
//! ```ignore
//! use site_pages::{HerokuappPage, Session, SuiteConfig};
//! use site_pages::pages::herokuapp::DialogKind;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Session::launch(SuiteConfig::from_env()?.headless(true)).await?;
//!
//!     session
//!         .run("prompt", |driver| async move {
//!             let page = HerokuappPage::new(driver);
//!             let result = page
//!                 .handle_javascript_alert(DialogKind::Prompt, Some("hello"))
//!                 .await?;
//!             assert_eq!(result, "You entered: hello");
//!             Ok::<_, anyhow::Error>(())
//!         })
//!         .await?;
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`driver::Driver`]: the browser primitives page objects use; [`PlaywrightDriver`] implements it
//! - [`pages`]: `BasePage`, `ExamplePage`, `HerokuappPage`
//! - [`Session`]: browser launch and per-test contexts
//! - [`SuiteConfig`]: settings read from the environment
//! - [`support`]: artifacts, test data, retries, reports

pub mod config;
pub mod driver;
pub mod error;
pub mod pages;
pub mod session;
pub mod support;

/// Static documentation page.
pub const EXAMPLE_URL: &str = "https://example.com";

/// Multi-feature interactive test site.
pub const HEROKUAPP_URL: &str = "http://the-internet.herokuapp.com";

pub use config::{BrowserKind, DevicePreset, SuiteConfig};
pub use driver::{Driver, PlaywrightDriver, Viewport};
pub use error::{Error, Result};
pub use pages::{BasePage, ExamplePage, HerokuappPage};
pub use session::{PageSession, Session};
