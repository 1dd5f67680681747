// Page objects
//
// Each page object composes a `BasePage` over the test's shared driver.

pub mod base;
pub mod example;
pub mod herokuapp;

pub use base::{BasePage, ElementRef};
pub use example::{ExamplePage, ResponsiveCheck};
pub use herokuapp::HerokuappPage;
