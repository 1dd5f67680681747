// Support utilities for the UI suite
//
// Artifact saving, JSON test data, retries and markdown reports. None of
// these are used by the page objects themselves.

pub mod artifacts;
pub mod report;
pub mod retry;
pub mod test_data;

pub use artifacts::{Artifact, ArtifactStore};
pub use report::{TestOutcome, TestResults, generate_test_report, render_report};
pub use retry::{RetryPolicy, retry};
pub use test_data::{load_test_data, load_typed};
