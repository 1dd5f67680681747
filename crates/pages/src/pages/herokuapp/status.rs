// Status Codes - outcome of visiting a status code page

use serde::Serialize;
use std::fmt;
use url::Url;

/// Result of navigating to `/status_codes/<code>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusCheck {
    /// The browser ended up on the status code page
    Reached { url: String },
    /// Navigation finished somewhere else
    Mismatch { url: String },
    /// Navigation itself failed
    NavigationFailed { reason: String },
}

impl StatusCheck {
    /// Classifies the URL the browser landed on after requesting `code`.
    pub fn from_url(url: &str, code: u16) -> Self {
        if ends_with_status_path(url, code) {
            StatusCheck::Reached {
                url: url.to_string(),
            }
        } else {
            StatusCheck::Mismatch {
                url: url.to_string(),
            }
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, StatusCheck::Reached { .. })
    }
}

impl fmt::Display for StatusCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCheck::Reached { url } => write!(f, "reached {url}"),
            StatusCheck::Mismatch { url } => write!(f, "ended on {url}"),
            StatusCheck::NavigationFailed { reason } => write!(f, "navigation failed: {reason}"),
        }
    }
}

fn ends_with_status_path(url: &str, code: u16) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(segments) = parsed.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
    let code = code.to_string();
    matches!(segments.as_slice(), [.., "status_codes", last] if *last == code)
}
