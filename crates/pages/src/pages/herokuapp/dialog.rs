// JavaScript Alerts - native dialog kinds and their trigger buttons

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::driver::DialogResponse;
use crate::error::Error;

/// Native dialog opened by the JavaScript Alerts example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
}

impl DialogKind {
    /// Button that opens this kind of dialog.
    pub fn trigger_selector(self) -> &'static str {
        match self {
            DialogKind::Alert => "button[onclick='jsAlert()']",
            DialogKind::Confirm => "button[onclick='jsConfirm()']",
            DialogKind::Prompt => "button[onclick='jsPrompt()']",
        }
    }

    /// Accepting response; text is only kept for prompts.
    pub(crate) fn accept_with(self, text: Option<&str>) -> DialogResponse {
        let prompt_text = match self {
            DialogKind::Prompt => text.map(str::to_string),
            DialogKind::Alert | DialogKind::Confirm => None,
        };
        DialogResponse::Accept { prompt_text }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialogKind::Alert => "alert",
            DialogKind::Confirm => "confirm",
            DialogKind::Prompt => "prompt",
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialogKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alert" => Ok(DialogKind::Alert),
            "confirm" => Ok(DialogKind::Confirm),
            "prompt" => Ok(DialogKind::Prompt),
            other => Err(Error::InvalidArgument(format!(
                "unknown dialog type '{other}' (expected alert, confirm or prompt)"
            ))),
        }
    }
}
