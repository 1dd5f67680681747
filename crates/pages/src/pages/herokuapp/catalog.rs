// Example catalog - name → link/path mapping for the-internet's example index
//
// Resolution order for a requested example name (first match wins):
// 1. exactly one link whose trimmed text equals the name
// 2. first link (document order) containing any matching variant, case-insensitively
// 3. the entry's direct path, for entries marked `direct`
// 4. ExampleNotFound

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleEntry {
    /// Name callers ask for
    pub name: String,

    /// Extra text variant tried during substring matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// URL path of the example on the site (e.g. `/tables`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Navigate to `path` directly when no link matched
    #[serde(default)]
    pub direct: bool,
}

impl ExampleEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            path: None,
            direct: false,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }
}

/// Outcome of resolving an example name against the index links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Click the link at `index` (document order) with the given text
    Link { index: usize, text: String },
    /// Navigate to this path below the site's base URL
    Path(String),
}

/// Lookup table used to resolve example names to navigation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleCatalog {
    entries: Vec<ExampleEntry>,
}

impl Default for ExampleCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                ExampleEntry::new("Form Authentication").path("/login"),
                ExampleEntry::new("Dynamic Loading").path("/dynamic_loading"),
                ExampleEntry::new("Checkboxes").path("/checkboxes"),
                ExampleEntry::new("Drag and Drop").path("/drag_and_drop"),
                ExampleEntry::new("File Upload").path("/upload"),
                ExampleEntry::new("Frames").path("/frames"),
                ExampleEntry::new("JavaScript Alerts").path("/javascript_alerts"),
                ExampleEntry::new("Key Presses").path("/key_presses"),
                ExampleEntry::new("Horizontal Slider").path("/horizontal_slider"),
                ExampleEntry::new("Sortable Data Tables")
                    .alias("Sortable Tables")
                    .path("/tables"),
                ExampleEntry::new("Tables").alias("Data Tables").path("/tables"),
                ExampleEntry::new("Data Tables").path("/tables").direct(true),
                ExampleEntry::new("Status Code")
                    .alias("Status Codes")
                    .path("/status_codes"),
                ExampleEntry::new("Status Codes")
                    .path("/status_codes")
                    .direct(true),
            ],
        }
    }
}

impl ExampleCatalog {
    /// Catalog with no entries; resolution then relies on link text alone.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Loads a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds or replaces the entry with the same name.
    pub fn with_entry(mut self, entry: ExampleEntry) -> Self {
        self.entries.retain(|e| e.name != entry.name);
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[ExampleEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ExampleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Known URL path of the example, if catalogued.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|e| e.path.as_deref())
    }

    /// Text variants tried during substring matching, without duplicates.
    pub fn variants(&self, name: &str) -> Vec<String> {
        let mut variants = vec![
            name.to_string(),
            name.to_lowercase(),
            title_case(name),
            name.split_whitespace().collect::<String>(),
        ];
        if let Some(alias) = self.get(name).and_then(|e| e.alias.clone()) {
            variants.push(alias);
        }

        let mut unique = Vec::with_capacity(variants.len());
        for variant in variants {
            if !unique.contains(&variant) {
                unique.push(variant);
            }
        }
        unique
    }

    /// Resolves `name` against the example index link texts (document order).
    pub fn resolve(&self, name: &str, links: &[String]) -> Result<Resolution> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return Err(Error::InvalidArgument(
                "example name must not be empty".to_string(),
            ));
        }

        let exact: Vec<usize> = links
            .iter()
            .enumerate()
            .filter(|(_, text)| text.trim() == wanted)
            .map(|(index, _)| index)
            .collect();
        if let [index] = exact[..] {
            return Ok(Resolution::Link {
                index,
                text: links[index].trim().to_string(),
            });
        }

        let variants: Vec<String> = self
            .variants(wanted)
            .iter()
            .map(|v| v.to_lowercase())
            .collect();
        let fuzzy = links.iter().enumerate().find(|(_, text)| {
            let text = text.trim().to_lowercase();
            variants.iter().any(|v| text.contains(v.as_str()))
        });
        if let Some((index, text)) = fuzzy {
            return Ok(Resolution::Link {
                index,
                text: text.trim().to_string(),
            });
        }

        match self.get(wanted) {
            Some(ExampleEntry {
                path: Some(path),
                direct: true,
                ..
            }) => Ok(Resolution::Path(path.clone())),
            _ => Err(Error::ExampleNotFound(wanted.to_string())),
        }
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
