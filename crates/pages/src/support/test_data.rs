// Test data - JSON fixtures keyed by name

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use crate::error::Result;

/// Loads `<dir>/<name>.json`, or an empty object when the file does not exist.
pub async fn load_test_data(dir: &Path, name: &str) -> Result<Value> {
    let path = dir.join(format!("{name}.json"));
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No test data at {}, using empty object", path.display());
            return Ok(Value::Object(Default::default()));
        }
        Err(e) => {
            return Err(crate::Error::from(e).context(format!("reading {}", path.display())));
        }
    };
    serde_json::from_str(&raw).map_err(|e| {
        crate::Error::from(e).context(format!("parsing {}", path.display()))
    })
}

/// Loads `<dir>/<name>.json` into `T`; a missing file deserializes from `{}`.
pub async fn load_typed<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    Ok(serde_json::from_value(load_test_data(dir, name).await?)?)
}
