// Sortable Data Tables - rows keyed by column header

use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

/// One table row: `(header, cell)` pairs in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<(String, String)>,
}

impl TableRow {
    /// Zips `cells` positionally against `headers`.
    ///
    /// Extra cells without a header are dropped; headers without a cell are omitted.
    pub fn zip(headers: &[String], cells: &[String]) -> Self {
        Self {
            cells: headers
                .iter()
                .zip(cells)
                .map(|(h, c)| (h.clone(), c.clone()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, cell)| cell.as_str())
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(header, _)| header.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, cell) in &self.cells {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// Index of the header whose trimmed text equals `column`.
pub(crate) fn column_index(headers: &[String], column: &str) -> Option<usize> {
    let wanted = column.trim();
    headers.iter().position(|h| h.trim() == wanted)
}
