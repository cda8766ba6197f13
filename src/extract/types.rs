use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One cell of a row: either final display text, or a sequence of display
/// strings that was resolved without a join separator and is passed through
/// for the renderer to deal with.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    List(Vec<String>),
}

impl Cell {
    /// Collapse the cell into a single display string. Sequence cells are
    /// joined with a comma, which is only used by renderers that cannot
    /// show sequence-valued cells natively.
    pub fn to_display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::List(items) => items.join(","),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// One flat output row: an ordered mapping from output name to cell.
///
/// Insertion order is preserved; inserting under an existing name overwrites
/// the cell in place (later directives win, no error).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Row { cells: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, cell: Cell) {
        let name = name.into();
        if let Some(slot) = self.cells.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = cell;
        } else {
            self.cells.push((name, cell));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(n, c)| (n.as_str(), c))
    }
}

// Serialized as a JSON object in column order; serde_json::Map would sort
// the keys, so the Vec-backed row serializes itself.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in &self.cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Convert a resolved JSON value into display text.
///
/// Strings pass through unquoted, numbers and booleans use their JSON
/// rendering, null becomes the empty string (matching the optional-key
/// default), and containers fall back to compact JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_preserves_insertion_order() {
        let mut row = Row::new();
        row.insert("zone", Cell::Text("us-east-1a".into()));
        row.insert("id", Cell::Text("i-0abc".into()));
        row.insert("name", Cell::Text("web".into()));

        let names: Vec<&str> = row.names().collect();
        assert_eq!(names, vec!["zone", "id", "name"]);
    }

    #[test]
    fn test_row_duplicate_insert_overwrites_in_place() {
        let mut row = Row::new();
        row.insert("id", Cell::Text("first".into()));
        row.insert("state", Cell::Text("running".into()));
        row.insert("id", Cell::Text("second".into()));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id").unwrap().to_display(), "second");
        let names: Vec<&str> = row.names().collect();
        assert_eq!(names, vec!["id", "state"]);
    }

    #[test]
    fn test_row_serializes_as_ordered_object() {
        let mut row = Row::new();
        row.insert("zz", Cell::Text("1".into()));
        row.insert("aa", Cell::List(vec!["x".into(), "y".into()]));

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zz":"1","aa":["x","y"]}"#);
    }

    #[test]
    fn test_display_string_scalars() {
        assert_eq!(display_string(&json!("plain")), "plain");
        assert_eq!(display_string(&json!(42)), "42");
        assert_eq!(display_string(&json!(true)), "true");
        assert_eq!(display_string(&json!(null)), "");
        assert_eq!(display_string(&json!([1, 2])), "[1,2]");
    }
}
