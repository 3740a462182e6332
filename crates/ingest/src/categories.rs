use std::collections::BTreeSet;
use std::path::Path;

/// Loads the category allow-list: a flat JSON array of labels. An empty
/// result means "no restriction". Missing or malformed files degrade to
/// empty rather than failing the run.
pub fn load_categories(path: &Path) -> BTreeSet<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "categories file {} not readable ({e}), allowing all categories",
                path.display()
            );
            return BTreeSet::new();
        }
    };
    parse_categories(&text)
}

pub fn parse_categories(text: &str) -> BTreeSet<String> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("categories file is not valid JSON ({e}), allowing all categories");
            return BTreeSet::new();
        }
    };
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
