use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Navigation parameters delivered to a popup (and its view-model) when it is
/// pushed.
///
/// Values are `serde_json::Value`s keyed by string, so any serializable type
/// can cross the push boundary without the popup and its caller sharing
/// concrete types.
///
/// # Example
/// ```rust
/// use popstack::NavigationParams;
///
/// let params = NavigationParams::new()
///     .with("title", "Session expired")
///     .with("retry_count", 3);
///
/// assert_eq!(params.get_str("title"), Some("Session expired"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationParams(HashMap<String, Value>);

impl NavigationParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, consuming and returning the set for chaining.
    /// Unserializable values degrade to `Value::Null`.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.0
            .insert(key.into(), serde_json::to_value(value).unwrap_or(Value::Null));
        self
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a value expected to be a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for NavigationParams {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_and_get() {
        let params = NavigationParams::new()
            .with("name", "toast")
            .with("count", 2);

        assert_eq!(params.get_str("name"), Some("toast"));
        assert_eq!(params.get("count").and_then(Value::as_i64), Some(2));
        assert!(params.get("missing").is_none());
    }

    #[test]
    fn empty_by_default() {
        let params = NavigationParams::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn builds_from_a_plain_map_and_iterates() {
        let mut map = HashMap::new();
        map.insert("kind".to_string(), Value::from("toast"));
        map.insert("count".to_string(), Value::from(2));

        let params = NavigationParams::from(map);
        assert_eq!(params.get_str("kind"), Some("toast"));

        let mut keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["count", "kind"]);
    }
}
