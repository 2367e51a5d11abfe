use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a backend entity
///
/// Backends use numeric keys or string keys (UUIDs, slugs); both appear
/// untagged on the wire and render the same way when substituted into a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EntityId::Number(n) => Some(*n),
            EntityId::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Number(id)
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        EntityId::Number(id as i64)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_untagged() {
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EntityId::Number(42));

        let id: EntityId = serde_json::from_str("\"c0ffee\"").unwrap();
        assert_eq!(id, EntityId::Text("c0ffee".to_string()));
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::from(42i64).to_string(), "42");
        assert_eq!(EntityId::from("abc").to_string(), "abc");
        assert_eq!(EntityId::from("17").as_i64(), Some(17));
    }
}
