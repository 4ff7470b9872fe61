//! Department Model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Department entity
///
/// `parent_department` is accepted on the wire either as a bare id
/// (number or numeric string) or as a populated object carrying `id`/`_id`.
/// Both forms resolve to the same `parent_id`; an unparseable reference
/// resolves to `None` and the department is treated as a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered list of position titles
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(json))]
    pub positions: Vec<String>,
    #[serde(
        rename = "parent_department",
        default,
        deserialize_with = "deserialize_parent_ref"
    )]
    pub parent_id: Option<i64>,
}

/// Resolve a parent reference in any of its wire forms
pub fn resolve_parent_ref(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map.get("id").or_else(|| map.get("_id")).and_then(resolve_parent_ref),
        _ => None,
    }
}

fn deserialize_parent_ref<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(resolve_parent_ref))
}

/// Create department payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(
        rename = "parent_department",
        default,
        deserialize_with = "deserialize_parent_ref"
    )]
    pub parent_id: Option<i64>,
}

/// Update department payload
///
/// `clear_parent` turns the department into a root; it wins over `parent_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub positions: Option<Vec<String>>,
    #[serde(
        rename = "parent_department",
        default,
        deserialize_with = "deserialize_parent_ref"
    )]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub clear_parent: bool,
}

/// A department with its depth in the hierarchy, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    #[serde(flatten)]
    pub department: Department,
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_reference_forms_resolve_uniformly() {
        let by_number: Department =
            serde_json::from_str(r#"{"id":2,"name":"Backend","parent_department":1}"#).unwrap();
        let by_string: Department =
            serde_json::from_str(r#"{"id":2,"name":"Backend","parent_department":"1"}"#).unwrap();
        let populated: Department = serde_json::from_str(
            r#"{"id":2,"name":"Backend","parent_department":{"id":1,"name":"Eng"}}"#,
        )
        .unwrap();
        let mongo_style: Department = serde_json::from_str(
            r#"{"id":2,"name":"Backend","parent_department":{"_id":"1"}}"#,
        )
        .unwrap();

        assert_eq!(by_number.parent_id, Some(1));
        assert_eq!(by_string.parent_id, Some(1));
        assert_eq!(populated.parent_id, Some(1));
        assert_eq!(mongo_style.parent_id, Some(1));
    }

    #[test]
    fn missing_or_garbage_parent_is_root() {
        let missing: Department = serde_json::from_str(r#"{"id":1,"name":"Eng"}"#).unwrap();
        let null: Department =
            serde_json::from_str(r#"{"id":1,"name":"Eng","parent_department":null}"#).unwrap();
        let garbage: Department =
            serde_json::from_str(r#"{"id":1,"name":"Eng","parent_department":"abc"}"#).unwrap();

        assert_eq!(missing.parent_id, None);
        assert_eq!(null.parent_id, None);
        assert_eq!(garbage.parent_id, None);
        assert!(missing.positions.is_empty());
    }

    #[test]
    fn serializes_parent_as_plain_id() {
        let dept = Department {
            id: 2,
            name: "Backend".into(),
            description: None,
            positions: vec!["Engineer".into()],
            parent_id: Some(1),
        };
        let json = serde_json::to_value(&dept).unwrap();
        assert_eq!(json["parent_department"], 1);
    }
}
