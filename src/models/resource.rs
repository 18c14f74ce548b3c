//! Resource object shapes and the type-tagged factory.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fields shared by every resource kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCommon {
    /// The resource identifier.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// The server-side type tag.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// A file resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    #[serde(flatten)]
    pub common: ResourceCommon,
}

/// A folder resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(flatten)]
    pub common: ResourceCommon,
}

/// A table resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(flatten)]
    pub common: ResourceCommon,
}

/// A resource object created from a type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceObject {
    File(File),
    Folder(Folder),
    Query(super::Query),
    Table(Table),
}

/// Creates a resource object based on its type tag.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an unknown type tag and
/// [`Error::Decode`] if the payload does not match the resource shape.
pub fn resource_object(resource_type: &str, data: &serde_json::Value) -> Result<ResourceObject> {
    match resource_type {
        "file" => Ok(ResourceObject::File(serde_json::from_value(data.clone())?)),
        "folder" => Ok(ResourceObject::Folder(serde_json::from_value(data.clone())?)),
        "query" => Ok(ResourceObject::Query(serde_json::from_value(data.clone())?)),
        "table" => Ok(ResourceObject::Table(serde_json::from_value(data.clone())?)),
        other => Err(Error::InvalidArgument(format!(
            "invalid resource type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_factory_dispatches_on_type_tag() {
        let data = json!({"id": "abc123", "name": "f.csv", "type": "file"});

        match resource_object("file", &data).unwrap() {
            ResourceObject::File(file) => {
                assert_eq!(file.common.id, "abc123");
                assert_eq!(file.common.name.as_deref(), Some("f.csv"));
            }
            other => panic!("expected a file resource, got {other:?}"),
        }
    }

    #[test]
    fn test_factory_rejects_unknown_type() {
        let result = resource_object("dashboard", &json!({"id": "x"}));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_query_shape_keeps_config() {
        let data = json!({
            "id": "q1",
            "name": "daily",
            "type": "query",
            "config": {"sql": "select 1"}
        });

        match resource_object("query", &data).unwrap() {
            ResourceObject::Query(query) => {
                assert_eq!(query.common.id, "q1");
                assert_eq!(query.config.unwrap()["sql"], "select 1");
            }
            other => panic!("expected a query resource, got {other:?}"),
        }
    }
}
