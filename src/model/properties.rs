// src/model/properties.rs
//! Database property values as they appear on pages.

use super::blocks::FileUrl;
use super::UserRef;
use crate::types::RichTextItem;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// The value of one page property, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    CreatedBy {
        created_by: UserRef,
    },
    CreatedTime {
        #[serde(default)]
        created_time: String,
    },
    Date {
        #[serde(default)]
        date: Option<DateRange>,
    },
    Email {
        #[serde(default)]
        email: Option<String>,
    },
    Files {
        #[serde(default)]
        files: Vec<FileReference>,
    },
    Formula {
        formula: FormulaValue,
    },
    LastEditedBy {
        last_edited_by: UserRef,
    },
    LastEditedTime {
        #[serde(default)]
        last_edited_time: String,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    People {
        #[serde(default)]
        people: Vec<UserRef>,
    },
    PhoneNumber {
        #[serde(default)]
        phone_number: Option<String>,
    },
    Relation {
        #[serde(default)]
        relation: Vec<RelationReference>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextItem>,
    },
    Rollup {
        rollup: RollupValue,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Status {
        #[serde(default)]
        status: Option<SelectOption>,
    },
    Title {
        #[serde(default)]
        title: Vec<RichTextItem>,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    pub fn is_title(&self) -> bool {
        matches!(self, PropertyValue::Title { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationReference {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: Option<FileUrl>,
    #[serde(default)]
    pub external: Option<FileUrl>,
}

impl FileReference {
    pub fn url(&self) -> &str {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    String {
        #[serde(default)]
        string: Option<String>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Boolean {
        #[serde(default)]
        boolean: Option<bool>,
    },
    Date {
        #[serde(default)]
        date: Option<DateRange>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupValue {
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Date {
        #[serde(default)]
        date: Option<DateRange>,
    },
    Array {
        #[serde(default, deserialize_with = "lenient_values")]
        array: Vec<PropertyValue>,
    },
    #[serde(other)]
    Unsupported,
}

/// A property name in a database schema and its declared type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
}

impl SchemaProperty {
    pub fn is_title(&self) -> bool {
        self.property_type == "title"
    }
}

fn parse_or_unsupported(name: &str, raw: serde_json::Value) -> PropertyValue {
    PropertyValue::deserialize(&raw).unwrap_or_else(|e| {
        log::warn!("Failed to parse property '{}': {}. Rendering it empty.", name, e);
        PropertyValue::Unsupported
    })
}

/// Deserializes a property map, degrading malformed values to `Unsupported`
/// instead of failing the whole page. Key order is preserved.
pub(crate) fn lenient_properties<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let parsed = parse_or_unsupported(&name, value);
            (name, parsed)
        })
        .collect())
}

fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| parse_or_unsupported("rollup item", value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "lenient_properties")]
        properties: IndexMap<String, PropertyValue>,
    }

    #[test]
    fn test_property_order_is_preserved() {
        let holder: Holder = serde_json::from_str(
            r#"{"properties": {
                "Zeta": {"id": "a", "type": "checkbox", "checkbox": true},
                "Alpha": {"id": "b", "type": "number", "number": 3},
                "Name": {"id": "title", "type": "title", "title": []}
            }}"#,
        )
        .unwrap();

        let names: Vec<&str> = holder.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Name"]);
        assert!(holder.properties["Name"].is_title());
    }

    #[test]
    fn test_malformed_and_unknown_values_degrade() {
        let holder: Holder = serde_json::from_value(json!({"properties": {
            "Broken": {"type": "select", "select": 42},
            "Verification": {"type": "verification", "verification": {"state": "verified"}}
        }}))
        .unwrap();

        assert_eq!(holder.properties["Broken"], PropertyValue::Unsupported);
        assert_eq!(holder.properties["Verification"], PropertyValue::Unsupported);
    }

    #[test]
    fn test_rollup_array_items() {
        let value: PropertyValue = serde_json::from_value(json!({
            "type": "rollup",
            "rollup": {
                "type": "array",
                "function": "show_original",
                "array": [
                    {"type": "number", "number": 2},
                    {"type": "title", "title": [{"type": "text", "text": {"content": "A"}, "plain_text": "A"}]}
                ]
            }
        }))
        .unwrap();

        match value {
            PropertyValue::Rollup {
                rollup: RollupValue::Array { array },
            } => assert_eq!(array.len(), 2),
            other => panic!("unexpected value {:?}", other),
        }
    }
}
