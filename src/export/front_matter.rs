// src/export/front_matter.rs
//! The header placed above every exported document.

use crate::model::PageMeta;

/// Builds the header of one document, ending with its `# title` line.
///
/// With `extract_metadata` the header opens with a YAML block. Database
/// entries always list their rendered properties as `name: value` lines.
pub fn compose_front_matter(meta: &PageMeta, path: &str, extract_metadata: bool) -> String {
    let mut out = String::new();

    if extract_metadata {
        out.push_str("---\n");
        out.push_str(&format!("title: {}\n", meta.title));
        // Quoted so colons in titles stay valid YAML
        out.push_str(&format!("path: \"{}\"\n", path));
        out.push_str(&format!("url: {}\n", meta.url));
        out.push_str(&format!("created_by: {}\n", meta.created_by));
        out.push_str(&format!("last_edited_by: {}\n", meta.last_edited_by));
        out.push_str(&format!("last_edited_time: {}\n", meta.last_edited_time));
        out.push_str("---\n\n");
    }

    if let Some(properties) = &meta.properties {
        for (name, value) in properties {
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out.push('\n');
    }

    out.push_str(&format!("# {}", meta.title));
    out
}

/// Joins a header and a body into the final document text.
pub fn compose_document(front_matter: &str, body: &str) -> String {
    format!("{}\n{}", front_matter, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotionId;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn meta() -> PageMeta {
        PageMeta {
            id: NotionId::from("11111111-1111-1111-1111-111111111111"),
            title: "Q3: Plan".to_string(),
            url: "https://www.notion.so/Q3-Plan-11111111111111111111111111111111".to_string(),
            created_by: "Ada".to_string(),
            last_edited_by: "Grace".to_string(),
            last_edited_time: "2024-05-01T10:00:00.000Z".to_string(),
            parent_id: None,
            properties: None,
        }
    }

    #[test]
    fn test_title_only_without_metadata() {
        assert_eq!(compose_front_matter(&meta(), "Q3: Plan", false), "# Q3: Plan");
    }

    #[test]
    fn test_yaml_header() {
        assert_eq!(
            compose_front_matter(&meta(), "Team / Q3: Plan", true),
            "---\n\
             title: Q3: Plan\n\
             path: \"Team / Q3: Plan\"\n\
             url: https://www.notion.so/Q3-Plan-11111111111111111111111111111111\n\
             created_by: Ada\n\
             last_edited_by: Grace\n\
             last_edited_time: 2024-05-01T10:00:00.000Z\n\
             ---\n\
             \n\
             # Q3: Plan"
        );
    }

    #[test]
    fn test_entry_properties_follow_header() {
        let mut properties = IndexMap::new();
        properties.insert("Status".to_string(), "Done".to_string());
        properties.insert("Owner".to_string(), "Ada".to_string());
        let entry = PageMeta {
            properties: Some(properties),
            ..meta()
        };

        let header = compose_front_matter(&entry, "Q3: Plan", false);
        assert_eq!(header, "Status: Done\nOwner: Ada\n\n# Q3: Plan");
        assert_eq!(
            compose_document(&header, "body"),
            "Status: Done\nOwner: Ada\n\n# Q3: Plan\nbody"
        );
    }
}
