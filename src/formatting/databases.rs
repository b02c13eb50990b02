// src/formatting/databases.rs
//! Table building for Notion databases.
//!
//! A database exports as its description followed by one Markdown table:
//! the title column first, then every other column in schema order, and
//! one row per query result.

use super::properties::render_property;
use crate::model::{DatabaseRecord, PageRecord};

/// Builder for the Markdown table of one database.
pub struct TableBuilder<'a> {
    database: &'a DatabaseRecord,
    entries: &'a [PageRecord],
}

impl<'a> TableBuilder<'a> {
    pub fn new(database: &'a DatabaseRecord, entries: &'a [PageRecord]) -> Self {
        Self { database, entries }
    }

    /// Column names in output order.
    pub fn columns(&self) -> Vec<&'a str> {
        let schema = &self.database.properties;
        let title = schema
            .iter()
            .find(|(_, property)| property.is_title())
            .map(|(name, _)| name.as_str());

        title
            .into_iter()
            .chain(
                schema
                    .iter()
                    .filter(|(name, _)| Some(name.as_str()) != title)
                    .map(|(name, _)| name.as_str()),
            )
            .collect()
    }

    /// Builds the document body: description, header, separator, rows.
    pub fn build(&self) -> String {
        let columns = self.columns();
        log::debug!(
            "Building table for database '{}' with {} columns and {} rows",
            self.database.title(),
            columns.len(),
            self.entries.len()
        );

        let mut out = format!("{}\n\n", self.database.description());
        out.push_str(&table_line(columns.iter().map(|name| escape_for_table(name))));
        out.push_str(&format!("|{}\n", "---|".repeat(columns.len())));

        for entry in self.entries {
            let cells = columns.iter().map(|name| {
                entry
                    .properties
                    .get(*name)
                    .map(|value| escape_for_table(&render_property(value)))
                    .unwrap_or_default()
            });
            out.push_str(&table_line(cells));
        }

        out
    }
}

fn table_line(cells: impl Iterator<Item = String>) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push_str(&cell);
        line.push('|');
    }
    line.push('\n');
    line
}

/// Escapes text so it can sit inside one Markdown table cell.
pub fn escape_for_table(text: &str) -> String {
    text.replace('|', "\\|")
        .replace('\n', "<br>")
        .replace('\r', "")
}
