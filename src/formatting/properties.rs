// src/formatting/properties.rs
//! Type-specific formatting of page property values.

use super::rich_text::render_rich_text;
use crate::constants::{NOTION_LINK_HOST, UNKNOWN_USER};
use crate::model::{DateRange, FormulaValue, PropertyValue, RollupValue, SelectOption, UserRef};
use crate::types::{first_plain_text, NotionId};

/// Formats a property value into the string shown in tables and front matter.
pub fn render_property(value: &PropertyValue) -> String {
    use PropertyValue::*;

    match value {
        Title { title } => first_plain_text(title),
        RichText { rich_text } => render_rich_text(rich_text),
        Checkbox { checkbox } => (if *checkbox { "[x]" } else { "[ ]" }).to_string(),
        CreatedBy { created_by } => user_name(created_by),
        LastEditedBy { last_edited_by } => user_name(last_edited_by),
        CreatedTime { created_time } => created_time.clone(),
        LastEditedTime { last_edited_time } => last_edited_time.clone(),
        Date { date } => format_date(date.as_ref()),
        Email { email } => email.clone().unwrap_or_default(),
        PhoneNumber { phone_number } => phone_number.clone().unwrap_or_default(),
        Url { url } => url.clone().unwrap_or_default(),
        Files { files } => files
            .iter()
            .map(|file| format!("[{}]({})", file.name, file.url()))
            .collect::<Vec<_>>()
            .join(", "),
        Formula { formula } => format_formula(formula),
        MultiSelect { multi_select } => multi_select
            .iter()
            .map(|option| option.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        Number { number } => format_number(*number),
        People { people } => people.iter().map(user_name).collect::<Vec<_>>().join(", "),
        Relation { relation } => relation
            .iter()
            .map(|reference| {
                let id = NotionId::from(reference.id.as_str());
                format!("{}/{}", NOTION_LINK_HOST, id.to_compact())
            })
            .collect::<Vec<_>>()
            .join(", "),
        Rollup { rollup } => format_rollup(rollup),
        Select { select } => option_name(select.as_ref()),
        Status { status } => option_name(status.as_ref()),
        Unsupported => String::new(),
    }
}

fn user_name(user: &UserRef) -> String {
    user.name.clone().unwrap_or_else(|| UNKNOWN_USER.to_string())
}

fn option_name(option: Option<&SelectOption>) -> String {
    option.map(|o| o.name.clone()).unwrap_or_default()
}

fn format_date(date: Option<&DateRange>) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let start = date.start.clone().unwrap_or_default();
    match &date.end {
        Some(end) => format!("{} - {}", start, end),
        None => start,
    }
}

/// Integral numbers print without a fractional part.
fn format_number(number: Option<f64>) -> String {
    match number {
        Some(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
            format!("{}", n as i64)
        }
        Some(n) => n.to_string(),
        None => String::new(),
    }
}

fn format_formula(formula: &FormulaValue) -> String {
    match formula {
        FormulaValue::String { string } => string.clone().unwrap_or_default(),
        FormulaValue::Number { number } => format_number(*number),
        FormulaValue::Boolean { boolean } => boolean.map(|b| b.to_string()).unwrap_or_default(),
        FormulaValue::Date { date } => format_date(date.as_ref()),
        FormulaValue::Unsupported => String::new(),
    }
}

fn format_rollup(rollup: &RollupValue) -> String {
    match rollup {
        RollupValue::Number { number } => format_number(*number),
        RollupValue::Date { date } => format_date(date.as_ref()),
        RollupValue::Array { array } => array
            .iter()
            .map(render_property)
            .collect::<Vec<_>>()
            .join(", "),
        RollupValue::Unsupported => String::new(),
    }
}
