//! Schema output formatting.

use owo_colors::OwoColorize;
use sieve_core::{Operator, Schema};

use super::helpers::{push_header, to_json, truncate_str};

/// Formats a schema as JSON, in the same shape schema files use.
pub fn format_schema_json(schema: &Schema, pretty: bool) -> Result<String, serde_json::Error> {
    to_json(schema, pretty)
}

/// Formats a schema as a table of fields.
pub fn format_schema_table(schema: &Schema, use_colors: bool) -> String {
    let mut output = String::new();

    let title = match schema.entity() {
        Some(entity) => format!("Schema: {entity}"),
        None => "Schema".to_string(),
    };
    if use_colors {
        output.push_str(&format!("{}\n\n", title.green().bold()));
    } else {
        output.push_str(&format!("{title}\n\n"));
    }

    if schema.is_empty() {
        output.push_str("No fields declared.\n");
        return output;
    }

    // Header
    let header = format!("{:<20} {:<8} {:<7} {}", "Field", "Type", "Filter", "Operators");
    push_header(&mut output, &header, use_colors);

    for field in schema.fields() {
        let filterable = if field.filterable { "yes" } else { "no" };
        let operators = if field.filterable {
            field
                .operators()
                .iter()
                .map(Operator::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "-".to_string()
        };

        let line = format!(
            "{:<20} {:<8} {:<7} {}",
            truncate_str(&field.name, 20),
            field.field_type.as_str(),
            filterable,
            operators
        );
        output.push_str(&line);
        output.push('\n');

        if let Some(ref values) = field.enum_values {
            output.push_str(&format!("{:<20} values: {}\n", "", values.join(", ")));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_core::{FieldDescriptor, FieldType};

    fn schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::new("age", FieldType::Number)
                .with_operators([Operator::Eq, Operator::Gt]),
            FieldDescriptor::new("role", FieldType::Enum).with_enum_values(["admin", "viewer"]),
            FieldDescriptor::new("createdAt", FieldType::Date).not_filterable(),
        ])
        .unwrap()
        .with_entity("users")
    }

    #[test]
    fn test_format_schema_table() {
        let output = format_schema_table(&schema(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Schema: users");
        assert!(lines[2].starts_with("Field"));
        assert_eq!(lines[3], format!("{:<20} {:<8} {:<7} {}", "age", "number", "yes", "eq, gt"));
        assert!(lines[4].starts_with("role"));
        assert_eq!(lines[5].trim_start(), "values: admin, viewer");
        assert_eq!(lines[6], format!("{:<20} {:<8} {:<7} {}", "createdAt", "date", "no", "-"));
    }

    #[test]
    fn test_format_schema_table_empty() {
        let output = format_schema_table(&Schema::default(), false);
        assert_eq!(output, "Schema\n\nNo fields declared.\n");
    }

    #[test]
    fn test_format_schema_json_uses_file_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&format_schema_json(&schema(), true).unwrap()).unwrap();

        assert_eq!(json["entity"], "users");
        assert_eq!(json["fields"][0]["name"], "age");
        assert_eq!(json["fields"][0]["type"], "number");
        assert_eq!(json["fields"][2]["filterable"], false);
    }
}
