//! Static field descriptions that drive validation.
//!
//! A [`Schema`] is an ordered set of [`FieldDescriptor`]s with unique names.
//! It is supplied once when an engine is built and never changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::error::SchemaError;
use crate::filter::Operator;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Uuid,
}

impl FieldType {
    /// Returns the lowercase name used in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Enum => "enum",
            FieldType::Uuid => "uuid",
        }
    }

    /// Operators permitted for this type when a field declares no explicit list.
    pub fn default_operators(&self) -> &'static [Operator] {
        use Operator::*;

        match self {
            FieldType::String => &[
                Eq, Neq, Contains, StartsWith, EndsWith, In, IsNull, IsNotNull,
            ],
            FieldType::Number => &[Eq, Neq, Gt, Lt, Gte, Lte, Between, In, IsNull, IsNotNull],
            FieldType::Date => &[Eq, Neq, Gt, Lt, Gte, Lte, Between, IsNull, IsNotNull],
            FieldType::Boolean => &[Eq, Neq, IsNull, IsNotNull],
            FieldType::Enum | FieldType::Uuid => &[Eq, Neq, In, IsNull, IsNotNull],
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of a single filterable (or deliberately hidden) field.
///
/// # Example
///
/// ```
/// use sieve_core::{FieldDescriptor, FieldType, Operator};
///
/// let role = FieldDescriptor::new("role", FieldType::Enum)
///     .with_enum_values(["admin", "editor", "viewer"]);
/// assert!(role.permits(Operator::In));
/// assert!(!role.permits(Operator::Gt));
///
/// let created = FieldDescriptor::new("createdAt", FieldType::Date).not_filterable();
/// assert!(!created.filterable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in filters and records.
    pub name: String,

    /// Declared value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether filters may reference this field at all.
    #[serde(default = "filterable_by_default")]
    pub filterable: bool,

    /// Explicit operator whitelist, replacing the type's default set.
    #[serde(
        default,
        alias = "allowedOperators",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_operators: Option<Vec<Operator>>,

    /// Permitted values for `enum` fields.
    #[serde(default, alias = "enumValues", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

fn filterable_by_default() -> bool {
    true
}

impl FieldDescriptor {
    /// Creates a filterable field using the type's default operators.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            filterable: true,
            allowed_operators: None,
            enum_values: None,
        }
    }

    /// Marks the field as not filterable.
    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    /// Restricts the field to an explicit set of operators.
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.allowed_operators = Some(operators.into_iter().collect());
        self
    }

    /// Declares the permitted values of an `enum` field.
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// The operators this field accepts.
    pub fn operators(&self) -> &[Operator] {
        match &self.allowed_operators {
            Some(operators) => operators,
            None => self.field_type.default_operators(),
        }
    }

    /// Returns true if `operator` may be used with this field.
    pub fn permits(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

/// On-disk shape of a schema, before uniqueness is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Optional name of the entity the schema describes (e.g. "users").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Field descriptors in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// The set of field descriptors for one entity.
///
/// Field names are unique; declaration order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDefinition", into = "SchemaDefinition")]
pub struct Schema {
    entity: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Builds a schema, rejecting empty, reserved or duplicate field names.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateField` if two descriptors share a name,
    /// `SchemaError::EmptyFieldName` for a blank name,
    /// `SchemaError::ReservedFieldName` for a name starting with `$`, and
    /// `SchemaError::UnexpectedEnumValues` when a non-enum field lists values.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        for (i, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if field.name.starts_with('$') {
                return Err(SchemaError::ReservedFieldName {
                    name: field.name.clone(),
                });
            }
            if fields[..i].iter().any(|other| other.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if field.enum_values.is_some() && field.field_type != FieldType::Enum {
                return Err(SchemaError::UnexpectedEnumValues {
                    name: field.name.clone(),
                    field_type: field.field_type.to_string(),
                });
            }
        }

        Ok(Self {
            entity: None,
            fields,
        })
    }

    /// Sets the entity name.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// The entity name, if one was declared.
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Looks up a descriptor by exact field name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds the filterable field name closest to `name`.
    ///
    /// Returns `None` for exact matches and when nothing is within the
    /// suggestion distance.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let query = name.to_lowercase();

        let (best, distance) = self
            .fields
            .iter()
            .filter(|f| f.filterable)
            .map(|f| (f.name.as_str(), levenshtein(&query, &f.name.to_lowercase())))
            .min_by_key(|(_, d)| *d)?;

        if best != name && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best)
        } else {
            None
        }
    }
}

impl TryFrom<SchemaDefinition> for Schema {
    type Error = SchemaError;

    fn try_from(definition: SchemaDefinition) -> Result<Self, Self::Error> {
        let schema = Schema::new(definition.fields)?;
        Ok(match definition.entity {
            Some(entity) => schema.with_entity(entity),
            None => schema,
        })
    }
}

impl From<Schema> for SchemaDefinition {
    fn from(schema: Schema) -> Self {
        Self {
            entity: schema.entity,
            fields: schema.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::users_schema;

    #[test]
    fn test_default_operators_by_type() {
        assert!(FieldType::String.default_operators().contains(&Operator::Contains));
        assert!(!FieldType::String.default_operators().contains(&Operator::Gt));
        assert!(FieldType::Number.default_operators().contains(&Operator::In));
        assert!(FieldType::Number.default_operators().contains(&Operator::Between));
        assert!(!FieldType::Date.default_operators().contains(&Operator::In));
        assert!(FieldType::Date.default_operators().contains(&Operator::Between));
        assert_eq!(FieldType::Boolean.default_operators().len(), 4);
        assert_eq!(
            FieldType::Enum.default_operators(),
            FieldType::Uuid.default_operators()
        );
    }

    #[test]
    fn test_explicit_operators_replace_defaults() {
        let field = FieldDescriptor::new("name", FieldType::String)
            .with_operators([Operator::Eq, Operator::StartsWith]);

        assert!(field.permits(Operator::StartsWith));
        assert!(!field.permits(Operator::Contains));
        assert_eq!(field.operators(), &[Operator::Eq, Operator::StartsWith]);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::new(vec![
            FieldDescriptor::new("age", FieldType::Number),
            FieldDescriptor::new("age", FieldType::String),
        ]);

        assert_eq!(
            result,
            Err(SchemaError::DuplicateField {
                name: "age".to_string()
            })
        );
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let result = Schema::new(vec![FieldDescriptor::new("  ", FieldType::Number)]);
        assert_eq!(result, Err(SchemaError::EmptyFieldName));
    }

    #[test]
    fn test_operator_like_field_name_rejected() {
        let result = Schema::new(vec![
            FieldDescriptor::new("age", FieldType::Number),
            FieldDescriptor::new("$where", FieldType::String),
        ]);

        assert_eq!(
            result,
            Err(SchemaError::ReservedFieldName {
                name: "$where".to_string()
            })
        );
    }

    #[test]
    fn test_dollar_inside_field_name_allowed() {
        assert!(Schema::new(vec![FieldDescriptor::new("price$", FieldType::Number)]).is_ok());
    }

    #[test]
    fn test_enum_values_on_non_enum_rejected() {
        let result = Schema::new(vec![
            FieldDescriptor::new("age", FieldType::Number).with_enum_values(["1"])
        ]);
        assert!(matches!(
            result,
            Err(SchemaError::UnexpectedEnumValues { .. })
        ));
    }

    #[test]
    fn test_field_lookup_preserves_order() {
        let schema = users_schema();

        assert_eq!(schema.fields()[0].name, "id");
        assert_eq!(schema.field("age").map(|f| f.field_type), Some(FieldType::Number));
        assert!(schema.field("Age").is_none());
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_suggest_close_field_name() {
        let schema = users_schema();

        assert_eq!(schema.suggest("agee"), Some("age"));
        assert_eq!(schema.suggest("isactive"), Some("isActive"));
        assert_eq!(schema.suggest("age"), None);
        assert_eq!(schema.suggest("completely_unrelated"), None);
    }

    #[test]
    fn test_suggest_skips_hidden_fields() {
        let schema = users_schema();
        // createdAt exists but is not filterable.
        assert_eq!(schema.suggest("createdAtt"), None);
    }

    #[test]
    fn test_schema_deserializes_from_json() {
        let json = r#"{
            "entity": "users",
            "fields": [
                {"name": "age", "type": "number", "filterable": true},
                {"name": "role", "type": "enum", "filterable": true,
                 "enumValues": ["admin", "viewer"], "allowedOperators": ["eq", "in"]}
            ]
        }"#;

        let schema: Schema = serde_json::from_str(json).unwrap();

        assert_eq!(schema.entity(), Some("users"));
        assert_eq!(schema.len(), 2);
        let role = schema.field("role").unwrap();
        assert_eq!(role.operators(), &[Operator::Eq, Operator::In]);
        assert_eq!(
            role.enum_values.as_deref(),
            Some(&["admin".to_string(), "viewer".to_string()][..])
        );
    }

    #[test]
    fn test_schema_deserialize_rejects_duplicates() {
        let json = r#"{"fields": [
            {"name": "age", "type": "number", "filterable": true},
            {"name": "age", "type": "number", "filterable": false}
        ]}"#;

        let err = serde_json::from_str::<Schema>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate field in schema: age"));
    }

    #[test]
    fn test_filterable_defaults_to_true() {
        let field: FieldDescriptor =
            serde_json::from_str(r#"{"name": "age", "type": "number"}"#).unwrap();
        assert!(field.filterable);
    }
}
