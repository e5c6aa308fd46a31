//! Shared fixtures for unit tests.

use serde_json::{json, Value};

use crate::schema::{FieldDescriptor, FieldType, Schema};

/// Schema for a small users collection.
pub(crate) fn users_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::new("id", FieldType::Uuid),
        FieldDescriptor::new("name", FieldType::String),
        FieldDescriptor::new("email", FieldType::String),
        FieldDescriptor::new("age", FieldType::Number),
        FieldDescriptor::new("role", FieldType::Enum).with_enum_values(["admin", "editor", "viewer"]),
        FieldDescriptor::new("isActive", FieldType::Boolean),
        FieldDescriptor::new("lastLogin", FieldType::Date),
        FieldDescriptor::new("createdAt", FieldType::Date).not_filterable(),
    ])
    .expect("users schema is well formed")
    .with_entity("users")
}

/// Three fixed users.
pub(crate) fn users() -> Vec<Value> {
    vec![
        json!({
            "id": "9b2f4c1e-8a3d-4f6b-9c2e-1d5a7b3c9e01",
            "name": "Alice Anderson",
            "email": "alice@example.com",
            "age": 34,
            "role": "admin",
            "isActive": true,
            "lastLogin": "2024-03-01T09:00:00Z",
            "createdAt": "2022-01-10"
        }),
        json!({
            "id": "4e7a1c2b-3d5f-4a8b-b6c9-0e2d4f6a8b02",
            "name": "Bob Brown",
            "email": "bob@example.org",
            "age": 28,
            "role": "editor",
            "isActive": true,
            "lastLogin": null,
            "createdAt": "2023-06-15"
        }),
        json!({
            "id": "1c3e5a7b-9d2f-4b6a-8c1e-3f5a7b9d2e03",
            "name": "Carol Clark",
            "email": "carol@example.com",
            "age": 45,
            "role": "viewer",
            "isActive": false,
            "lastLogin": "2023-11-20T17:45:00Z",
            "createdAt": "2021-09-01"
        }),
    ]
}
