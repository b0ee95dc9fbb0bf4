use crate::model::MigrationType;
use serde_json::json;

/// Starting point for a common migration
#[derive(Debug, Clone)]
pub struct MigrationTemplate {
    pub name: &'static str,
    pub migration_type: MigrationType,
    pub description: &'static str,
    config: serde_json::Value,
}

impl MigrationTemplate {
    /// Config as accepted by `MigrationRegistry::create`
    pub fn config_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap_or_else(|_| self.config.to_string())
    }
}

/// Built-in templates, one per migration type
pub fn all() -> Vec<MigrationTemplate> {
    vec![
        MigrationTemplate {
            name: "Create Users Collection",
            migration_type: MigrationType::CreateCollection,
            description: "Create a new users collection with basic schema",
            config: json!({
                "collection": "users",
                "schema": {
                    "name": "string",
                    "email": "string",
                    "createdAt": "date"
                }
            }),
        },
        MigrationTemplate {
            name: "Add Email Field",
            migration_type: MigrationType::AddField,
            description: "Add an email field to existing collection",
            config: json!({
                "collection": "users",
                "field": "email",
                "type": "string",
                "required": true,
                "unique": true
            }),
        },
        MigrationTemplate {
            name: "Remove Deprecated Field",
            migration_type: MigrationType::RemoveField,
            description: "Remove a deprecated field from collection",
            config: json!({
                "collection": "users",
                "field": "oldField"
            }),
        },
        MigrationTemplate {
            name: "Rename Field",
            migration_type: MigrationType::RenameField,
            description: "Rename a field in existing collection",
            config: json!({
                "collection": "users",
                "oldName": "username",
                "newName": "displayName"
            }),
        },
        MigrationTemplate {
            name: "Create Email Index",
            migration_type: MigrationType::CreateIndex,
            description: "Create an index on email field for faster queries",
            config: json!({
                "collection": "users",
                "field": "email",
                "unique": true,
                "sparse": false
            }),
        },
    ]
}

/// Look up a template by display name (case-insensitive) or migration type
pub fn find(key: &str) -> Option<MigrationTemplate> {
    let key = key.trim();
    let by_type = key.parse::<MigrationType>().ok();

    all().into_iter().find(|t| {
        t.name.eq_ignore_ascii_case(key) || Some(t.migration_type) == by_type
    })
}
