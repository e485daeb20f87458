//! Output formatters for migration results and stored schemas.

use automig_core::catalog::StoredSchema;
use automig_core::migration::MigrationOutcome;
use clap::ValueEnum;
use comfy_table::{Cell, Table};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format the outcome of a migration run.
    fn format_outcome(&self, outcome: &MigrationOutcome) -> String;

    /// Format a stored schema.
    fn format_schema(&self, schema: &StoredSchema) -> String;

    /// Format the list of persisted versions.
    fn format_versions(&self, current: u64, versions: &[u64]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_outcome(&self, outcome: &MigrationOutcome) -> String {
        let status = if outcome.persisted {
            format!(
                "schema version {} -> {}",
                outcome.from_version, outcome.to_version
            )
        } else if outcome.report.is_empty() {
            format!("schema version {} is up to date", outcome.from_version)
        } else {
            format!("schema version {} (dry run, not persisted)", outcome.from_version)
        };

        if outcome.report.is_empty() {
            return status;
        }

        let mut table = Table::new();
        table.set_header(vec!["#", "Entity", "Field", "Edit"]);
        for (i, edit) in outcome.report.edits.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(edit.entity_name()),
                Cell::new(edit.field_name().unwrap_or("")),
                Cell::new(edit),
            ]);
        }

        format!("{}\n{}\n{} edit(s)", status, table, outcome.report.len())
    }

    fn format_schema(&self, schema: &StoredSchema) -> String {
        if schema.entities.is_empty() {
            return format!("schema version {} has no entities", schema.version);
        }

        let mut output = format!("schema version {}", schema.version);
        for entity in schema.entities.values() {
            let mut table = Table::new();
            table.set_header(vec!["Field", "Type", "Nullable", "Indexed", "Primary key"]);
            for field in &entity.fields {
                table.add_row(vec![
                    Cell::new(&field.name),
                    Cell::new(&field.stored_type),
                    Cell::new(yes_no(field.nullable)),
                    Cell::new(yes_no(field.indexed)),
                    Cell::new(yes_no(entity.is_primary_key(&field.name))),
                ]);
            }
            output.push_str(&format!("\n\n{}\n{}", entity.name, table));
        }
        output
    }

    fn format_versions(&self, current: u64, versions: &[u64]) -> String {
        if versions.is_empty() {
            return "No schema versions".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Version", "Current"]);
        for version in versions {
            let marker = if *version == current { "*" } else { "" };
            table.add_row(vec![Cell::new(version), Cell::new(marker)]);
        }
        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_outcome(&self, outcome: &MigrationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_schema(&self, schema: &StoredSchema) -> String {
        serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_versions(&self, current: u64, versions: &[u64]) -> String {
        serde_json::json!({
            "current": current,
            "versions": versions,
        })
        .to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automig_core::catalog::{ScalarType, StoredEntity, StoredField};
    use automig_core::migration::{SchemaEdit, SyncReport};

    fn outcome(persisted: bool, edits: Vec<SchemaEdit>) -> MigrationOutcome {
        MigrationOutcome {
            from_version: 1,
            to_version: if persisted { 2 } else { 1 },
            persisted,
            report: SyncReport { edits },
        }
    }

    #[test]
    fn test_table_outcome() {
        let out = TableFormatter.format_outcome(&outcome(
            true,
            vec![SchemaEdit::CreateEntity {
                entity: "Dog".into(),
            }],
        ));
        assert!(out.starts_with("schema version 1 -> 2"));
        assert!(out.contains("create entity Dog"));
        assert!(out.ends_with("1 edit(s)"));

        let out = TableFormatter.format_outcome(&outcome(false, Vec::new()));
        assert_eq!(out, "schema version 1 is up to date");
    }

    #[test]
    fn test_table_schema() {
        let schema = StoredSchema::new(4).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("id", ScalarType::Int64, false))
                .with_primary_key("id"),
        );
        let out = TableFormatter.format_schema(&schema);
        assert!(out.starts_with("schema version 4"));
        assert!(out.contains("Cat"));
        assert!(out.contains("int64"));
    }

    #[test]
    fn test_json_outcome() {
        let out = JsonFormatter.format_outcome(&outcome(
            true,
            vec![SchemaEdit::AddIndex {
                entity: "Cat".into(),
                field: "name".into(),
            }],
        ));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["to_version"], 2);
        assert_eq!(value["report"]["edits"][0]["edit"], "add_index");
    }

    #[test]
    fn test_json_versions() {
        let out = JsonFormatter.format_versions(2, &[1, 2]);
        assert_eq!(out, r#"{"current":2,"versions":[1,2]}"#);
    }
}
