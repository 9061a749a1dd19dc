use anyhow::{bail, Result};

use super::open_store;
use crate::context::Context;
use crate::provision::{Initializer, SchemaStatus};
use crate::schema::SWA_SCHEMA;

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let store = open_store(ctx)?;
    let status = Initializer::new(&store, SWA_SCHEMA).verify()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", render(&status));
    }

    if !status.is_complete() {
        bail!(
            "database '{}' does not match the expected layout",
            status.database
        );
    }
    log::info!("✅ Database '{}' is fully provisioned", status.database);
    Ok(())
}

fn render(status: &SchemaStatus) -> String {
    let mut out = format!("database {}\n", status.database);
    for collection in &status.collections {
        let marker = if collection.exists { "ok" } else { "MISSING" };
        out.push_str(&format!("  {:<12} {}\n", collection.name, marker));
        for index in &collection.indexes {
            out.push_str(&format!("    {:<16} {}", index.name, index.state));
            if let Some(existing) = &index.existing {
                out.push_str(&format!(" (found {existing})"));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::{CollectionStatus, IndexStatus};

    #[test]
    fn render_marks_missing_and_conflicts() {
        let status = SchemaStatus {
            database: "swa_database".into(),
            collections: vec![
                CollectionStatus {
                    name: "users".into(),
                    exists: true,
                    indexes: vec![IndexStatus {
                        name: "username_1".into(),
                        state: "conflict",
                        existing: Some("username_1 { \"username\": 1 }".into()),
                    }],
                },
                CollectionStatus {
                    name: "slots".into(),
                    exists: false,
                    indexes: vec![IndexStatus {
                        name: "slot_id_1".into(),
                        state: "missing",
                        existing: None,
                    }],
                },
            ],
        };
        let text = render(&status);
        assert!(text.starts_with("database swa_database\n"));
        assert!(text.contains("users        ok"));
        assert!(text.contains("conflict (found username_1"));
        assert!(text.contains("slots        MISSING"));
        assert!(text.contains("slot_id_1        missing"));
    }
}
