//! Schema Migration - Legacy Keys Rewritten Once, at Load
//!
//! Each migration targets one schema version and runs over every component
//! of a document older than that version. Renames never overwrite a value
//! already stored under the new key; the old key is always dropped.

use semver::Version;
use tracing::debug;

use crate::attributes::parse_flag;
use crate::components::EmailComponent;
use crate::project::LoadError;

pub const CURRENT_SCHEMA_VERSION: &str = "2.0.0";
pub const LEGACY_SCHEMA_VERSION: &str = "1.0.0";

struct Migration {
    to: &'static str,
    apply: fn(&mut EmailComponent),
}

const MIGRATIONS: &[Migration] = &[Migration {
    to: "2.0.0",
    apply: rename_v1_keys,
}];

pub fn parse_version(raw: &str) -> Result<Version, LoadError> {
    Version::parse(raw.trim()).map_err(|_| LoadError::InvalidSchemaVersion(raw.to_string()))
}

pub fn current_version() -> Version {
    Version::new(2, 0, 0)
}

/// Bring components from schema `from` up to the current schema.
///
/// Returns the version the components now conform to.
pub fn migrate_components(
    components: &mut [EmailComponent],
    from: &str,
) -> Result<Version, LoadError> {
    let from = parse_version(from)?;
    let current = current_version();
    if from > current {
        return Err(LoadError::UnsupportedSchemaVersion {
            found: from.to_string(),
            supported: current.to_string(),
        });
    }

    for migration in MIGRATIONS {
        let target = parse_version(migration.to)?;
        if target <= from || target > current {
            continue;
        }
        debug!(from = %from, to = %target, components = components.len(), "migrating document");
        components.iter_mut().for_each(migration.apply);
    }

    Ok(current)
}

fn rename(component: &mut EmailComponent, old: &str, new: &str) {
    if let Some(value) = component.data.remove(old) {
        component.data.entry(new.to_string()).or_insert(value);
    }
}

fn rename_v1_keys(component: &mut EmailComponent) {
    match component.component_type.as_str() {
        "header" | "text_block" => rename(component, "alignment", "textAlign"),
        "button" => {
            rename(component, "url", "link");
            rename(component, "bgColor", "backgroundColor");
            if let Some(full) = component.data.remove("fullWidth") {
                let width_type = if parse_flag(&full) == Some(true) { "full" } else { "auto" };
                component
                    .data
                    .entry("widthType".to_string())
                    .or_insert_with(|| width_type.to_string());
            }
        }
        "spacer" => rename(component, "transparent", "matchBackground"),
        "service_offer" => rename(component, "couponBorder", "couponShowBorder"),
        "sales_offer" => {
            for (old, kind) in [("stockNumber", "stock"), ("vin", "vin")] {
                if let Some(value) = component.data.remove(old) {
                    if !component.data.contains_key("stockVinValue") {
                        component.set("stockVinValue", value);
                        component.set("stockVinType", kind);
                    }
                }
            }
            rename(component, "imagePosition", "layout");
        }
        _ => {}
    }
}
