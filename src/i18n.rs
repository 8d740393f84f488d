use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

pub mod keys {
    pub const LOADING: &str = "history.loading";
    pub const NO_HISTORY: &str = "history.noHistory";
    pub const LOAD_MORE: &str = "history.loadMore";
    pub const RECORD_CREATED: &str = "history.recordCreated";
    pub const RECORD_DELETED: &str = "history.recordDeleted";
    pub const FIELD_CREATED: &str = "history.fieldCreated";
    pub const FIELD_UPDATED: &str = "history.fieldUpdated";
    pub const BY: &str = "history.by";
    pub const UNKNOWN_USER: &str = "history.unknownUser";
}

const ENGLISH: &[(&str, &str)] = &[
    (keys::LOADING, "Loading history..."),
    (keys::NO_HISTORY, "No history yet"),
    (keys::LOAD_MORE, "Load more"),
    (keys::RECORD_CREATED, "Record created"),
    (keys::RECORD_DELETED, "Record deleted"),
    (keys::FIELD_CREATED, "set"),
    (keys::FIELD_UPDATED, "changed"),
    (keys::BY, "by"),
    (keys::UNKNOWN_USER, "Unknown user"),
];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read strings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid strings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("string for `{0}` must be text")]
    NotText(String),
}

/// Key to label lookup for every user-facing string in the history view.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    strings: HashMap<String, String>,
}

impl Catalog {
    pub fn english() -> Self {
        Self {
            strings: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Looks up `key`, answering with the key itself when no label exists.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Overlays labels from a TOML document on top of the current ones.
    /// Both `"history.loading" = "..."` and nested `[history]` tables are
    /// accepted.
    pub fn merge_toml(&mut self, content: &str) -> Result<(), CatalogError> {
        let table: toml::Table = toml::from_str(content)?;
        flatten_into(&mut self.strings, String::new(), table)
    }

    pub fn load_overrides(&mut self, path: &Path) -> Result<(), CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml(&content)?;
        tracing::info!("Loaded UI strings from {}", path.display());
        Ok(())
    }
}

fn flatten_into(
    out: &mut HashMap<String, String>,
    prefix: String,
    table: toml::Table,
) -> Result<(), CatalogError> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(s) => {
                out.insert(full_key, s);
            }
            toml::Value::Table(nested) => flatten_into(out, full_key, nested)?,
            _ => return Err(CatalogError::NotText(full_key)),
        }
    }
    Ok(())
}
