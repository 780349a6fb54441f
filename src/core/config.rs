use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::models::entry::{Entry, ItemKind};
use crate::models::hooks::Hooks;
use crate::services::search::SearchPriority;

/// Tree-wide settings a host can keep in a JSON file.
///
/// ```json
/// { "default_names": { "file": "untitled.txt" }, "case_sensitive_sort": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub default_names: DefaultNames,
    pub search_priority: SearchPriority,
    pub case_sensitive_sort: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultNames {
    pub folder: String,
    pub file: String,
    pub symlink: String,
}

impl Default for DefaultNames {
    fn default() -> Self {
        Self {
            folder: ItemKind::Folder.as_str().to_string(),
            file: ItemKind::File.as_str().to_string(),
            symlink: ItemKind::Symlink.as_str().to_string(),
        }
    }
}

impl DefaultNames {
    pub fn for_kind(&self, kind: ItemKind) -> &str {
        match kind {
            ItemKind::Folder => &self.folder,
            ItemKind::File => &self.file,
            ItemKind::Symlink => &self.symlink,
        }
    }
}

impl TreeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Root hooks carrying these settings.
    pub fn hooks(&self) -> Hooks {
        let names = self.default_names.clone();
        let mut hooks = Hooks::new()
            .with_default_name(move |kind| names.for_kind(kind).to_string())
            .with_search_priority(self.search_priority);
        if self.case_sensitive_sort {
            hooks = hooks.with_comparator(|a: &Entry, b: &Entry| a.name().cmp(&b.name()));
        }
        hooks
    }
}
