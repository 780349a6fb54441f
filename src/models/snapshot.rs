use serde::Serialize;

use crate::models::entry::Entry;

/// Serializable view of an entry and its subtree, for hosts that render the
/// tree outside this process.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EntryDto {
    pub name: String,
    pub path: String,
    pub kind: String,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntryDto>,
}

impl From<&Entry> for EntryDto {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name().unwrap_or_default(),
            path: entry.path(),
            kind: entry.kind().as_str().to_string(),
            readonly: entry.readonly(),
            children: entry.children().iter().map(EntryDto::from).collect(),
        }
    }
}
