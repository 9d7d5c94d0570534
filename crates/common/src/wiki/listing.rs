use chrono::{DateTime, Utc};
use object_store::{KeyValueStore, ListMode, Listing, StoreError};
use serde::{Deserialize, Serialize};

use super::path::{normalize_dir, DIRECTORY_MARKER};

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Full key; directories keep their trailing `/`
    pub key: String,
    pub name: String,
    pub is_file: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Immediate children of `prefix`: sub-directories first, then files, each
/// group in lexical order. Directory markers are hidden.
pub async fn list_children(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> Result<Vec<ListingEntry>, StoreError> {
    let prefix = normalize_dir(prefix);
    let listing = store.list(&prefix, ListMode::Delimited).await?;
    Ok(entries_from_listing(&prefix, listing))
}

pub fn entries_from_listing(prefix: &str, listing: Listing) -> Vec<ListingEntry> {
    let mut entries = Vec::with_capacity(listing.items.len() + listing.common_prefixes.len());

    for dir in listing.common_prefixes {
        let name = dir
            .strip_prefix(prefix)
            .unwrap_or(&dir)
            .trim_end_matches('/')
            .to_string();
        if name.is_empty() {
            continue;
        }
        entries.push(ListingEntry {
            key: dir,
            name,
            is_file: false,
            size: None,
            last_modified: None,
        });
    }

    for item in listing.items {
        let name = item.key.strip_prefix(prefix).unwrap_or(&item.key);
        if name.is_empty() || name == DIRECTORY_MARKER {
            continue;
        }
        entries.push(ListingEntry {
            name: name.to_string(),
            key: item.key,
            is_file: true,
            size: Some(item.size),
            last_modified: Some(item.last_modified),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use object_store::ObjectInfo;

    use super::*;

    fn item(key: &str, size: u64) -> ObjectInfo {
        ObjectInfo {
            key: key.to_string(),
            size,
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn test_entries_from_listing() {
        let listing = Listing {
            items: vec![
                item("users/alice/.keep", 0),
                item("users/alice/a.md", 5),
                item("users/alice/b.md", 7),
            ],
            common_prefixes: vec!["users/alice/notes/".to_string()],
        };

        let entries = entries_from_listing("users/alice/", listing);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["notes", "a.md", "b.md"]);

        assert!(!entries[0].is_file);
        assert_eq!(entries[0].key, "users/alice/notes/");
        assert_eq!(entries[0].size, None);

        assert!(entries[1].is_file);
        assert_eq!(entries[1].key, "users/alice/a.md");
        assert_eq!(entries[1].size, Some(5));
    }

    #[test]
    fn test_entries_serialize_without_empty_fields() {
        let entries = entries_from_listing(
            "users/alice/",
            Listing {
                items: vec![],
                common_prefixes: vec!["users/alice/notes/".to_string()],
            },
        );
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "users/alice/notes/",
                "name": "notes",
                "is_file": false,
            })
        );
    }

    #[test]
    fn test_marker_only_directory_lists_empty() {
        let listing = Listing {
            items: vec![item("users/alice/empty/.keep", 0)],
            common_prefixes: vec![],
        };
        assert!(entries_from_listing("users/alice/empty/", listing).is_empty());
    }
}
