//! Depth-one directory listings
//!
//! Listing applies the `/` delimiter so only immediate children come back:
//! sub-prefixes as directory entries, objects as file entries. Shares the
//! expander's page loop against the store but never recurses.

use serde::Serialize;

use crate::error::Result;
use crate::key;
use crate::traits::{ListRequest, ObjectMeta, ObjectStore};

/// One row of a directory listing, either a file or a sub-directory
#[derive(Debug, Clone, Serialize)]
pub struct ListedEntry {
    /// Display name; directory names keep their trailing `/`
    pub name: String,

    /// Full object key or prefix
    pub key: String,

    /// Size in bytes (0 for directories)
    pub size: i64,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp (absent for directories)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

impl ListedEntry {
    /// Entry for a concrete object
    pub fn file(meta: ObjectMeta) -> Self {
        let name = key::basename_of(&meta.key).to_string();
        Self {
            name,
            size_human: Some(humansize::format_size(
                meta.size.max(0) as u64,
                humansize::BINARY,
            )),
            key: meta.key,
            size: meta.size,
            last_modified: meta.last_modified,
        }
    }

    /// Entry for a sub-prefix
    pub fn dir(prefix: String) -> Self {
        let name = key::basename_of(&prefix).to_string();
        Self {
            name,
            key: prefix,
            size: 0,
            size_human: None,
            last_modified: None,
        }
    }

    /// Whether this entry is a directory
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Result of listing one directory
#[derive(Debug, Serialize)]
pub struct DirListing {
    /// The listed path (empty string is the bucket root)
    pub path: String,

    /// Key of the containing directory
    pub parent: String,

    /// Entries, directories first, case-insensitive by name within each group
    pub files: Vec<ListedEntry>,

    /// True when the cap was hit before the listing was exhausted
    pub has_more: bool,
}

/// List the immediate children of `path`.
///
/// `limit <= 0` means unbounded. The listing stops as soon as `limit` entries
/// have been examined (it never pre-counts the full result), setting
/// `has_more`. With `dirs_only`, files are omitted from the result but still
/// count toward the cap. The marker object for `path` itself is excluded: it
/// is being browsed, so it belongs to the parent's listing.
pub async fn list_dir(
    store: &dyn ObjectStore,
    path: &str,
    limit: i64,
    dirs_only: bool,
) -> Result<DirListing> {
    let mut files: Vec<ListedEntry> = Vec::new();
    let mut examined = 0i64;
    let mut has_more = false;
    let mut token: Option<String> = None;

    'pages: loop {
        let page = store
            .list_objects(ListRequest {
                prefix: path.to_string(),
                delimiter: Some("/".to_string()),
                continuation_token: token.take(),
                max_keys: None,
            })
            .await?;

        for prefix in page.prefixes {
            files.push(ListedEntry::dir(prefix));
            examined += 1;
            if 0 < limit && limit <= examined {
                has_more = true;
                break 'pages;
            }
        }

        for object in page.objects {
            // a manually created folder appears as its own zero-byte object;
            // the marker for the directory being browsed is skipped entirely
            if object.key == path {
                continue;
            }
            if !dirs_only {
                files.push(ListedEntry::file(object));
            }
            examined += 1;
            if 0 < limit && limit <= examined {
                has_more = true;
                break 'pages;
            }
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    files.sort_by(|a, b| {
        (!a.is_dir(), a.name.to_lowercase()).cmp(&(!b.is_dir(), b.name.to_lowercase()))
    });

    Ok(DirListing {
        path: path.to_string(),
        parent: key::parent_of(path).to_string(),
        files,
        has_more,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry() {
        let entry = ListedEntry::file(ObjectMeta::new("docs/readme.md", 1024));
        assert_eq!(entry.name, "readme.md");
        assert_eq!(entry.key, "docs/readme.md");
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.size_human.as_deref(), Some("1 KiB"));
        assert!(!entry.is_dir());
    }

    #[test]
    fn test_dir_entry() {
        let entry = ListedEntry::dir("docs/images/".to_string());
        assert_eq!(entry.name, "images/");
        assert_eq!(entry.key, "docs/images/");
        assert_eq!(entry.size, 0);
        assert!(entry.size_human.is_none());
        assert!(entry.is_dir());
    }
}
