//! Prefix expansion for directory-shaped keys
//!
//! The store has no directories, so relocating or deleting a "directory"
//! means enumerating every concrete object key under its prefix first. No
//! operation ever targets a bare prefix as a storage primitive.

use crate::error::ValidationError;
use crate::traits::{ListRequest, ObjectStore};

/// Hard cap on resolved object keys per batch
pub const MAX_BATCH_KEYS: usize = 1000;

/// Hard cap on aggregate source size per batch (100 GiB)
pub const MAX_BATCH_BYTES: i64 = 100 * 1024 * 1024 * 1024;

/// Running totals for one batch, shared across all of its sources
///
/// Both caps are checked on every charge so expansion stops as soon as either
/// is exceeded, before the remaining pages are fetched.
#[derive(Debug, Default)]
pub struct BatchBudget {
    keys: usize,
    bytes: i64,
}

impl BatchBudget {
    /// Account for one more resolved object key of `size` bytes
    pub fn charge(&mut self, size: i64) -> Result<(), ValidationError> {
        self.keys += 1;
        self.bytes = self.bytes.saturating_add(size.max(0));
        if self.keys > MAX_BATCH_KEYS {
            return Err(ValidationError::TooManyFiles);
        }
        if self.bytes > MAX_BATCH_BYTES {
            return Err(ValidationError::FilesTooLarge);
        }
        Ok(())
    }

    /// Number of keys charged so far
    pub fn keys(&self) -> usize {
        self.keys
    }

    /// Aggregate bytes charged so far
    pub fn bytes(&self) -> i64 {
        self.bytes
    }
}

/// Expand a directory-shaped key into every concrete object key under it.
///
/// Pages through the full recursive listing (no delimiter) until the store's
/// continuation token is exhausted. The prefix's own marker object, if one
/// exists, is included: it relocates or deletes together with the directory.
pub async fn expand_prefix(
    store: &dyn ObjectStore,
    prefix: &str,
    budget: &mut BatchBudget,
) -> Result<Vec<String>, ValidationError> {
    let mut keys = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = store
            .list_objects(ListRequest {
                prefix: prefix.to_string(),
                delimiter: None,
                continuation_token: token.take(),
                max_keys: None,
            })
            .await?;

        for object in page.objects {
            budget.charge(object.size)?;
            keys.push(object.key);
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(keys)
}
