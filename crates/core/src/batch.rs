//! Batch relocation engine: validation and concurrent execution
//!
//! A batch turns user-supplied source keys plus a target directory (or
//! explicit target keys) into a validated, conflict-free set of per-object
//! copy or move operations. Validation performs no mutations and rejects the
//! whole batch on any conflict; execution runs the resolved pairs
//! concurrently and reports failures per pair without aborting siblings.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{Error, ValidationError};
use crate::expand::{expand_prefix, BatchBudget};
use crate::key;
use crate::traits::ObjectStore;

/// A resolved (source, target) pair ready for execution
///
/// Both keys are concrete; source and target agree on directory-shapedness
/// (marker objects relocate as marker objects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPair {
    /// Concrete source key
    pub source: String,
    /// Concrete target key
    pub target: String,
}

/// Per-pair failure record, part of the batch response
#[derive(Debug, Clone, Serialize)]
pub struct FailedPair {
    /// Source key of the failed pair
    pub src: String,
    /// Target key of the failed pair
    pub tgt: String,
    /// Failure text
    pub err: String,
}

/// Aggregate outcome of one executed batch
///
/// Success is per pair: a pair absent from `failed` was applied. An empty
/// list means the whole batch succeeded.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Failed pairs in submission order
    pub failed: Vec<FailedPair>,
}

impl BatchOutcome {
    /// Whether every pair was applied
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// How a resolved pair is applied to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationMode {
    /// Server-side copy, source left in place
    Copy,
    /// Copy, verify the target landed, then delete the source
    Move,
}

/// Normalize delete sources into a flat list of concrete object keys.
///
/// Directory-shaped keys expand recursively; plain keys are confirmed to
/// exist via a metadata fetch. The shared budget bounds the whole batch.
pub async fn validate_sources(
    store: &dyn ObjectStore,
    sources: &[String],
) -> Result<Vec<String>, ValidationError> {
    let mut budget = BatchBudget::default();
    let mut resolved = Vec::new();

    for source in sources {
        if key::is_dir_key(source) {
            resolved.extend(expand_prefix(store, source, &mut budget).await?);
        } else {
            let meta = match store.head_object(source).await {
                Ok(meta) => meta,
                Err(Error::NotFound(_)) => {
                    return Err(ValidationError::SourceNotFound(source.clone()))
                }
                Err(e) => return Err(e.into()),
            };
            budget.charge(meta.size)?;
            resolved.push(source.clone());
        }
    }

    Ok(resolved)
}

/// Validate and resolve (source, target) pairs for copy or move.
///
/// Directory sources expand recursively, each contained key rebased onto the
/// target prefix. The returned pairs are deduplicated (source == target is a
/// legal no-op and is dropped) and conflict-free: no duplicate targets, no
/// key that is both read and written within the batch, and no silent
/// overwrite of an untouched object unless `allow_overwrite` is set.
pub async fn validate_pairs(
    store: &dyn ObjectStore,
    sources: &[String],
    targets: &[String],
    allow_overwrite: bool,
) -> Result<Vec<RelocationPair>, ValidationError> {
    if sources.len() != targets.len() {
        return Err(ValidationError::LengthMismatch);
    }

    let mut budget = BatchBudget::default();
    let mut resolved_sources: Vec<String> = Vec::new();
    let mut resolved_targets: Vec<String> = Vec::new();

    for (source, target) in sources.iter().zip(targets) {
        if key::is_dir_key(source) {
            if !key::is_dir_key(target) {
                return Err(ValidationError::DirToFile);
            }
            // A target inside its own source prefix would make execution
            // write under keys sibling operations are reading; pair order is
            // unspecified, so reject up front.
            if target != source && target.starts_with(source.as_str()) {
                return Err(ValidationError::SourceOverlapsTarget);
            }
            for object_key in expand_prefix(store, source, &mut budget).await? {
                resolved_targets.push(key::rebase_key(&object_key, source, target));
                resolved_sources.push(object_key);
            }
        } else {
            let meta = match store.head_object(source).await {
                Ok(meta) => meta,
                Err(Error::NotFound(_)) => {
                    return Err(ValidationError::SourceNotFound(source.clone()))
                }
                Err(e) => return Err(e.into()),
            };
            if key::is_dir_key(target) {
                return Err(ValidationError::FileToDir);
            }
            budget.charge(meta.size)?;
            resolved_sources.push(source.clone());
            resolved_targets.push(target.clone());
        }
    }

    let unique: HashSet<&String> = resolved_targets.iter().collect();
    if unique.len() != resolved_targets.len() {
        return Err(ValidationError::DuplicatedTarget);
    }

    // Equal source and target is a no-op, not an error.
    let pairs: Vec<RelocationPair> = resolved_sources
        .into_iter()
        .zip(resolved_targets)
        .filter(|(source, target)| source != target)
        .map(|(source, target)| RelocationPair { source, target })
        .collect();

    let source_set: HashSet<&str> = pairs.iter().map(|p| p.source.as_str()).collect();
    if pairs.iter().any(|p| source_set.contains(p.target.as_str())) {
        return Err(ValidationError::SourceOverlapsTarget);
    }

    if !allow_overwrite {
        for pair in &pairs {
            if store.object_exists(&pair.target).await? {
                return Err(ValidationError::WouldOverwrite(pair.target.clone()));
            }
        }
    }

    Ok(pairs)
}

/// Worker-pool width for per-pair execution
fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

/// Run every resolved pair concurrently and collect per-pair failures.
///
/// Fan-out is bounded by the host's available parallelism; the caller
/// suspends until every pair has completed. A failed pair never interrupts
/// its siblings, so the store may end up in a mixed state; that partial
/// state is the documented contract, reported through the outcome. There are
/// no retries and no cancellation once execution has begun.
pub async fn execute_batch(
    store: &dyn ObjectStore,
    pairs: Vec<RelocationPair>,
    mode: RelocationMode,
) -> BatchOutcome {
    let mut results: Vec<(usize, RelocationPair, Result<(), String>)> =
        stream::iter(pairs.into_iter().enumerate().map(|(index, pair)| async move {
            let result = relocate_one(store, &pair, mode).await;
            (index, pair, result)
        }))
        .buffer_unordered(worker_count())
        .collect()
        .await;

    // failures are reported in submission order
    results.sort_by_key(|(index, _, _)| *index);

    let failed: Vec<FailedPair> = results
        .into_iter()
        .filter_map(|(_, pair, result)| {
            result.err().map(|err| FailedPair {
                src: pair.source,
                tgt: pair.target,
                err,
            })
        })
        .collect();

    if !failed.is_empty() {
        tracing::warn!(failed = failed.len(), "batch completed with failures");
    }

    BatchOutcome { failed }
}

/// Apply one pair. The failure text goes straight into the batch response.
async fn relocate_one(
    store: &dyn ObjectStore,
    pair: &RelocationPair,
    mode: RelocationMode,
) -> Result<(), String> {
    let verb = match mode {
        RelocationMode::Copy => "copy",
        RelocationMode::Move => "move",
    };

    store
        .copy_object(&pair.source, &pair.target)
        .await
        .map_err(|e| format!("{verb} failed: {e}"))?;

    if mode == RelocationMode::Copy {
        return Ok(());
    }

    // Move is copy-then-delete, not an atomic rename: verify each phase so a
    // half-applied pair is reported rather than silently losing data.
    match store.object_exists(&pair.target).await {
        Ok(true) => {}
        Ok(false) => return Err("copy succeeded but target missing".to_string()),
        Err(e) => return Err(format!("move failed: {e}")),
    }

    store
        .delete_object(&pair.source)
        .await
        .map_err(|e| format!("move failed: {e}"))?;

    match store.object_exists(&pair.source).await {
        Ok(false) => Ok(()),
        Ok(true) => Err("delete failed".to_string()),
        Err(e) => Err(format!("move failed: {e}")),
    }
}

/// Copy `src_keys` into `target_dir`, optionally renaming.
pub async fn copy_batch(
    store: &dyn ObjectStore,
    src_keys: &[String],
    target_dir: &str,
    rename: &str,
    allow_overwrite: bool,
) -> Result<BatchOutcome, ValidationError> {
    let targets: Vec<String> = src_keys
        .iter()
        .map(|source| key::resolve_target(source, target_dir, rename))
        .collect();
    let pairs = validate_pairs(store, src_keys, &targets, allow_overwrite).await?;
    Ok(execute_batch(store, pairs, RelocationMode::Copy).await)
}

/// Move `src_keys` into `target_dir`, optionally renaming.
pub async fn move_batch(
    store: &dyn ObjectStore,
    src_keys: &[String],
    target_dir: &str,
    rename: &str,
    allow_overwrite: bool,
) -> Result<BatchOutcome, ValidationError> {
    let targets: Vec<String> = src_keys
        .iter()
        .map(|source| key::resolve_target(source, target_dir, rename))
        .collect();
    let pairs = validate_pairs(store, src_keys, &targets, allow_overwrite).await?;
    Ok(execute_batch(store, pairs, RelocationMode::Move).await)
}

/// Rename one object (or directory) in place.
///
/// The new key keeps the parent of `file_key`; equal old and new keys
/// short-circuit to success without touching the store.
pub async fn rename(
    store: &dyn ObjectStore,
    file_key: &str,
    new_name: &str,
) -> Result<BatchOutcome, ValidationError> {
    let mut new_key = format!("{}{}", key::parent_of(file_key), new_name);
    if key::is_dir_key(file_key) {
        new_key.push('/');
    }
    if file_key == new_key {
        return Ok(BatchOutcome::default());
    }

    let pairs = validate_pairs(store, &[file_key.to_string()], &[new_key], false).await?;
    Ok(execute_batch(store, pairs, RelocationMode::Move).await)
}
