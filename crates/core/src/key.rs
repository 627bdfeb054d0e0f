//! Key-string algebra for directory-shaped object keys
//!
//! The bucket is flat; a "directory" is any key prefix ending in `/`. These
//! helpers only manipulate strings and perform no I/O. Keys are opaque apart
//! from the `/` delimiter: no `.`/`..` resolution, no case folding.

/// Whether a key denotes a virtual directory.
pub fn is_dir_key(key: &str) -> bool {
    key.ends_with('/')
}

/// Key of the containing directory, or `""` for a root-level key.
///
/// The result is itself directory-shaped (ends in `/`) unless empty. A
/// directory-shaped input has its trailing `/` stripped before the parent is
/// computed, so `parent_of("a/b/")` is `"a/"`.
pub fn parent_of(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(pos) => &key[..=pos],
        None => "",
    }
}

/// Last path component; directory-shaped keys keep their trailing `/`.
pub fn basename_of(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(pos) => &key[pos + 1..],
        None => key,
    }
}

/// Compute the concrete target key for relocating `source` into `target_dir`.
///
/// With an empty `rename` the source keeps its basename. Otherwise the new
/// name is used, with a trailing `/` appended iff `source` is
/// directory-shaped. `target_dir` must be empty or end in `/`; callers
/// validate that at the request boundary.
pub fn resolve_target(source: &str, target_dir: &str, rename: &str) -> String {
    debug_assert!(target_dir.is_empty() || target_dir.ends_with('/'));
    if rename.is_empty() {
        return format!("{target_dir}{}", basename_of(source));
    }
    let rename = rename.trim_end_matches('/');
    if is_dir_key(source) {
        format!("{target_dir}{rename}/")
    } else {
        format!("{target_dir}{rename}")
    }
}

/// Rebase `key` from `src_prefix` onto `tgt_prefix`.
///
/// Only the leading prefix is substituted; a recurrence of the prefix text
/// deeper in the key is left untouched.
pub fn rebase_key(key: &str, src_prefix: &str, tgt_prefix: &str) -> String {
    debug_assert!(key.starts_with(src_prefix));
    format!("{tgt_prefix}{}", &key[src_prefix.len()..])
}
