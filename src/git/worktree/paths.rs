//! Path resolution utilities for worktrees

use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute form suitable for identity comparison.
///
/// Relative paths are joined onto `base`. The longest existing prefix is
/// canonicalized (following symlinks) and the remaining, not-yet-existing
/// components are normalized lexically, so `../wt1` resolves the same way
/// before and after the directory is created.
///
/// # Examples
///
/// ```ignore
/// let p = resolve_path(Path::new("../wt1"), Path::new("/home/user/repo"));
/// assert_eq!(p, PathBuf::from("/home/user/wt1"));
/// ```
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let normalized = normalize_lexically(&joined);

    if let Ok(canonical) = normalized.canonicalize() {
        return canonical;
    }

    // Walk up until an ancestor exists, canonicalize it, re-append the tail.
    let mut existing = normalized.clone();
    let mut tail = Vec::new();
    while !existing.exists() {
        match existing.file_name() {
            Some(name) => {
                tail.push(name.to_os_string());
                existing.pop();
            }
            None => return normalized,
        }
    }

    let mut resolved = existing.canonicalize().unwrap_or(existing);
    for component in tail.into_iter().rev() {
        resolved.push(component);
    }
    resolved
}

/// Collapse `.` and `..` components without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    out.pop();
                } else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
                    // Leading `..` stays; `..` at the root is the root
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
