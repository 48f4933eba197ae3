//! Path resolution helpers
//!
//! Paths are slash-delimited absolute strings. Resolution everywhere in this
//! crate recurses one level at a time: take the first component, hand the
//! remainder to the child.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// Non-empty components of a path, in order. Repeated and trailing slashes
/// are ignored, so `scan_path("/a//b/")` is `["a", "b"]`.
pub fn scan_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split a path into its first component and the remaining path.
///
/// The root (or an empty string) yields `(None, None)`; a single component
/// yields `(Some(name), None)`.
pub fn split_path(path: &str) -> (Option<String>, Option<String>) {
    let mut parts = scan_path(path);
    if parts.is_empty() {
        return (None, None);
    }
    let head = parts.remove(0);
    if parts.is_empty() {
        (Some(head), None)
    } else {
        (Some(head), Some(parts.join("/")))
    }
}

/// Parent directory of a path; the parent of the root is the root itself.
pub fn dirname(path: &str) -> String {
    let parts = scan_path(path);
    match parts.split_last() {
        None | Some((_, [])) => "/".to_string(),
        Some((_, init)) => {
            let mut out = String::from("/");
            out.push_str(&init.join("/"));
            out
        }
    }
}

/// Final component of a path; the basename of the root is `/`.
pub fn basename(path: &str) -> String {
    scan_path(path)
        .pop()
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_path_root() {
        assert_eq!(split_path("/"), (None, None));
        assert_eq!(split_path(""), (None, None));
    }

    #[test]
    fn split_path_one_level() {
        assert_eq!(split_path("/a"), (Some("a".into()), None));
    }

    #[test]
    fn split_path_nested() {
        assert_eq!(
            split_path("/a/b/c"),
            (Some("a".into()), Some("b/c".into()))
        );
    }

    #[test]
    fn split_path_ignores_repeated_slashes() {
        assert_eq!(split_path("//a///b/"), (Some("a".into()), Some("b".into())));
    }

    #[test]
    fn dirname_and_basename() {
        assert_eq!(dirname("/a/b/c"), "/a/b");
        assert_eq!(dirname("/a"), "/");
        assert_eq!(dirname("/"), "/");
        assert_eq!(basename("/a/b/c"), "c");
        assert_eq!(basename("/"), "/");
    }
}
