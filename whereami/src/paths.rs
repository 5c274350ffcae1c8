//! String-level path helpers shared by the resolver and the entry point.
//!
//! These operate on the literal text of a path rather than on `Path`
//! components: the argv0 chain builds candidates by concatenation exactly the
//! way a shell does, and `directory_of` keeps the trailing separator so a file
//! name can be appended directly.

use whereami_common::SEARCH_PATH_SEPARATOR;

#[cfg(windows)]
const SEPARATORS: &[u8] = b"\\/";
#[cfg(not(windows))]
const SEPARATORS: &[u8] = b"/";

/// Directory part of `path`, up to and including the last separator
///
/// Returns `path` unchanged when it contains no separator.
#[must_use]
pub fn directory_of(path: &str) -> &str {
    // Separators are ASCII, so the cut always lands on a char boundary.
    &path[..directory_of_bytes(path.as_bytes()).len()]
}

/// [`directory_of`] over raw bytes, for paths that need not be UTF-8
#[must_use]
pub fn directory_of_bytes(path: &[u8]) -> &[u8] {
    match path.iter().rposition(|b| SEPARATORS.contains(b)) {
        Some(pos) => &path[..=pos],
        None => path,
    }
}

/// Replace every non-overlapping occurrence of `pattern`, scanning left to right
///
/// Text inserted by a replacement is never rescanned.
///
/// # Panics
/// `pattern` must not be empty (debug builds assert; release builds return
/// `text` unchanged).
#[must_use]
pub fn replace_all(text: &str, pattern: &str, replacement: &str) -> String {
    debug_assert!(!pattern.is_empty(), "replace_all pattern must not be empty");
    if pattern.is_empty() {
        return text.to_string();
    }
    text.replace(pattern, replacement)
}

/// Split a `:`-separated search list the way a line reader does
///
/// Interior empty entries are kept (they name the root when joined with
/// `/name`), a single trailing empty entry is dropped, and an empty list
/// yields nothing.
///
/// Works on bytes: entries of `PATH` are file names, not text.
pub fn split_search_list(list: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut entries: Vec<&[u8]> = list.split(|&b| b == SEARCH_PATH_SEPARATOR).collect();
    if entries.last().is_some_and(|e| e.is_empty()) {
        entries.pop();
    }
    entries.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_of() {
        assert_eq!(directory_of("/a/b/c"), "/a/b/");
        assert_eq!(directory_of("name"), "name");
        assert_eq!(directory_of("/app"), "/");
        assert_eq!(directory_of("dir/"), "dir/");
    }

    #[cfg(windows)]
    #[test]
    fn test_directory_of_native_separator() {
        assert_eq!(directory_of(r"C:\tools\app.exe"), r"C:\tools\");
        assert_eq!(directory_of(r"C:\tools/sub\app.exe"), r"C:\tools/sub\");
    }

    #[test]
    fn test_replace_all_quotes() {
        assert_eq!(replace_all("a\"b\"c", "\"", "\\\""), "a\\\"b\\\"c");
    }

    #[test]
    fn test_replace_all_does_not_rescan_replacement() {
        assert_eq!(replace_all("aaa", "a", "aa"), "aaaaaa");
        assert_eq!(replace_all("abab", "ab", "b"), "bb");
        assert_eq!(replace_all("none here", "x", "y"), "none here");
    }

    #[test]
    fn test_split_search_list() {
        let split = |s: &'static str| {
            split_search_list(s.as_bytes())
                .map(|e| std::str::from_utf8(e).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(split("/usr/bin:/bin"), vec!["/usr/bin", "/bin"]);
        assert_eq!(split("/a::/b"), vec!["/a", "", "/b"]);
        assert_eq!(split("/a:"), vec!["/a"]);
        assert_eq!(split(":"), vec![""]);
        assert!(split("").is_empty());
    }

    #[test]
    fn test_split_search_list_keeps_non_utf8_entries() {
        let entries: Vec<&[u8]> = split_search_list(b"/opt/pd_\xff:/bin").collect();
        assert_eq!(entries, vec![&b"/opt/pd_\xff"[..], &b"/bin"[..]]);
    }

    #[test]
    fn test_directory_of_bytes() {
        assert_eq!(directory_of_bytes(b"/a/pd_\xff/app"), &b"/a/pd_\xff/"[..]);
        assert_eq!(directory_of_bytes(b"app"), &b"app"[..]);
    }
}
