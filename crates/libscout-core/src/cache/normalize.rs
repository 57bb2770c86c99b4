//! Key normalization

/// Canonicalize a search term or alias into a lookup key.
///
/// Trims surrounding whitespace and lowercases, so `"  ReactJS "` and
/// `"reactjs"` address the same entry.
pub fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Case-insensitive name equality under [`normalize`]
pub fn same_name(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
