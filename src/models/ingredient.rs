/// Normalizes an ingredient name for comparison
///
/// Trims surrounding whitespace and lowercases. Applying it twice yields the
/// same string as applying it once.
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case- and whitespace-insensitive ingredient equality
pub fn same_ingredient(a: &str, b: &str) -> bool {
    normalize_ingredient(a) == normalize_ingredient(b)
}
