//! Identifier normalization
//!
//! Flow identifiers are user-chosen and may contain spaces, underscores,
//! mixed case or non-ASCII characters. Derived storage keys need a
//! deterministic, filesystem-safe form of them.

/// Normalize an identifier into a lowercase ASCII slug.
///
/// Every run of non-alphanumeric characters (underscores included) folds
/// into a single hyphen, so the result never contains the separators used
/// by the key encodings. The same input always produces the same slug.
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
