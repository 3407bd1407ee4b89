//! Canonical text form used for venue and menu-term matching.

/// Lower-case `input`, turn every non-word, non-space character into a
/// space, collapse whitespace runs, and trim.
///
/// Word characters are alphanumerics plus `_`. Apostrophes become spaces, so
/// `"Durty Nelly's"` normalizes to `"durty nelly s"` on both sides of a match.
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
