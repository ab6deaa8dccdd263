//! Single-item text transforms. None of these touch the worker pool.

/// Splits `text` on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Builds n-grams of `n` consecutive tokens joined by a single space.
///
/// Returns nothing when `n` is zero or larger than the number of tokens.
pub fn ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens
        .windows(n)
        .map(|window| window.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" "))
        .collect()
}

/// Lowercases ASCII letters only; every other character is kept as is.
pub fn to_lower(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// Removes ASCII punctuation.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}
