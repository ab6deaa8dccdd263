/// Suffixes stripped by [`stem`], checked in this order.
const SUFFIXES: [&str; 5] = ["ing", "ed", "es", "s", "er"];

/// Shortest stem [`stem`] will produce.
const MIN_STEM_LEN: usize = 3;

/// Strips one common English suffix from `word`.
///
/// Words of three bytes or less are returned unchanged, as is any word whose stem would be
/// shorter than three bytes. For `-ing`, a doubled consonant before the suffix is dropped too
/// (`swimming` -> `swim`).
pub fn stem(word: &str) -> String {
    if word.len() <= MIN_STEM_LEN {
        return word.to_owned();
    }

    let Some(suffix) = SUFFIXES.iter().find(|suffix| word.ends_with(*suffix)) else {
        return word.to_owned();
    };

    let mut stem = &word[..word.len() - suffix.len()];
    if *suffix == "ing" {
        let bytes = stem.as_bytes();
        if let [.., a, b] = bytes {
            if a == b && a.is_ascii_alphabetic() {
                stem = &stem[..stem.len() - 1];
            }
        }
    }

    if stem.len() < MIN_STEM_LEN { word.to_owned() } else { stem.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(stem("swimming"), "swim");
        assert_eq!(stem("jumping"), "jump");
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("runner"), "runn");
    }

    #[test]
    fn test_short_words_unchanged() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("was"), "was");
        assert_eq!(stem("bed"), "bed");
        // Stem would be two bytes.
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("used"), "used");
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(stem("world"), "world");
    }

    #[test]
    fn test_non_ascii_words() {
        assert_eq!(stem("café"), "café");
        assert_eq!(stem("naïves"), "naïv");
    }
}
