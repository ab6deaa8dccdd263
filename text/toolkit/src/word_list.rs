use std::{collections::HashSet, fs, path::Path, sync::Arc};

use crate::{Error, Result};

/// A set of words (or characters) loaded from a file with one entry per line.
///
/// Used for stop words and special characters. Trailing `\r` is trimmed from each line and blank
/// lines are ignored. Clones share the same set.
#[derive(Clone, Debug, Default)]
pub struct WordList {
    words: Arc<HashSet<String>>,
}

impl WordList {
    pub fn new<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self { words: Arc::new(words.into_iter().map(Into::into).collect()) }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| Error::WordList { path: path.to_path_buf(), source })?;

        let list = Self::new(
            contents.lines().map(|line| line.trim_end_matches('\r')).filter(|line| !line.is_empty()),
        );
        log::debug!("loaded {} entries from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.words.contains(c.encode_utf8(&mut [0; 4]) as &str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
