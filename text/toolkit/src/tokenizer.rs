use std::{collections::HashMap, ops::Deref, sync::Arc};

use nlpkit_scheduling_dispatcher::{Concat, ParallelDispatcher};

use crate::{Error, Result};

/// Token used for every word missing from the vocabulary.
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Maps tokens to ids and back using a fixed vocabulary.
///
/// Cheap to clone: clones share one vocabulary, which is what lets batch operations hand the
/// tokenizer to worker tasks.
#[derive(Clone)]
pub struct Tokenizer(Arc<TokenizerData>);

pub struct TokenizerData {
    id_to_token: Vec<String>,
    token_to_id: HashMap<String, u32>,
    unknown_id: u32,
}

impl Tokenizer {
    /// Builds a tokenizer from a vocabulary list; a token's id is its position in the list.
    ///
    /// Duplicate entries map to their last position. [`UNKNOWN_TOKEN`] is appended when the list
    /// does not contain it.
    pub fn new<S: Into<String>>(vocab: impl IntoIterator<Item = S>) -> Self {
        let mut id_to_token: Vec<String> = vocab.into_iter().map(Into::into).collect();
        let mut token_to_id: HashMap<String, u32> = id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as u32))
            .collect();

        let unknown_id = match token_to_id.get(UNKNOWN_TOKEN) {
            Some(&id) => id,
            None => {
                let id = id_to_token.len() as u32;
                id_to_token.push(UNKNOWN_TOKEN.to_owned());
                token_to_id.insert(UNKNOWN_TOKEN.to_owned(), id);
                id
            }
        };

        Self(Arc::new(TokenizerData { id_to_token, token_to_id, unknown_id }))
    }

    /// Maps each token to its id; unknown tokens map to the id of [`UNKNOWN_TOKEN`].
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .map(|token| self.token_to_id.get(token.as_ref()).copied().unwrap_or(self.unknown_id))
            .collect()
    }

    /// Maps each id back to its token. Fails on the first id outside the vocabulary.
    pub fn decode(&self, ids: &[u32]) -> Result<Vec<String>> {
        ids.iter()
            .map(|&id| {
                self.id_to_token.get(id as usize).cloned().ok_or(Error::InvalidTokenId {
                    id,
                    vocab_size: self.id_to_token.len(),
                })
            })
            .collect()
    }

    /// Encodes every sentence in parallel; the result is in sentence order.
    pub fn batch_encode(
        &self,
        dispatcher: &ParallelDispatcher<'_>,
        sentences: Vec<Vec<String>>,
        threads: usize,
    ) -> Result<Vec<Vec<u32>>> {
        let tokenizer = self.clone();
        let encode = move |sentence: Vec<String>| Ok::<_, Error>(tokenizer.encode(&sentence));
        Ok(dispatcher.dispatch(sentences, encode, threads, Concat)?)
    }

    /// Decodes every sentence in parallel; the result is in sentence order.
    ///
    /// Fails if any sentence contains an invalid id.
    pub fn batch_decode(
        &self,
        dispatcher: &ParallelDispatcher<'_>,
        sentences: Vec<Vec<u32>>,
        threads: usize,
    ) -> Result<Vec<Vec<String>>> {
        let tokenizer = self.clone();
        let decode = move |ids: Vec<u32>| tokenizer.decode(&ids);
        Ok(dispatcher.dispatch(sentences, decode, threads, Concat)?)
    }

    pub fn vocab_size(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }
}

impl Deref for Tokenizer {
    type Target = TokenizerData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use nlpkit_scheduling_dispatcher::{Error as DispatchError, ExecutionConfig};
    use nlpkit_scheduling_worker_pool::WorkerPool;

    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(["hello", "world", "<UNK>", "my", "name", "is", "<UNK>", "My"])
    }

    #[test]
    fn test_unknown_token_is_appended_when_missing() {
        let tokenizer = Tokenizer::new(["a", "b"]);
        assert_eq!(tokenizer.vocab_size(), 3);
        assert_eq!(tokenizer.unknown_id(), 2);
        assert_eq!(tokenizer.encode(&["b", "zzz"]), [1, 2]);
    }

    #[test]
    fn test_duplicates_map_to_last_position() {
        let tokenizer = tokenizer();
        assert_eq!(tokenizer.unknown_id(), 6);
        assert_eq!(tokenizer.vocab_size(), 8);
        assert_eq!(tokenizer.encode(&["hello", "unknown", "world", "is", "name"]), [0, 6, 1, 5, 4]);
    }

    #[test]
    fn test_decode() {
        let tokenizer = tokenizer();
        assert_eq!(
            tokenizer.decode(&[0, 2, 1, 5, 7, 3, 4]).unwrap(),
            ["hello", "<UNK>", "world", "is", "My", "my", "name"]
        );
        assert!(matches!(
            tokenizer.decode(&[0, 8]),
            Err(Error::InvalidTokenId { id: 8, vocab_size: 8 })
        ));
    }

    #[test]
    fn test_batch_roundtrip() {
        let config = ExecutionConfig::default().with_worker_count(2);
        let pool = WorkerPool::new(config.pool_config()).unwrap();
        let dispatcher = ParallelDispatcher::new(&pool, &config);
        let tokenizer = tokenizer();

        let sentences = vec![
            vec!["hello".to_owned(), "world".to_owned(), "test".to_owned()],
            vec!["unknown".to_owned(), "hello".to_owned(), "name".to_owned(), "My".to_owned()],
        ];
        let encoded = tokenizer.batch_encode(&dispatcher, sentences, 5).unwrap();
        assert_eq!(encoded, vec![vec![0, 1, 6], vec![6, 0, 4, 7]]);

        let decoded = tokenizer.batch_decode(&dispatcher, encoded, 3).unwrap();
        assert_eq!(decoded[0], ["hello", "world", "<UNK>"]);
        assert_eq!(decoded[1], ["<UNK>", "hello", "name", "My"]);
    }

    #[test]
    fn test_batch_decode_reports_invalid_sentence() {
        let config = ExecutionConfig::default().with_worker_count(2);
        let pool = WorkerPool::new(config.pool_config()).unwrap();
        let dispatcher = ParallelDispatcher::new(&pool, &config);

        let err = tokenizer().batch_decode(&dispatcher, vec![vec![0, 1], vec![42]], 2).unwrap_err();
        let Error::Dispatch(DispatchError::ChunksFailed { failures, .. }) = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(failures[0].chunk.index(), 1);
        assert!(failures[0].error.to_string().contains("invalid token id 42"));
    }
}
