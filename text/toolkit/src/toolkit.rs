use std::{collections::HashMap, convert::Infallible};

use nlpkit_scheduling_dispatcher::{Accumulate, Concat, Flatten, KeepLast, ParallelDispatcher};
use nlpkit_scheduling_worker_pool::WorkerPool;
use tap::Tap;

use crate::{
    EmbeddingGenerator, Exporter, Result, Tokenizer, ToolkitConfig, WordList,
    stem::stem,
    text::{ngrams, remove_punctuation, to_lower, tokenize},
};

/// Batch text operations running on a pool owned by the toolkit.
///
/// Every operation takes an optional thread count (`None` uses the configured default, `0` the
/// available parallelism), splits its input into that many chunks, and merges the chunk results
/// into exactly what a serial run would return. Results are exported after merging, on the
/// calling thread. Single-item transforms are offered too, so that their results are exported
/// as well. Dropping the toolkit shuts its pool down.
pub struct TextToolkit {
    config: ToolkitConfig,
    pool: WorkerPool,
    embeddings: EmbeddingGenerator,
    exporter: Exporter,
}

impl TextToolkit {
    pub fn new(config: ToolkitConfig) -> Result<Self> {
        let pool = WorkerPool::new(config.execution.pool_config())?;
        let embeddings = EmbeddingGenerator::new(config.embedding_dimensions, config.embedding_seed);
        let exporter = Exporter::new(config.export_destination.clone());

        Ok(Self { config, pool, embeddings, exporter }.tap(|toolkit| {
            log::debug!("text toolkit started with {} workers", toolkit.pool.worker_count())
        }))
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        self.finish("tokenize", tokenize(text))
    }

    pub fn ngrams<S: AsRef<str>>(&self, tokens: &[S], n: usize) -> Result<Vec<String>> {
        self.finish("ngrams", ngrams(tokens, n))
    }

    pub fn to_lower(&self, text: &str) -> Result<String> {
        self.finish("to_lower", to_lower(text))
    }

    pub fn remove_punctuation(&self, text: &str) -> Result<String> {
        self.finish("remove_punctuation", remove_punctuation(text))
    }

    pub fn stem(&self, word: &str) -> Result<String> {
        self.finish("stem", stem(word))
    }

    pub fn encode<S: AsRef<str>>(&self, tokenizer: &Tokenizer, tokens: &[S]) -> Result<Vec<u32>> {
        self.finish("encode", tokenizer.encode(tokens))
    }

    pub fn decode(&self, tokenizer: &Tokenizer, ids: &[u32]) -> Result<Vec<String>> {
        self.finish("decode", tokenizer.decode(ids)?)
    }

    /// Counts the occurrences of every token.
    pub fn bag_of_words(
        &self,
        tokens: Vec<String>,
        threads: Option<usize>,
    ) -> Result<HashMap<String, u64>> {
        let count = |token: String| Ok::<_, Infallible>((token, 1_u64));
        let counts = self.dispatcher().dispatch(tokens, count, self.threads(threads), Accumulate)?;
        self.finish("bag_of_words", counts)
    }

    /// Generates one embedding per unique token.
    pub fn embeddings(
        &self,
        tokens: Vec<String>,
        threads: Option<usize>,
    ) -> Result<HashMap<String, Vec<f32>>> {
        let generator = self.embeddings;
        let embed = move |token: String| {
            let embedding = generator.generate(&token);
            Ok::<_, Infallible>((token, embedding))
        };
        let embeddings = self.dispatcher().dispatch(tokens, embed, self.threads(threads), KeepLast)?;
        self.finish("embeddings", embeddings)
    }

    /// Drops every whitespace-separated token found in `stop_words` and rejoins the rest with
    /// single spaces.
    pub fn remove_stop_words(
        &self,
        text: &str,
        stop_words: &WordList,
        threads: Option<usize>,
    ) -> Result<String> {
        let stop_words = stop_words.clone();
        let keep = move |token: String| {
            Ok::<_, Infallible>((!stop_words.contains(&token)).then_some(token))
        };
        let kept = self.dispatcher().dispatch(tokenize(text), keep, self.threads(threads), Flatten)?;
        self.finish("remove_stop_words", kept.join(" "))
    }

    /// Removes every character listed in `special_characters`.
    pub fn remove_special_characters(
        &self,
        text: &str,
        special_characters: &WordList,
        threads: Option<usize>,
    ) -> Result<String> {
        let special_characters = special_characters.clone();
        let keep =
            move |c: char| Ok::<_, Infallible>((!special_characters.contains_char(c)).then_some(c));
        let chars: Vec<char> = text.chars().collect();
        let kept = self.dispatcher().dispatch(chars, keep, self.threads(threads), Flatten)?;
        self.finish("remove_special_characters", kept.into_iter().collect::<String>())
    }

    /// Stems every word, preserving order.
    pub fn stem_all(&self, words: Vec<String>, threads: Option<usize>) -> Result<Vec<String>> {
        let stem_word = |word: String| Ok::<_, Infallible>(stem(&word));
        let stems = self.dispatcher().dispatch(words, stem_word, self.threads(threads), Concat)?;
        self.finish("stem_all", stems)
    }

    pub fn batch_encode(
        &self,
        tokenizer: &Tokenizer,
        sentences: Vec<Vec<String>>,
        threads: Option<usize>,
    ) -> Result<Vec<Vec<u32>>> {
        let encoded = tokenizer.batch_encode(&self.dispatcher(), sentences, self.threads(threads))?;
        self.finish("batch_encode", encoded)
    }

    pub fn batch_decode(
        &self,
        tokenizer: &Tokenizer,
        sentences: Vec<Vec<u32>>,
        threads: Option<usize>,
    ) -> Result<Vec<Vec<String>>> {
        let decoded = tokenizer.batch_decode(&self.dispatcher(), sentences, self.threads(threads))?;
        self.finish("batch_decode", decoded)
    }

    fn dispatcher(&self) -> ParallelDispatcher<'_> {
        ParallelDispatcher::new(&self.pool, &self.config.execution)
    }

    fn threads(&self, threads: Option<usize>) -> usize {
        threads.unwrap_or(self.config.default_threads)
    }

    fn finish<T: serde::Serialize>(&self, task: &str, output: T) -> Result<T> {
        self.exporter.export(task, &output)?;
        Ok(output)
    }
}

impl std::fmt::Debug for TextToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextToolkit")
            .field("pool", &self.pool)
            .field("embeddings", &self.embeddings)
            .field("exporter", &self.exporter)
            .finish()
    }
}
