//! Text processing built on the parallel dispatcher.
//!
//! Single-item transforms ([`tokenize`], [`ngrams`], [`to_lower`], [`remove_punctuation`],
//! [`stem`]) are plain functions. Batch operations live on [`TextToolkit`], which owns a worker
//! pool and runs each call as a chunked parallel map whose result matches a serial run.
//!
//! # Usage
//!
//! ```ignore
//! use nlpkit_text_toolkit::{TextToolkit, ToolkitConfig, tokenize};
//!
//! let toolkit = TextToolkit::new(ToolkitConfig::default())?;
//! let counts = toolkit.bag_of_words(tokenize("to be or not to be"), Some(4))?;
//! assert_eq!(counts["be"], 2);
//! ```

mod config;
mod embedding;
mod error;
mod export;
mod stem;
mod text;
mod tokenizer;
mod toolkit;
mod word_list;

pub use config::ToolkitConfig;
pub use embedding::EmbeddingGenerator;
pub use error::{Error, Result};
pub use export::Exporter;
pub use stem::stem;
pub use text::{ngrams, remove_punctuation, to_lower, tokenize};
pub use tokenizer::{Tokenizer, TokenizerData, UNKNOWN_TOKEN};
pub use toolkit::TextToolkit;
pub use word_list::WordList;
