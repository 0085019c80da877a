pub mod chunk;
pub mod compact;
pub mod config;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod stopwords;
pub mod tokenizer;
