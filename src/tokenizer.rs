use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

// Loaded once per process; a failed load leaves every counter in heuristic
// mode rather than blocking the pipeline.
static BPE: Lazy<Option<CoreBPE>> = Lazy::new(|| cl100k_base().ok());

/// Token counter over a fixed BPE encoding, with a character-count fallback
/// when the encoder is unavailable.
pub struct TokenCounter {
    bpe: Option<&'static CoreBPE>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self { bpe: BPE.as_ref() }
    }

    /// Counter that never uses the BPE encoder.
    pub fn heuristic() -> Self {
        Self { bpe: None }
    }

    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }

    /// Empty text counts as zero. In heuristic mode this is ceil(chars/3):
    /// Latin-script text averages roughly 3 chars per token, dense scripts
    /// undercount (accepted limitation).
    pub fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        match self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => text.chars().count().div_ceil(3),
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}
