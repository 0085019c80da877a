use anyhow::bail;

use crate::compact::compact;
use crate::progress::ConsoleProgress;
use crate::providers::{LingvaProvider, MyMemoryProvider, TranslationProvider};
use crate::stopwords::strip;
use crate::tokenizer::TokenCounter;

use super::config::PipelineConfig;
use super::translator::ChunkedTranslator;

/// How a given prompt gets optimized. Chosen once per invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Stopword stripping only; no translation, no reply suffix. The model
    /// replies in the source language because the prompt stays in it.
    Bypass,
    /// Strip stopwords, translate into the dense target script, compact.
    DenseTranslate,
    /// Translate into the default target language.
    StandardTranslate,
}

impl Strategy {
    /// Translation carries fixed per-call overhead (latency, suffix tokens)
    /// that short prompts cannot amortize; for those, stripping filler in
    /// the original language wins.
    pub fn choose(input_chars: usize, aggressive: bool, short_threshold: usize) -> Self {
        if !aggressive {
            Self::StandardTranslate
        } else if input_chars < short_threshold {
            Self::Bypass
        } else {
            Self::DenseTranslate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bypass => "bypass",
            Self::DenseTranslate => "dense-translate",
            Self::StandardTranslate => "standard-translate",
        }
    }
}

// Ultra-short reply instructions, in Chinese because those cost the fewest
// tokens. Needed whenever the prompt language changed, otherwise the model
// answers in the target language.
fn reply_suffix(source_lang: &str) -> &'static str {
    match source_lang {
        "es" => "\n(用西语答)",
        "en" => "\n(用英语答)",
        "fr" => "\n(用法语答)",
        "de" => "\n(用德语答)",
        "pt" => "\n(用葡语答)",
        _ => "\n(用原语答)",
    }
}

#[derive(Clone, Debug)]
pub struct OptimizationResult {
    pub output: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    /// Negative when the output grew.
    pub saved_tokens: i64,
    pub savings_percent: i64,
    pub strategy: Strategy,
}

/// Entry point of the optimization pipeline. Owns the tokenizer-ready state
/// and the in-flight guard; the outer layer only ever calls `optimize` and
/// `count`.
pub struct Optimizer {
    cfg: PipelineConfig,
    counter: TokenCounter,
    translator: ChunkedTranslator,
    progress: ConsoleProgress,
    in_flight: bool,
}

impl Optimizer {
    pub fn new(cfg: PipelineConfig, progress: ConsoleProgress) -> Self {
        let counter = TokenCounter::new();
        if !counter.is_exact() {
            progress.warn("tokenizer unavailable; token counts are chars/3 estimates");
        }
        // one connection pool for the whole provider chain
        let client = reqwest::Client::new();
        let providers: Vec<Box<dyn TranslationProvider>> = vec![
            Box::new(MyMemoryProvider::new(
                client.clone(),
                &cfg.mymemory_base_url,
                &cfg.mymemory_contact,
                cfg.rate_limit_backoff,
            )),
            Box::new(LingvaProvider::new(
                client,
                &cfg.lingva_api_url,
                &cfg.relay_base_url,
            )),
        ];
        let translator = ChunkedTranslator::new(providers, cfg.chunk_max_chars, cfg.chunk_interval);
        Self {
            cfg,
            counter,
            translator,
            progress,
            in_flight: false,
        }
    }

    pub fn count(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    pub async fn optimize(
        &mut self,
        raw: &str,
        source_lang: &str,
        aggressive: bool,
    ) -> anyhow::Result<OptimizationResult> {
        let raw = raw.trim();
        if raw.is_empty() {
            bail!("empty prompt: nothing to optimize");
        }
        if self.in_flight {
            bail!("an optimization run is already in flight");
        }
        self.in_flight = true;
        let result = self.run(raw, source_lang, aggressive).await;
        self.in_flight = false;
        result
    }

    async fn run(
        &mut self,
        raw: &str,
        source_lang: &str,
        aggressive: bool,
    ) -> anyhow::Result<OptimizationResult> {
        let source = if source_lang == "auto" {
            self.cfg.default_source_lang.clone()
        } else {
            source_lang.to_string()
        };
        let strategy = Strategy::choose(
            raw.chars().count(),
            aggressive,
            self.cfg.short_prompt_threshold,
        );
        self.progress
            .info(format!("strategy: {} (source: {source})", strategy.as_str()));

        // Both aggressive paths strip filler first.
        let prepared = if aggressive { strip(raw) } else { raw.to_string() };

        let output = match strategy {
            Strategy::Bypass => prepared,
            Strategy::DenseTranslate => {
                let translated = self
                    .translator
                    .translate(&prepared, &source, &self.cfg.dense_target_lang, &self.progress)
                    .await;
                format!("{}{}", compact(&translated), reply_suffix(&source))
            }
            Strategy::StandardTranslate => {
                let translated = self
                    .translator
                    .translate(
                        &prepared,
                        &source,
                        &self.cfg.standard_target_lang,
                        &self.progress,
                    )
                    .await;
                format!("{translated}{}", reply_suffix(&source))
            }
        };

        let input_tokens = self.counter.count(raw);
        let output_tokens = self.counter.count(&output);
        let saved_tokens = input_tokens as i64 - output_tokens as i64;
        let savings_percent = if input_tokens > 0 {
            ((saved_tokens as f64 / input_tokens as f64) * 100.0).round() as i64
        } else {
            0
        };

        Ok(OptimizationResult {
            output,
            input_tokens,
            output_tokens,
            saved_tokens,
            savings_percent,
            strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{reply_suffix, Optimizer, Strategy};
    use crate::pipeline::config::PipelineConfig;
    use crate::progress::ConsoleProgress;

    #[test]
    fn strategy_table() {
        assert_eq!(Strategy::choose(10, false, 150), Strategy::StandardTranslate);
        assert_eq!(Strategy::choose(5000, false, 150), Strategy::StandardTranslate);
        assert_eq!(Strategy::choose(100, true, 150), Strategy::Bypass);
        assert_eq!(Strategy::choose(500, true, 150), Strategy::DenseTranslate);
        // boundary: exactly at the threshold counts as long
        assert_eq!(Strategy::choose(150, true, 150), Strategy::DenseTranslate);
    }

    #[test]
    fn suffix_lookup_falls_back_to_generic() {
        assert_eq!(reply_suffix("es"), "\n(用西语答)");
        assert_eq!(reply_suffix("pt"), "\n(用葡语答)");
        assert_eq!(reply_suffix("ja"), "\n(用原语答)");
        assert_eq!(reply_suffix("auto"), "\n(用原语答)");
    }

    #[tokio::test]
    async fn rejects_empty_input_before_any_work() {
        let mut opt = Optimizer::new(PipelineConfig::default(), ConsoleProgress::new(false));
        assert!(opt.optimize("   \n\t ", "auto", true).await.is_err());
    }

    #[tokio::test]
    async fn rejects_reentrant_invocation() {
        let mut opt = Optimizer::new(PipelineConfig::default(), ConsoleProgress::new(false));
        opt.in_flight = true;
        let err = opt.optimize("some text", "auto", true).await.unwrap_err();
        assert!(err.to_string().contains("in flight"));
    }
}
