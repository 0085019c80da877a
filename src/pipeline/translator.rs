use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::chunk::split_and_pack;
use crate::progress::ConsoleProgress;
use crate::providers::TranslationProvider;

/// Fixed-interval request scheduler. The first call passes immediately;
/// every later call waits out whatever remains of the interval since the
/// previous one. A zero interval makes it a no-op, which is what tests use.
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub async fn pace(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Translates long text by splitting it into sentence-bounded chunks and
/// walking a fixed-priority provider chain per chunk, strictly sequentially.
/// A chunk no provider can translate passes through unchanged; the result may
/// be mixed-language but never loses content.
pub struct ChunkedTranslator {
    providers: Vec<Box<dyn TranslationProvider>>,
    chunk_max_chars: usize,
    pacer: Pacer,
}

impl ChunkedTranslator {
    pub fn new(
        providers: Vec<Box<dyn TranslationProvider>>,
        chunk_max_chars: usize,
        chunk_interval: Duration,
    ) -> Self {
        Self {
            providers,
            chunk_max_chars,
            pacer: Pacer::new(chunk_interval),
        }
    }

    pub async fn translate(
        &mut self,
        text: &str,
        source: &str,
        target: &str,
        progress: &ConsoleProgress,
    ) -> String {
        let chunks = split_and_pack(text, self.chunk_max_chars);
        let total = chunks.len();
        let mut results: Vec<String> = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            let trimmed = chunk.trim();
            if trimmed.is_empty() {
                results.push(chunk.clone());
                continue;
            }

            self.pacer.pace().await;
            progress.progress("translate", i + 1, total);

            let mut translated: Option<String> = None;
            for provider in &self.providers {
                match provider.translate(trimmed, source, target).await {
                    Ok(t) => {
                        translated = Some(t);
                        break;
                    }
                    Err(err) => {
                        progress.warn(format!("{} failed: {err:#}", provider.name()));
                    }
                }
            }
            // Both providers down: keep the original chunk untranslated.
            results.push(translated.unwrap_or_else(|| chunk.clone()));
        }

        results.join(" ")
    }
}
