use std::path::PathBuf;
use std::time::Duration;

use crate::config::{find_default_config, load_config, AppConfig, CONFIG_ENV_VAR, CONFIG_FILENAME};

/// Fully resolved runtime settings: CLI override > config file > defaults.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub short_prompt_threshold: usize,
    pub chunk_max_chars: usize,
    pub chunk_interval: Duration,
    pub rate_limit_backoff: Duration,
    pub default_source_lang: String,
    pub standard_target_lang: String,
    pub dense_target_lang: String,
    pub mymemory_base_url: String,
    pub mymemory_contact: String,
    pub lingva_api_url: String,
    pub relay_base_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            short_prompt_threshold: 150,
            chunk_max_chars: 450,
            chunk_interval: Duration::from_millis(500),
            rate_limit_backoff: Duration::from_millis(2000),
            default_source_lang: "es".to_string(),
            standard_target_lang: "en".to_string(),
            dense_target_lang: "zh-CN".to_string(),
            mymemory_base_url: "https://api.mymemory.translated.net".to_string(),
            mymemory_contact: "freak@tokenminimizer.com".to_string(),
            lingva_api_url: "https://lingva.ml/api/v1".to_string(),
            relay_base_url: "https://api.allorigins.win/raw".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_args(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let cfg_file = config_path
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(|| find_default_config(CONFIG_FILENAME));

        let mut file_cfg = AppConfig::default();
        if let Some(p) = cfg_file.as_ref() {
            if p.exists() {
                file_cfg = load_config(p)?;
            }
        }
        Ok(Self::from_app_config(&file_cfg))
    }

    pub fn from_app_config(cfg: &AppConfig) -> Self {
        let d = Self::default();
        let p = &cfg.pipeline;
        let pr = &cfg.providers;
        Self {
            short_prompt_threshold: p.short_prompt_threshold.unwrap_or(d.short_prompt_threshold),
            chunk_max_chars: p.chunk_max_chars.unwrap_or(d.chunk_max_chars).max(1),
            chunk_interval: p
                .chunk_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(d.chunk_interval),
            rate_limit_backoff: p
                .rate_limit_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(d.rate_limit_backoff),
            default_source_lang: p
                .default_source_lang
                .clone()
                .unwrap_or(d.default_source_lang),
            standard_target_lang: p
                .standard_target_lang
                .clone()
                .unwrap_or(d.standard_target_lang),
            dense_target_lang: p.dense_target_lang.clone().unwrap_or(d.dense_target_lang),
            mymemory_base_url: pr.mymemory_base_url.clone().unwrap_or(d.mymemory_base_url),
            mymemory_contact: pr.mymemory_contact.clone().unwrap_or(d.mymemory_contact),
            lingva_api_url: pr.lingva_api_url.clone().unwrap_or(d.lingva_api_url),
            relay_base_url: pr.relay_base_url.clone().unwrap_or(d.relay_base_url),
        }
    }
}
