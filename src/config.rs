use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "token-minimizer.toml";
pub const CONFIG_ENV_VAR: &str = "TOKEN_MINIMIZER_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub providers: ProvidersSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PipelineSection {
    /// Inputs shorter than this many characters skip translation entirely in
    /// aggressive mode (the per-call overhead outweighs the savings).
    #[serde(default)]
    pub short_prompt_threshold: Option<usize>,

    /// Upper bound on the characters packed into one translation request.
    #[serde(default)]
    pub chunk_max_chars: Option<usize>,

    /// Politeness spacing between successive chunk requests.
    #[serde(default)]
    pub chunk_interval_ms: Option<u64>,

    /// Wait before the single retry after a rate-limited response.
    #[serde(default)]
    pub rate_limit_backoff_ms: Option<u64>,

    /// Language the "auto" sentinel resolves to.
    #[serde(default)]
    pub default_source_lang: Option<String>,

    /// Target for the normal (non-aggressive) path.
    #[serde(default)]
    pub standard_target_lang: Option<String>,

    /// Token-dense target for long aggressive prompts.
    #[serde(default)]
    pub dense_target_lang: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ProvidersSection {
    #[serde(default)]
    pub mymemory_base_url: Option<String>,
    #[serde(default)]
    pub mymemory_contact: Option<String>,
    #[serde(default)]
    pub lingva_api_url: Option<String>,
    #[serde(default)]
    pub relay_base_url: Option<String>,
}

pub fn find_file_upwards(start: &Path, filename: &str, max_depth: usize) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());
    for _ in 0..=max_depth {
        let d = dir?;
        let cand = d.join(filename);
        if cand.is_file() {
            return Some(cand);
        }
        dir = d.parent().map(|p| p.to_path_buf());
    }
    None
}

pub fn find_default_config(filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 8) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

const DEFAULT_CONFIG_TOML: &str = r#"[pipeline]
# Inputs shorter than this many characters skip translation in aggressive mode.
short_prompt_threshold = 150

# Upper bound on characters packed into one translation request.
chunk_max_chars = 450

# Politeness spacing between successive chunk requests (ms).
chunk_interval_ms = 500

# Wait before the single retry after an HTTP 429 (ms).
rate_limit_backoff_ms = 2000

# Language that the "auto" source sentinel resolves to.
default_source_lang = "es"

# Target for the normal path; dense target for long aggressive prompts.
standard_target_lang = "en"
dense_target_lang = "zh-CN"

[providers]
mymemory_base_url = "https://api.mymemory.translated.net"
mymemory_contact = "freak@tokenminimizer.com"
lingva_api_url = "https://lingva.ml/api/v1"
relay_base_url = "https://api.allorigins.win/raw"
"#;
