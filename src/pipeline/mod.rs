mod config;
mod optimizer;
mod translator;

pub use config::PipelineConfig;
pub use optimizer::{OptimizationResult, Optimizer, Strategy};
pub use translator::{ChunkedTranslator, Pacer};
