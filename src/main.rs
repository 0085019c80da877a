use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use token_minimizer::config::init_default_config;
use token_minimizer::pipeline::{Optimizer, PipelineConfig};
use token_minimizer::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "token-minimizer")]
#[command(
    about = "Shrinks LLM prompts by stripping filler words and translating into a token-dense script",
    long_about = None
)]
struct Args {
    /// Prompt text, or a path to a plain-text file containing it (stdin when omitted)
    #[arg(value_name = "TEXT_OR_FILE")]
    input: Option<String>,

    /// Source language code (es, en, fr, de, pt); "auto" resolves to the configured default
    #[arg(long, default_value = "auto")]
    source_lang: String,

    /// Aggressive mode: strip filler words; long prompts also get translated into a dense script
    #[arg(long)]
    aggressive: bool,

    /// Write the optimized prompt to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the token count of the input and exit (no optimization)
    #[arg(long)]
    count_only: bool,

    /// Config file path (default: search for token-minimizer.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Suppress progress output on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let raw = read_input(args.input.as_deref())?;
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("no prompt given: pass text, a file path, or pipe text on stdin");
    }

    let cfg = PipelineConfig::from_args(args.config.clone()).context("resolve config")?;
    let mut optimizer = Optimizer::new(cfg, progress);

    if args.count_only {
        println!("{}", optimizer.count(raw));
        return Ok(());
    }

    let result = optimizer
        .optimize(raw, &args.source_lang, args.aggressive)
        .await?;

    progress.info(format!(
        "input: {} tokens, output: {} tokens",
        result.input_tokens, result.output_tokens
    ));
    if result.saved_tokens >= 0 {
        progress.info(format!(
            "saved {} tokens ({}%)",
            result.saved_tokens, result.savings_percent
        ));
    } else {
        progress.info(format!(
            "increase: {} tokens ({}%)",
            -result.saved_tokens,
            result.savings_percent.abs()
        ));
    }

    match args.output {
        Some(path) => {
            std::fs::write(&path, &result.output)
                .with_context(|| format!("write output: {}", path.display()))?;
            progress.info(format!("wrote {}", path.display()));
        }
        None => println!("{}", result.output),
    }
    Ok(())
}

fn read_input(arg: Option<&str>) -> anyhow::Result<String> {
    match arg {
        Some(s) => {
            let p = Path::new(s);
            if p.is_file() {
                std::fs::read_to_string(p).with_context(|| format!("read input: {}", p.display()))
            } else {
                Ok(s.to_string())
            }
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}
