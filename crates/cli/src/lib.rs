use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use context_engine::{format_for_llm, ContextEngine, EngineConfig, Ranking};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "repo-context")]
#[command(about = "Pick the repository files most relevant to a prompt, within a token budget", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the context bundle for a prompt
    Pack(PackArgs),

    /// Show how files score for a prompt, without loading content
    Rank(RankArgs),
}

impl Commands {
    fn json(&self) -> bool {
        match self {
            Commands::Pack(args) => args.json,
            Commands::Rank(args) => args.json,
        }
    }
}

#[derive(Args)]
struct PackArgs {
    /// Repository root (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Task description the context is collected for
    #[arg(long, short = 'p', default_value = "")]
    prompt: String,

    /// Print the result as JSON instead of the LLM-ready text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    knobs: KnobArgs,
}

#[derive(Args)]
struct RankArgs {
    /// Repository root (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Task description to score against
    #[arg(long, short = 'p', default_value = "")]
    prompt: String,

    /// Print the ranking as JSON
    #[arg(long)]
    json: bool,

    /// Show only the top N candidates
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    #[command(flatten)]
    knobs: KnobArgs,
}

/// Per-invocation overrides, applied over the `REPO_CONTEXT_*` environment
#[derive(Args)]
struct KnobArgs {
    /// Token budget for selected files
    #[arg(long, value_parser = parse_at_least_one)]
    max_tokens: Option<usize>,

    /// Maximum number of selected files
    #[arg(long, value_parser = parse_at_least_one)]
    max_files: Option<usize>,

    /// Characters read per file
    #[arg(long, value_parser = parse_at_least_one)]
    max_file_chars: Option<usize>,

    /// Directory levels scanned below the root (0 = root files only)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Result cache TTL in seconds
    #[arg(long)]
    cache_ttl: Option<u64>,
}

impl KnobArgs {
    fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(max_files) = self.max_files {
            config.max_files = max_files;
        }
        if let Some(max_file_chars) = self.max_file_chars {
            config.max_file_chars = max_file_chars;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(cache_ttl) = self.cache_ttl {
            config.cache_ttl = Duration::from_secs(cache_ttl);
        }
        config
    }
}

fn parse_at_least_one(raw: &str) -> std::result::Result<usize, String> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a whole number"))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // JSON output keeps stdout machine-readable, so it silences progress logs too
    if cli.quiet || cli.command.json() {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Rank(args) => run_rank(args),
    }
}

fn run_pack(args: PackArgs) -> Result<()> {
    let config = args.knobs.apply(EngineConfig::from_env());
    log::debug!("Engine config: {config:?}");
    let engine = ContextEngine::new(config);

    let result = engine.collect(&args.path, &args.prompt);
    if args.json {
        let body = serde_json::to_string_pretty(&result).context("serialize context result")?;
        print_stdout(&body)
    } else {
        print_stdout(&format_for_llm(&result))
    }
}

fn run_rank(args: RankArgs) -> Result<()> {
    let config = args.knobs.apply(EngineConfig::from_env());
    log::debug!("Engine config: {config:?}");
    let engine = ContextEngine::new(config);

    let mut ranking = engine
        .rank(&args.path, &args.prompt)
        .with_context(|| format!("Failed to rank files under {}", args.path.display()))?;

    if args.json {
        if let Some(limit) = args.limit {
            ranking.candidates.truncate(limit);
        }
        let body = serde_json::to_string_pretty(&ranking).context("serialize ranking")?;
        print_stdout(&body)
    } else {
        print_stdout(&render_ranking(&ranking, args.limit))
    }
}

/// Header totals always describe the whole selection; `limit` only trims the rows
fn render_ranking(ranking: &Ranking, limit: Option<usize>) -> String {
    let total = ranking.candidates.len();
    let shown = limit.map_or(total, |limit| limit.min(total));

    let mut lines = Vec::with_capacity(shown + 4);
    lines.push(format!("Keywords: {}", ranking.keywords.join(", ")));
    lines.push(format!(
        "Selected {} files, ~{} tokens (estimate)",
        ranking.selected().count(),
        ranking.estimated_tokens
    ));
    if shown < total {
        lines.push(format!("Showing top {shown} of {total} candidates"));
    }
    lines.push(format!(
        "{:>3} {:>7} {:>6} {:>7}  path",
        "sel", "score", "fan-in", "tokens"
    ));
    for candidate in ranking.candidates.iter().take(shown) {
        lines.push(format!(
            "{:>3} {:>7.1} {:>6} {:>7}  {}",
            if candidate.selected { "*" } else { "" },
            candidate.score,
            candidate.fan_in,
            candidate.estimated_tokens,
            candidate.relative_path
        ));
    }
    lines.join("\n")
}
