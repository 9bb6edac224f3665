use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use longform::corpus::write_stats;
use longform::discovery::DiscoveryConfig;
use longform::matcher::read_exclusion_file;
use longform::{
    extract_from_collection, extract_from_file, replace_in_file, AbbrevMatcher,
    AbbreviationIndex, MatchScope, MatcherConfig, TextDirSource,
};

#[derive(Parser, Debug)]
#[command(name = "longform")]
#[command(about = "Discover and expand bracketed abbreviations in biomedical text")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    matcher: MatcherArgs,
}

#[derive(clap::Args, Debug)]
struct MatcherArgs {
    /// TOML file with matcher settings; the flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shortest accepted abbreviation
    #[arg(long, global = true)]
    min_len: Option<usize>,

    /// Longest accepted abbreviation
    #[arg(long, global = true)]
    max_len: Option<usize>,

    /// Look-back limit for the nearest-word fallback
    #[arg(long, global = true)]
    long_version_max: Option<usize>,

    /// Abbreviation to always reject (repeatable)
    #[arg(long = "exclude", global = true)]
    exclude: Vec<String>,

    /// File of abbreviations to reject, one per line
    #[arg(long, global = true)]
    exclude_file: Option<PathBuf>,

    /// Verbose logging and ambiguity warnings
    #[arg(long, global = true)]
    debug: bool,

    /// Abort on the first unreadable document
    #[arg(long, global = true)]
    fail_fast: bool,
}

impl MatcherArgs {
    fn build_config(&self) -> Result<MatcherConfig> {
        let mut config = match &self.config {
            Some(path) => MatcherConfig::load(path)?,
            None => MatcherConfig::default(),
        };
        if let Some(min_len) = self.min_len {
            config.min_len = min_len;
        }
        if let Some(max_len) = self.max_len {
            config.max_len = max_len;
        }
        if let Some(long_version_max) = self.long_version_max {
            config.long_version_max = long_version_max;
        }
        config = config.with_excluded(self.exclude.iter().cloned());
        if let Some(path) = &self.exclude_file {
            config = config.with_excluded(read_exclusion_file(path)?);
        }
        config.debug |= self.debug;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover abbreviation pairs in a file or a directory of .txt documents
    Extract {
        /// File or directory to scan
        path: PathBuf,

        /// File of document ids (one per line) to read from the directory
        #[arg(long)]
        ids: Option<PathBuf>,

        /// Reset the matcher between documents
        #[arg(long)]
        per_document: bool,

        /// Also read documents from subdirectories
        #[arg(long)]
        recursive: bool,

        /// Write the index JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Per-document stats output file
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },
    /// Replace abbreviations in a file with their resolved long forms
    Replace {
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Apply a previously extracted index instead of discovering pairs in the file
        #[arg(long)]
        corpus_index: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: stdout carries results, so structured logs go to stderr
    let level = if args.matcher.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let fail_fast = args.matcher.fail_fast;
    let mut matcher = AbbrevMatcher::new(args.matcher.build_config()?)?;

    match args.command {
        Command::Extract { path, ids, per_document, recursive, out, stats_out } => {
            let scope = if per_document { MatchScope::PerDocument } else { MatchScope::Corpus };
            let discovery = DiscoveryConfig { fail_fast, recursive, ..DiscoveryConfig::default() };
            let index = run_extract(&mut matcher, &path, ids, scope, discovery, stats_out).await?;
            let json = serde_json::to_string_pretty(&index)?;
            write_output(out.as_deref(), &format!("{json}\n")).await
        }
        Command::Replace { file, out, corpus_index } => {
            let output = run_replace(&mut matcher, &file, corpus_index.as_deref()).await?;
            write_output(out.as_deref(), &output).await
        }
    }
}

async fn run_extract(
    matcher: &mut AbbrevMatcher,
    path: &Path,
    ids: Option<PathBuf>,
    scope: MatchScope,
    discovery: DiscoveryConfig,
    stats_out: Option<PathBuf>,
) -> Result<AbbreviationIndex> {
    if path.is_file() {
        let index = extract_from_file(matcher, path).await?;
        return Ok(index.clone());
    }
    if !path.is_dir() {
        bail!("Input path does not exist: {}", path.display());
    }

    let fail_fast = discovery.fail_fast;
    let source = match ids {
        Some(id_file) => TextDirSource::from_id_file(path, id_file).await?,
        None => TextDirSource::discover(path, discovery).await?,
    };

    let report = extract_from_collection(matcher, &source, scope, fail_fast).await?;
    if let Some(stats_path) = stats_out {
        write_stats(&stats_path, &report).await?;
        info!("Wrote stats to {}", stats_path.display());
    }
    Ok(report.index)
}

async fn run_replace(
    matcher: &mut AbbrevMatcher,
    file: &Path,
    corpus_index: Option<&Path>,
) -> Result<String> {
    let Some(index_path) = corpus_index else {
        return replace_in_file(matcher, file).await;
    };

    let content = tokio::fs::read_to_string(index_path)
        .await
        .with_context(|| format!("Cannot read index {}", index_path.display()))?;
    let index: AbbreviationIndex = serde_json::from_str(&content)
        .with_context(|| format!("Invalid index JSON in {}", index_path.display()))?;
    matcher.load_index(&index);

    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Cannot read {}", file.display()))?;
    Ok(matcher.apply_index(&text))
}

async fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Cannot write {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
