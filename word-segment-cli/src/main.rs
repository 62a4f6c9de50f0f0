use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use word_segment::{
    Fallback, FrequencyModel, Keyword, KeywordScorer, LengthPenalty, Order, Search, Segmenter,
    Uniform,
};

mod config;
mod snapshot;

use config::{Config, ModelConfig, DOCUMENTS_TOTAL, USAGE_TOTAL};
use snapshot::Snapshot;

/// Split unsegmented text into its most probable words and rank them as keywords.
#[derive(Parser)]
#[command(name = "word-segment", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Word usage counts, one `word<delimiter>count` pair per line
    #[arg(long, global = true)]
    usage: Option<PathBuf>,

    /// Document-frequency counts, in the same format as the usage counts
    #[arg(long, global = true)]
    documents: Option<PathBuf>,

    /// Load both models from a snapshot written by `compile` instead of count files
    #[arg(long, global = true, conflicts_with_all = ["usage", "documents"])]
    snapshot: Option<PathBuf>,

    /// Maximum length in chars of the first word at each split point
    #[arg(long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the best segmentation of each text (or of each line on stdin)
    Segment {
        text: Vec<String>,
    },

    /// Segment each text and rank its words by TF/IDF relevance
    Keywords {
        /// Minimum document-frequency probability for a keyword
        #[arg(long)]
        threshold: Option<f64>,

        /// Sort direction for relevance scores
        #[arg(long, value_enum)]
        order: Option<SortOrder>,

        text: Vec<String>,
    },

    /// Parse the count files and write both models to a binary snapshot
    Compile {
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    Ascending,
    Descending,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => Order::Ascending,
            SortOrder::Descending => Order::Descending,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.usage {
        config.usage.path = Some(path);
    }
    if let Some(path) = cli.documents {
        config.documents.path = Some(path);
    }
    if let Some(limit) = cli.limit {
        config.segment.limit = limit;
    }

    let (usage, documents) = match &cli.snapshot {
        Some(path) => {
            let snapshot = Snapshot::load(path)?;
            (snapshot.usage, snapshot.documents)
        }
        None => {
            let usage = load_model(&config.usage, "usage", USAGE_TOTAL, LengthPenalty)?
                .ok_or_else(|| anyhow!("no usage counts given (use --usage or [usage] path)"))?;
            let documents = load_model(
                &config.documents,
                "document-frequency",
                DOCUMENTS_TOTAL,
                Uniform,
            )?;
            (usage, documents)
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Compile { output } => {
            let snapshot = Snapshot { usage, documents };
            snapshot.dump(&output)?;
            info!(path = %output.display(), "wrote snapshot");
        }

        Commands::Segment { text } => {
            let mut segmenter = Segmenter::new(usage);
            segmenter.set_limit(config.segment.limit);
            let mut search = Search::default();
            for_each_text(text, config.segment.max_chars, |text| {
                let words = segmenter.segment(text, &mut search);
                debug!(score = words.score(), "segmented");
                write_words(&mut out, &words.collect::<Vec<_>>())?;
                Ok(())
            })?;
        }

        Commands::Keywords {
            threshold,
            order,
            text,
        } => {
            let documents = documents.ok_or_else(|| {
                anyhow!("no document-frequency counts given (use --documents or [documents] path)")
            })?;
            let order = order.map(Order::from).unwrap_or(config.keywords.order);

            let mut segmenter = Segmenter::new(usage);
            segmenter.set_limit(config.segment.limit);
            let scorer = KeywordScorer::new(segmenter.model(), &documents)
                .with_threshold(threshold.unwrap_or(config.keywords.threshold));

            let mut search = Search::default();
            for_each_text(text, config.segment.max_chars, |text| {
                let words = segmenter.segment(text, &mut search).collect::<Vec<_>>();
                let keywords = scorer.extract_and_rank(words.iter().copied(), order);
                write_keywords(&mut out, &words, &keywords)?;
                Ok(())
            })?;
        }
    }

    Ok(())
}

/// Build a model from the counts file named in `config`, if any
fn load_model<F: Fallback>(
    config: &ModelConfig,
    name: &str,
    default_total: f64,
    fallback: F,
) -> Result<Option<FrequencyModel<F>>> {
    let path = match &config.path {
        Some(path) => path,
        None => return Ok(None),
    };

    let model = read_counts(path, config.delimiter, config.total_or(default_total), fallback)
        .with_context(|| format!("failed to load {} counts from {}", name, path.display()))?;
    info!(
        model = name,
        words = model.len(),
        total = model.total(),
        "loaded counts"
    );
    Ok(Some(model))
}

fn read_counts<F: Fallback>(
    path: &Path,
    delimiter: char,
    total: Option<f64>,
    fallback: F,
) -> Result<FrequencyModel<F>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(FrequencyModel::from_reader(reader, delimiter, total, fallback)?)
}

/// Run `f` on each text argument, or on each non-empty stdin line if none were given
fn for_each_text(
    texts: Vec<String>,
    max_chars: Option<usize>,
    mut f: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    if texts.is_empty() {
        return for_each_line(io::stdin().lock(), max_chars, f);
    }

    texts.iter().try_for_each(|text| {
        check_length(text, max_chars)?;
        f(text)
    })
}

/// Run `f` on each trimmed, non-empty line of `reader`
fn for_each_line<R: BufRead>(
    reader: R,
    max_chars: Option<usize>,
    mut f: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if !line.is_empty() {
            check_length(line, max_chars)?;
            f(line)?;
        }
    }
    Ok(())
}

fn check_length(text: &str, max_chars: Option<usize>) -> Result<()> {
    if let Some(max) = max_chars {
        let len = text.chars().count();
        if len > max {
            bail!("input of {} chars exceeds the limit of {}", len, max);
        }
    }
    Ok(())
}

fn write_words<W: Write>(out: &mut W, words: &[&str]) -> io::Result<()> {
    writeln!(out, "{}", words.join(" "))
}

/// Print the segmentation followed by a `TF/IDF:` block with one `  <word> <score>` line each
fn write_keywords<W: Write>(
    out: &mut W,
    words: &[&str],
    keywords: &[Keyword],
) -> io::Result<()> {
    write_words(out, words)?;
    writeln!(out, "\nTF/IDF:")?;
    for keyword in keywords {
        writeln!(out, "  {} {}", keyword.word, keyword.score)?;
    }
    Ok(())
}
