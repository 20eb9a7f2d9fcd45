use std::{
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_it_fake_preprocessing::{Credibility, FeatureSet, LinguisticExtractor, LinkReport, analyze_links};

use crate::{
    Detector, DetectorConfig, TrainingConfig, Variant, Verdict,
    config::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DATA_DIR},
    training::{CsvCorpus, SANITY_ARTICLES, Trainer, TrainingReport},
};

#[derive(Parser)]
#[command(name = "is-it-fake")]
#[command(about = "Detect fake news and explain the verdict", long_about = None)]
pub struct Cli {
    /// Directory holding the vectorizer and classifier artifacts
    #[arg(long, global = true, value_name = "DIR", env = "IS_IT_FAKE_ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    artifacts_dir: PathBuf,

    /// Which detector to train or run
    #[arg(long, global = true, value_enum, env = "IS_IT_FAKE_VARIANT", default_value_t = Variant::Enhanced)]
    variant: Variant,

    /// Use the basic linguistic features even when sentiment is available
    #[arg(long, global = true)]
    no_sentiment: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model and write its artifacts
    Train {
        /// Directory containing fake.csv and true.csv
        #[arg(long, value_name = "DIR", env = "IS_IT_FAKE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Classify a text as FAKE or REAL
    Analyze {
        #[command(flatten)]
        input: Input,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
    /// Report the credibility of links found in a text
    Links {
        #[command(flatten)]
        input: Input,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct Input {
    /// Text to analyze (if not provided, reads from stdin)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read text from file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    /// Just the label (FAKE or REAL)
    Label,
    /// The full verdict as JSON
    Json,
    /// Human-readable output with warnings and links
    Human,
}

impl Cli {
    fn feature_set(&self) -> FeatureSet {
        if self.no_sentiment {
            FeatureSet::Basic
        } else {
            FeatureSet::Enriched
        }
    }

    fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            artifacts_dir: self.artifacts_dir.clone(),
            variant: self.variant,
            enrichment: self.feature_set(),
        }
    }
}

/// Priority: text arg > file > stdin
fn read_input(input: &Input) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Train { data_dir } => train(cli, data_dir),
        Command::Analyze { input, format } => analyze(cli, input, *format),
        Command::Links { input, json } => links(input, *json),
    }
}

fn train(cli: &Cli, data_dir: &Path) -> Result<()> {
    let config = TrainingConfig {
        data_dir: data_dir.to_path_buf(),
        ..TrainingConfig::default()
    };
    let source = CsvCorpus::new(&config.data_dir, config.sample_per_class, config.seed);
    let extractor = LinguisticExtractor::resolve(cli.feature_set());

    let start = Instant::now();
    let trainer = Trainer::new(config, cli.variant, extractor.clone());
    let (trained, report) = trainer
        .train(&source, &cli.artifacts_dir)
        .context("Training failed")?;
    print_report(&report);
    eprintln!("Training time: {:?}", start.elapsed());

    let detector = Detector::from_trained(trained, &extractor)?;
    println!();
    println!("Sanity check:");
    for (text, expected) in SANITY_ARTICLES {
        let verdict = detector.analyze(text)?;
        println!("  {text}");
        println!(
            "    expected {expected}, got {} ({:.1}%)",
            verdict.label,
            verdict.confidence * 100.0
        );
        if !verdict.warning_signs.is_empty() {
            println!("    warnings: {}", verdict.warning_signs.join(", "));
        }
    }
    Ok(())
}

fn print_report(report: &TrainingReport) {
    println!("Variant: {} ({:?})", report.variant, report.layout);
    println!("Corpus: {}", report.origin);
    println!(
        "Samples: {} train / {} test, {} terms, {} features",
        report.n_train, report.n_test, report.vocab_size, report.dimension
    );
    match report.accuracy {
        Some(accuracy) => println!("Accuracy: {:.2}%", accuracy * 100.0),
        None => println!("Accuracy: n/a (no held-out rows)"),
    }
}

fn analyze(cli: &Cli, input: &Input, format: OutputFormat) -> Result<()> {
    let text = read_input(input)?;
    let detector = Detector::load(cli.detector_config());
    if !detector.is_loaded() {
        bail!(
            "No usable model in {}; run `is-it-fake train` first",
            cli.artifacts_dir.display()
        );
    }
    let verdict = detector.analyze(&text)?;
    match format {
        OutputFormat::Label => println!("{}", verdict.label),
        OutputFormat::Json => println!("{}", serde_json::to_string(&verdict)?),
        OutputFormat::Human => print_verdict(&verdict),
    }
    Ok(())
}

fn print_verdict(verdict: &Verdict) {
    println!("Result: {}", verdict.label);
    println!("Confidence: {:.1}%", verdict.confidence * 100.0);
    if !verdict.warning_signs.is_empty() {
        println!("Warning signs:");
        for warning in &verdict.warning_signs {
            println!("  - {warning}");
        }
    }
    if !verdict.links.is_empty() {
        print_links(&LinkReport {
            links: verdict.links.clone(),
            summary: verdict.link_summary,
        });
    }
}

fn print_links(report: &LinkReport) {
    let summary = &report.summary;
    println!(
        "Links: {} total, {} trusted, {} suspicious, {} unknown",
        summary.total, summary.trusted, summary.suspicious, summary.unknown
    );
    for link in &report.links {
        let marker = match link.credibility {
            Credibility::Trusted => "trusted",
            Credibility::Suspicious => "suspicious",
            Credibility::Unknown => "unknown",
        };
        println!("  [{marker}] {} ({})", link.url, link.domain);
    }
}

fn links(input: &Input, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let report = analyze_links(&text);
    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print_links(&report);
    }
    Ok(())
}
