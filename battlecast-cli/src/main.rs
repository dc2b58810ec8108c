mod reports;
mod runner;
mod scenario;

use anyhow::{Context, Result};
use battlecast_game::{Preview, StandardRules};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use runner::run_analyses;
use scenario::{ScenarioFile, expand_analyses, load_config};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Coloured summary for a terminal
    Console,
    /// Full report as pretty-printed JSON
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "battlecast", version)]
#[command(about = "Preview battle, flee and exploration odds before committing an action")]
struct Args {
    /// Scenario JSON describing the adventurer, proposed changes and beast
    #[arg(long)]
    scenario: PathBuf,

    /// Optional JSON file overriding engine thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyses to run (comma-separated: battle,flee,ambush,obstacle or all)
    #[arg(long, default_value = "all")]
    analyses: String,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Include the per-turn mass trace in console reports
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = ScenarioFile::load(&args.scenario)?;
    let config = load_config(args.config.as_deref())?;
    let preview = Preview::new(StandardRules, config).context("invalid preview configuration")?;

    let (analyses, unknown) = expand_analyses(&args.analyses);
    for name in &unknown {
        eprintln!("⚠️  Unknown analysis: {}", name.yellow());
    }
    if analyses.is_empty() {
        anyhow::bail!("no analyses selected (choose from battle, flee, ambush, obstacle, all)");
    }

    let summary = run_analyses(&preview, &scenario, &analyses)?;
    write_report(&args, &summary)
}

fn write_report(args: &Args, summary: &runner::PreviewSummary) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, summary)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut output_target, summary)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, summary, args.verbose)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
