mod assets;
mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use assets::{FileLoader, TesterAssets};
use logic::{GameplayStrategy, RunRecord, resolve_seed_inputs, run_batch, summarize};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for a terminal
    Console,
    /// Every run plus per-policy summaries
    Json,
    /// Summary table for pasting into docs
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "niuma-tester", version)]
#[command(about = "Automated playthroughs and balance reports for the Niuma card game")]
struct Args {
    /// Policies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    policies: String,

    /// List all available policies and exit
    #[arg(long)]
    list_policies: bool,

    /// Seeds to run (comma-separated, decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of runs per seed and policy
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Stop a run that survives this many days
    #[arg(long, default_value_t = 30)]
    max_days: u32,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rules JSON overriding the default balance
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Content JSON replacing the embedded tables
    #[arg(long)]
    content: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_policies(&args)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let strategies = expand_policies(&args.policies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let loader = FileLoader {
        rules_path: args.rules.clone(),
        content_path: args.content.clone(),
    };
    let assets = TesterAssets::load(&loader).context("loading tester assets")?;
    info!(
        "running {} policies x {} seeds x {} iterations",
        strategies.len(),
        seeds.len(),
        args.iterations
    );

    let records = run_batch(&assets, &strategies, &seeds, args.iterations, args.max_days)?;
    write_reports(&args, &records, start_time)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn maybe_list_policies(args: &Args) -> Result<bool> {
    if !args.list_policies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available policies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            strategy.label().to_lowercase(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🐂 Niuma Automated Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn expand_policies(raw: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        match GameplayStrategy::from_str(&token, true) {
            Ok(strategy) => strategies.push(strategy),
            Err(_) => bail!("unknown policy: {token}"),
        }
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        bail!("no policies selected");
    }
    Ok(strategies)
}

fn write_reports(args: &Args, records: &[RunRecord], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let summaries = summarize(records);

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, &summaries, records)?;
        }
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, &summaries)?;
        }
        ReportFormat::Console => {
            if records.is_empty() {
                writeln!(&mut output_target, "No runs executed.")?;
            }
            logic::reports::generate_console_report(
                &mut output_target,
                &summaries,
                start_time.elapsed(),
            )?;
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
