mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use ithaca_game::GameState;
use ithaca_game::constants::{MAX_PLAYERS, MIN_PLAYERS};
use ithaca_game::snapshot;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{
    GameRecord, GameplayStrategy, SimulationConfig, derive_iteration_seed, resolve_seed_inputs,
    run_game,
};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "ithaca-tester", version = "0.1.0")]
#[command(about = "Automated QA runs for the Ithaca voyage engine")]
struct Args {
    /// Base seeds to run (comma-separated, decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Players seated at every table
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Games per base seed and strategy
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Strategies to play (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = GameplayStrategy::ALL)]
    strategies: Vec<GameplayStrategy>,

    /// Stop a game after this many turns
    #[arg(long, default_value_t = 400)]
    max_turns: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Write the first game's final snapshot JSON to this path
    #[arg(long)]
    dump_state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        bail!(
            "--players must be between {MIN_PLAYERS} and {MAX_PLAYERS} (got {})",
            args.players
        );
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let (records, first_state) = run_games(&args, &seeds)?;

    write_reports(&args, &records, start_time)?;

    if let Some(path) = &args.dump_state
        && let Some(state) = &first_state
    {
        dump_state(path, state)?;
    }

    if records.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "⛵ Ithaca Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn run_games(args: &Args, seeds: &[u64]) -> Result<(Vec<GameRecord>, Option<GameState>)> {
    let mut records = Vec::new();
    let mut first_state = None;

    for strategy in &args.strategies {
        for base in seeds {
            for iteration in 0..args.iterations {
                let seed = derive_iteration_seed(*base, iteration)?;
                let config = SimulationConfig::new(*strategy, seed, args.players)
                    .with_max_turns(args.max_turns);
                let run = run_game(&config, args.verbose)
                    .with_context(|| format!("{strategy} game from base seed {base}"))?;
                if args.verbose {
                    let status = if run.record.passed() {
                        "✅".to_string()
                    } else {
                        format!("❌ {}", run.record.violations.join("; "))
                    };
                    println!(
                        "{status} [{} seed {}] {} turns, finished: {}",
                        strategy.label().green(),
                        seed,
                        run.record.turns,
                        run.record.finished
                    );
                }
                if first_state.is_none() {
                    first_state = Some(run.final_state);
                }
                records.push(run.record);
            }
        }
    }

    Ok((records, first_state))
}

fn write_reports(args: &Args, records: &[GameRecord], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records)?,
        "markdown" => {
            if records.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Ithaca Voyage Test Results\n\n_No games played._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, records)?;
            }
        }
        _ => {
            if records.is_empty() {
                writeln!(&mut output_target, "No games played.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    records,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn dump_state(path: &Path, state: &GameState) -> Result<()> {
    let json = snapshot::to_json(state)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!(target: "ithaca::tester", "final state written to {}", path.display());
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
