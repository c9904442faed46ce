//! Headless slot session runner
//!
//! Usage:
//!   reel-sim play --spins 100            - Play a session, logging signals
//!   reel-sim play --config my.yaml       - Use a custom machine config
//!   reel-sim rtp --spins 100000 --json   - Estimate RTP and hit rate
//!   reel-sim eval c,c,c,c,c g,g,g,x,x h,v,d,f,g - Evaluate a fixed grid
//!   reel-sim config                      - Print the default config as JSON

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use reel_core::{
    Grid, PaylineEngine, REEL_COUNT, ROW_COUNT, SessionStats, SlotConfig, SlotError, SlotMachine,
    SlotSignal, SpinRequest, TURBO_FACTOR,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "reel-sim", about = "Five-reel slot session runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct MachineArgs {
    /// Machine config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Halve all reel durations
    #[arg(long)]
    turbo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins frame by frame, logging every signal
    Play {
        #[command(flatten)]
        machine: MachineArgs,

        /// Number of spins to request
        #[arg(short = 'n', long, default_value_t = 10)]
        spins: u64,

        /// Simulated frame rate
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Run many spins and report session statistics
    Rtp {
        #[command(flatten)]
        machine: MachineArgs,

        /// Number of spins to run
        #[arg(short = 'n', long, default_value_t = 10_000)]
        spins: u64,

        /// Top up the balance instead of stopping when it runs out
        #[arg(long)]
        unlimited: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a grid given as rows of comma-separated symbol ids, top row first
    Eval {
        /// Machine config supplying symbols, roll price and pay tiers
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exactly three rows, e.g. `c,c,c,g,h`
        #[arg(num_args = ROW_COUNT, required = true)]
        rows: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a config as JSON
    Config {
        /// Config to normalize (defaults to the built-in classic machine)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { machine, spins, fps } => play(&machine, spins, fps),
        Commands::Rtp {
            machine,
            spins,
            unlimited,
            json,
        } => rtp(&machine, spins, unlimited, json),
        Commands::Eval { config, rows, json } => eval(config.as_deref(), &rows, json),
        Commands::Config { config } => print_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SlotConfig> {
    match path {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(SlotConfig::default()),
    }
}

fn build_machine(args: &MachineArgs) -> Result<SlotMachine> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.turbo {
        config.timing = config.timing.scaled(TURBO_FACTOR);
    }
    SlotMachine::new(config).context("Invalid machine config")
}

fn frame_duration(fps: u32) -> Result<Duration> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    Ok(Duration::from_secs_f64(1.0 / f64::from(fps)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLAY
// ═══════════════════════════════════════════════════════════════════════════════

fn play(args: &MachineArgs, spins: u64, fps: u32) -> Result<()> {
    let frame = frame_duration(fps)?;
    let mut machine = build_machine(args)?;
    log::info!(
        "Each spin lasts {:.2}s at {fps} fps",
        machine
            .config()
            .timing
            .total_spin_duration(REEL_COUNT)
            .as_secs_f64()
    );

    for spin in 1..=spins {
        match machine.request_spin()? {
            SpinRequest::Accepted => {}
            SpinRequest::InsufficientFunds => {
                println!("Out of funds after {} spins", spin - 1);
                break;
            }
            SpinRequest::SpinInProgress => bail!("spin {spin} requested while reels were moving"),
        }

        let mut frames = 0u64;
        while machine.is_spinning() {
            machine.tick(frame)?;
            frames += 1;
            for signal in machine.drain_signals() {
                log_signal(frames, &signal);
            }
        }

        let Some(grid) = machine.last_grid() else {
            bail!("spin {spin} settled without a grid");
        };
        println!("Spin {spin} ({frames} frames)");
        for row in grid.rows() {
            let cells: Vec<&str> = row.iter().map(|s| s.as_str()).collect();
            println!("  {}", cells.join(" "));
        }
        if let Some(result) = machine.last_result() {
            for line in &result.lines {
                println!(
                    "  line {}: {} x{} pays {:.2}",
                    line.line_index, line.symbol, line.match_count, line.win_amount
                );
            }
        }
        println!("  balance {:.2}", machine.balance());
    }

    print_stats(machine.stats());
    Ok(())
}

fn log_signal(frame: u64, signal: &SlotSignal) {
    match signal {
        SlotSignal::ReelStopped { reel_index } => {
            log::debug!("[frame {frame}] reel {reel_index} stopped");
        }
        SlotSignal::SmallWin { amount } | SlotSignal::BigWin { amount } => {
            log::info!("[frame {frame}] {} {amount:.2}", signal.type_name());
        }
        _ => log::debug!("[frame {frame}] {}", signal.type_name()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RTP
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct RtpReport<'a> {
    spins: u64,
    rtp_percent: f64,
    hit_rate_percent: f64,
    final_balance: f64,
    stats: &'a SessionStats,
}

fn rtp(args: &MachineArgs, spins: u64, unlimited: bool, json: bool) -> Result<()> {
    // Outcome odds do not depend on frame rate, so settle in coarse steps
    let frame = Duration::from_millis(100);
    let mut machine = build_machine(args)?;
    let roll_price = machine.config().roll_price;

    for _ in 0..spins {
        if unlimited && !machine.can_afford_spin() {
            machine.deposit(roll_price);
        }
        if !machine.request_spin()?.is_accepted() {
            log::warn!("Stopping early: balance {:.2}", machine.balance());
            break;
        }
        machine.run_until_settled(frame)?;
        machine.drain_signals();
    }

    let stats = machine.stats();
    if json {
        let report = RtpReport {
            spins: stats.total_spins,
            rtp_percent: stats.rtp(),
            hit_rate_percent: stats.hit_rate(),
            final_balance: machine.balance(),
            stats,
        };
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        print_stats(stats);
        println!("Final balance: {:.2}", machine.balance());
    }
    Ok(())
}

fn print_stats(stats: &SessionStats) {
    println!("Spins:    {}", stats.total_spins);
    println!("Bet:      {:.2}", stats.total_bet);
    println!("Won:      {:.2}", stats.total_win);
    println!("RTP:      {:.2}%", stats.rtp());
    println!("Hit rate: {:.2}%", stats.hit_rate());
    println!("Big wins: {}", stats.big_wins);
    println!("Max win:  {:.2}", stats.max_win);
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVAL
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_grid(rows: &[String]) -> Result<Grid> {
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.split(',').map(str::trim).collect())
        .collect();
    Grid::from_rows(&cells).context("Grid must be 3 rows of 5 comma-separated symbols")
}

fn eval(path: Option<&Path>, rows: &[String], json: bool) -> Result<()> {
    let config = load_config(path)?;
    let alphabet = Arc::new(config.alphabet()?);
    let grid = parse_grid(rows)?;

    let unknown = grid.find_unknown(&alphabet).map(|(pos, id)| (pos, id.clone()));
    if let Some((pos, id)) = &unknown {
        log::warn!("Symbol '{id}' at row {}, reel {} is not in the alphabet", pos.row, pos.reel);
    }

    let engine = PaylineEngine::new(alphabet, config.roll_price, config.pay_tiers);
    let result = match engine.evaluate(&grid) {
        Ok(result) => result,
        Err(SlotError::UnknownSymbol(id)) => match unknown {
            Some((pos, _)) => bail!(
                "Unknown symbol '{id}' forms a paying run (first unknown cell: row {}, reel {})",
                pos.row,
                pos.reel
            ),
            None => bail!("Unknown symbol '{id}' forms a paying run"),
        },
        Err(e) => return Err(e.into()),
    };

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{out}");
        return Ok(());
    }

    for line in &result.lines {
        println!(
            "line {}: {} x{} pays {:.2}",
            line.line_index, line.symbol, line.match_count, line.win_amount
        );
    }
    println!(
        "Total: {:.2} ({:?})",
        result.total,
        result.win_class(config.big_win_threshold)
    );
    Ok(())
}

fn print_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    println!("{}", config.to_json()?);
    Ok(())
}
