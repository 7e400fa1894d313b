//! Stryktips CLI - Command-line interface for building and backtesting systems

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use stryktips::backtesting::{analyze_by_cover, correct_distribution, BacktestConfig, BacktestSimulator};
use stryktips::core::{
    OptimizationResult, ReductionStrategy, RiskLevel, RiskProfile, SystemOptimizer,
};
use stryktips::data::{load_coupon, load_history};
use stryktips::models::{MatchInput, MatchProbability, MatchSelection, Outcome, PredictResponse};
use stryktips::predictor::{overround, OddsPredictor, ProbabilitySource};

const DEFAULT_BUDGET: u64 = 100;
const DEFAULT_ROUND_SIZE: usize = 13;

#[derive(Parser)]
#[command(name = "stryktips")]
#[command(author, version, about = "Stryktipset system optimizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a system for a coupon file (.json or .csv)
    Optimize {
        /// Path to the coupon file
        #[arg(short, long)]
        coupon: PathBuf,

        /// Maximum number of rows (overrides the coupon)
        #[arg(short, long)]
        budget: Option<u64>,

        /// Risk level: low, medium or high (overrides the coupon)
        #[arg(short, long)]
        risk: Option<String>,

        /// Seed for the random fallback of matches without odds
        #[arg(long)]
        seed: Option<u64>,

        /// Re-rank candidates after every removal
        #[arg(long)]
        rerank: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the thresholds of every risk level
    Profiles,
    /// Replay historical matches as coupons and score the systems
    Backtest {
        /// CSV with HomeTeam, AwayTeam, FTR and AvgH/AvgD/AvgA columns
        #[arg(short, long)]
        data: PathBuf,

        /// Matches per coupon
        #[arg(long, default_value_t = DEFAULT_ROUND_SIZE)]
        round_size: usize,

        /// Maximum number of rows per coupon
        #[arg(short, long, default_value_t = DEFAULT_BUDGET)]
        budget: u64,

        /// Risk level: low, medium or high
        #[arg(short, long, default_value = "medium")]
        risk: String,

        /// Seed for the random fallback of matches without odds
        #[arg(long)]
        seed: Option<u64>,

        /// Re-rank candidates after every removal
        #[arg(long)]
        rerank: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.interactive {
        print_banner();
        run_interactive()?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Optimize {
                coupon,
                budget,
                risk,
                seed,
                rerank,
                json,
            } => {
                if !json {
                    print_banner();
                }
                run_optimize(&coupon, budget, risk, seed, strategy(rerank), json)?;
            }
            Commands::Profiles => {
                print_banner();
                print_profiles();
            }
            Commands::Backtest {
                data,
                round_size,
                budget,
                risk,
                seed,
                rerank,
            } => {
                print_banner();
                run_backtest(&data, round_size, budget, &risk, seed, strategy(rerank))?;
            }
        }
    } else {
        print_banner();
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        format!("Stryktips CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold()
    );
    println!();
}

fn strategy(rerank: bool) -> ReductionStrategy {
    if rerank {
        ReductionStrategy::Rerank
    } else {
        ReductionStrategy::SinglePass
    }
}

fn build_predictor(seed: Option<u64>) -> OddsPredictor {
    match seed {
        Some(seed) => OddsPredictor::with_seed(seed),
        None => OddsPredictor::new(),
    }
}

/// Build and print a system for a coupon file
fn run_optimize(
    coupon_path: &Path,
    budget: Option<u64>,
    risk: Option<String>,
    seed: Option<u64>,
    strategy: ReductionStrategy,
    json: bool,
) -> Result<()> {
    let coupon = load_coupon(coupon_path)
        .with_context(|| format!("Failed to load coupon from {:?}", coupon_path))?;

    let budget = budget.or(coupon.budget).unwrap_or(DEFAULT_BUDGET);
    let risk = risk
        .or(coupon.risk_level)
        .unwrap_or_else(|| RiskLevel::default().to_string());

    let predictor = build_predictor(seed);
    let predictions = predictor.predict(&coupon.matches);

    let result = SystemOptimizer::new(budget, &risk)
        .and_then(|optimizer| optimizer.with_strategy(strategy).optimize(&predictions))
        .map_err(|e| {
            if e.is_configuration() {
                anyhow!("{} (check --budget/--risk or the coupon file)", e)
            } else {
                anyhow::Error::new(e).context(format!("Failed to optimize coupon {:?}", coupon_path))
            }
        })?;

    if json {
        let response = PredictResponse {
            predictions,
            system: result.system,
            cost: result.cost,
            expected_value: result.expected_value,
            win_probability: result.win_probability,
            composition: result.composition,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{}: {} matches / budget {} / risk {}",
        "Optimizing".green(),
        coupon.matches.len(),
        budget,
        risk
    );
    println!();

    print_predictions(&coupon.matches, &predictions);
    print_system(&result, budget);

    Ok(())
}

fn print_predictions(inputs: &[MatchInput], predictions: &[MatchProbability]) {
    println!("{}", "Probabilities:".yellow().bold());
    println!(
        "{:>3} {:<36} {:>7} {:>7} {:>7} {:>8}",
        "#", "Match", "1", "X", "2", "Margin"
    );
    println!("{}", "-".repeat(72));

    for (i, (input, pred)) in inputs.iter().zip(predictions).enumerate() {
        let margin = match (input.avg_home, input.avg_draw, input.avg_away) {
            (Some(h), Some(d), Some(a)) => format!("{:>7.1}%", overround(h, d, a) * 100.0),
            _ => format!("{:>8}", "-".dimmed()),
        };
        println!(
            "{:>3} {:<36} {:>6.1}% {:>6.1}% {:>6.1}% {}",
            i + 1,
            truncate_name(&format!("{} - {}", pred.home_team, pred.away_team), 36),
            pred.probabilities.home * 100.0,
            pred.probabilities.draw * 100.0,
            pred.probabilities.away * 100.0,
            margin
        );
    }
    println!();
}

fn selection_cell(selection: &MatchSelection, outcome: Outcome) -> String {
    if selection.contains(outcome) {
        format!("{:^3}", outcome.code()).green().bold().to_string()
    } else {
        format!("{:^3}", ".").dimmed().to_string()
    }
}

fn print_system(result: &OptimizationResult, budget: u64) {
    println!("{}", "System:".yellow().bold());
    println!(
        "{:>3} {:<36} {:^3} {:^3} {:^3} {:>9}",
        "#", "Match", "1", "X", "2", "Covered"
    );
    println!("{}", "-".repeat(62));

    for s in &result.system {
        println!(
            "{:>3} {:<36} {} {} {} {:>8.1}%",
            s.match_index,
            truncate_name(&format!("{} - {}", s.home_team, s.away_team), 36),
            selection_cell(s, Outcome::Home),
            selection_cell(s, Outcome::Draw),
            selection_cell(s, Outcome::Away),
            s.covered_probability() * 100.0
        );
    }
    println!("{}", "-".repeat(62));

    let cost = if result.within_budget {
        result.cost.to_string().green()
    } else {
        result.cost.to_string().red()
    };
    println!("Rows: {} (budget {})", cost, budget);
    println!(
        "Singles / doubles / triples: {} / {} / {}",
        result.composition.singles, result.composition.doubles, result.composition.triples
    );
    if !result.composition.within_caps {
        println!("{}", "Composition exceeds the risk profile caps".yellow());
    }
    println!("Win probability: {:.4}%", result.win_probability * 100.0);

    let ev = format!("{:+.2}", result.expected_value);
    if result.expected_value >= 0.0 {
        println!("Expected value: {}", ev.green());
    } else {
        println!("Expected value: {}", ev.red());
    }
}

fn print_profiles() {
    println!("{}", "Risk profiles:".yellow().bold());
    println!(
        "{:<8} {:>12} {:>12} {:>12} {:>12}",
        "Level", "Lock at", "Max doubles", "Max triples", "Value at"
    );
    println!("{}", "-".repeat(60));

    for profile in RiskProfile::all() {
        println!(
            "{:<8} {:>11.0}% {:>12} {:>12} {:>12.2}",
            profile.level.as_str(),
            profile.min_prob_for_single * 100.0,
            profile.max_doubles,
            profile.max_triples,
            profile.value_threshold
        );
    }
}

/// Run a backtest over a historical CSV
fn run_backtest(
    data_path: &Path,
    round_size: usize,
    budget: u64,
    risk: &str,
    seed: Option<u64>,
    strategy: ReductionStrategy,
) -> Result<()> {
    println!("{}", "Running backtest...".green());

    let config = BacktestConfig {
        round_size,
        budget,
        risk_level: risk.parse()?,
        strategy,
    };

    println!("Round size: {}", config.round_size);
    println!("Budget: {}", config.budget);
    println!("Risk level: {}", config.risk_level);
    if let Some(seed) = seed {
        println!("Seed: {}", seed);
    }
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Loading data and running backtest...");

    let history = load_history(data_path)
        .with_context(|| format!("Failed to load history from {:?}", data_path))?;

    let simulator = BacktestSimulator::new(config, Box::new(build_predictor(seed)));
    let result = simulator
        .run(&history)
        .with_context(|| "Backtest failed")?;

    pb.finish_and_clear();

    // Print results
    simulator.print_summary(&result);

    // Additional analysis
    if !result.rounds.is_empty() {
        println!("\n{}", "Analysis by Cover:".yellow().bold());
        println!(
            "{:>12} {:>8} {:>8} {:>10} {:>12}",
            "Cover", "Matches", "Hits", "Hit Rate", "Avg Covered"
        );
        println!("{}", "-".repeat(54));
        for a in analyze_by_cover(&result.rounds) {
            println!(
                "{:>12} {:>8} {:>8} {:>9.1}% {:>11.1}%",
                a.key,
                a.matches,
                a.hits,
                a.hit_rate * 100.0,
                a.avg_covered_probability * 100.0
            );
        }

        println!("\n{}", "Correct per Round:".yellow().bold());
        println!("{:>8} {:>8}", "Correct", "Rounds");
        println!("{}", "-".repeat(17));
        for (correct, rounds) in correct_distribution(&result.rounds) {
            println!("{:>8} {:>8}", correct, rounds);
        }
    }

    Ok(())
}

fn run_interactive() -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Choose Quit to exit.\n");

    let theme = ColorfulTheme::default();
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(|l| l.as_str()).collect();

    loop {
        let options = vec!["Optimize a coupon", "Show risk profiles", "Backtest", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let coupon: String = Input::with_theme(&theme)
                    .with_prompt("Coupon file (.json or .csv)")
                    .interact_text()?;

                let budget: u64 = Input::with_theme(&theme)
                    .with_prompt("Budget (rows)")
                    .default(DEFAULT_BUDGET)
                    .interact_text()?;

                let risk = Select::with_theme(&theme)
                    .with_prompt("Risk level")
                    .items(&levels)
                    .default(1)
                    .interact()?;

                println!();
                if let Err(e) = run_optimize(
                    Path::new(&coupon),
                    Some(budget),
                    Some(levels[risk].to_string()),
                    None,
                    ReductionStrategy::default(),
                    false,
                ) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            1 => {
                println!();
                print_profiles();
                println!();
            }
            2 => {
                let data: String = Input::with_theme(&theme)
                    .with_prompt("History CSV")
                    .interact_text()?;

                let round_size: usize = Input::with_theme(&theme)
                    .with_prompt("Matches per round")
                    .default(DEFAULT_ROUND_SIZE)
                    .interact_text()?;

                let budget: u64 = Input::with_theme(&theme)
                    .with_prompt("Budget (rows)")
                    .default(DEFAULT_BUDGET)
                    .interact_text()?;

                println!();
                if let Err(e) = run_backtest(
                    Path::new(&data),
                    round_size,
                    budget,
                    RiskLevel::default().as_str(),
                    None,
                    ReductionStrategy::default(),
                ) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            3 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
