//! Keiba CLI - build, settle and summarize parimutuel bets

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use keiba::data::{load_bet, load_bets, load_payout_table, load_roster, PayoutParser};
use keiba::{
    settle_detailed, Bet, BetStatus, BettingSummary, CombinationBuilder, Entry, HouseRules,
    PayoutTable, Selection, SettlementOutcome, WagerType,
};

#[derive(Parser)]
#[command(name = "keiba")]
#[command(author, version, about = "Parimutuel bet builder and settlement CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Single,
    Box,
    Formation,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and price a bet
    Build {
        /// Wager type (exacta, umatan, 馬単, ...)
        #[arg(short, long)]
        wager: WagerType,

        /// Purchase method
        #[arg(short, long, value_enum, default_value = "single")]
        method: MethodArg,

        /// Entries: "1,2,3"; formation groups are separated by '/': "1,2/3/4,5"
        #[arg(short, long)]
        entries: String,

        /// Stake per combination in yen
        #[arg(short, long, default_value = "100")]
        stake: u64,

        /// Race card JSON
        #[arg(short, long)]
        roster: PathBuf,

        /// Write the bet as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Settle a bet against official payouts
    Settle {
        /// Bet JSON produced by `build`
        #[arg(short, long)]
        bet: PathBuf,

        /// Payout table (JSON, or payout text with --text)
        #[arg(short, long)]
        payouts: PathBuf,

        /// Read payouts as official payout text
        #[arg(long)]
        text: bool,

        /// Write the settled bet as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert official payout text to a JSON payout table
    ParsePayouts {
        /// Payout text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Hit rate and recovery rate over settled bets
    Summary {
        /// JSON array of bets
        #[arg(short, long)]
        bets: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            wager,
            method,
            entries,
            stake,
            roster,
            output,
        } => run_build(wager, method, &entries, stake, &roster, output.as_deref()),
        Commands::Settle {
            bet,
            payouts,
            text,
            output,
        } => run_settle(&bet, &payouts, text, output.as_deref()),
        Commands::ParsePayouts { input, output } => run_parse(&input, output.as_deref()),
        Commands::Summary { bets } => run_summary(&bets),
    }
}

/// Parse "1,2,3" into entries
fn parse_entries(raw: &str) -> Result<Vec<Entry>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Entry>()
                .with_context(|| format!("Invalid entry number {:?}", s))
        })
        .collect()
}

fn parse_selection(method: MethodArg, raw: &str) -> Result<Selection> {
    let selection = match method {
        MethodArg::Single => Selection::Single(parse_entries(raw)?),
        MethodArg::Box => Selection::Box(parse_entries(raw)?),
        MethodArg::Formation => {
            let groups = raw
                .split('/')
                .map(parse_entries)
                .collect::<Result<Vec<_>>>()?;
            Selection::Formation(groups)
        }
    };
    Ok(selection)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    println!("{} {}", "Saved:".green(), path.display());
    Ok(())
}

fn run_build(
    wager: WagerType,
    method: MethodArg,
    entries: &str,
    stake: u64,
    roster_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let selection = parse_selection(method, entries)?;
    let roster = load_roster(roster_path)
        .with_context(|| format!("Failed to load roster from {:?}", roster_path))?;

    let builder = CombinationBuilder::new(HouseRules::from_env());
    let bet = match builder.build(wager, &selection, &roster, stake) {
        Ok(bet) => bet,
        Err(e) => bail!("{}", e.to_string().red()),
    };

    print_bet(&bet);

    if let Some(path) = output {
        write_json(path, &bet)?;
    }

    Ok(())
}

fn print_bet(bet: &Bet) {
    println!(
        "{} {} ({}) / {}",
        "Bet:".yellow().bold(),
        bet.wager_type.label(),
        bet.wager_type,
        bet.method
    );
    println!("{}", "-".repeat(40));

    for (i, combination) in bet.combinations.iter().enumerate() {
        println!("{:>4}  {:<10} {:>7}円", i + 1, combination.to_string(), bet.unit_stake);
    }

    println!("{}", "-".repeat(40));
    println!(
        "{} {}点 x {}円 = {}円",
        "Total:".bold(),
        bet.combination_count(),
        bet.unit_stake,
        bet.total_cost.to_string().cyan().bold()
    );
}

fn run_settle(bet_path: &Path, payouts_path: &Path, text: bool, output: Option<&Path>) -> Result<()> {
    let mut bet =
        load_bet(bet_path).with_context(|| format!("Failed to load bet from {:?}", bet_path))?;

    let parsed = if text {
        PayoutParser::new().parse_file(payouts_path)
    } else {
        load_payout_table(payouts_path)
    };
    let table: PayoutTable =
        parsed.with_context(|| format!("Failed to load payouts from {:?}", payouts_path))?;

    if bet.status.is_settled() {
        bail!("Bet is already settled ({:?})", bet.status);
    }

    let outcome = match settle_detailed(&bet, &table) {
        Some(settlement) => {
            for hit in &settlement.hits {
                println!(
                    "{} {} @ {}/100 -> {}円",
                    "的中".green().bold(),
                    hit.combination,
                    hit.rate_per_100,
                    hit.amount
                );
            }
            settlement.outcome()
        }
        None => SettlementOutcome::NotSettleable,
    };

    bet.apply(outcome)?;

    match (bet.status, bet.payout) {
        (BetStatus::Won, Some(payout)) => println!(
            "{} payout {}円 (cost {}円)",
            "WON".green().bold(),
            payout,
            bet.total_cost
        ),
        (BetStatus::Lost, _) => println!("{} (cost {}円)", "LOST".red().bold(), bet.total_cost),
        _ => println!(
            "{}",
            format!("No {} payouts yet; bet stays pending", bet.wager_type.label()).dimmed()
        ),
    }

    if let Some(path) = output {
        write_json(path, &bet)?;
    }

    Ok(())
}

fn run_parse(input: &Path, output: Option<&Path>) -> Result<()> {
    let table = PayoutParser::new()
        .parse_file(input)
        .with_context(|| format!("Failed to parse payouts from {:?}", input))?;

    for wager in table.wager_types() {
        println!(
            "{:<6} {} entries",
            wager.label(),
            table.entries_for(wager).len()
        );
    }

    match output {
        Some(path) => write_json(path, &table)?,
        None => println!("{}", serde_json::to_string_pretty(&table)?),
    }

    Ok(())
}

fn run_summary(bets_path: &Path) -> Result<()> {
    let bets =
        load_bets(bets_path).with_context(|| format!("Failed to load bets from {:?}", bets_path))?;
    let summary = BettingSummary::from_bets(&bets);

    println!("\n{}", "=".repeat(50));
    println!("{}", "BETTING SUMMARY".bold());
    println!("{}", "=".repeat(50));
    println!("Total bets: {}", summary.total_bets);
    println!("Settled: {}  Pending: {}", summary.settled_bets, summary.pending_bets);
    println!("Winning bets: {}", summary.winning_bets);
    println!("{}", "-".repeat(50));
    println!("Total stake: {}円", summary.total_stake);
    println!("Total payout: {}円", summary.total_payout);
    let profit = format!("{}円", summary.net_profit);
    println!(
        "Net profit: {}",
        if summary.net_profit >= 0 {
            profit.green()
        } else {
            profit.red()
        }
    );
    println!("Hit rate: {:.1}%", summary.hit_rate * 100.0);
    println!("回収率 (recovery): {:.1}%", summary.recovery_rate * 100.0);

    if !summary.by_wager.is_empty() {
        println!("{}", "-".repeat(50));
        println!(
            "{:<8} {:>5} {:>5} {:>10} {:>10} {:>8}",
            "券種", "bets", "wins", "stake", "payout", "回収率"
        );
        for row in &summary.by_wager {
            println!(
                "{:<8} {:>5} {:>5} {:>10} {:>10} {:>7.1}%",
                row.wager_type.label(),
                row.bets,
                row.wins,
                row.stake,
                row.payout,
                row.recovery_rate * 100.0
            );
        }
    }

    println!("{}", "=".repeat(50));
    Ok(())
}
