use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use platter_core::{Catalog, Recommendation};
use platter_gateway::{Gateway, GatewayConfig, SessionId, TurnStats, BUDGET_BANDS};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod chat;

/// Platter - conversational meal recommendations from a menu catalog
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gateway configuration file (.toml or .json). Falls back to $PLATTER_CONFIG
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// JSONL turn log: appended to by chat and recommend, read by stats
    #[arg(long, value_name = "FILE", global = true)]
    turn_log: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation
    Chat {
        /// Menu catalog (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
    },

    /// Recommend a set of dishes for a single request
    Recommend {
        /// Menu catalog (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// What the diner said
        #[arg(long)]
        text: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check a catalog file for structural problems
    Validate {
        /// Menu catalog (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
    },

    /// Tag market-price items and clean beverage tags
    Normalize {
        /// Menu catalog (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Rewrite the catalog file in place
        #[arg(long)]
        write: bool,
    },

    /// Summarise the preferences recorded in the --turn-log file
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Chat { catalog } => {
            let gateway = build_gateway(&cli)?;
            gateway.reload(&load_catalog(catalog)?);
            chat::run(&gateway).await?;
            gateway.shutdown();
        }
        Commands::Recommend {
            catalog,
            text,
            json,
        } => {
            let gateway = build_gateway(&cli)?;
            gateway.reload(&load_catalog(catalog)?);
            let rec = gateway.handle_turn(&SessionId::new(), text)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                print_recommendation(&rec);
            }
        }
        Commands::Validate { catalog } => {
            let content = std::fs::read_to_string(catalog)
                .with_context(|| format!("cannot read {}", catalog.display()))?;
            match Catalog::from_json_str(&content) {
                Ok(parsed) => {
                    let classified = platter_core::ClassifiedCatalog::new(&parsed);
                    println!(
                        "{} {} categories, {} items",
                        "valid:".green().bold(),
                        parsed.categories().len(),
                        parsed.item_count()
                    );
                    for (role, count) in classified.role_counts() {
                        println!("   {:<8} {}", role.as_str(), count);
                    }
                }
                Err(e) => {
                    println!("{} {}", "invalid:".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Normalize { catalog, write } => {
            let mut parsed = load_catalog(catalog)?;
            let stats = parsed.normalize();
            println!("market-price tagged: {}", stats.market_price_tagged);
            println!("saltiness tags removed: {}", stats.removed_salt_tags);

            if *write && stats.changed() {
                parsed
                    .write_to(catalog)
                    .with_context(|| format!("cannot write {}", catalog.display()))?;
                println!("{} {}", "rewrote".green(), catalog.display());
            } else if *write {
                println!("nothing to rewrite");
            }
        }
        Commands::Stats { json } => {
            let log = cli
                .turn_log
                .as_ref()
                .context("stats needs --turn-log <FILE>")?;
            let stats = platter_gateway::summarize(log)
                .with_context(|| format!("cannot read turn log {}", log.display()))?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn build_gateway(cli: &Cli) -> anyhow::Result<Gateway> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("PLATTER_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => GatewayConfig::from_file(&path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => GatewayConfig::default(),
    };
    if let Some(turn_log) = &cli.turn_log {
        config = config.with_turn_log(turn_log);
    }

    Ok(Gateway::new(config)?)
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    Catalog::from_path(path).with_context(|| format!("cannot load catalog {}", path.display()))
}

fn print_stats(stats: &TurnStats) {
    if stats.turns == 0 {
        println!("{}", "No turns recorded yet.".yellow());
        return;
    }
    println!("turns: {}  sessions: {}", stats.turns, stats.sessions);
    if stats.skipped_lines > 0 {
        println!("{} {}", "skipped lines:".yellow(), stats.skipped_lines);
    }

    println!("\n{}", "Budget".bold());
    if stats.budget_bands.iter().all(|n| *n == 0) {
        println!("   no budgets mentioned");
    }
    for (label, count) in BUDGET_BANDS.iter().zip(stats.budget_bands) {
        if count > 0 {
            println!("   {:<10} {}", label, count);
        }
    }

    println!("\n{}", "Drinks".bold());
    println!("   {:<10} {}", "wanted", stats.drinks_wanted);
    println!("   {:<10} {}", "declined", stats.drinks_declined);
    println!("   {:<10} {}", "unmentioned", stats.drinks_unmentioned);

    println!("\n{}", "Spice".bold());
    if stats.spice_levels.is_empty() {
        println!("   no spice preferences");
    }
    for (level, count) in &stats.spice_levels {
        println!("   {:<10} {}", level, count);
    }

    if stats.over_budget > 0 {
        println!("\n{} {}", "over-budget fallbacks:".red(), stats.over_budget);
    }
}

pub(crate) fn print_recommendation(rec: &Recommendation) {
    if rec.is_empty() {
        println!("{}", rec.notes.as_deref().unwrap_or("No recommendation.").yellow());
        return;
    }

    for (i, item) in rec.items.iter().enumerate() {
        println!(
            "  {}. {} {} - {} {}",
            i + 1,
            item.name.bold(),
            format!("({})", item.category).dimmed(),
            item.price_label(),
            format!("[{}]", item.reason).cyan()
        );
    }

    let total = format!("Estimated total: ${:.0}", rec.total_cost);
    match rec.meta.budget {
        Some(budget) if rec.over_budget => {
            println!("{} (budget ${:.0})", total.red().bold(), budget)
        }
        Some(budget) => println!("{} (budget ${:.0})", total.green().bold(), budget),
        None => println!("{}", total.bold()),
    }
    if let Some(notes) = &rec.notes {
        println!("{}", notes.yellow());
    }
}
