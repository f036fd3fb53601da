mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::exchange::ExchangeArgs;
use commands::lending::{CompareLoansArgs, HardMoneyArgs};
use commands::monte_carlo::SimulateArgs;
use commands::partnership::JointVentureArgs;
use commands::solver::{IrrArgs, NpvArgs};

/// Real-estate investment analysis
#[derive(Parser)]
#[command(
    name = "rei",
    version,
    about = "Real-estate investment analysis",
    long_about = "A CLI for analyzing rental-property investments. Runs Monte Carlo \
                  simulations over rent, expense, and appreciation assumptions, and \
                  covers hard-money loans, loan comparisons, 1031 exchanges, and \
                  joint-venture waterfalls."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Monte Carlo rental-investment simulation
    Simulate(SimulateArgs),
    /// Solve the internal rate of return for a cash-flow series
    Irr(IrrArgs),
    /// Net present value of a cash-flow series at a given rate
    Npv(NpvArgs),
    /// Analyze a hard-money (fix-and-flip) loan
    HardMoney(HardMoneyArgs),
    /// Compare financing offers by lifetime cost
    CompareLoans(CompareLoansArgs),
    /// Analyze a like-kind (IRC 1031) exchange
    #[command(name = "exchange-1031")]
    Exchange1031(ExchangeArgs),
    /// Run a joint-venture distribution waterfall
    JointVenture(JointVentureArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::monte_carlo::run_simulate(args),
        Commands::Irr(args) => commands::solver::run_irr(args),
        Commands::Npv(args) => commands::solver::run_npv(args),
        Commands::HardMoney(args) => commands::lending::run_hard_money(args),
        Commands::CompareLoans(args) => commands::lending::run_compare_loans(args),
        Commands::Exchange1031(args) => commands::exchange::run_exchange(args),
        Commands::JointVenture(args) => commands::partnership::run_joint_venture(args),
        Commands::Version => {
            println!("rei {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
