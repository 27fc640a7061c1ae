mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{AmortizeArgs, ChartArgs, PaymentArgs};

/// Loan payment and amortization schedule calculator
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan payment and amortization schedule calculator",
    long_about = "A CLI for level-payment loan calculations with decimal precision. \
                  Computes periodic installments, full amortization schedules with \
                  extra principal and early payoff, and chart-ready series."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr (RUST_LOG is honoured otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a full amortization schedule and summary
    Amortize(AmortizeArgs),
    /// Quote the periodic installment only
    Payment(PaymentArgs),
    /// Chart series: per-period split, cost and first-payment breakdowns
    Chart(ChartArgs),
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

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Chart(args) => commands::amortization::run_chart(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
