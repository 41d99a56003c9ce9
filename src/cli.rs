//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::StratError;
use crate::domain::market::{MarketData, Signal};
use crate::domain::rule::Rule;
use crate::domain::sandbox::Sandbox;
use crate::domain::sandbox_config::SandboxConfig;
use crate::domain::strategy::Strategy;
use crate::domain::strategy_parser;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "stratlang", about = "Trading strategy DSL parser and evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a strategy and print its canonical JSON form
    Parse { file: PathBuf },
    /// Check a strategy for syntax errors
    Validate {
        file: PathBuf,
        /// Also run the sandbox's structural and content checks
        #[arg(long)]
        sandbox: bool,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Evaluate a strategy against a signal and local market data
    Eval {
        #[arg(short, long)]
        strategy: PathBuf,
        /// Directory holding <SYMBOL>.csv price files
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "")]
        signal: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Parse { file } => run_parse(&file),
        Command::Validate {
            file,
            sandbox,
            config,
        } => run_validate(&file, sandbox, config.as_deref()),
        Command::Eval {
            strategy,
            data,
            symbol,
            signal,
            config,
        } => run_eval(&strategy, &data, &symbol, &signal, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_strategy(path: &Path) -> Result<Strategy, StratError> {
    let code = fs::read_to_string(path)?;
    Ok(strategy_parser::parse(&code)?)
}

/// Sandbox limits from an INI file, or the defaults when no file is given.
pub fn load_sandbox(config_path: Option<&Path>) -> Result<Sandbox, StratError> {
    let config = match config_path {
        Some(path) => {
            let adapter =
                FileConfigAdapter::from_file(path).map_err(|e| StratError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            SandboxConfig::from_config(&adapter)?
        }
        None => SandboxConfig::default(),
    };
    Ok(Sandbox::new(config))
}

/// Loads everything `eval` needs and runs the sandboxed evaluation.
pub fn evaluate_file(
    strategy_path: &Path,
    data_dir: &Path,
    symbol: &str,
    signal: &str,
    config_path: Option<&Path>,
) -> Result<(Strategy, Option<Rule>), StratError> {
    let sandbox = load_sandbox(config_path)?;
    let strategy = load_strategy(strategy_path)?;
    let market = fetch_market(&CsvAdapter::new(data_dir.to_path_buf()), symbol)?;
    let fired = sandbox.evaluate_strategy(&strategy, &Signal::new(signal), &market)?;
    Ok((strategy, fired))
}

/// Snapshot for `symbol`, naming the available symbols when it is unknown.
pub fn fetch_market(port: &dyn MarketDataPort, symbol: &str) -> Result<MarketData, StratError> {
    let symbols = port.list_symbols()?;
    if !symbols.iter().any(|s| s == symbol) {
        let available = if symbols.is_empty() {
            "none".to_string()
        } else {
            symbols.join(", ")
        };
        return Err(StratError::MarketData {
            reason: format!("unknown symbol {} (available: {})", symbol, available),
        });
    }
    port.fetch_market_data(symbol)
}

fn run_parse(path: &Path) -> Result<(), StratError> {
    let strategy = load_strategy(path)?;
    println!("{}", strategy_parser::to_json(&strategy)?);
    Ok(())
}

fn run_validate(path: &Path, sandbox: bool, config_path: Option<&Path>) -> Result<(), StratError> {
    let code = fs::read_to_string(path)?;

    if let Some(err) = strategy_parser::validate(&code).into_iter().next() {
        eprintln!("{}: invalid strategy", path.display());
        return Err(err.into());
    }

    if sandbox {
        let strategy = strategy_parser::parse(&code)?;
        load_sandbox(config_path)?.validate_strategy(&strategy)?;
    }

    println!("ok");
    Ok(())
}

fn run_eval(
    strategy_path: &Path,
    data_dir: &Path,
    symbol: &str,
    signal: &str,
    config_path: Option<&Path>,
) -> Result<(), StratError> {
    let (strategy, fired) = evaluate_file(strategy_path, data_dir, symbol, signal, config_path)?;
    let report = json!({
        "strategy": strategy.name,
        "fired": fired.is_some(),
        "actions": fired.map(|rule| rule.actions).unwrap_or_default(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
