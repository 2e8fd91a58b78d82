//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::BandtraderError;
use crate::domain::ledger::{TradeDirection, TradeEvent};
use crate::domain::report::Summary;
use crate::domain::simulation::{run_simulation, PortfolioSnapshot, SimConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Bollinger-band mean-reversion backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the code from the config file
        #[arg(long)]
        code: Option<String>,
        /// Write the portfolio-value series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the trade log to this CSV file
        #[arg(long)]
        trades: Option<PathBuf>,
        /// Validate configuration and print resolved parameters, no run
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List codes available in the data directory
    ListCodes {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a code
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            output,
            trades,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, code.as_deref(), output.as_ref(), trades.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListCodes { config } => run_list_codes(&config),
        Command::Info { config, code } => run_info(&config, code.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BandtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build a [`SimConfig`] from the `[strategy]` section plus
/// `[backtest] initial_cash`, falling back to the documented defaults.
pub fn build_sim_config(adapter: &dyn ConfigPort) -> SimConfig {
    let defaults = SimConfig::default();
    SimConfig {
        window: adapter.get_int("strategy", "window", defaults.window as i64) as usize,
        band_multiplier: adapter.get_double("strategy", "band_multiplier", defaults.band_multiplier),
        cash_fraction: adapter.get_double("strategy", "cash_fraction", defaults.cash_fraction),
        buy_proximity: adapter.get_double("strategy", "buy_proximity", defaults.buy_proximity),
        buy_cooldown: adapter.get_int("strategy", "buy_cooldown", defaults.buy_cooldown as i64)
            as usize,
        max_holding_steps: adapter.get_int(
            "strategy",
            "max_holding_steps",
            defaults.max_holding_steps as i64,
        ) as usize,
        initial_cash: adapter.get_double("backtest", "initial_cash", defaults.initial_cash),
    }
}

fn config_dates(adapter: &dyn ConfigPort) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let parse = |key: &str| {
        adapter
            .get_string("backtest", key)
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
    };
    (parse("start_date"), parse("end_date"))
}

fn run_backtest(
    config_path: &PathBuf,
    code_override: Option<&str>,
    output_path: Option<&PathBuf>,
    trades_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let sim_config = build_sim_config(&adapter);
    let code = match code_override {
        Some(c) => c.to_uppercase(),
        // Presence checked by validate_backtest_config.
        None => adapter
            .get_string("backtest", "code")
            .unwrap_or_default()
            .to_uppercase(),
    };
    let (start_date, end_date) = config_dates(&adapter);

    let data_path = adapter.get_string("data", "path").unwrap_or_default();
    let data_port = CsvAdapter::new(PathBuf::from(data_path));

    run_backtest_pipeline(
        &data_port,
        &code,
        start_date,
        end_date,
        &sim_config,
        output_path,
        trades_path,
    )
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    code: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    sim_config: &SimConfig,
    output_path: Option<&PathBuf>,
    trades_path: Option<&PathBuf>,
) -> ExitCode {
    let bars = match data_port.fetch_bars(code, start_date, end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Running backtest: {} ({} bars)", code, bars.len());

    let result = match run_simulation(&bars, sim_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let summary = Summary::compute(&result.snapshots, sim_config.initial_cash);

    if !result.trades.is_empty() {
        eprintln!("\n=== Trades ===");
        for trade in &result.trades {
            let direction = match trade.direction {
                TradeDirection::Buy => "BUY ",
                TradeDirection::Sell => "SELL",
            };
            eprintln!(
                "  {} {} {:>6} @ {:.2}",
                trade.date, direction, trade.quantity, trade.price
            );
        }
    }

    eprintln!("\n=== Results ===");
    eprintln!("Initial Cash:          ${:.2}", summary.initial_cash);
    eprintln!("Final Portfolio Value: ${:.2}", summary.final_value);
    eprintln!("Net Profit:            ${:.2}", summary.net_profit);
    eprintln!("Profit Rate:           {:.2}%", summary.profit_rate);

    if let Some(path) = output_path {
        if let Err(e) = write_snapshots_csv(path, &result.snapshots) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return (&e).into();
        }
        eprintln!("\nPortfolio values written to: {}", path.display());
    }

    if let Some(path) = trades_path {
        if let Err(e) = write_trades_csv(path, &result.trades) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return (&e).into();
        }
        eprintln!("Trade log written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn write_snapshots_csv(
    path: &PathBuf,
    snapshots: &[PortfolioSnapshot],
) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| BandtraderError::Data {
        reason: e.to_string(),
    })?;
    wtr.write_record(["date", "value"])
        .map_err(|e| BandtraderError::Data {
            reason: e.to_string(),
        })?;
    for snap in snapshots {
        wtr.write_record([snap.date.to_string(), format!("{:.2}", snap.value)])
            .map_err(|e| BandtraderError::Data {
                reason: e.to_string(),
            })?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_trades_csv(path: &PathBuf, trades: &[TradeEvent]) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| BandtraderError::Data {
        reason: e.to_string(),
    })?;
    wtr.write_record(["date", "direction", "quantity", "price"])
        .map_err(|e| BandtraderError::Data {
            reason: e.to_string(),
        })?;
    for trade in trades {
        let direction = match trade.direction {
            TradeDirection::Buy => "buy",
            TradeDirection::Sell => "sell",
        };
        wtr.write_record([
            trade.date.to_string(),
            direction.to_string(),
            trade.quantity.to_string(),
            format!("{:.2}", trade.price),
        ])
        .map_err(|e| BandtraderError::Data {
            reason: e.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let sim_config = build_sim_config(&adapter);
    let code = adapter.get_string("backtest", "code").unwrap_or_default();

    eprintln!("\nResolved parameters:");
    eprintln!("  code:              {}", code.to_uppercase());
    eprintln!("  initial_cash:      {}", sim_config.initial_cash);
    eprintln!("  window:            {}", sim_config.window);
    eprintln!("  band_multiplier:   {}", sim_config.band_multiplier);
    eprintln!("  cash_fraction:     {}", sim_config.cash_fraction);
    eprintln!("  buy_proximity:     {}", sim_config.buy_proximity);
    eprintln!("  buy_cooldown:      {}", sim_config.buy_cooldown);
    eprintln!("  max_holding_steps: {}", sim_config.max_holding_steps);

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_codes(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match adapter.get_string("data", "path") {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            eprintln!("error: missing config key [data] path");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvAdapter::new(PathBuf::from(data_path));
    let codes = match data_port.list_codes() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if codes.is_empty() {
        eprintln!("No codes found");
    } else {
        for code in &codes {
            println!("{}", code);
        }
        eprintln!("{} codes found", codes.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match adapter.get_string("data", "path") {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            eprintln!("error: missing config key [data] path");
            return ExitCode::from(2);
        }
    };

    let code = match code_override {
        Some(c) => c.to_uppercase(),
        None => match adapter.get_string("backtest", "code") {
            Some(c) => c.to_uppercase(),
            None => {
                eprintln!("error: code is required (use --code or set in config)");
                return ExitCode::from(2);
            }
        },
    };

    let data_port = CsvAdapter::new(PathBuf::from(data_path));
    match data_port.data_range(&code) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", code, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_defaults_when_keys_absent() {
        let adapter = FileConfigAdapter::from_string("[backtest]\ncode = NVDA\n").unwrap();
        let config = build_sim_config(&adapter);
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn sim_config_overrides() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ninitial_cash = 5000\n\
             [strategy]\nwindow = 10\nband_multiplier = 1.5\ncash_fraction = 0.25\n\
             buy_proximity = 0.1\nbuy_cooldown = 3\nmax_holding_steps = 15\n",
        )
        .unwrap();
        let config = build_sim_config(&adapter);

        assert_eq!(config.window, 10);
        assert_eq!(config.band_multiplier, 1.5);
        assert_eq!(config.cash_fraction, 0.25);
        assert_eq!(config.buy_proximity, 0.1);
        assert_eq!(config.buy_cooldown, 3);
        assert_eq!(config.max_holding_steps, 15);
        assert_eq!(config.initial_cash, 5000.0);
    }

    #[test]
    fn config_dates_parse_and_ignore_invalid() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2024-01-02\nend_date = garbage\n",
        )
        .unwrap();
        let (start, end) = config_dates(&adapter);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(end, None);
    }
}
