//! Simulation driver: replays a bar series through the trading policy.

use chrono::NaiveDate;

use super::bar::{validate_series, Bar};
use super::error::BandtraderError;
use super::indicator::compute_bands;
use super::ledger::{Ledger, TradeEvent};
use super::policy::{evaluate_step, PolicyParams};

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub window: usize,
    pub band_multiplier: f64,
    pub cash_fraction: f64,
    pub buy_proximity: f64,
    pub buy_cooldown: usize,
    pub max_holding_steps: usize,
    pub initial_cash: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            window: 20,
            band_multiplier: 2.0,
            cash_fraction: 0.4,
            buy_proximity: 0.15,
            buy_cooldown: 2,
            max_holding_steps: 20,
            initial_cash: 2000.0,
        }
    }
}

impl SimConfig {
    fn policy_params(&self) -> PolicyParams {
        PolicyParams {
            cash_fraction: self.cash_fraction,
            buy_proximity: self.buy_proximity,
            buy_cooldown: self.buy_cooldown,
            max_holding_steps: self.max_holding_steps,
        }
    }
}

/// Portfolio value at one processed bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything a run produces: the ordered trade log, one snapshot per
/// processed bar (aligned to indices 1..N−1), and the final ledger state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub trades: Vec<TradeEvent>,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub ledger: Ledger,
}

/// Replay `bars` in chronological order through the decision policy.
///
/// Bands are precomputed for the whole series, then each bar from index 1
/// onward is fed to the policy and valued. Index 0 can never have a valid
/// trailing indicator and serves only as the series' starting reference
/// point. Deterministic: identical inputs produce identical output.
pub fn run_simulation(bars: &[Bar], config: &SimConfig) -> Result<SimulationResult, BandtraderError> {
    validate_series(bars)?;

    let bands = compute_bands(bars, config.window, config.band_multiplier);
    let params = config.policy_params();

    let mut ledger = Ledger::new(config.initial_cash);
    let mut trades = Vec::new();
    let mut snapshots = Vec::with_capacity(bars.len() - 1);

    for (i, bar) in bars.iter().enumerate().skip(1) {
        evaluate_step(
            &mut ledger,
            &mut trades,
            i,
            bar.date,
            bar.close,
            bands[i],
            &params,
        );

        snapshots.push(PortfolioSnapshot {
            date: bar.date,
            value: ledger.valuate(bar.close),
        });
    }

    Ok(SimulationResult {
        trades,
        snapshots,
        ledger,
    })
}
