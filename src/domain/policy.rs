//! Per-step decision state machine.
//!
//! Each step evaluates the buy rule first, then the sell rule, against the
//! same bar's price and band values. The sell rule sees the ledger state
//! left by the buy phase, including a freshly overwritten entry index. That
//! sequential same-step mutation is part of the engine's contract and must
//! not be split across steps.

use chrono::NaiveDate;

use super::indicator::BandPoint;
use super::ledger::{Ledger, TradeEvent};

/// Trading-rule constants. All values are overridable configuration; the
/// defaults live in [`super::simulation::SimConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyParams {
    /// Fraction of current cash allocated per buy.
    pub cash_fraction: f64,
    /// Buy when the price sits within this fraction of the band spread
    /// above the lower band.
    pub buy_proximity: f64,
    /// Minimum steps between consecutive buys.
    pub buy_cooldown: usize,
    /// Holding periods longer than this switch the exit to the
    /// mean-reversion branch.
    pub max_holding_steps: usize,
}

/// Evaluate one bar. Appends any resulting trades to `trades` in execution
/// order (buy before sell).
pub fn evaluate_step(
    ledger: &mut Ledger,
    trades: &mut Vec<TradeEvent>,
    index: usize,
    date: NaiveDate,
    price: f64,
    band: Option<BandPoint>,
    params: &PolicyParams,
) {
    // Buy phase. An undefined band means insufficient history: no signal.
    // A collapsed band (zero spread) carries no proximity information and
    // is likewise no signal.
    if let Some(b) = band {
        let spread = b.mean - b.lower;
        let near_lower = spread > 0.0 && price - b.lower <= params.buy_proximity * spread;
        let cooled_down = match ledger.last_entry {
            None => true,
            Some(entry) => index - entry >= params.buy_cooldown,
        };

        if near_lower && cooled_down {
            if let Some(event) = ledger.buy(index, date, price, params.cash_fraction) {
                trades.push(event);
            }
        }
    }

    // Sell phase, using the post-buy ledger state. A buy on this same bar
    // has holding period 0 and is checked against the upper band.
    if ledger.position > 0 {
        if let (Some(entry), Some(b)) = (ledger.last_entry, band) {
            let holding = index - entry;
            let exit = if holding > params.max_holding_steps {
                price > b.mean
            } else {
                price > b.upper
            };

            if exit {
                if let Some(event) = ledger.sell(date, price) {
                    trades.push(event);
                }
            }
        }
    }
}
