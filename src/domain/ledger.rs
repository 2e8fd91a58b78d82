//! Position ledger: cash, share count, and entry timing.

use chrono::NaiveDate;

/// Direction of a trade event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// One executed trade. Immutable once appended to the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub direction: TradeDirection,
    pub quantity: u64,
    pub price: f64,
}

/// Cash balance, share position, and the bar index of the most recent buy.
///
/// Owned exclusively by one simulation run and mutated only through
/// [`Ledger::buy`] and [`Ledger::sell`], so cash can never go negative and
/// the position can never go below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub cash: f64,
    pub position: u64,
    pub last_entry: Option<usize>,
}

impl Ledger {
    pub fn new(initial_cash: f64) -> Self {
        Ledger {
            cash: initial_cash,
            position: 0,
            last_entry: None,
        }
    }

    /// Buy whole shares with `cash_fraction` of the *current* cash balance.
    ///
    /// `shares = floor(cash * cash_fraction / price)`. When that rounds to
    /// zero no mutation happens and `None` is returned ("no trade", not an
    /// error). On a fill the entry index is overwritten even if a position
    /// is already open, resetting the holding-period clock to the latest
    /// entry.
    pub fn buy(
        &mut self,
        index: usize,
        date: NaiveDate,
        price: f64,
        cash_fraction: f64,
    ) -> Option<TradeEvent> {
        let allocation = self.cash * cash_fraction;
        let shares = (allocation / price).floor() as u64;

        if shares == 0 {
            return None;
        }

        self.cash -= shares as f64 * price;
        self.position += shares;
        self.last_entry = Some(index);

        Some(TradeEvent {
            date,
            direction: TradeDirection::Buy,
            quantity: shares,
            price,
        })
    }

    /// Liquidate the entire position at `price`. Partial sells are not
    /// supported.
    ///
    /// Calling this with no open position is a defect in the caller's
    /// guards: fatal in debug builds, a no-op in release.
    pub fn sell(&mut self, date: NaiveDate, price: f64) -> Option<TradeEvent> {
        debug_assert!(self.position > 0, "sell with zero position");
        if self.position == 0 {
            return None;
        }

        let quantity = self.position;
        self.cash += quantity as f64 * price;
        self.position = 0;
        self.last_entry = None;

        Some(TradeEvent {
            date,
            direction: TradeDirection::Sell,
            quantity,
            price,
        })
    }

    /// Total portfolio value at `price`: cash + position × price.
    pub fn valuate(&self, price: f64) -> f64 {
        self.cash + self.position as f64 * price
    }
}
