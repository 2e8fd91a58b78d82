//! Run summary: final value, net profit, profit rate.

use super::simulation::PortfolioSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub initial_cash: f64,
    pub final_value: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of initial cash.
    pub profit_rate: f64,
}

impl Summary {
    /// Pure function of the snapshot series and the starting cash. An empty
    /// series means no bar was ever processed, so the final value is the
    /// initial cash itself.
    pub fn compute(snapshots: &[PortfolioSnapshot], initial_cash: f64) -> Self {
        let final_value = snapshots.last().map(|s| s.value).unwrap_or(initial_cash);
        let net_profit = final_value - initial_cash;
        let profit_rate = net_profit * 100.0 / initial_cash;

        Summary {
            initial_cash,
            final_value,
            net_profit,
            profit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(day: u32, value: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            value,
        }
    }

    #[test]
    fn profitable_run() {
        let snapshots = vec![snapshot(1, 2100.0), snapshot(2, 2400.0), snapshot(3, 2500.0)];
        let summary = Summary::compute(&snapshots, 2000.0);

        assert!((summary.final_value - 2500.0).abs() < f64::EPSILON);
        assert!((summary.net_profit - 500.0).abs() < f64::EPSILON);
        assert!((summary.profit_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn losing_run() {
        let snapshots = vec![snapshot(1, 1800.0)];
        let summary = Summary::compute(&snapshots, 2000.0);

        assert!((summary.net_profit - (-200.0)).abs() < f64::EPSILON);
        assert!((summary.profit_rate - (-10.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_series_falls_back_to_initial_cash() {
        let summary = Summary::compute(&[], 2000.0);

        assert!((summary.final_value - 2000.0).abs() < f64::EPSILON);
        assert!((summary.net_profit - 0.0).abs() < f64::EPSILON);
        assert!((summary.profit_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uses_last_snapshot_only() {
        let snapshots = vec![snapshot(1, 9000.0), snapshot(2, 2200.0)];
        let summary = Summary::compute(&snapshots, 2000.0);

        assert!((summary.final_value - 2200.0).abs() < f64::EPSILON);
    }
}
