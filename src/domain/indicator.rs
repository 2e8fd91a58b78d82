//! Rolling-band indicator engine.
//!
//! For every bar index the engine yields the trailing mean and trailing
//! standard deviation of the `window` most recent closes (inclusive), plus
//! the derived envelope:
//! - upper = mean + multiplier × stddev
//! - lower = mean − multiplier × stddev
//!
//! Stddev uses the *sample* convention (divides by N−1). The first
//! `window − 1` indices have insufficient history and are `None`; consumers
//! must treat `None` as "no signal", never as a fault.

use super::bar::Bar;

/// Band values at one bar index. All four fields are defined together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub mean: f64,
    pub stddev: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Compute the band series for `bars`.
///
/// Pure function of the inputs; recomputing on an identical series yields
/// identical output. Each point is a direct recomputation over its window
/// so the result matches a plain rolling-window calculation exactly, with
/// no incremental-accumulator drift.
pub fn compute_bands(bars: &[Bar], window: usize, multiplier: f64) -> Vec<Option<BandPoint>> {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = window.saturating_sub(1);

    for i in 0..bars.len() {
        if i < warmup {
            values.push(None);
            continue;
        }

        let start = i + 1 - window;
        let slice = &bars[start..=i];

        let mean: f64 = slice.iter().map(|b| b.close).sum::<f64>() / window as f64;

        let variance: f64 = slice
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;

        let stddev = variance.sqrt();

        values.push(Some(BandPoint {
            mean,
            stddev,
            upper: mean + multiplier * stddev,
            lower: mean - multiplier * stddev,
        }));
    }

    values
}
