//! Configuration validation.
//!
//! Validates all config fields before a simulation runs, so invalid input
//! is rejected up front instead of failing mid-replay.

use crate::domain::error::BandtraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_data_path(config)?;
    validate_code(config)?;
    validate_initial_cash(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_window(config)?;
    validate_band_multiplier(config)?;
    validate_cash_fraction(config)?;
    validate_buy_proximity(config)?;
    validate_buy_cooldown(config)?;
    validate_max_holding_steps(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BandtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_code(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    match config.get_string("backtest", "code") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BandtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "code".to_string(),
        }),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "initial_cash", 2000.0);
    if value <= 0.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(BandtraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, BandtraderError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| BandtraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_int("strategy", "window", 20);
    // Sample stddev needs at least two observations per window.
    if value < 2 {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "window".to_string(),
            reason: "window must be at least 2".to_string(),
        });
    }
    Ok(())
}

fn validate_band_multiplier(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("strategy", "band_multiplier", 2.0);
    if value <= 0.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "band_multiplier".to_string(),
            reason: "band_multiplier must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_cash_fraction(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("strategy", "cash_fraction", 0.4);
    if value <= 0.0 || value > 1.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "cash_fraction".to_string(),
            reason: "cash_fraction must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_buy_proximity(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("strategy", "buy_proximity", 0.15);
    if !(0.0..=1.0).contains(&value) {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "buy_proximity".to_string(),
            reason: "buy_proximity must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_buy_cooldown(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_int("strategy", "buy_cooldown", 2);
    if value < 0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "buy_cooldown".to_string(),
            reason: "buy_cooldown must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_max_holding_steps(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_int("strategy", "max_holding_steps", 20);
    if value < 1 {
        return Err(BandtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "max_holding_steps".to_string(),
            reason: "max_holding_steps must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[data]
path = /tmp/prices

[backtest]
code = NVDA
initial_cash = 2000
"#;

    #[test]
    fn valid_config_passes() {
        let a = adapter(VALID);
        assert!(validate_backtest_config(&a).is_ok());
        assert!(validate_strategy_config(&a).is_ok());
    }

    #[test]
    fn missing_data_path_rejected() {
        let a = adapter("[backtest]\ncode = NVDA\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(BandtraderError::ConfigMissing { ref section, .. }) if section == "data"
        ));
    }

    #[test]
    fn missing_code_rejected() {
        let a = adapter("[data]\npath = /tmp\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(BandtraderError::ConfigMissing { ref key, .. }) if key == "code"
        ));
    }

    #[test]
    fn non_positive_initial_cash_rejected() {
        let a = adapter("[data]\npath = /tmp\n[backtest]\ncode = NVDA\ninitial_cash = 0\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(BandtraderError::ConfigInvalid { ref key, .. }) if key == "initial_cash"
        ));
    }

    #[test]
    fn bad_date_format_rejected() {
        let a = adapter("[data]\npath = /tmp\n[backtest]\ncode = NVDA\nstart_date = 01/02/2024\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(BandtraderError::ConfigInvalid { ref key, .. }) if key == "start_date"
        ));
    }

    #[test]
    fn inverted_date_range_rejected() {
        let a = adapter(
            "[data]\npath = /tmp\n[backtest]\ncode = NVDA\n\
             start_date = 2024-06-01\nend_date = 2024-01-01\n",
        );
        assert!(validate_backtest_config(&a).is_err());
    }

    #[test]
    fn window_of_one_rejected() {
        let a = adapter("[strategy]\nwindow = 1\n");
        assert!(matches!(
            validate_strategy_config(&a),
            Err(BandtraderError::ConfigInvalid { ref key, .. }) if key == "window"
        ));
    }

    #[test]
    fn cash_fraction_above_one_rejected() {
        let a = adapter("[strategy]\ncash_fraction = 1.5\n");
        assert!(matches!(
            validate_strategy_config(&a),
            Err(BandtraderError::ConfigInvalid { ref key, .. }) if key == "cash_fraction"
        ));
    }

    #[test]
    fn negative_proximity_rejected() {
        let a = adapter("[strategy]\nbuy_proximity = -0.1\n");
        assert!(validate_strategy_config(&a).is_err());
    }

    #[test]
    fn defaults_pass_when_sections_absent() {
        let a = adapter("[strategy]\n");
        assert!(validate_strategy_config(&a).is_ok());
    }
}
