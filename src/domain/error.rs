//! Domain error types.

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("series too short: have {bars} bars, need at least {minimum}")]
    TooShortSeries { bars: usize, minimum: usize },

    #[error("timestamps not strictly increasing at bar {index}")]
    NonIncreasingTimestamps { index: usize },

    #[error("non-positive closing price {price} at bar {index}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::Data { .. } => 3,
            BandtraderError::TooShortSeries { .. }
            | BandtraderError::NonIncreasingTimestamps { .. }
            | BandtraderError::NonPositivePrice { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
