use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid container size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid time key `{key}`: {reason}")]
    InvalidTimeKey { key: String, reason: String },

    #[error("unknown chart id {0}")]
    UnknownChart(u64),

    #[error("unknown series id {0}")]
    UnknownSeries(u64),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}
