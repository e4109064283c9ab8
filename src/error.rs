use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config value for `{key}`: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error(
        "not allowed type for {axis}. Only allowed \"time\", \"linear\" or \"categorical\". Got: {value}"
    )]
    UnsupportedAxisType { axis: &'static str, value: String },

    #[error("datasource failure: {0}")]
    Datasource(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("websocket transport error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    pub(crate) fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
