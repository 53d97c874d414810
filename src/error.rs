use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrrigationError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(
        "Please fill in all fields and fetch weather data (missing or invalid: {})",
        .0.join(", ")
    )]
    IncompleteInput(Vec<&'static str>),

    #[error("Unknown crop type: {0}")]
    UnknownCrop(String),

    #[error("Unknown growth stage: {0}")]
    UnknownGrowthStage(String),

    #[error("Division by zero: {0} must be greater than zero")]
    DivisionByZero(&'static str),
}

pub type Result<T> = std::result::Result<T, IrrigationError>;
