use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
