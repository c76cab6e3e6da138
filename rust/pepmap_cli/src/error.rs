use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    PepMap(#[from] pepmap::PepMapError),

    #[error("Error interpreting the config: {0}")]
    Config(String),
}
