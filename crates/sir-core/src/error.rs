use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("row {row} has {found} cells but the header declares {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column \"{column}\" has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read scoring profile {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scoring profile: {0}")]
    ProfileParse(#[from] serde_yaml::Error),

    #[error("invalid scoring config: {0}")]
    Validation(String),
}
