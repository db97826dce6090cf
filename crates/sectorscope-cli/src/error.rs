use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] sectorscope_core::ValidationError),

    #[error(transparent)]
    Universe(#[from] sectorscope_core::UniverseError),

    #[error("upstream error: {0}")]
    Source(#[from] sectorscope_core::SourceError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("report error: {0}")]
    Report(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Universe(_) => 3,
            Self::Source(_) => 4,
            Self::Command(_) | Self::Serialization(_) | Self::Report(_) | Self::Io(_) => 10,
        }
    }
}
