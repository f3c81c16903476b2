use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a result record from being produced at all.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },
    #[error("no files found in {}", dir.display())]
    NoUploads { dir: PathBuf },
    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("{program} is not available ({hint})")]
    EngineUnavailable {
        program: String,
        hint: &'static str,
    },
    #[error("{program} failed on {}: {message}", path.display())]
    Engine {
        program: String,
        path: PathBuf,
        message: String,
    },
}

impl ScanError {
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn engine(
        program: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Engine {
            program: program.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } | Self::NoUploads { .. } => 2,
            Self::Decode { .. } | Self::EngineUnavailable { .. } | Self::Engine { .. } => 3,
        }
    }
}

pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ScanError>())
        .map(ScanError::exit_code)
        .unwrap_or(1)
}
