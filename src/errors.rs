use thiserror::Error;
use zbb_config::ConfigError;
use zbb_core::{CoreError, RepositoryError};

/// Top-level error for the CLI and embedders of the whole stack.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Failure on a read path (views, summaries, suggestions).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failure while storing records (assignment, initialization, import).
    #[error("save failed: {0}")]
    Save(CoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error("Serialization error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<RepositoryError> for BudgetError {
    fn from(err: RepositoryError) -> Self {
        Self::Core(CoreError::Repository(err))
    }
}

impl BudgetError {
    /// Wraps an error raised while writing.
    pub fn saving(err: impl Into<CoreError>) -> Self {
        Self::Save(err.into())
    }

    /// Text safe to show to the end user. Validation, authorization and
    /// not-found details are verbatim; storage internals are not exposed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(err) => core_message(err, "failed to compute budget"),
            Self::Save(err) => core_message(err, "failed to save budget"),
            Self::Config(ConfigError::Invalid(_)) => self.to_string(),
            Self::Config(_) => "failed to load configuration".into(),
            Self::Usage(message) => message.clone(),
            Self::Output(_) => "failed to render output".into(),
        }
    }
}

fn core_message(err: &CoreError, generic: &str) -> String {
    match err {
        CoreError::Unauthorized | CoreError::Validation(_) | CoreError::NotFound(_) => {
            err.to_string()
        }
        CoreError::Repository(_) | CoreError::Computation(_) => generic.to_string(),
    }
}
