use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No simulations have been run")]
    NotRun,

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Parameter error: {0}")]
    Params(String),
}

impl SimError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::NotRun => true, // run trials first
            SimError::Dataset(_) => true,
            SimError::Configuration(_) => false,
            SimError::Params(_) => false,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Dataset(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_run_is_recoverable() {
        assert!(SimError::NotRun.is_recoverable());
        assert!(!SimError::Configuration("mode".into()).is_recoverable());
    }

    #[test]
    fn test_display_includes_message() {
        let err = SimError::Configuration("season must be positive, got 0".into());
        assert_eq!(err.to_string(), "Configuration error: season must be positive, got 0");
    }
}
