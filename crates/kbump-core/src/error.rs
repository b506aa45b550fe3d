//! Error taxonomy for the bump pipeline.

use tool_cache::ToolCacheError;

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum BumpError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with non-zero status {code}")]
    NonZeroExit { command: String, code: i32 },

    /// The overlay edit ran but reported failure.
    #[error("Kustomize failed")]
    MutationFailed,

    #[error("tool cache error: {0}")]
    ToolCache(#[from] ToolCacheError),

    #[error("failed to update PATH: {0}")]
    PathUpdate(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, BumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = BumpError::MissingInput("name".to_string());
        assert_eq!(err.to_string(), "Input required and not supplied: name");
    }

    #[test]
    fn test_non_zero_exit_message() {
        let err = BumpError::NonZeroExit {
            command: "git push".to_string(),
            code: 128,
        };
        assert_eq!(err.to_string(), "git push exited with non-zero status 128");
    }

    #[test]
    fn test_mutation_failed_message() {
        assert_eq!(BumpError::MutationFailed.to_string(), "Kustomize failed");
    }

    #[test]
    fn test_tool_cache_error_converts() {
        let err: BumpError = ToolCacheError::DownloadFailed {
            url: "https://example.com".to_string(),
            status: 500,
        }
        .into();
        assert!(err.to_string().contains("tool cache error"));
    }
}
