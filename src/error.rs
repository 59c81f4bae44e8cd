use thiserror::Error;

/// Main error type for Beatpath
#[derive(Error, Debug)]
pub enum BeatpathError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph or roster artifact parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// LLM API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM fallback requested but no credential was configured
    #[error("LLM service not configured.")]
    LlmNotConfigured,
}

/// Convenient Result type using BeatpathError
pub type Result<T> = std::result::Result<T, BeatpathError>;
