use thiserror::Error;

/// O-Saft docker tooling error types
#[derive(Error, Debug)]
pub enum OsaftError {
    /// Invalid invocation (missing arguments, missing mode operand)
    #[error("Usage error: {0}")]
    Usage(String),

    /// No recognised mode was given
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Invalid or incomplete build configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local archive does not match its expected digest
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// The transient working directory is left over from an earlier run
    #[error("Working directory already exists: {0}")]
    WorkdirExists(String),

    /// The transient working directory could not be created
    #[error("Cannot create working directory {path}: {message}")]
    WorkdirCreate { path: String, message: String },

    /// The container engine returned a non-zero status
    #[error("Engine command failed (exit {code}): {command}")]
    EngineFailed { command: String, code: i32 },

    /// The container engine could not be started at all
    #[error("Cannot execute '{program}': {message}")]
    EngineSpawn { program: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OsaftError {
    /// Process exit code reported for this error.
    ///
    /// Engine failures propagate the engine's own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::WorkdirExists(_) | Self::WorkdirCreate { .. } => 2,
            Self::UnknownMode(_) => 4,
            Self::EngineFailed { code, .. } => *code,
            Self::Config(_)
            | Self::ChecksumMismatch { .. }
            | Self::EngineSpawn { .. }
            | Self::Io(_)
            | Self::Serialization(_) => 1,
        }
    }
}

impl From<serde_yaml::Error> for OsaftError {
    fn from(err: serde_yaml::Error) -> Self {
        OsaftError::Serialization(err.to_string())
    }
}

/// Result type alias for O-Saft docker operations
pub type Result<T> = std::result::Result<T, OsaftError>;
