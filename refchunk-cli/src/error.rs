//! Error handling for refchunk CLI

use thiserror::Error;
use std::path::PathBuf;

use refchunk_core::ChunkError;

/// Main error type for refchunk CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid source argument '{argument}': {message}")]
    InvalidSource { argument: String, message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Staging store error: {message}")]
    Store { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_source<S: Into<String>>(argument: S, message: S) -> Self {
        Self::InvalidSource {
            argument: argument.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

impl From<ChunkError> for CliError {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::Io(e) => Self::io(e.to_string()),
            ChunkError::Store(message) => Self::Store { message },
            ChunkError::InvalidChunkSize(size) => {
                Self::validation(format!("chunk size {} is too small", size))
            }
            ChunkError::UnknownSource(tag) => {
                Self::invalid_source(tag, "unknown source tag".to_string())
            }
            other => Self::MalformedInput { message: other.to_string() },
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    // Add helpful suggestions based on error type
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Compressed inputs must carry a .gz extension",
                path.display()
            ));
        }

        CliError::InvalidSource { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Pass sources as tag=path, e.g. --source motif=MotifFeatures.gff.gz\n\
                 • Known tags: annotated, motif, regulatory, mirna"
            );
        }

        CliError::MalformedInput { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Annotation lines need 9 tab-separated columns\n\
                 • Attribute tokens must be written as key=value\n\
                 • Ensure the file is not corrupted or truncated"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your refchunk.toml configuration file\n\
                 • Use 'refchunk config --example' to generate a sample configuration"
            );
        }

        CliError::Store { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check free space and write permissions of the staging directory\n\
                 • Try --store memory for small annotation sets"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
