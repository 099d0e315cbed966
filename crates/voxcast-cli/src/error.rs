use console::style;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    /// Invalid input
    InvalidInput(String),
    /// Synthesis or transformation failure in the core pipeline
    Pipeline(voxcast_core::Error),
    /// I/O error
    Io(io::Error),
    /// Other errors
    Other(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", style(msg).yellow())
            }
            CliError::Pipeline(e) => {
                write!(f, "{}", e)
            }
            CliError::Io(e) => {
                write!(f, "I/O error: {}", e)
            }
            CliError::Other(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Pipeline(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<voxcast_core::Error> for CliError {
    fn from(e: voxcast_core::Error) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Other(e.to_string())
    }
}
