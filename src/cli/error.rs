//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),

    #[error("course not found: {0}")]
    NotFound(String),

    #[error("course {0} is already in the index")]
    Duplicate(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::NotFound(_) => crate::exitcode::NOT_FOUND,
            CliError::Duplicate(_) => crate::exitcode::DATAERR,
            CliError::Application(e) => match e {
                ApplicationError::Io { .. } => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follow_sysexits() {
        let io = CliError::from(ApplicationError::io(
            "write",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ));
        assert_eq!(io.exit_code(), crate::exitcode::IOERR);
        assert_eq!(
            CliError::NotFound("X".into()).exit_code(),
            crate::exitcode::NOT_FOUND
        );
        assert_eq!(
            CliError::Usage("bad".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
