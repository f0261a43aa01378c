//! Process exit codes.
//!
//! - 0: Success (scan completed, with or without duplicates found)
//! - 1: General error (unexpected failure)
//! - 2: No valid input paths were supplied
//! - 130: Interrupted by user (Ctrl+C)

/// Exit codes for the dedupr application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The scan (and optional purge) completed normally. Finding no
    /// duplicates is still a success.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// None of the supplied paths exist.
    NoValidPaths = 2,
    /// The operation was interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix used in error messages.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::NoValidPaths => "DD002",
            Self::Interrupted => "DD130",
        }
    }
}
