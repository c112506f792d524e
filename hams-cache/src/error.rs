//! describe errors in Hams

use std::time::Duration;

use thiserror::Error;

/// Error type for health probes and the health check registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HamsError {
    /// A standard error with configurable message
    #[error("Generic error: `{0}`")]
    Message(String),
    /// The probe was cancelled before it completed
    #[error("Probe cancelled")]
    Cancelled,
    /// The probe did not complete within its registration timeout
    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),
    /// A probe with the same name is already registered
    #[error("Probe `{0}` is already registered")]
    DuplicateName(String),
}

impl From<&str> for HamsError {
    fn from(msg: &str) -> HamsError {
        HamsError::Message(msg.to_owned())
    }
}

impl From<String> for HamsError {
    fn from(msg: String) -> HamsError {
        HamsError::Message(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_of_errors() {
        assert_eq!(
            "Generic error: `db down`",
            HamsError::from("db down").to_string()
        );
        assert_eq!("Probe cancelled", HamsError::Cancelled.to_string());
        assert_eq!(
            "Probe timed out after 2s",
            HamsError::Timeout(Duration::from_secs(2)).to_string()
        );
        assert_eq!(
            "Probe `db` is already registered",
            HamsError::DuplicateName("db".to_owned()).to_string()
        );
    }
}
