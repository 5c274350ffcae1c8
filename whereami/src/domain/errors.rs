//! Structured error types for whereami
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Every variant is an ordinary resolution failure: the public resolver turns
//! them into an empty result, never a process-fatal error.

use super::types::Pid;
use crate::locate::Capability;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Kernel identity of the executable for {pid} unavailable: {reason}")]
    TextImageUnavailable { pid: Pid, reason: String },

    #[error("{0} is not available on this platform")]
    Unsupported(Capability),

    #[error("{strategy} query failed: {source}")]
    Query {
        strategy: Capability,
        #[source]
        source: std::io::Error,
    },

    #[error("{strategy} result still truncated after {attempts} attempts")]
    Truncated { strategy: Capability, attempts: usize },

    #[error("Process has no argv[0]")]
    MissingArgv0,

    #[error("No candidate matched the running executable")]
    NoMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_image_error_display() {
        let err = ResolveError::TextImageUnavailable {
            pid: Pid(1234),
            reason: "no text entry".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kernel identity of the executable for PID:1234 unavailable: no text entry"
        );
    }

    #[test]
    fn test_truncated_error_display() {
        let err = ResolveError::Truncated { strategy: Capability::KernelPathSysctl, attempts: 3 };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("sysctl"));
    }
}
