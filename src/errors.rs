use thiserror::Error;

/// `NetgripError` enumerates every failure class a netgrip operation can
/// surface. Operations that return a [`crate::response::CommandResult`]
/// normally fold these into the result's `error` field; callers opting in
/// to `fail_on_error` receive them directly.
#[derive(Debug, Error)]
pub enum NetgripError {
    /// Transport-level connection failure: refused, unroutable, DNS, TCP,
    /// or PTY allocation.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Authentication failed, or every algorithm profile in the fallback
    /// chain was exhausted without a successful handshake.
    #[error("authentication or algorithm negotiation failed: {0}")]
    AuthOrAlgorithm(String),

    /// No prompt was observed within the operation deadline. Carries
    /// whatever output was collected before the deadline expired.
    #[error("timed out waiting for prompt after {elapsed_millis} ms")]
    Timeout {
        /// Milliseconds spent before giving up.
        elapsed_millis: u64,
        /// Output collected up to the deadline.
        collected: Vec<u8>,
    },

    /// The device produced output but nothing recognizable as a prompt.
    #[error("no recognizable prompt in device output: {0}")]
    PromptNotFound(String),

    /// Could not enter or exit configuration mode.
    #[error("configuration mode transition failed: {0}")]
    ConfigMode(String),

    /// A commit was rejected on a commit-based platform.
    #[error("commit rejected: {0}")]
    Commit(String),

    /// A vendor error marker matched in command output.
    #[error("device reported command failure: {0}")]
    Command(String),

    /// A confirmation dialogue did not match the expected pattern.
    #[error("unexpected confirmation dialogue: {0}")]
    ConfirmationMismatch(String),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Canceled,

    /// The device-type tag is not in the dispatch table. Carries the list
    /// of supported tags for the caller's benefit.
    #[error("unsupported device type '{tag}' (supported: {supported})")]
    UnsupportedDevice {
        /// The tag that failed lookup.
        tag: String,
        /// Comma-joined supported tags.
        supported: String,
    },

    /// An operation was attempted before a successful `connect`.
    #[error("session is not connected")]
    NotConnected,

    /// Anything that does not fit the taxonomy above -- lock poisoning,
    /// invalid utf-8 in places it must not be, internal invariant breaks.
    #[error("{0}")]
    Internal(String),
}

impl NetgripError {
    /// A short stable tag for the error kind, useful in
    /// [`crate::response::CommandResult`] error fields and in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match *self {
            Self::Connect(_) => "connect",
            Self::AuthOrAlgorithm(_) => "auth",
            Self::Timeout { .. } => "timeout",
            Self::PromptNotFound(_) => "prompt_not_found",
            Self::ConfigMode(_) => "config_mode",
            Self::Commit(_) => "commit",
            Self::Command(_) => "command",
            Self::ConfirmationMismatch(_) => "confirmation",
            Self::Canceled => "canceled",
            Self::UnsupportedDevice { .. } => "unsupported_device",
            Self::NotConnected => "not_connected",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NetgripError;

    #[test]
    fn timeout_carries_partial_output() {
        let err = NetgripError::Timeout {
            elapsed_millis: 5_000,
            collected: b"partial".to_vec(),
        };

        match err {
            NetgripError::Timeout { collected, .. } => {
                assert_eq!(collected, b"partial");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn unsupported_device_lists_tags() {
        let err = NetgripError::UnsupportedDevice {
            tag: String::from("cisco_iois"),
            supported: String::from("cisco_ios, cisco_nxos"),
        };

        assert!(err.to_string().contains("cisco_iois"));
        assert!(err.to_string().contains("cisco_nxos"));
    }
}
