use chrono::offset::Utc;
use chrono::{
    DateTime,
    Duration,
};
use serde::Serialize;

/// `CommandResult` is the value produced by every session operation --
/// both the single-command kind (`send_command`) and the aggregated kind
/// (`send_config`). A *failed* result means the device reported a problem
/// (an error marker matched, a confirmation mismatched); unrecoverable
/// engine errors are returned as [`crate::errors::NetgripError`] instead
/// when `fail_on_error` is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// The command (or newline-joined commands) sent to the device.
    pub command: String,
    /// Sanitized output of the operation.
    pub output: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error description when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The device-type tag of the session that produced this result.
    pub device_type: String,
    /// The host the session was connected to.
    pub host: String,
    /// Start of the operation.
    pub timestamp: DateTime<Utc>,
    /// Wall-clock duration of the operation in milliseconds.
    pub execution_time_millis: i64,
    /// Connection attempts burned before the transport came up, when the
    /// operation had to (re)connect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_retries: Option<u32>,
    /// Command retries burned on timeouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_retries: Option<u32>,
    #[serde(skip)]
    started: DateTime<Utc>,
}

impl CommandResult {
    /// Initializes a new `CommandResult` stamped with the current time.
    /// The result starts out failed; recording output or an error settles
    /// it.
    #[must_use]
    pub fn new(
        command: &str,
        device_type: &str,
        host: &str,
    ) -> Self {
        let now = Utc::now();

        Self {
            command: command.to_owned(),
            output: String::new(),
            success: false,
            error: None,
            device_type: device_type.to_owned(),
            host: host.to_owned(),
            timestamp: now,
            execution_time_millis: 0,
            connection_retries: None,
            command_retries: None,
            started: now,
        }
    }

    /// Record a successful operation's sanitized output and close out the
    /// timing.
    pub fn record(
        &mut self,
        output: String,
    ) {
        self.finish();
        self.output = output;
        self.success = true;
        self.error = None;
    }

    /// Record a device-reported failure -- output is kept (it usually
    /// carries the device's complaint) and the error message is attached.
    pub fn record_failure(
        &mut self,
        output: String,
        error: &str,
    ) {
        self.finish();
        self.output = output;
        self.success = false;
        self.error = Some(error.to_owned());
    }

    fn finish(&mut self) {
        let elapsed: Duration = Utc::now() - self.started;

        self.execution_time_millis = elapsed.num_milliseconds();
    }
}

#[cfg(test)]
mod tests {
    use super::CommandResult;

    #[test]
    fn new_result_starts_failed() {
        let result = CommandResult::new("show version", "cisco_ios", "10.0.0.1");

        assert!(!result.success);
        assert!(result.error.is_none());
        assert!(result.output.is_empty());
    }

    #[test]
    fn record_settles_success_and_timing() {
        let mut result = CommandResult::new("show version", "cisco_ios", "10.0.0.1");

        result.record(String::from("Cisco IOS Software"));

        assert!(result.success);
        assert_eq!(result.output, "Cisco IOS Software");
        assert!(result.execution_time_millis >= 0);
    }

    #[test]
    fn record_failure_keeps_output() {
        let mut result = CommandResult::new("show verison", "cisco_ios", "10.0.0.1");

        result.record_failure(String::from("% Invalid input"), "device reported command failure");

        assert!(!result.success);
        assert_eq!(result.output, "% Invalid input");
        assert!(result.error.as_deref().unwrap().contains("failure"));
    }
}
