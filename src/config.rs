use core::time::Duration;
use serde::{
    Deserialize,
    Serialize,
};

/// The default ssh port.
pub const DEFAULT_PORT: u16 = 22;

/// Default per-command deadline in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECONDS: u64 = 10;

/// Per-command deadline in seconds used when fast mode is enabled.
pub const FAST_MODE_COMMAND_TIMEOUT_SECONDS: u64 = 5;

/// Default transport setup deadline in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT_SECONDS: u64 = 15;

/// Default number of connection attempts before giving up.
pub const DEFAULT_CONNECTION_RETRY_COUNT: u32 = 3;

/// Default number of command retries after a timeout.
pub const DEFAULT_COMMAND_RETRY_COUNT: u32 = 2;

/// Default delay between retries in seconds.
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 2;

/// How a session authenticates to a device (or a bastion).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMethod {
    /// Plain password authentication.
    Password {
        /// The password.
        password: String,
    },
    /// Private key authentication, optionally passphrase protected. The
    /// key is carried in-memory; netgrip never reads files on its own.
    PrivateKey {
        /// PEM encoded private key material.
        key: String,
        /// Optional passphrase protecting the key.
        #[serde(default)]
        passphrase: Option<String>,
    },
}

/// A bastion (jump host) hop: the target is reached by first opening ssh
/// to this host and tunneling a `direct-tcpip` channel through it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpHost {
    /// Bastion host name or address.
    pub host: String,
    /// Bastion ssh port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username on the bastion.
    pub username: String,
    /// Authentication against the bastion -- independent of the target's.
    pub auth: AuthMethod,
}

/// Everything needed to reach and log in to one device. Immutable for the
/// lifetime of the session built from it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Device host name or address.
    pub host: String,
    /// Device ssh port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username on the device.
    pub username: String,
    /// Authentication material.
    pub auth: AuthMethod,
    /// The device-type tag, e.g. `cisco_ios` or `juniper_junos`. Matched
    /// case-insensitively against the dispatch table.
    pub device_type: String,
    /// The enable (privilege escalation) password where the platform has
    /// one; falls back to the login password when unset.
    #[serde(default)]
    pub enable_password: Option<String>,
    /// Optional bastion hop.
    #[serde(default)]
    pub jump_host: Option<JumpHost>,
    /// Send transport keepalives every 30 s while the session is open.
    #[serde(default)]
    pub keep_alive: bool,
    /// Transport setup deadline in seconds; defaults to 15.
    #[serde(default)]
    pub connection_timeout: Option<u64>,
}

impl Credentials {
    /// Return a new instance of `Credentials` with password auth -- the
    /// common case in tests and examples.
    #[must_use]
    pub fn password(
        host: &str,
        username: &str,
        password: &str,
        device_type: &str,
    ) -> Self {
        Self {
            host: host.to_owned(),
            port: DEFAULT_PORT,
            username: username.to_owned(),
            auth: AuthMethod::Password {
                password: password.to_owned(),
            },
            device_type: device_type.to_owned(),
            enable_password: None,
            jump_host: None,
            keep_alive: false,
            connection_timeout: None,
        }
    }

    /// The effective transport setup deadline.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connection_timeout
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECONDS),
        )
    }

    /// The password to use for privilege escalation -- the explicit enable
    /// password when given, otherwise the login password (when password
    /// auth is in use).
    #[must_use]
    pub fn effective_enable_password(&self) -> Option<String> {
        if self.enable_password.is_some() {
            return self.enable_password.clone();
        }

        match self.auth {
            AuthMethod::Password { ref password } => Some(password.clone()),
            AuthMethod::PrivateKey { .. } => None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Per-operation knobs merged with defaults at the request boundary.
/// Unknown keys in serialized input are rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AdvancedOptions {
    /// Per-command deadline in seconds.
    pub command_timeout: u64,
    /// Transport setup deadline in seconds.
    pub connection_timeout: u64,
    /// Shorten timeouts and skip non-essential session preparation steps.
    pub fast_mode: bool,
    /// Consult the process-wide connection pool before opening a new
    /// transport.
    pub connection_pooling: bool,
    /// Leave the session in the pool on release instead of closing it.
    pub reuse_connection: bool,
    /// Connection attempts before giving up.
    pub connection_retry_count: u32,
    /// Command retries after a timeout.
    pub command_retry_count: u32,
    /// Delay between retries in seconds.
    pub retry_delay: u64,
    /// Surface operation errors instead of folding them into a failed
    /// `CommandResult`.
    pub fail_on_error: bool,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT_SECONDS,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT_SECONDS,
            fast_mode: false,
            connection_pooling: false,
            reuse_connection: false,
            connection_retry_count: DEFAULT_CONNECTION_RETRY_COUNT,
            command_retry_count: DEFAULT_COMMAND_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY_SECONDS,
            fail_on_error: true,
        }
    }
}

impl AdvancedOptions {
    /// The effective per-command deadline -- fast mode halves the default.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        if self.fast_mode && self.command_timeout == DEFAULT_COMMAND_TIMEOUT_SECONDS {
            return Duration::from_secs(FAST_MODE_COMMAND_TIMEOUT_SECONDS);
        }

        Duration::from_secs(self.command_timeout)
    }

    /// The delay between retry attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AdvancedOptions,
        Credentials,
        DEFAULT_COMMAND_TIMEOUT_SECONDS,
    };
    use core::time::Duration;

    #[test]
    fn defaults_match_documented_values() {
        let opts = AdvancedOptions::default();

        assert_eq!(opts.command_timeout, DEFAULT_COMMAND_TIMEOUT_SECONDS);
        assert_eq!(opts.connection_timeout, 15);
        assert!(!opts.fast_mode);
        assert!(!opts.connection_pooling);
        assert_eq!(opts.connection_retry_count, 3);
        assert_eq!(opts.command_retry_count, 2);
        assert_eq!(opts.retry_delay, 2);
        assert!(opts.fail_on_error);
    }

    #[test]
    fn fast_mode_shortens_command_timeout() {
        let opts = AdvancedOptions {
            fast_mode: true,
            ..AdvancedOptions::default()
        };

        assert_eq!(opts.command_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn explicit_timeout_wins_over_fast_mode() {
        let opts = AdvancedOptions {
            fast_mode: true,
            command_timeout: 30,
            ..AdvancedOptions::default()
        };

        assert_eq!(opts.command_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn unknown_option_keys_are_rejected() {
        let parsed: Result<AdvancedOptions, _> =
            serde_json::from_str(r#"{"commandTimeout": 5, "bogusKnob": true}"#);

        assert!(parsed.is_err());
    }

    #[test]
    fn enable_password_falls_back_to_login_password() {
        let creds = Credentials::password("10.0.0.1", "admin", "secret", "cisco_ios");

        assert_eq!(creds.effective_enable_password().as_deref(), Some("secret"));
    }
}
