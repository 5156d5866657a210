use crate::config::{
    AuthMethod,
    Credentials,
    JumpHost,
};
use crate::errors::NetgripError;
use core::time::Duration;

/// The default transport read size -- 8,192 bytes.
pub const DEFAULT_READ_SIZE: u16 = 8_192;

/// The pty terminal type requested on the shell channel.
pub const DEFAULT_TERM_TYPE: &str = "vt100";

/// The default terminal width negotiated on the pty.
pub const DEFAULT_TERM_WIDTH: u32 = 200;

/// The default terminal height negotiated on the pty.
pub const DEFAULT_TERM_HEIGHT: u32 = 24;

/// The settle interval after the shell channel opens, normal profile.
pub const CHANNEL_SETTLE: Duration = Duration::from_millis(800);

/// The settle interval after the shell channel opens in fast mode.
pub const CHANNEL_SETTLE_FAST: Duration = Duration::from_millis(200);

/// Transport is the trait all netgrip transports must implement in order
/// to be consumed by a channel and ultimately by sessions.
///
/// `read`/`read_n` implementations *must be non blocking* -- if the read
/// for a given transport is normally blocking, wrap it in a thread with a
/// queue or whatever you gotta do to make sure it is not blocking. The
/// channel's background read loop depends on it.
pub trait Transport {
    /// Open the underlying transport -- for ssh flavors this is tcp
    /// connect, handshake (with algorithm fallback), authentication, and
    /// shell channel allocation with the requested pty.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if any issues occur.
    fn open(&mut self) -> Result<(), NetgripError>;

    /// Close the underlying transport. Must be idempotent.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if any issues occur.
    fn close(&mut self) -> Result<(), NetgripError>;

    /// Indicates if the transport is "alive".
    fn alive(&mut self) -> bool;

    /// Read the default read amount of bytes from the underlying
    /// transport, returning an empty vec on a quiet channel.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if any issues occur.
    fn read(&mut self) -> Result<Vec<u8>, NetgripError>;

    /// Read up to `n` bytes from the underlying transport, returning an
    /// empty vec on a quiet channel.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if any issues occur.
    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, NetgripError>;

    /// Write to the underlying transport; must not buffer partial writes
    /// across calls.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if any issues occur.
    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError>;

    /// Send a transport-level liveness probe. The default is a no-op for
    /// transports with nothing useful to send.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the probe could not be sent -- the
    /// session keepalive watchdog treats that as an unhealthy transport.
    fn keepalive_probe(&mut self) -> Result<(), NetgripError> {
        Ok(())
    }

    /// Returns the host of the transport.
    fn host(&self) -> String;

    /// Returns the port of the transport.
    fn port(&self) -> u16;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> Result<(), NetgripError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), NetgripError> {
        (**self).close()
    }

    fn alive(&mut self) -> bool {
        (**self).alive()
    }

    fn read(&mut self) -> Result<Vec<u8>, NetgripError> {
        (**self).read()
    }

    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, NetgripError> {
        (**self).read_n(n)
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        (**self).write(b)
    }

    fn keepalive_probe(&mut self) -> Result<(), NetgripError> {
        (**self).keepalive_probe()
    }

    fn host(&self) -> String {
        (**self).host()
    }

    fn port(&self) -> u16 {
        (**self).port()
    }
}

/// A struct holding the generic arguments that apply to all transport
/// flavors.
#[derive(Clone)]
pub struct TransportArgs {
    /// The actual host to connect to.
    pub host: String,
    /// The port to connect to the host on.
    pub port: u16,
    /// The username for authenticating to the host.
    pub username: String,
    /// The authentication material.
    pub auth: AuthMethod,
    /// The timeout for initial socket connection and handshake.
    pub timeout_socket: Duration,
    /// The read size for each read of the transport (the default is fine).
    pub read_size: u16,
    /// The terminal width to request on the pty.
    pub term_width: u32,
    /// The terminal height to request on the pty.
    pub term_height: u32,
    /// Whether transport keepalives should be armed after connect.
    pub keep_alive: bool,
}

impl TransportArgs {
    /// Build transport arguments from caller credentials.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            host: credentials.host.clone(),
            port: credentials.port,
            username: credentials.username.clone(),
            auth: credentials.auth.clone(),
            timeout_socket: credentials.connection_timeout(),
            read_size: DEFAULT_READ_SIZE,
            term_width: DEFAULT_TERM_WIDTH,
            term_height: DEFAULT_TERM_HEIGHT,
            keep_alive: credentials.keep_alive,
        }
    }

    /// Build transport arguments for the bastion hop of a jump-host
    /// connection.
    #[must_use]
    pub fn from_jump_host(
        jump: &JumpHost,
        timeout_socket: Duration,
    ) -> Self {
        Self {
            host: jump.host.clone(),
            port: jump.port,
            username: jump.username.clone(),
            auth: jump.auth.clone(),
            timeout_socket,
            read_size: DEFAULT_READ_SIZE,
            term_width: DEFAULT_TERM_WIDTH,
            term_height: DEFAULT_TERM_HEIGHT,
            keep_alive: false,
        }
    }
}
