use crate::config::AuthMethod;
use crate::errors::NetgripError;
use crate::transport::base::{
    Transport,
    TransportArgs,
    DEFAULT_TERM_TYPE,
};
use log::{
    debug,
    info,
    warn,
};
use ssh2::{
    MethodType,
    Session,
    TraceFlags,
};
use std::io::{
    Read,
    Write,
};
use std::net::{
    TcpStream,
    ToSocketAddrs,
};

/// One entry in the progressive algorithm negotiation chain. Profiles are
/// tried in order; a device that only speaks `diffie-hellman-group1-sha1`
/// with `3des-cbc` still connects, it just takes until the last profile.
pub struct AlgorithmProfile {
    /// Profile name for logs.
    pub name: &'static str,
    /// Key exchange preference list.
    pub kex: &'static str,
    /// Host key preference list.
    pub host_key: &'static str,
    /// Cipher preference list (both directions).
    pub ciphers: &'static str,
    /// MAC preference list (both directions).
    pub macs: &'static str,
}

/// The algorithm fallback chain: modern first, then the legacy profile for
/// aging network gear, then the ultra-legacy profile for the truly ancient.
pub const ALGORITHM_PROFILES: [AlgorithmProfile; 3] = [
    AlgorithmProfile {
        name: "modern",
        kex: "curve25519-sha256,curve25519-sha256@libssh.org,ecdh-sha2-nistp256,ecdh-sha2-nistp384,ecdh-sha2-nistp521,diffie-hellman-group-exchange-sha256",
        host_key: "ssh-ed25519,ecdsa-sha2-nistp256,ecdsa-sha2-nistp384,ecdsa-sha2-nistp521,rsa-sha2-512,rsa-sha2-256",
        ciphers: "chacha20-poly1305@openssh.com,aes256-gcm@openssh.com,aes128-gcm@openssh.com,aes256-ctr,aes192-ctr,aes128-ctr",
        macs: "hmac-sha2-256-etm@openssh.com,hmac-sha2-512-etm@openssh.com,hmac-sha2-256,hmac-sha2-512",
    },
    AlgorithmProfile {
        name: "legacy",
        kex: "diffie-hellman-group-exchange-sha256,diffie-hellman-group-exchange-sha1,diffie-hellman-group14-sha1",
        host_key: "ssh-rsa,ssh-dss",
        ciphers: "aes256-cbc,aes192-cbc,aes128-cbc,aes256-ctr,aes128-ctr",
        macs: "hmac-sha2-256,hmac-sha1",
    },
    AlgorithmProfile {
        name: "ultra-legacy",
        kex: "diffie-hellman-group1-sha1,diffie-hellman-group14-sha1",
        host_key: "ssh-rsa,ssh-dss",
        ciphers: "3des-cbc,aes128-cbc",
        macs: "hmac-sha1,hmac-md5",
    },
];

/// Keepalive interval armed on the libssh2 session when requested.
pub const KEEPALIVE_INTERVAL_SECONDS: u32 = 30;

fn connect_tcp(args: &TransportArgs) -> Result<TcpStream, NetgripError> {
    let addr = format!("{}:{}", args.host, args.port);

    let mut resolved = addr.to_socket_addrs().map_err(|err| {
        NetgripError::Connect(format!("failed resolving '{addr}', error: {err}"))
    })?;

    let socket_addr = resolved
        .next()
        .ok_or_else(|| NetgripError::Connect(format!("'{addr}' resolved to no addresses")))?;

    let tcp = TcpStream::connect_timeout(&socket_addr, args.timeout_socket).map_err(|err| {
        NetgripError::Connect(format!("failed connecting to '{addr}', error: {err}"))
    })?;

    tcp.set_nodelay(true).ok();

    Ok(tcp)
}

fn handshake_with_profile(
    args: &TransportArgs,
    profile: &AlgorithmProfile,
) -> Result<Session, NetgripError> {
    let tcp = connect_tcp(args)?;

    let mut session = Session::new().map_err(|err| {
        NetgripError::Connect(format!("failed creating ssh session, error: {err}"))
    })?;

    if ssh_debug_enabled() {
        session.trace(TraceFlags::KEX | TraceFlags::AUTH | TraceFlags::PUBLICKEY);
    }

    session
        .method_pref(MethodType::Kex, profile.kex)
        .and_then(|()| session.method_pref(MethodType::HostKey, profile.host_key))
        .and_then(|()| session.method_pref(MethodType::CryptCs, profile.ciphers))
        .and_then(|()| session.method_pref(MethodType::CryptSc, profile.ciphers))
        .and_then(|()| session.method_pref(MethodType::MacCs, profile.macs))
        .and_then(|()| session.method_pref(MethodType::MacSc, profile.macs))
        .map_err(|err| {
            NetgripError::Connect(format!(
                "failed setting '{}' algorithm preferences, error: {err}",
                profile.name
            ))
        })?;

    #[allow(clippy::cast_possible_truncation)]
    session.set_timeout(args.timeout_socket.as_millis() as u32);
    session.set_tcp_stream(tcp);

    session.handshake().map_err(|err| {
        NetgripError::AuthOrAlgorithm(format!(
            "handshake with '{}' profile failed, error: {err}",
            profile.name
        ))
    })?;

    Ok(session)
}

/// Walk the algorithm fallback chain until a handshake sticks. The
/// fallback chain is *not* a retry -- connection-level failures (refused,
/// unroutable) abort immediately since an older profile cannot fix those.
fn negotiate(args: &TransportArgs) -> Result<Session, NetgripError> {
    let mut last_error: Option<NetgripError> = None;

    for profile in &ALGORITHM_PROFILES {
        debug!(
            "attempting ssh handshake with '{}' algorithm profile",
            profile.name
        );

        match handshake_with_profile(args, profile) {
            Ok(session) => {
                info!("ssh handshake succeeded with '{}' profile", profile.name);

                return Ok(session);
            }
            Err(err) => {
                if matches!(err, NetgripError::Connect(_)) {
                    return Err(err);
                }

                warn!("ssh handshake with '{}' profile failed", profile.name);

                last_error = Some(err);
            }
        }
    }

    Err(NetgripError::AuthOrAlgorithm(format!(
        "all algorithm profiles exhausted, last error: {}",
        last_error.map_or_else(|| String::from("none recorded"), |err| err.to_string()),
    )))
}

fn authenticate(
    args: &TransportArgs,
    session: &Session,
) -> Result<(), NetgripError> {
    match args.auth {
        AuthMethod::Password { ref password } => {
            session
                .userauth_password(args.username.as_str(), password.as_str())
                .map_err(|err| {
                    NetgripError::AuthOrAlgorithm(format!(
                        "password authentication failed, error: {err}"
                    ))
                })?;
        }
        AuthMethod::PrivateKey {
            ref key,
            ref passphrase,
        } => {
            session
                .userauth_pubkey_memory(
                    args.username.as_str(),
                    None,
                    key.as_str(),
                    passphrase.as_deref(),
                )
                .map_err(|err| {
                    NetgripError::AuthOrAlgorithm(format!(
                        "private key authentication failed, error: {err}"
                    ))
                })?;
        }
    }

    if !session.authenticated() {
        return Err(NetgripError::AuthOrAlgorithm(String::from(
            "authentication did not complete",
        )));
    }

    Ok(())
}

/// Open an authenticated ssh client (no shell yet) against wherever `args`
/// points. Shared between the plain transport and the bastion hop of the
/// tunnel transport.
pub(crate) fn open_client(args: &TransportArgs) -> Result<Session, NetgripError> {
    let session = negotiate(args)?;

    authenticate(args, &session)?;

    Ok(session)
}

/// The ssh2 (libssh2) transport: an in-process ssh client owning one tcp
/// stream, one authenticated session, and one shell channel with a pty.
pub struct Ssh {
    args: TransportArgs,
    session: Option<Session>,
    shell: Option<ssh2::Channel>,
}

impl Ssh {
    /// Returns a new, un-opened `Ssh` transport.
    #[must_use]
    pub const fn new(args: TransportArgs) -> Self {
        Self {
            args,
            session: None,
            shell: None,
        }
    }

    fn open_shell(
        &self,
        session: &Session,
    ) -> Result<ssh2::Channel, NetgripError> {
        let mut shell = session.channel_session().map_err(|err| {
            NetgripError::Connect(format!("failed opening session channel, error: {err}"))
        })?;

        shell
            .request_pty(
                DEFAULT_TERM_TYPE,
                None,
                Some((self.args.term_width, self.args.term_height, 0, 0)),
            )
            .map_err(|err| NetgripError::Connect(format!("failed allocating pty, error: {err}")))?;

        shell.shell().map_err(|err| {
            NetgripError::Connect(format!("failed requesting shell, error: {err}"))
        })?;

        Ok(shell)
    }
}

impl Transport for Ssh {
    fn open(&mut self) -> Result<(), NetgripError> {
        debug!(
            "opening ssh transport to {}:{}",
            self.args.host, self.args.port
        );

        let session = open_client(&self.args)?;

        let shell = self.open_shell(&session)?;

        if self.args.keep_alive {
            session.set_keepalive(true, KEEPALIVE_INTERVAL_SECONDS);
        }

        // reads must never block the channel read loop
        session.set_blocking(false);

        self.session = Some(session);
        self.shell = Some(shell);

        Ok(())
    }

    fn close(&mut self) -> Result<(), NetgripError> {
        if let Some(mut shell) = self.shell.take() {
            if let Some(session) = self.session.as_ref() {
                session.set_blocking(true);
                #[allow(clippy::cast_possible_truncation)]
                session.set_timeout(self.args.timeout_socket.as_millis() as u32);
            }

            shell.send_eof().ok();
            shell.close().ok();
        }

        if let Some(session) = self.session.take() {
            session.disconnect(None, "netgrip session closed", None).ok();
        }

        Ok(())
    }

    fn alive(&mut self) -> bool {
        let Some(shell) = self.shell.as_ref() else {
            return false;
        };

        !shell.eof()
    }

    fn read(&mut self) -> Result<Vec<u8>, NetgripError> {
        self.read_n(self.args.read_size)
    }

    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, NetgripError> {
        let Some(shell) = self.shell.as_mut() else {
            return Err(NetgripError::NotConnected);
        };

        let mut b = vec![0_u8; n as usize];

        match shell.read(b.as_mut_slice()) {
            Ok(read_n) => {
                b.truncate(read_n);

                Ok(b)
            }
            Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => Ok(vec![]),
            Err(err) => Err(NetgripError::Connect(format!(
                "error reading from shell channel, error: {err}"
            ))),
        }
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        let Some(session) = self.session.as_ref() else {
            return Err(NetgripError::NotConnected);
        };

        let Some(shell) = self.shell.as_mut() else {
            return Err(NetgripError::NotConnected);
        };

        // flip to blocking so the full write lands, then back for the read
        // loop
        session.set_blocking(true);

        let write_result = shell
            .write_all(b)
            .and_then(|()| shell.flush())
            .map_err(|err| {
                NetgripError::Connect(format!("failed writing to shell channel, error: {err}"))
            });

        session.set_blocking(false);

        write_result
    }

    fn keepalive_probe(&mut self) -> Result<(), NetgripError> {
        let Some(session) = self.session.as_ref() else {
            return Err(NetgripError::NotConnected);
        };

        session
            .keepalive_send()
            .map(|_| ())
            .map_err(|err| NetgripError::Connect(format!("keepalive probe failed, error: {err}")))
    }

    fn host(&self) -> String {
        self.args.host.clone()
    }

    fn port(&self) -> u16 {
        self.args.port
    }
}

/// Whether verbose ssh negotiation logging was requested via the
/// `SSH_DEBUG` environment variable.
#[must_use]
pub fn ssh_debug_enabled() -> bool {
    std::env::var("SSH_DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::ALGORITHM_PROFILES;

    #[test]
    fn fallback_chain_is_ordered_modern_to_ultra_legacy() {
        let names: Vec<&str> = ALGORITHM_PROFILES.iter().map(|p| p.name).collect();

        assert_eq!(names, vec!["modern", "legacy", "ultra-legacy"]);
    }

    #[test]
    fn ultra_legacy_profile_reaches_ancient_gear() {
        let ultra = &ALGORITHM_PROFILES[2];

        assert!(ultra.kex.contains("diffie-hellman-group1-sha1"));
        assert!(ultra.ciphers.contains("3des-cbc"));
        assert!(ultra.macs.contains("hmac-md5"));
    }
}
