use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::pool::{
    self,
    Acquire,
    PoolKey,
};
use crate::session::Session;
use crate::transport::base::{
    Transport,
    TransportArgs,
};
use crate::transport::ssh::Ssh;
use crate::transport::tunnel::Tunnel;
use crate::vendors::{
    self,
    mikrotik,
};
use log::debug;

/// Build the vendor session for a credential set: look the device-type
/// tag up in the registry, construct the right transport (tunneled when a
/// complete jump-host block is present), and hand both to the vendor
/// constructor. The session is returned un-connected.
///
/// # Errors
///
/// Returns `UnsupportedDevice` for a tag outside the registry, listing
/// the supported tags.
pub fn build_session(
    credentials: Credentials,
    options: AdvancedOptions,
) -> Result<Box<dyn Session + Send>, NetgripError> {
    let tag = credentials.device_type.to_lowercase();

    let Some(constructor) = vendors::registry().get(tag.as_str()) else {
        return Err(NetgripError::UnsupportedDevice {
            tag,
            supported: vendors::supported_device_types().join(", "),
        });
    };

    let mut credentials = credentials;
    credentials.device_type = tag;

    let transport = build_transport(&credentials);

    Ok(constructor(credentials, options, transport))
}

/// Like [`build_session`], but over a caller-supplied transport --
/// detection probes and tests drive sessions over canned shells this way.
///
/// # Errors
///
/// Returns `UnsupportedDevice` for a tag outside the registry.
pub fn build_session_with_transport(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Result<Box<dyn Session + Send>, NetgripError> {
    let tag = credentials.device_type.to_lowercase();

    let Some(constructor) = vendors::registry().get(tag.as_str()) else {
        return Err(NetgripError::UnsupportedDevice {
            tag,
            supported: vendors::supported_device_types().join(", "),
        });
    };

    let mut credentials = credentials;
    credentials.device_type = tag;

    Ok(constructor(credentials, options, transport))
}

fn build_transport(credentials: &Credentials) -> Box<dyn Transport + Send> {
    let mut target_args = TransportArgs::from_credentials(credentials);

    // RouterOS negotiates terminal geometry through the login name
    if credentials.device_type.starts_with("mikrotik") {
        target_args.username = mikrotik::login_name(credentials.username.as_str());
    }

    match credentials.jump_host {
        Some(ref jump) if !jump.host.is_empty() && !jump.username.is_empty() => {
            debug!(
                "routing {} through bastion {}",
                credentials.host, jump.host
            );

            let bastion_args =
                TransportArgs::from_jump_host(jump, credentials.connection_timeout());

            Box::new(Tunnel::new(bastion_args, target_args))
        }
        _ => Box::new(Ssh::new(target_args)),
    }
}

/// Fetch a session for the request: consult the pool when
/// `connection_pooling` is set (a busy entry falls back to a fresh,
/// unpooled session), otherwise build fresh. The result may or may not be
/// connected -- callers check `is_connected` before use.
///
/// # Errors
///
/// Returns `UnsupportedDevice` for a tag outside the registry.
pub fn acquire_or_build(
    credentials: &Credentials,
    options: &AdvancedOptions,
) -> Result<Box<dyn Session + Send>, NetgripError> {
    if options.connection_pooling {
        let key = PoolKey::from_credentials(credentials);

        match pool::global().acquire(&key) {
            Acquire::Hit(session) => {
                debug!("reusing pooled session for {}", credentials.host);

                return Ok(session);
            }
            Acquire::Busy => {
                debug!("pooled session busy, opening an unpooled one");
            }
            Acquire::Miss => {}
        }
    }

    build_session(credentials.clone(), options.clone())
}

/// Hand a session back after an operation: pooled and reusable sessions
/// return to the pool, everything else disconnects.
///
/// # Errors
///
/// Returns any error the disconnect raised.
pub fn release_session(
    mut session: Box<dyn Session + Send>,
    options: &AdvancedOptions,
) -> Result<(), NetgripError> {
    if options.connection_pooling && options.reuse_connection && session.is_healthy() {
        let key = PoolKey::from_credentials(&session.base().credentials);

        pool::global().checkin(key, session);

        return Ok(());
    }

    session.disconnect()
}

#[cfg(test)]
mod tests {
    use super::build_session;
    use crate::config::{
        AdvancedOptions,
        Credentials,
    };
    use crate::errors::NetgripError;

    #[test]
    fn unknown_tag_lists_supported_types() {
        let credentials = Credentials::password("10.0.0.1", "admin", "secret", "cisco_iois");

        let err = match build_session(credentials, AdvancedOptions::default()) {
            Err(err) => err,
            Ok(_) => panic!("expected build_session to fail"),
        };

        match err {
            NetgripError::UnsupportedDevice { tag, supported } => {
                assert_eq!(tag, "cisco_iois");
                assert!(supported.contains("cisco_ios"));
                assert!(supported.contains("juniper_junos"));
            }
            other => panic!("expected unsupported device, got {other}"),
        }
    }

    #[test]
    fn tags_are_matched_case_insensitively() {
        let credentials = Credentials::password("10.0.0.1", "admin", "secret", "Cisco_IOS");

        let session = build_session(credentials, AdvancedOptions::default()).unwrap();

        assert_eq!(session.device_type(), "cisco_ios");
    }

    #[test]
    fn every_registered_tag_constructs() {
        for tag in crate::vendors::supported_device_types() {
            let credentials = Credentials::password("10.0.0.1", "admin", "secret", tag);

            let session = build_session(credentials, AdvancedOptions::default()).unwrap();

            assert_eq!(session.device_type(), tag);
            assert!(!session.is_connected());
        }
    }
}
