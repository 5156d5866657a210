#![allow(dead_code)]

use netgrip::config::{
    AdvancedOptions,
    Credentials,
};
use netgrip::dispatch;
use netgrip::session::Session;
use netgrip::transport::scripted::{
    Scripted,
    ScriptedHandle,
};

/// Options tuned for scripted shells: fast mode (minimal preparation,
/// short settle) and a short command deadline so a missing rule fails the
/// test quickly instead of stalling it.
pub fn fast_options() -> AdvancedOptions {
    AdvancedOptions {
        fast_mode: true,
        command_timeout: 2,
        ..AdvancedOptions::default()
    }
}

/// Full-preparation options with the same short command deadline.
pub fn full_options() -> AdvancedOptions {
    AdvancedOptions {
        command_timeout: 2,
        fast_mode: false,
        ..AdvancedOptions::default()
    }
}

/// Build a vendor session over a scripted transport, returning the
/// session and the handle for transcript assertions.
pub fn session_over(
    tag: &str,
    options: AdvancedOptions,
    transport: Scripted,
) -> (Box<dyn Session + Send>, ScriptedHandle) {
    let handle = transport.handle();

    let credentials = Credentials::password("10.0.0.1", "admin", "secret", tag);

    let session = dispatch::build_session_with_transport(credentials, options, Box::new(transport))
        .expect("registered tag must construct");

    (session, handle)
}
