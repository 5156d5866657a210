use super::{
    ProfileSession,
    VendorProfile,
};
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::session::Session;
use crate::transport::base::Transport;

/// The username suffix RouterOS interprets as terminal negotiation:
/// console type, 511 columns, 4098 rows. Appended to the ssh login name,
/// never reported back to callers.
pub const LOGIN_SUFFIX: &str = "+ct511w4098h";

/// RouterOS: no config mode (paths are absolute), `\r\n` submits, backup
/// via `/system backup save`, and a license prompt answered `n` on some
/// builds.
pub const ROUTEROS_PROFILE: VendorProfile = VendorProfile {
    return_char: "\r\n",
    show_config: Some("/export"),
    save_config: Some("/system backup save name=netgrip"),
    reboot: Some("/system reboot"),
    reboot_answer: "y",
    failed_when_contains: &[
        "bad command name",
        "syntax error",
        "expected end of command",
        "invalid value",
        "failure:",
    ],
    ..VendorProfile::defaults("mikrotik_routeros")
};

/// SwOS managed switches take the RouterOS shape.
pub const SWITCHOS_PROFILE: VendorProfile = VendorProfile {
    device_type: "mikrotik_switchos",
    ..ROUTEROS_PROFILE
};

/// The ssh login name for a RouterOS credential: the caller's username
/// plus the terminal-negotiation suffix (unless already present).
#[must_use]
pub fn login_name(username: &str) -> String {
    if username.ends_with(LOGIN_SUFFIX) {
        return username.to_owned();
    }

    format!("{username}{LOGIN_SUFFIX}")
}

pub(crate) fn routeros(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        ROUTEROS_PROFILE,
        transport,
    ))
}

pub(crate) fn switchos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        SWITCHOS_PROFILE,
        transport,
    ))
}

#[cfg(test)]
mod tests {
    use super::login_name;

    #[test]
    fn suffix_is_appended_once() {
        assert_eq!(login_name("admin"), "admin+ct511w4098h");
        assert_eq!(login_name("admin+ct511w4098h"), "admin+ct511w4098h");
    }
}
