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

/// Classic IOS / IOS-XE dialect: enable-gated, `configure terminal`, and
/// `[confirm]` dialogues answered with a bare return.
pub const IOS_PROFILE: VendorProfile = VendorProfile {
    requires_enable: true,
    enter_config: Some("configure terminal"),
    exit_config: Some("end"),
    disable_paging: Some("terminal length 0"),
    terminal_width: Some("terminal width 511"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "",
    reboot: Some("reload"),
    reboot_answer: "",
    ..VendorProfile::defaults("cisco_ios")
};

/// NX-OS differs mostly in how it persists configuration.
pub const NXOS_PROFILE: VendorProfile = VendorProfile {
    device_type: "cisco_nxos",
    save_config: Some("copy running-config startup-config"),
    reboot_answer: "y",
    ..IOS_PROFILE
};

/// ASA keeps the IOS shape.
pub const ASA_PROFILE: VendorProfile = VendorProfile {
    device_type: "cisco_asa",
    ..IOS_PROFILE
};

/// IOS-XR stages configuration and applies it with `commit`.
pub const IOS_XR_PROFILE: VendorProfile = VendorProfile {
    device_type: "cisco_ios_xr",
    enter_config: Some("configure"),
    commit: Some("commit"),
    save_config: Some("commit"),
    terminal_width: Some("terminal width 511"),
    ..IOS_PROFILE
};

/// The small-business SG300 line: a reduced IOS-ish CLI with its own
/// pager verb.
pub const SG300_PROFILE: VendorProfile = VendorProfile {
    device_type: "cisco_sg300",
    enter_config: Some("configure"),
    disable_paging: Some("terminal datadump"),
    terminal_width: None,
    ..IOS_PROFILE
};

pub(crate) fn ios(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, IOS_PROFILE, transport))
}

pub(crate) fn nxos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, NXOS_PROFILE, transport))
}

pub(crate) fn asa(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, ASA_PROFILE, transport))
}

pub(crate) fn ios_xr(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, IOS_XR_PROFILE, transport))
}

pub(crate) fn sg300(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, SG300_PROFILE, transport))
}
