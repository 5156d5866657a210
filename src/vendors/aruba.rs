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

/// Aruba OS mobility controllers: carriage-return submits, enable-gated,
/// `no paging`.
pub const ARUBA_OS_PROFILE: VendorProfile = VendorProfile {
    return_char: "\r",
    requires_enable: true,
    paging_requires_enable: true,
    enter_config: Some("configure term"),
    exit_config: Some("end"),
    disable_paging: Some("no paging"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "",
    reboot: Some("reload"),
    reboot_answer: "y",
    ..VendorProfile::defaults("aruba_os")
};

/// AOS-CX switches: similar shape, `no page`, no enable gate.
pub const AOSCX_PROFILE: VendorProfile = VendorProfile {
    return_char: "\r",
    requires_enable: false,
    paging_requires_enable: false,
    enter_config: Some("configure term"),
    exit_config: Some("end"),
    disable_paging: Some("no page"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "",
    reboot: Some("boot system"),
    reboot_answer: "y",
    ..VendorProfile::defaults("aruba_aoscx")
};

pub(crate) fn os(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        ARUBA_OS_PROFILE,
        transport,
    ))
}

pub(crate) fn aoscx(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        AOSCX_PROFILE,
        transport,
    ))
}
