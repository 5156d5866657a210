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

/// ProCurve: enable-gated, pager disabled with `no page` (which itself
/// needs enable), "press any key" banner on login, and a "save?" dialogue
/// on logout.
pub const PROCURVE_PROFILE: VendorProfile = VendorProfile {
    requires_enable: true,
    paging_requires_enable: true,
    enter_config: Some("configure terminal"),
    exit_config: Some("exit"),
    disable_paging: Some("no page"),
    terminal_width: Some("terminal width 511"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "",
    reboot: Some("reload"),
    reboot_answer: "y",
    logout: Some("logout"),
    logout_answer: "n",
    ..VendorProfile::defaults("hp_procurve")
};

pub(crate) fn procurve(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        PROCURVE_PROFILE,
        transport,
    ))
}
