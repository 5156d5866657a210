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

/// OS10: IOS-shaped CLI over a linux base (shell escapes via
/// `system "..."`), `yes` on reload.
pub const OS10_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure terminal"),
    exit_config: Some("exit"),
    disable_paging: Some("terminal length 0"),
    terminal_width: Some("terminal width 511"),
    show_config: Some("show running-configuration"),
    save_config: Some("copy running-configuration startup-configuration"),
    reboot: Some("reload"),
    reboot_answer: "yes",
    ..VendorProfile::defaults("dell_os10")
};

pub(crate) fn os10(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, OS10_PROFILE, transport))
}
