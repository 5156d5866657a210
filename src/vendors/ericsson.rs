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

/// IPOS routers: a cisco-shaped dialect with `commit`-less config.
pub const IPOS_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("end"),
    disable_paging: Some("terminal length 0"),
    terminal_width: Some("terminal width 512"),
    show_config: Some("show configuration"),
    save_config: Some("save configuration"),
    ..VendorProfile::defaults("ericsson_ipos")
};

/// MINI-LINK transport nodes: a reduced CLI; commands run directly.
pub const MLTN_PROFILE: VendorProfile = VendorProfile {
    show_config: Some("show running-config"),
    save_config: Some("write"),
    ..VendorProfile::defaults("ericsson_mltn")
};

pub(crate) fn ipos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, IPOS_PROFILE, transport))
}

pub(crate) fn mltn(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, MLTN_PROFILE, transport))
}
