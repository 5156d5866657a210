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

/// SAOS: a flat command set (no configuration mode), pager off through the
/// system shell settings, `configuration save` to persist.
pub const SAOS_PROFILE: VendorProfile = VendorProfile {
    disable_paging: Some("system shell set more off"),
    show_config: Some("configuration show"),
    save_config: Some("configuration save"),
    reboot: Some("chassis reboot"),
    ..VendorProfile::defaults("ciena_saos")
};

pub(crate) fn saos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(credentials, options, SAOS_PROFILE, transport))
}
