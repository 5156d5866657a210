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

/// The minimal platform: learn the prompt and nothing else. Auto-detection
/// probes run over this.
pub const GENERIC_PROFILE: VendorProfile = VendorProfile {
    ..VendorProfile::defaults("generic")
};

pub(crate) fn generic(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        GENERIC_PROFILE,
        transport,
    ))
}
