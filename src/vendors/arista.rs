use super::VendorProfile;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::sanitize;
use crate::session::{
    BaseSession,
    Session,
};
use crate::transport::base::Transport;

/// EOS is IOS-shaped, with configuration-stage markers (`(s1)`, `(s2)`)
/// decorating prompts that must not leak into output.
pub const EOS_PROFILE: VendorProfile = VendorProfile {
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
    ..VendorProfile::defaults("arista_eos")
};

/// Arista EOS session: the stage markers are scrubbed on top of the common
/// sanitation.
pub struct Eos {
    base: BaseSession,
}

impl Session for Eos {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn sanitize_output(
        &self,
        raw: &str,
        command: &str,
    ) -> String {
        sanitize::clean_output(
            raw,
            command,
            self.base.prompt.base.as_str(),
            &[sanitize::config_stage_pattern()],
        )
    }
}

pub(crate) fn eos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Eos {
        base: BaseSession::new(credentials, options, EOS_PROFILE, transport),
    })
}
