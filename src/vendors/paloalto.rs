use super::VendorProfile;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::session::{
    BaseSession,
    Session,
};
use crate::transport::base::Transport;

/// PAN-OS: operational and configure modes, commit-based, with a pager
/// that takes two commands to fully silence.
pub const PANOS_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    commit: Some("commit"),
    config_marker: "#",
    terminal_width: Some("set cli terminal width 511"),
    show_config: Some("show config running"),
    save_config: Some("commit"),
    save_answer: "yes",
    reboot: Some("request restart system"),
    reboot_answer: "yes",
    ..VendorProfile::defaults("paloalto_panos")
};

/// PAN-OS session: the pager needs both `set cli pager off` and
/// `set cli screen-length 0`.
pub struct PanOs {
    base: BaseSession,
}

impl Session for PanOs {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn session_preparation(&mut self) -> Result<(), NetgripError> {
        self.set_base_prompt()?;

        self.base.in_operational_mode = true;

        if self.base.options.fast_mode {
            return Ok(());
        }

        if let Err(err) = self.disable_paging() {
            log::warn!("disable paging failed (continuing): {err}");
        }

        if let Err(err) = self.set_terminal_width() {
            log::warn!("terminal width setup failed (continuing): {err}");
        }

        Ok(())
    }

    fn disable_paging(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        self.base.channel.send_input("set cli pager off", Some(timeout))?;
        self.base
            .channel
            .send_input("set cli screen-length 0", Some(timeout))?;

        Ok(())
    }
}

pub(crate) fn panos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(PanOs {
        base: BaseSession::new(credentials, options, PANOS_PROFILE, transport),
    })
}
