use super::VendorProfile;
use crate::channel::patterns::confirmation_pattern;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::sanitize;
use crate::session::{
    BaseSession,
    Session,
};
use crate::transport::base::Transport;

/// Junos stages configuration and applies it atomically; `commit and-quit`
/// lands back in the operational CLI. `[edit]` context lines and
/// `{master:N}` routing-engine tags never belong in output.
pub const JUNOS_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    commit: Some("commit and-quit"),
    config_marker: "#",
    disable_paging: Some("set cli screen-length 0"),
    terminal_width: Some("set cli screen-width 511"),
    show_config: Some("show configuration"),
    save_config: Some("commit"),
    save_answer: "yes",
    reboot: Some("request system reboot"),
    reboot_answer: "yes",
    ..VendorProfile::defaults("juniper_junos")
};

/// SRX firewalls speak the same Junos dialect.
pub const SRX_PROFILE: VendorProfile = VendorProfile {
    device_type: "juniper_srx",
    ..JUNOS_PROFILE
};

/// Junos session: operational-mode bookkeeping, context-marker scrubbing,
/// and the uncommitted-changes dialogue on config exit.
pub struct Junos {
    base: BaseSession,
}

impl Session for Junos {
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

    fn exit_config_mode(&mut self) -> Result<(), NetgripError> {
        if !self.base.in_config_mode {
            return Ok(());
        }

        let timeout = self.base.command_timeout();

        // exiting with uncommitted changes raises a
        // "[yes,no] (yes)" dialogue
        self.base
            .channel
            .send_and_confirm("exit", "yes", &confirmation_pattern(), Some(timeout))?;

        self.base.in_config_mode = false;

        Ok(())
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
            &[sanitize::commit_context_pattern()],
        )
    }
}

pub(crate) fn junos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Junos {
        base: BaseSession::new(credentials, options, JUNOS_PROFILE, transport),
    })
}

pub(crate) fn srx(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Junos {
        base: BaseSession::new(credentials, options, SRX_PROFILE, transport),
    })
}
