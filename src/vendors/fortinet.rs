use super::VendorProfile;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::response::CommandResult;
use crate::session::{
    BaseSession,
    Session,
};
use crate::transport::base::Transport;

/// FortiOS: configuration happens inside `config ... / end` blocks the
/// caller supplies, changes persist on `end` automatically, and the pager
/// is silenced through the console settings (VDOM-aware layouts put that
/// inside `config global`).
pub const FORTIOS_PROFILE: VendorProfile = VendorProfile {
    show_config: Some("show full-configuration"),
    reboot: Some("execute reboot"),
    reboot_answer: "y",
    failed_when_contains: &[
        "command parse error",
        "unknown action",
        "command fail",
        "invalid",
        "entry not found",
    ],
    ..VendorProfile::defaults("fortinet_fortios")
};

/// FortiOS session: three-step pager silencing, and `save_config` reports
/// success without sending anything (FortiOS persists on `end`).
pub struct FortiOs {
    base: BaseSession,
}

impl Session for FortiOs {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn disable_paging(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        self.base.channel.send_input("config system console", Some(timeout))?;
        self.base.channel.send_input("set output standard", Some(timeout))?;
        self.base.channel.send_input("end", Some(timeout))?;

        Ok(())
    }

    fn save_config(&mut self) -> Result<CommandResult, NetgripError> {
        let mut result = CommandResult::new(
            "",
            self.device_type(),
            self.base.credentials.host.as_str(),
        );

        if !self.base.connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        // configuration is already persistent once a block ends
        result.record(String::from("configuration persists automatically on FortiOS"));

        Ok(result)
    }
}

pub(crate) fn fortios(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(FortiOs {
        base: BaseSession::new(credentials, options, FORTIOS_PROFILE, transport),
    })
}
