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

/// VyOS: commit-based, with `save` only valid inside configuration mode.
pub const VYOS_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    commit: Some("commit"),
    config_marker: "#",
    show_config: Some("show configuration"),
    save_config: Some("save"),
    reboot: Some("reboot"),
    ..VendorProfile::defaults("vyos")
};

/// VyOS session: persisting configuration means entering config mode,
/// running `save`, and leaving again.
pub struct Vyos {
    base: BaseSession,
}

impl Session for Vyos {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn save_config(&mut self) -> Result<CommandResult, NetgripError> {
        let mut result = CommandResult::new(
            "save",
            self.device_type(),
            self.base.credentials.host.as_str(),
        );

        if !self.base.connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if let Err(err) = self.enter_config_mode() {
            return self.fail_or_fold(result, err);
        }

        let timeout = self.base.command_timeout();

        let raw = match self.base.channel.send_input("save", Some(timeout)) {
            Ok(raw) => raw,
            Err(err) => {
                self.exit_config_mode().ok();

                return self.fail_or_fold(result, err);
            }
        };

        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
        let clean = self.sanitize_output(text.as_str(), "save");

        if let Err(err) = self.exit_config_mode() {
            return self.fail_or_fold(result, err);
        }

        match self.base.failure_marker(clean.as_str()) {
            Some(marker) => {
                result.record_failure(clean, format!("save rejected ('{marker}')").as_str());
            }
            None => result.record(clean),
        }

        Ok(result)
    }
}

pub(crate) fn vyos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Vyos {
        base: BaseSession::new(credentials, options, VYOS_PROFILE, transport),
    })
}
