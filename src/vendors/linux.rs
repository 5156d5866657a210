use super::VendorProfile;
use crate::channel::patterns::password_prompt_pattern;
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

/// A plain shell: no config mode, no pager, prompt ends in `$` or `#`.
/// Widening the terminal is a best-effort `stty`.
pub const LINUX_PROFILE: VendorProfile = VendorProfile {
    terminal_width: Some("stty cols 511"),
    reboot: Some("sudo reboot"),
    failed_when_contains: &[
        "command not found",
        "no such file or directory",
        "permission denied",
        "syntax error",
    ],
    ..VendorProfile::defaults("linux")
};

/// Linux host session: reboot goes through sudo, which may ask for the
/// login password.
pub struct LinuxHost {
    base: BaseSession,
}

impl Session for LinuxHost {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn reboot_device(&mut self) -> Result<CommandResult, NetgripError> {
        let mut result = CommandResult::new(
            "sudo reboot",
            self.device_type(),
            self.base.credentials.host.as_str(),
        );

        if !self.base.connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if let Err(err) = self.base.channel.write_and_return(b"sudo reboot") {
            return self.fail_or_fold(result, err);
        }

        match self.base.channel.expect_within_grace(&password_prompt_pattern()) {
            Ok((saw_password, collected)) => {
                if saw_password {
                    let password = self
                        .base
                        .credentials
                        .effective_enable_password()
                        .unwrap_or_default();

                    self.base.channel.write_and_return(password.as_bytes()).ok();
                }

                result.record(String::from_utf8_lossy(collected.as_slice()).trim().to_owned());
            }
            Err(err) => return self.fail_or_fold(result, err),
        }

        self.base.set_healthy(false);

        Ok(result)
    }
}

pub(crate) fn host(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(LinuxHost {
        base: BaseSession::new(credentials, options, LINUX_PROFILE, transport),
    })
}
