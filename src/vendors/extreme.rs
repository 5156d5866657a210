use super::VendorProfile;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::response::CommandResult;
use crate::session::{
    BaseSession,
    PromptModel,
    Session,
};
use crate::transport::base::Transport;
use once_cell::sync::OnceCell;
use regex::Regex;

/// EXOS: no config mode (statements apply immediately), CLI prompting
/// disabled during preparation, and a prompt counter that increments on
/// every command.
pub const EXOS_PROFILE: VendorProfile = VendorProfile {
    disable_paging: Some("disable clipaging"),
    show_config: Some("show configuration"),
    save_config: Some("save configuration primary"),
    reboot: Some("reboot"),
    ..VendorProfile::defaults("extreme_exos")
};

/// # Panics
///
/// Returns (once) the pattern for the EXOS prompt shape --
/// `* HOST.<N> #` with optional unsaved-changes star -- capturing the bare
/// host. This should realistically never panic.
#[allow(clippy::expect_used)]
fn exos_prompt_shape() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"^[*!\s]*([a-zA-Z\d_\-]+)\.\d+\s*[#>]?\s*$")
            .expect("failed compiling pattern, this is a bug")
    })
}

/// EXOS session: the prompt mutates per command (`HOST.1 #`, `HOST.2 #`,
/// ...), so the base is re-learned before every command and the counter
/// never leaks into output.
pub struct Exos {
    base: BaseSession,
}

impl Exos {
    fn learn_exos_prompt(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        let (capture, _) = self.base.channel.read_prompt(Some(timeout))?;
        let text = String::from_utf8_lossy(capture.as_slice()).into_owned();

        let line = PromptModel::last_line(text.as_str());

        self.base.banner = text.clone();

        let host = exos_prompt_shape()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map_or_else(
                || PromptModel::strip_terminator(line).to_owned(),
                |host| host.as_str().to_owned(),
            );

        if host.is_empty() {
            return Err(NetgripError::PromptNotFound(format!(
                "could not reduce exos prompt '{line}' to a hostname"
            )));
        }

        // the pattern tolerates any counter value so the next increment
        // still matches
        let pattern = regex::bytes::Regex::new(&format!(
            r"(?m)^[*!\s]*{}\.\d+\s*[#>]\s*$",
            regex::escape(host.as_str())
        ))
        .map_err(|err| {
            NetgripError::Internal(format!("failed compiling exos prompt pattern, error: {err}"))
        })?;

        self.base.prompt.base = host;
        self.base.channel.args.prompt_pattern = pattern;

        Ok(())
    }
}

impl Session for Exos {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn set_base_prompt(&mut self) -> Result<(), NetgripError> {
        self.learn_exos_prompt()
    }

    fn session_preparation(&mut self) -> Result<(), NetgripError> {
        self.set_base_prompt()?;

        if self.base.options.fast_mode {
            return Ok(());
        }

        let timeout = self.base.command_timeout();

        if let Err(err) = self.base.channel.send_input("disable clipaging", Some(timeout)) {
            log::warn!("disable clipaging failed (continuing): {err}");
        }

        if let Err(err) = self
            .base
            .channel
            .send_input("disable cli prompting", Some(timeout))
        {
            log::warn!("disable cli prompting failed (continuing): {err}");
        }

        Ok(())
    }

    fn send_command(
        &mut self,
        command: &str,
    ) -> Result<CommandResult, NetgripError> {
        let mut result = CommandResult::new(
            command,
            self.device_type(),
            self.base.credentials.host.as_str(),
        );

        if !self.base.connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        // the counter advanced on whatever ran last; re-learn before
        // trusting the pattern
        if let Err(err) = self.learn_exos_prompt() {
            return self.fail_or_fold(result, err);
        }

        let timeout = self.base.command_timeout();

        let raw = match self.base.channel.send_input(command, Some(timeout)) {
            Ok(raw) => raw,
            Err(err) => return self.fail_or_fold(result, err),
        };

        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
        let clean = self.sanitize_output(text.as_str(), command);

        match self.base.failure_marker(clean.as_str()) {
            Some(marker) => result.record_failure(
                clean,
                format!("device reported command failure ('{marker}')").as_str(),
            ),
            None => result.record(clean),
        }

        Ok(result)
    }

    fn sanitize_output(
        &self,
        raw: &str,
        command: &str,
    ) -> String {
        let cleaned = crate::sanitize::clean_output(
            raw,
            command,
            self.base.prompt.base.as_str(),
            &[],
        );

        // a counter-suffixed prompt line can survive the generic trailing
        // strip when the counter moved mid-capture
        let host = regex::escape(self.base.prompt.base.as_str());

        regex::Regex::new(&format!(r"(?m)^[*!\s]*{host}\.\d+\s*[#>]?\s*$"))
            .map_or(cleaned.clone(), |pattern| {
                pattern.replace_all(cleaned.as_str(), "").trim().to_owned()
            })
    }
}

pub(crate) fn exos(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Exos {
        base: BaseSession::new(credentials, options, EXOS_PROFILE, transport),
    })
}
