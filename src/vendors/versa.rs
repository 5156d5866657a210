use super::VendorProfile;
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
use log::debug;

/// FlexVNF: lands in a bootstrap shell, reaches the CLI with `cli`,
/// stages configuration behind `commit`, and decorates output with
/// `[edit]` / `{master:N}` context lines.
pub const FLEXVNF_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("exit configuration-mode"),
    commit: Some("commit"),
    config_marker: "(config)",
    disable_paging: Some("set screen length 0"),
    terminal_width: Some("set screen width 511"),
    show_config: Some("show configuration"),
    save_config: Some("commit"),
    save_answer: "yes",
    ..VendorProfile::defaults("versa_flexvnf")
};

/// FlexVNF session: preparation escapes the bootstrap shell first, and
/// commit-context markers are scrubbed from output.
pub struct FlexVnf {
    base: BaseSession,
}

impl Session for FlexVnf {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn session_preparation(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        // a fresh login may land in the boot shell ($); `cli` is a no-op
        // cost when it doesn't
        let raw = self.base.channel.get_prompt(Some(timeout))?;
        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();

        if text.trim_end().ends_with('$') {
            debug!("boot shell detected, entering the cli");

            self.base.in_shell_mode = true;
            self.base.channel.send_input("cli", Some(timeout))?;
            self.base.in_shell_mode = false;
        }

        self.set_base_prompt()?;

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

pub(crate) fn flexvnf(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(FlexVnf {
        base: BaseSession::new(credentials, options, FLEXVNF_PROFILE, transport),
    })
}
