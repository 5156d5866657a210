use super::VendorProfile;
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::sanitize;
use crate::session::{
    BaseSession,
    PromptModel,
    Session,
};
use crate::transport::base::Transport;
use once_cell::sync::OnceCell;
use regex::Regex;

/// VRP: `<host>` user view, `[host]` system view, `[Y/N]` confirmations,
/// paging disabled per-session with `temporary`.
pub const VRP_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("system-view"),
    exit_config: Some("return"),
    config_marker: "[",
    disable_paging: Some("screen-length 0 temporary"),
    terminal_width: Some("screen-width 300"),
    show_config: Some("display current-configuration"),
    save_config: Some("save"),
    reboot: Some("reboot"),
    extra_prompt_terminators: "]",
    ..VendorProfile::defaults("huawei_vrp")
};

/// # Panics
///
/// Returns (once) the pattern recognizing both VRP prompt forms --
/// `<host>` and `[host]` -- and capturing the bare hostname. This should
/// realistically never panic.
#[allow(clippy::expect_used)]
fn vrp_prompt_shape() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"^[<\[]([a-zA-Z\d_.\-]+)(?:-[a-zA-Z\d/.\-]+)?[>\]]$")
            .expect("failed compiling pattern, this is a bug")
    })
}

/// Huawei VRP session: prompt learning understands both bracket forms, and
/// bracketed prompts repeated mid-output are scrubbed.
pub struct Vrp {
    base: BaseSession,
}

impl Session for Vrp {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn set_base_prompt(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        let (capture, _) = self.base.channel.read_prompt(Some(timeout))?;
        let text = String::from_utf8_lossy(capture.as_slice()).into_owned();

        let line = PromptModel::last_line(text.as_str());

        self.base.banner = text.clone();

        let base = vrp_prompt_shape()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map_or_else(
                || PromptModel::strip_terminator(line).to_owned(),
                |host| host.as_str().to_owned(),
            );

        self.base.set_prompt(base.as_str())
    }

    fn sanitize_output(
        &self,
        raw: &str,
        command: &str,
    ) -> String {
        let base = self.base.prompt.base.as_str();

        match sanitize::bracketed_prompt_pattern(base) {
            Ok(pattern) => sanitize::clean_output(raw, command, base, &[&pattern]),
            Err(_) => sanitize::clean_output(raw, command, base, &[]),
        }
    }
}

pub(crate) fn vrp(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(Vrp {
        base: BaseSession::new(credentials, options, VRP_PROFILE, transport),
    })
}
