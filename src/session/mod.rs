/// The shared session engine all vendor plugins build on.
pub mod base;

/// The learned prompt model.
pub mod prompt;

pub use base::BaseSession;
pub use prompt::PromptModel;

use crate::channel::patterns::{
    confirmation_pattern,
    password_prompt_pattern,
};
use crate::channel::CancelHandle;
use crate::errors::NetgripError;
use crate::response::CommandResult;
use crate::sanitize;
use crate::transport::base::{
    CHANNEL_SETTLE,
    CHANNEL_SETTLE_FAST,
};
use crate::util::bytes::prompt_search_window;
use log::{
    debug,
    info,
    warn,
};
use std::thread;

/// The polymorphic per-device session: the uniform operation surface
/// (`connect`, `send_command`, `send_config`, `get_current_config`,
/// `save_config`, `reboot_device`, `disconnect`) plus the vendor hooks
/// (`session_preparation`, `set_base_prompt`, `disable_paging`,
/// `set_terminal_width`, `enter_config_mode`, `exit_config_mode`,
/// `sanitize_output`). The provided methods implement the common dialect;
/// vendor plugins override exactly their deltas.
#[allow(clippy::missing_errors_doc)]
pub trait Session: Send {
    /// The shared session state.
    fn base(&self) -> &BaseSession;

    /// The shared session state, mutably.
    fn base_mut(&mut self) -> &mut BaseSession;

    /// The device-type tag this session serves -- the caller's tag, which
    /// may be more specific than the vendor family behind it.
    fn device_type(&self) -> &str {
        self.base().credentials.device_type.as_str()
    }

    /// Whether `connect` has completed successfully.
    fn is_connected(&self) -> bool {
        self.base().connected
    }

    /// Whether the session is healthy enough to be reused.
    fn is_healthy(&self) -> bool {
        self.base().is_healthy()
    }

    /// A handle for cancelling in-flight operations; cancellation marks
    /// the session unhealthy.
    fn cancel_handle(&self) -> CancelHandle {
        self.base().channel.cancel_handle()
    }

    /// Establish the transport, open the channel, and run
    /// `session_preparation`. Connection attempts are retried per the
    /// options; the transport's internal algorithm fallback is not counted
    /// as a retry.
    fn connect(&mut self) -> Result<(), NetgripError> {
        if self.base().connected {
            return Ok(());
        }

        let attempts = self.base().options.connection_retry_count.max(1);
        let retry_delay = self.base().options.retry_delay();

        let mut retries_used: u32 = 0;

        loop {
            match self.base_mut().channel.open() {
                Ok(()) => break,
                Err(err) => {
                    retries_used += 1;

                    if retries_used >= attempts {
                        return Err(err);
                    }

                    warn!(
                        "connection attempt {retries_used}/{attempts} failed, retrying: {err}"
                    );

                    thread::sleep(retry_delay);
                }
            }
        }

        self.base_mut().connection_retries_used = retries_used;

        let settle = if self.base().options.fast_mode {
            CHANNEL_SETTLE_FAST
        } else {
            CHANNEL_SETTLE
        };

        thread::sleep(settle);

        if let Err(err) = self.session_preparation() {
            self.base_mut().channel.close().ok();

            return Err(err);
        }

        if self.base().credentials.keep_alive {
            self.base_mut().start_keepalive();
        }

        self.base_mut().connected = true;
        self.base().set_healthy(true);

        info!(
            "session to {} ({}) connected",
            self.base().credentials.host,
            self.device_type()
        );

        Ok(())
    }

    /// Prepare the freshly opened shell: learn the base prompt, then (when
    /// not in fast mode) disable paging and widen the terminal.
    /// Preparation succeeds iff prompt learning succeeds; the other steps
    /// are best effort.
    fn session_preparation(&mut self) -> Result<(), NetgripError> {
        self.set_base_prompt()?;

        if self.base().options.fast_mode {
            debug!("fast mode, skipping paging and width setup");

            return Ok(());
        }

        if let Err(err) = self.disable_paging() {
            warn!("disable paging failed (continuing): {err}");
        }

        if let Err(err) = self.set_terminal_width() {
            warn!("terminal width setup failed (continuing): {err}");
        }

        Ok(())
    }

    /// Learn the device's base prompt: elicit a prompt line, strip the
    /// terminator, store the remainder, and re-point the channel's prompt
    /// pattern at it.
    fn set_base_prompt(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base().command_timeout();

        let (capture, _) = self.base_mut().channel.read_prompt(Some(timeout))?;
        let text = String::from_utf8_lossy(capture.as_slice()).into_owned();

        let line = PromptModel::last_line(text.as_str());
        let base = PromptModel::strip_terminator(line).to_owned();

        debug!("learned base prompt '{base}'");

        self.base_mut().banner = text;
        self.base_mut().set_prompt(base.as_str())
    }

    /// Disable output pagination, when the platform has a pager.
    fn disable_paging(&mut self) -> Result<(), NetgripError> {
        let Some(command) = self.base().profile.disable_paging else {
            return Ok(());
        };

        if self.base().profile.paging_requires_enable {
            self.ensure_enable_mode()?;
        }

        let timeout = self.base().command_timeout();

        self.base_mut().channel.send_input(command, Some(timeout))?;

        Ok(())
    }

    /// Widen the terminal so long lines don't wrap, when the platform
    /// supports it.
    fn set_terminal_width(&mut self) -> Result<(), NetgripError> {
        let Some(command) = self.base().profile.terminal_width else {
            return Ok(());
        };

        let timeout = self.base().command_timeout();

        self.base_mut().channel.send_input(command, Some(timeout))?;

        Ok(())
    }

    /// Acquire privilege (enable) mode on platforms that gate commands
    /// behind it. Handles the `Password:` exchange when the device asks.
    fn ensure_enable_mode(&mut self) -> Result<(), NetgripError> {
        if !self.base().profile.requires_enable || self.base().in_enable_mode {
            return Ok(());
        }

        let timeout = self.base().command_timeout();

        let prompt = self.base_mut().channel.get_prompt(Some(timeout))?;

        if prompt_line_ends_with(prompt.as_slice(), b'#') {
            self.base_mut().in_enable_mode = true;

            return Ok(());
        }

        debug!("escalating to enable mode");

        self.base_mut().channel.write_and_return(b"enable")?;

        let watch = [
            password_prompt_pattern(),
            self.base().channel.args.prompt_pattern.clone(),
        ];

        match self.base_mut().channel.read_until_any(&watch, Some(crate::channel::INTERACT_GRACE)) {
            Ok(rb) => {
                if password_prompt_pattern().is_match(tail_window(rb.as_slice())) {
                    let secret = self
                        .base()
                        .credentials
                        .effective_enable_password()
                        .unwrap_or_default();

                    self.base_mut().channel.write_and_return(secret.as_bytes())?;
                    self.base_mut().channel.read_until_prompt(Some(timeout))?;
                }
            }
            Err(NetgripError::Timeout { .. }) => {}
            Err(err) => return Err(err),
        }

        let prompt = self.base_mut().channel.get_prompt(Some(timeout))?;

        if !prompt_line_ends_with(prompt.as_slice(), b'#') {
            return Err(NetgripError::AuthOrAlgorithm(format!(
                "privilege escalation failed, prompt still '{}'",
                String::from_utf8_lossy(prompt.as_slice()).trim()
            )));
        }

        self.base_mut().in_enable_mode = true;

        Ok(())
    }

    /// Enter configuration mode. A no-op for platforms without one.
    fn enter_config_mode(&mut self) -> Result<(), NetgripError> {
        let Some(command) = self.base().profile.enter_config else {
            return Ok(());
        };

        if self.base().in_config_mode {
            return Ok(());
        }

        if self.base().profile.requires_enable {
            self.ensure_enable_mode()?;
        }

        let timeout = self.base().command_timeout();

        self.base_mut().channel.send_input(command, Some(timeout))?;

        let prompt = self.base_mut().channel.get_prompt(Some(timeout))?;
        let prompt_text = String::from_utf8_lossy(prompt.as_slice()).into_owned();

        if !prompt_text.contains(self.base().profile.config_marker) {
            return Err(NetgripError::ConfigMode(format!(
                "config mode entry not confirmed, prompt '{}'",
                prompt_text.trim()
            )));
        }

        self.base_mut().in_config_mode = true;

        Ok(())
    }

    /// Leave configuration mode. Commit handling (for commit-based
    /// platforms) happens in `send_config` before this is called.
    fn exit_config_mode(&mut self) -> Result<(), NetgripError> {
        if !self.base().in_config_mode {
            return Ok(());
        }

        let timeout = self.base().command_timeout();

        if let Some(command) = self.base().profile.exit_config {
            self.base_mut().channel.send_input(command, Some(timeout))?;
        }

        let prompt = self.base_mut().channel.get_prompt(Some(timeout))?;
        let prompt_text = String::from_utf8_lossy(prompt.as_slice()).into_owned();

        if prompt_text.contains(self.base().profile.config_marker) {
            return Err(NetgripError::ConfigMode(format!(
                "config mode exit not confirmed, prompt '{}'",
                prompt_text.trim()
            )));
        }

        self.base_mut().in_config_mode = false;

        Ok(())
    }

    /// Clean a raw capture for return to the caller. Vendors with output
    /// decorations beyond the common set override this.
    fn sanitize_output(
        &self,
        raw: &str,
        command: &str,
    ) -> String {
        sanitize::clean_output(raw, command, self.base().prompt.base.as_str(), &[])
    }

    /// Send one command at the default privilege level and return its
    /// sanitized output. Does not enter configuration mode.
    fn send_command(
        &mut self,
        command: &str,
    ) -> Result<CommandResult, NetgripError> {
        let mut result = self.new_result(command);

        if !self.base().connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if let Err(err) = self.ensure_enable_mode() {
            return self.fail_or_fold(result, err);
        }

        info!("send_command '{command}'");

        let timeout = self.base().command_timeout();
        let max_retries = self.base().options.command_retry_count;
        let retry_delay = self.base().options.retry_delay();

        let mut retries_used: u32 = 0;

        let raw = loop {
            match self.base_mut().channel.send_input(command, Some(timeout)) {
                Ok(raw) => break raw,
                Err(err @ NetgripError::Timeout { .. }) => {
                    if retries_used >= max_retries {
                        return self.fail_or_fold(result, err);
                    }

                    retries_used += 1;

                    warn!("command timed out, retry {retries_used}/{max_retries}");

                    thread::sleep(retry_delay);
                }
                Err(err) => return self.fail_or_fold(result, err),
            }
        };

        if retries_used > 0 {
            result.command_retries = Some(retries_used);
        }

        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
        let clean = self.sanitize_output(text.as_str(), command);

        match self.base().failure_marker(clean.as_str()) {
            Some(marker) => {
                result.record_failure(
                    clean,
                    format!("device reported command failure ('{marker}')").as_str(),
                );
            }
            None => result.record(clean),
        }

        Ok(result)
    }

    /// Apply a sequence of configuration statements: enter config mode,
    /// send each statement, commit where the platform stages changes, and
    /// leave config mode. Stops at the first statement the device rejects.
    fn send_config(
        &mut self,
        commands: &[&str],
    ) -> Result<CommandResult, NetgripError> {
        let mut result = self.new_result(commands.join("\n").as_str());

        if !self.base().connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if commands.is_empty() {
            return self.fail_or_fold(
                result,
                NetgripError::Internal(String::from("send_config called with no commands")),
            );
        }

        info!("send_config, {} statement(s)", commands.len());

        if let Err(err) = self.enter_config_mode() {
            return self.fail_or_fold(result, err);
        }

        let timeout = self.base().command_timeout();
        let mut outputs: Vec<String> = vec![];

        for command in commands {
            let raw = match self.base_mut().channel.send_input(command, Some(timeout)) {
                Ok(raw) => raw,
                Err(err) => {
                    self.exit_config_mode().ok();

                    return self.fail_or_fold(result, err);
                }
            };

            let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
            let clean = self.sanitize_output(text.as_str(), command);

            if let Some(marker) = self.base().failure_marker(clean.as_str()) {
                outputs.push(clean);

                self.exit_config_mode().ok();

                result.record_failure(
                    outputs.join("\n"),
                    format!("device rejected '{command}' ('{marker}')").as_str(),
                );

                return Ok(result);
            }

            outputs.push(clean);
        }

        if let Some(output) = self.run_commit(&mut result, &mut outputs)? {
            return Ok(output);
        }

        if let Err(err) = self.exit_config_mode() {
            return self.fail_or_fold(result, err);
        }

        result.record(
            outputs
                .into_iter()
                .filter(|o| !o.is_empty())
                .collect::<Vec<String>>()
                .join("\n"),
        );

        Ok(result)
    }

    /// Issue the profile's commit command, if any. Returns `Some(result)`
    /// when the commit failed and the operation should end there.
    #[doc(hidden)]
    fn run_commit(
        &mut self,
        result: &mut CommandResult,
        outputs: &mut Vec<String>,
    ) -> Result<Option<CommandResult>, NetgripError> {
        let Some(commit_command) = self.base().profile.commit else {
            return Ok(None);
        };

        let timeout = self.base().command_timeout();

        let raw = match self.base_mut().channel.send_input(commit_command, Some(timeout)) {
            Ok(raw) => raw,
            Err(err) => {
                self.exit_config_mode().ok();

                return match self.fail_or_fold(result.clone(), err) {
                    Ok(folded) => Ok(Some(folded)),
                    Err(err) => Err(err),
                };
            }
        };

        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
        let clean = self.sanitize_output(text.as_str(), commit_command);

        let lowered = clean.to_lowercase();

        if lowered.contains("error") || lowered.contains("failed") {
            self.exit_config_mode().ok();

            return match self.fail_or_fold(result.clone(), NetgripError::Commit(clean)) {
                Ok(folded) => Ok(Some(folded)),
                Err(err) => Err(err),
            };
        }

        outputs.push(clean);

        // `commit and-quit` style commands drop out of config mode on
        // their own; note it so the exit step doesn't double-exit
        if commit_command.contains("and-quit") {
            self.base_mut().in_config_mode = false;
        }

        Ok(None)
    }

    /// Fetch the running configuration.
    fn get_current_config(&mut self) -> Result<CommandResult, NetgripError> {
        let Some(command) = self.base().profile.show_config else {
            let result = self.new_result("");

            return self.fail_or_fold(
                result,
                NetgripError::Internal(format!(
                    "platform '{}' has no configuration fetch command",
                    self.device_type()
                )),
            );
        };

        self.send_command(command)
    }

    /// Persist the running configuration, answering save confirmations
    /// automatically.
    fn save_config(&mut self) -> Result<CommandResult, NetgripError> {
        let Some(command) = self.base().profile.save_config else {
            let result = self.new_result("");

            return self.fail_or_fold(
                result,
                NetgripError::Internal(format!(
                    "platform '{}' has no save command",
                    self.device_type()
                )),
            );
        };

        let mut result = self.new_result(command);

        if !self.base().connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if let Err(err) = self.ensure_enable_mode() {
            return self.fail_or_fold(result, err);
        }

        let timeout = self.base().command_timeout();
        let answer = self.base().profile.save_answer;

        let raw = match self.base_mut().channel.send_and_confirm(
            command,
            answer,
            &confirmation_pattern(),
            Some(timeout),
        ) {
            Ok(raw) => raw,
            Err(err) => return self.fail_or_fold(result, err),
        };

        let text = String::from_utf8_lossy(raw.as_slice()).into_owned();
        let clean = self.sanitize_output(text.as_str(), command);

        match self.base().failure_marker(clean.as_str()) {
            Some(marker) => result.record_failure(
                clean,
                format!("save rejected ('{marker}')").as_str(),
            ),
            None => result.record(clean),
        }

        Ok(result)
    }

    /// Reboot the device. Succeeds as soon as the confirmation (if any) is
    /// accepted; never waits for the device to come back.
    fn reboot_device(&mut self) -> Result<CommandResult, NetgripError> {
        let Some(command) = self.base().profile.reboot else {
            let result = self.new_result("");

            return self.fail_or_fold(
                result,
                NetgripError::Internal(format!(
                    "platform '{}' has no reboot command",
                    self.device_type()
                )),
            );
        };

        let mut result = self.new_result(command);

        if !self.base().connected {
            return self.fail_or_fold(result, NetgripError::NotConnected);
        }

        if let Err(err) = self.ensure_enable_mode() {
            return self.fail_or_fold(result, err);
        }

        info!("reboot requested");

        let answer = self.base().profile.reboot_answer;

        // the command either raises a confirmation dialogue, returns to
        // the prompt, or drops the link; all three mean the reboot is on
        // its way
        match self.base_mut().channel.send_input_interim(
            command,
            &[confirmation_pattern()],
            Some(crate::channel::INTERACT_GRACE),
        ) {
            Ok(rb) => {
                if confirmation_pattern().is_match(tail_window(rb.as_slice())) {
                    // fire the answer and do not wait; the device is going
                    // down
                    self.base_mut()
                        .channel
                        .write_and_return(answer.as_bytes())
                        .ok();
                }

                result.record(String::from_utf8_lossy(rb.as_slice()).trim().to_owned());
            }
            Err(NetgripError::Timeout { collected, .. }) => {
                // no dialogue and no prompt -- the device likely dropped
                // the link mid-reboot, which is success for this operation
                result.record(String::from_utf8_lossy(collected.as_slice()).trim().to_owned());
            }
            Err(err) => return self.fail_or_fold(result, err),
        }

        self.base().set_healthy(false);

        Ok(result)
    }

    /// Return the device's current prompt.
    fn get_prompt(&mut self) -> Result<String, NetgripError> {
        let timeout = self.base().command_timeout();

        let raw = self.base_mut().channel.get_prompt(Some(timeout))?;

        Ok(String::from_utf8_lossy(raw.as_slice()).trim().to_owned())
    }

    /// Tear the session down: exit config mode if entered, issue the
    /// vendor's graceful logout (answering any "save?" dialogue), close
    /// the channel and the transport. Idempotent.
    fn disconnect(&mut self) -> Result<(), NetgripError> {
        if !self.base().connected {
            return Ok(());
        }

        if self.base().in_config_mode {
            self.exit_config_mode().ok();
        }

        if let Some(logout) = self.base().profile.logout {
            debug!("issuing graceful logout '{logout}'");

            if self.base_mut().channel.write_and_return(logout.as_bytes()).is_ok() {
                if let Ok((saw_dialogue, _)) =
                    self.base_mut().channel.expect_within_grace(&confirmation_pattern())
                {
                    if saw_dialogue {
                        let answer = self.base().profile.logout_answer;

                        self.base_mut().channel.write_and_return(answer.as_bytes()).ok();
                    }
                }
            }
        }

        self.base_mut().stop_keepalive();
        self.base_mut().channel.close()?;

        let base = self.base_mut();
        base.connected = false;
        base.in_enable_mode = false;
        base.in_config_mode = false;
        base.in_shell_mode = false;
        base.in_operational_mode = false;
        base.set_healthy(false);

        info!("session disconnected");

        Ok(())
    }

    /// Build a result shell stamped with this session's identity.
    #[doc(hidden)]
    fn new_result(
        &self,
        command: &str,
    ) -> CommandResult {
        let mut result = CommandResult::new(
            command,
            self.device_type(),
            self.base().credentials.host.as_str(),
        );

        if self.base().connection_retries_used > 0 {
            result.connection_retries = Some(self.base().connection_retries_used);
        }

        result
    }

    /// Either surface `err` (when `fail_on_error` is set) or fold it into
    /// a failed result, keeping any partial output a timeout collected.
    #[doc(hidden)]
    fn fail_or_fold(
        &self,
        mut result: CommandResult,
        err: NetgripError,
    ) -> Result<CommandResult, NetgripError> {
        if matches!(err, NetgripError::Canceled) {
            self.base().set_healthy(false);
        }

        if self.base().options.fail_on_error {
            return Err(err);
        }

        let partial = match err {
            NetgripError::Timeout { ref collected, .. } => {
                String::from_utf8_lossy(collected.as_slice()).into_owned()
            }
            _ => String::new(),
        };

        result.record_failure(partial, err.to_string().as_str());

        Ok(result)
    }
}

fn tail_window(rb: &[u8]) -> &[u8] {
    prompt_search_window(rb, 256)
}

fn prompt_line_ends_with(
    prompt: &[u8],
    terminator: u8,
) -> bool {
    let text = String::from_utf8_lossy(prompt);

    text.trim_end().as_bytes().last() == Some(&terminator)
}
