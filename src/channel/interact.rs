use super::constants::INTERACT_GRACE;
use super::Channel;
use crate::errors::NetgripError;
use crate::util::bytes::prompt_search_window;
use log::debug;
use regex::bytes::Regex;
use std::time::{
    Duration,
    Instant,
};

/// The most confirmation dialogues one command is allowed to raise before
/// the engine concludes something is wrong.
const CONFIRMATION_MAX: u8 = 5;

/// One step of an interactive exchange: send `input`, then wait for
/// `expect` (or the channel's prompt pattern when `expect` is `None`).
pub struct InteractEvent {
    /// The input to send.
    pub input: String,
    /// The pattern that completes this step; the channel prompt when
    /// unset.
    pub expect: Option<Regex>,
    /// Whether the input is secret -- kept out of logs.
    pub hidden: bool,
}

impl InteractEvent {
    /// A visible input step completed by the channel prompt.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            expect: None,
            hidden: false,
        }
    }

    /// A visible input step completed by `expect`.
    #[must_use]
    pub const fn expecting(
        input: String,
        expect: Regex,
    ) -> Self {
        Self {
            input,
            expect: Some(expect),
            hidden: false,
        }
    }

    /// A secret input step (passwords) completed by `expect`, or the
    /// prompt when `expect` is `None`.
    #[must_use]
    pub const fn secret(
        input: String,
        expect: Option<Regex>,
    ) -> Self {
        Self {
            input,
            expect,
            hidden: true,
        }
    }
}

impl Channel {
    /// Run a scripted interactive exchange -- privilege escalation with a
    /// password prompt, two-stage logins, save-on-logout dialogues.
    /// Returns the raw capture across all steps.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, cancellation, or transport
    /// failure.
    pub fn send_interactive(
        &mut self,
        events: &[InteractEvent],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        let timeout = timeout.unwrap_or(self.args.timeout_ops);
        let started = Instant::now();

        let mut collected: Vec<u8> = vec![];

        for event in events {
            if event.hidden {
                debug!("interactive step: sending hidden input");
            } else {
                debug!("interactive step: sending '{}'", event.input);
            }

            self.write_and_return(event.input.as_bytes())?;

            let remaining = timeout.saturating_sub(started.elapsed());

            let patterns = match event.expect {
                Some(ref expect) => vec![expect.clone()],
                None => vec![self.args.prompt_pattern.clone()],
            };

            let rb = self.read_until_any(patterns.as_slice(), Some(remaining))?;

            collected.extend(rb);
        }

        Ok(collected)
    }

    /// Wait a short grace interval for a follow-up dialogue matching
    /// `pattern` (e.g. the `Password:` line after `enable`). Returns the
    /// capture and whether the pattern showed up; quiet channels return an
    /// empty capture.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on cancellation or transport failure.
    pub fn expect_within_grace(
        &mut self,
        pattern: &Regex,
    ) -> Result<(bool, Vec<u8>), NetgripError> {
        match self.read_until_any(&[pattern.clone()], Some(INTERACT_GRACE)) {
            Ok(rb) => Ok((true, rb)),
            Err(NetgripError::Timeout { collected, .. }) => Ok((false, collected)),
            Err(err) => Err(err),
        }
    }

    /// Submit an input and automatically answer confirmation dialogues
    /// until the prompt returns. `answer` may be empty, meaning a bare
    /// return (the `[confirm]` style).
    ///
    /// # Errors
    ///
    /// Returns `ConfirmationMismatch` if the device keeps asking past a
    /// sane bound, otherwise a `NetgripError` on timeout, cancellation, or
    /// transport failure.
    pub fn send_and_confirm(
        &mut self,
        input: &str,
        answer: &str,
        confirm: &Regex,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        let timeout = timeout.unwrap_or(self.args.timeout_ops);
        let started = Instant::now();

        self.write_and_return(input.as_bytes())?;

        let patterns = [self.args.prompt_pattern.clone(), confirm.clone()];

        let mut collected: Vec<u8> = vec![];
        let mut answered: u8 = 0;

        loop {
            let remaining = timeout.saturating_sub(started.elapsed());

            let rb = self.read_until_any(patterns.as_slice(), Some(remaining))?;

            collected.extend(rb.as_slice());

            let window = prompt_search_window(rb.as_slice(), self.args.prompt_search_depth as usize);

            if self.args.prompt_pattern.is_match(window) {
                return Ok(collected);
            }

            if confirm.is_match(window) {
                if answered >= CONFIRMATION_MAX {
                    return Err(NetgripError::ConfirmationMismatch(
                        String::from_utf8_lossy(window).into_owned(),
                    ));
                }

                debug!("confirmation dialogue detected, answering '{answer}'");

                self.write_and_return(answer.as_bytes())?;

                answered += 1;

                continue;
            }

            // read_until_any returned without either pattern in the tail
            // window; treat as a dialogue we don't recognize
            return Err(NetgripError::ConfirmationMismatch(
                String::from_utf8_lossy(window).into_owned(),
            ));
        }
    }
}
