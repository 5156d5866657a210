use super::Channel;
use crate::errors::NetgripError;
use std::time::Duration;

impl Channel {
    /// Submit an input line and collect everything up to the next prompt.
    /// Returns the raw capture -- echo, body, and trailing prompt -- for
    /// the sanitizer to clean.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout (carrying partial output),
    /// cancellation, or transport failure.
    pub fn send_input(
        &mut self,
        input: &str,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.write_and_return(input.as_bytes())?;

        self.read_until_prompt(timeout)
    }

    /// Like [`Self::send_input`] but also completes when any of the given
    /// interim patterns match -- used where a command may legitimately end
    /// at something other than the prompt (confirmation dialogues, pager
    /// remnants, commit progress markers).
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, cancellation, or transport
    /// failure.
    pub fn send_input_interim(
        &mut self,
        input: &str,
        interim_patterns: &[regex::bytes::Regex],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.write_and_return(input.as_bytes())?;

        let mut patterns = vec![self.args.prompt_pattern.clone()];
        patterns.extend_from_slice(interim_patterns);

        self.read_until_any(patterns.as_slice(), timeout)
    }
}
