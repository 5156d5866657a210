use super::Channel;
use crate::errors::NetgripError;
use crate::util::bytes::prompt_search_window;
use std::time::Duration;

impl Channel {
    /// Write `b` bytes to the device.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the transport write fails.
    pub fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        match self.transport.lock() {
            Ok(mut transport) => {
                transport.write(b)?;

                Ok(())
            }
            Err(err) => Err(NetgripError::Internal(format!(
                "failed acquiring lock on transport, error: {err}"
            ))),
        }
    }

    /// Writes a return -- the return character by default is `\n`, but
    /// vendors can configure `\r` or `\r\n`.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the transport write fails.
    pub fn write_return(&mut self) -> Result<(), NetgripError> {
        let return_char = self.args.return_char.clone();

        self.write(return_char.as_bytes())
    }

    /// Write `b` bytes plus the return character as one transport write,
    /// the way a command is submitted.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the transport write fails.
    pub fn write_and_return(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        let mut line = b.to_vec();
        line.extend(self.args.return_char.as_bytes());

        self.write(line.as_slice())
    }

    /// Elicit and return the device's current prompt: write a return, read
    /// until the prompt pattern matches, and extract the match.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout or transport failure, or
    /// `PromptNotFound` if output arrived but the pattern cannot be
    /// re-located in it (a bug-ish situation).
    pub fn get_prompt(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.read_prompt(timeout).map(|(_, prompt)| prompt)
    }

    /// Like [`Self::get_prompt`], but also returns the full capture that
    /// led up to the prompt -- on a fresh shell that is the login banner.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, transport failure, or an
    /// unmatchable prompt.
    pub fn read_prompt(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<(Vec<u8>, Vec<u8>), NetgripError> {
        self.write_return()?;

        let rb = self.read_until_prompt(timeout)?;

        let window = prompt_search_window(rb.as_slice(), self.args.prompt_search_depth as usize);

        let Some(found) = self.args.prompt_pattern.find_iter(window).last() else {
            return Err(NetgripError::PromptNotFound(
                String::from_utf8_lossy(window).into_owned(),
            ));
        };

        let prompt = found.as_bytes().to_vec();

        Ok((rb, prompt))
    }
}
