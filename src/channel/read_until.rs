use super::Channel;
use crate::errors::NetgripError;
use crate::util::bytes::{
    contains_subslice,
    prompt_search_window,
};
use regex::bytes::Regex;
use std::thread;
use std::time::{
    Duration,
    Instant,
};

impl Channel {
    fn deadline_loop<F>(
        &mut self,
        timeout: Option<Duration>,
        mut matched: F,
    ) -> Result<Vec<u8>, NetgripError>
    where
        F: FnMut(&Channel, &[u8]) -> bool,
    {
        let timeout = timeout.unwrap_or(self.args.timeout_ops);
        let started = Instant::now();
        let mut rb: Vec<u8> = vec![];

        loop {
            if self.is_cancelled() {
                return Err(NetgripError::Canceled);
            }

            if started.elapsed() >= timeout {
                #[allow(clippy::cast_possible_truncation)]
                return Err(NetgripError::Timeout {
                    elapsed_millis: started.elapsed().as_millis() as u64,
                    collected: rb,
                });
            }

            let nb = self.read()?;

            if !nb.is_empty() {
                rb.extend(nb.as_slice());

                if matched(self, rb.as_slice()) {
                    return Ok(rb);
                }

                // new data may keep coming; poll again immediately
                continue;
            }

            thread::sleep(self.args.read_delay);
        }
    }

    /// Read until the channel's prompt pattern is seen in the tail of the
    /// accumulated output, or the deadline passes. A timeout error carries
    /// whatever was collected.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, cancellation, or transport
    /// failure.
    pub fn read_until_prompt(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.deadline_loop(timeout, |chan, rb| {
            let window = prompt_search_window(rb, chan.args.prompt_search_depth as usize);

            chan.args.prompt_pattern.is_match(window)
        })
    }

    /// Read until any pattern in `patterns` matches the tail of the
    /// accumulated output, or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, cancellation, or transport
    /// failure.
    pub fn read_until_any(
        &mut self,
        patterns: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.deadline_loop(timeout, |chan, rb| {
            let window = prompt_search_window(rb, chan.args.prompt_search_depth as usize);

            patterns.iter().any(|pattern| pattern.is_match(window))
        })
    }

    /// Read until the explicit byte sequence is seen anywhere in the
    /// accumulated output, or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on timeout, cancellation, or transport
    /// failure.
    pub fn read_until_explicit(
        &mut self,
        explicit: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, NetgripError> {
        self.deadline_loop(timeout, |_, rb| contains_subslice(rb, explicit))
    }

    /// Drain whatever is queued right now without waiting for a pattern --
    /// the "read whatever arrived in the window" primitive.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` on transport failure.
    pub fn read_window(
        &mut self,
        window: Duration,
    ) -> Result<Vec<u8>, NetgripError> {
        let started = Instant::now();
        let mut rb: Vec<u8> = vec![];

        while started.elapsed() < window {
            if self.is_cancelled() {
                return Err(NetgripError::Canceled);
            }

            let nb = self.read()?;

            if nb.is_empty() {
                thread::sleep(self.args.read_delay);
            } else {
                rb.extend(nb.as_slice());
            }
        }

        Ok(rb)
    }
}
