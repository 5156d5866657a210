use super::constants::{
    DEFAULT_PROMPT_SEARCH_DEPTH,
    DEFAULT_READ_DELAY,
    DEFAULT_RETURN_CHAR,
    DEFAULT_TIMEOUT_OPS,
};
use super::patterns::default_prompt_pattern;
use core::time::Duration;
use regex::bytes::Regex;

/// A struct to hold args/settings for a `Channel` object.
pub struct Args {
    /// Depth we should search back in accumulated output for the prompt.
    pub prompt_search_depth: u16,
    /// Regex pattern used to find the prompt; replaced once the session
    /// learns the device's base prompt.
    pub prompt_pattern: Regex,
    /// Return character used to submit input.
    pub return_char: String,
    /// Delay between reads of the underlying transport.
    pub read_delay: Duration,
    /// Default timeout for channel operations when the caller supplies
    /// none.
    pub timeout_ops: Duration,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            prompt_search_depth: DEFAULT_PROMPT_SEARCH_DEPTH,
            prompt_pattern: default_prompt_pattern(),
            return_char: DEFAULT_RETURN_CHAR.to_owned(),
            read_delay: DEFAULT_READ_DELAY,
            timeout_ops: DEFAULT_TIMEOUT_OPS,
        }
    }
}
