use std::time::Duration;

/// The default depth to search backward when looking for a device prompt.
pub const DEFAULT_PROMPT_SEARCH_DEPTH: u16 = 1024;

/// The default return character; vendors that need `\r` or `\r\n` override
/// this on their profile.
pub const DEFAULT_RETURN_CHAR: &str = "\n";

/// The default delay between reads of the underlying transport.
pub const DEFAULT_READ_DELAY: Duration = Duration::from_millis(50);

/// The ANSI escape byte.
pub const ANSI_ESCAPE_BYTE: u8 = 0x1b;

/// The prompt terminator set: the characters a prompt line may end with.
pub const PROMPT_TERMINATORS: [u8; 4] = [b'#', b'>', b'$', b'%'];

/// Default channel operation timeout -- callers normally override this per
/// request via `AdvancedOptions`.
pub const DEFAULT_TIMEOUT_OPS: Duration = Duration::from_secs(10);

/// How long the confirmation engine waits for a follow-up dialogue chunk
/// (e.g. the `Password:` line after `enable`) before concluding there is
/// none.
pub const INTERACT_GRACE: Duration = Duration::from_secs(2);
