use once_cell::sync::OnceCell;
use regex::bytes::Regex;

/// # Panics
///
/// Returns (once) the compiled default prompt pattern -- a short line of
/// prompt-ish characters ending in a prompt terminator. Wide enough for
/// `Router>`, `switch(config)#`, `<Huawei>`, `[admin@MikroTik] >`, and
/// `user@host:~$`. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn default_prompt_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?im)^[a-z\d.\-_@()/:~\[\]<> ]{1,63}[#>$%]\s*$")
            .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
/// Returns (once) the fast-mode prompt pattern: any non-empty line ending
/// in a prompt terminator plus optional trailing whitespace. This should
/// realistically never panic.
#[allow(clippy::expect_used)]
pub fn fast_prompt_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?m)^[^\n]*\S[^\n]*[#>$%][ \t]*$")
            .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
/// Returns (once) the compiled password prompt pattern used for enable
/// escalation and sudo. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn password_prompt_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?im)(?:.*@.*)?password\s*:\s*$")
            .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
/// Returns (once) the compiled login prompt pattern -- `login:` and
/// `username:` forms, seen during in-channel logins (the UniFi
/// telnet-to-switch hop). This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn username_prompt_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?im)^.*(?:username|login)\s*:\s*$")
            .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
/// Returns (once) the compiled confirmation dialogue pattern covering the
/// common vendor shapes: `[Y/N]`, `(y/n)`, `[confirm]`, `[yes,no]`,
/// `Are you sure?`, `continue?`. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn confirmation_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(
            r"(?im)(?:\[y(?:es)?[/,]n(?:o)?\]|\(y(?:es)?/n(?:o)?\)|\[confirm\]|are you sure.*\?|continue\s*\?|save\s*\?|to continue)\s*(?:\(yes\))?\s*:?\s*$",
        )
        .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        confirmation_pattern,
        default_prompt_pattern,
        fast_prompt_pattern,
        password_prompt_pattern,
    };

    #[test]
    fn default_pattern_matches_common_prompts() {
        let pattern = default_prompt_pattern();

        for prompt in [
            "Router>",
            "Router#",
            "switch(config)# ",
            "<Huawei>",
            "[admin@MikroTik] > ",
            "user@host:~$ ",
            "fw-01 % ",
        ] {
            assert!(
                pattern.is_match(prompt.as_bytes()),
                "expected match for '{prompt}'"
            );
        }
    }

    #[test]
    fn default_pattern_ignores_body_text() {
        let pattern = default_prompt_pattern();

        assert!(!pattern.is_match(b"Cisco IOS Software, Version 15.2"));
    }

    #[test]
    fn fast_pattern_matches_any_terminated_tail() {
        assert!(fast_prompt_pattern().is_match(b"weird-prompt!!#"));
        assert!(fast_prompt_pattern().is_match(b"X450-48t.1 # "));
        assert!(fast_prompt_pattern().is_match(b"[admin@MikroTik] > "));
        assert!(!fast_prompt_pattern().is_match(b"no terminator here"));
    }

    #[test]
    fn password_pattern_is_case_insensitive() {
        assert!(password_prompt_pattern().is_match(b"Password: "));
        assert!(password_prompt_pattern().is_match(b"admin@10.0.0.1's password:"));
    }

    #[test]
    fn confirmation_shapes() {
        let pattern = confirmation_pattern();

        assert!(pattern.is_match(b"Are you sure to continue?[Y/N]:"));
        assert!(pattern.is_match(b"Proceed with reload? [confirm]"));
        assert!(pattern.is_match(b"Are you sure you want to save? (y/n) "));
        assert!(pattern.is_match(b"Do you want to continue? "));
    }
}
