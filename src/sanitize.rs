use once_cell::sync::OnceCell;
use regex::Regex;

/// # Panics
///
/// Returns (once) the compiled ansi CSI/OSC escape pattern. This should
/// realistically never panic.
#[allow(clippy::expect_used)]
pub fn ansi_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"[\x1b\x9b][\[\]()#;?]*(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07|(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~])")
            .expect("failed compiling pattern, this is a bug")
    })
}

/// # Panics
///
/// Returns (once) the compiled pager marker pattern -- the `---- More ----`
/// and `Press ENTER to continue` style lines pagers leave behind even when
/// paging is disabled late. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn pager_marker_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*(?:-+\s*more\s*-+|--more--|press enter to continue.*|press any key to continue.*)[ \t]*$")
            .expect("failed compiling pattern, this is a bug")
    })
}

/// # Panics
///
/// Returns (once) the compiled Arista configuration stage marker pattern
/// (`(s1)` / `(s2)` decorations on config prompts). This should
/// realistically never panic.
#[allow(clippy::expect_used)]
pub fn config_stage_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| Regex::new(r"\(s\d\)").expect("failed compiling pattern, this is a bug"))
}

/// # Panics
///
/// Returns (once) the compiled commit-context marker pattern: `[edit ...]`
/// blocks, `{master:N}` / `{backup:N}` routing-engine tags, and bare
/// `admin@host` context lines emitted by Junos-style CLIs. This should
/// realistically never panic.
#[allow(clippy::expect_used)]
pub fn commit_context_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:\[edit[^\]]*\]|\{(?:master|backup):\d+\}|[a-zA-Z\d_.\-]+@[a-zA-Z\d_.\-]+[%#>]?)[ \t]*$")
            .expect("failed compiling pattern, this is a bug")
    })
}

/// Build the pattern matching a bracketed-hostname prompt embedded
/// mid-output -- the `<HOST>` and `[HOST]` forms VRP-style CLIs repeat on
/// every line of some outputs.
///
/// # Errors
///
/// Returns the regex error if the escaped hostname somehow fails to
/// compile.
pub fn bracketed_prompt_pattern(base_prompt: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?m)^[<\[]{}(?:-[a-zA-Z\d/.\-]+)?[>\]][ \t]*",
        regex::escape(base_prompt)
    ))
}

/// Normalize `\r\n` and bare `\r` to `\n`.
#[must_use]
pub fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Collapse any run of three or more blank lines down to a single blank
/// line.
#[allow(clippy::expect_used)]
#[must_use]
pub fn collapse_blank_runs(text: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();

    let re = RE.get_or_init(|| {
        Regex::new(r"\n{3,}").expect("failed compiling pattern, this is a bug")
    });

    re.replace_all(text, "\n\n").into_owned()
}

/// Remove the first occurrence of the command echo from the head of the
/// output. Devices echo the submitted command (sometimes twice, after a
/// width renegotiation) before the real output begins.
#[must_use]
pub fn strip_command_echo<'a>(
    text: &'a str,
    command: &str,
) -> &'a str {
    let mut remainder = text.trim_start_matches('\n');

    // some platforms re-echo after the terminal width changes; eat up to
    // two leading echo lines
    for _ in 0_u8..2 {
        let Some((first_line, rest)) = remainder.split_once('\n') else {
            if remainder.trim() == command.trim() {
                return "";
            }

            return remainder;
        };

        if first_line.trim() == command.trim() || first_line.trim().ends_with(command.trim()) {
            remainder = rest;
        } else {
            break;
        }
    }

    remainder
}

/// Remove the trailing prompt line -- the last non-empty line when it
/// contains the learned base prompt or ends in a prompt terminator.
#[must_use]
pub fn strip_trailing_prompt(
    text: &str,
    base_prompt: &str,
) -> String {
    let trimmed = text.trim_end();

    let Some((head, last_line)) = trimmed.rsplit_once('\n') else {
        if is_prompt_line(trimmed, base_prompt) {
            return String::new();
        }

        return trimmed.to_owned();
    };

    if is_prompt_line(last_line, base_prompt) {
        return head.to_owned();
    }

    trimmed.to_owned()
}

fn is_prompt_line(
    line: &str,
    base_prompt: &str,
) -> bool {
    let line = line.trim();

    if line.is_empty() {
        return false;
    }

    let terminated = line.ends_with('#')
        || line.ends_with('>')
        || line.ends_with('$')
        || line.ends_with('%');

    if base_prompt.is_empty() {
        return terminated;
    }

    terminated && line.contains(base_prompt)
}

/// Produce cleaned text from a raw capture: normalize line endings, strip
/// the echo, drop the trailing prompt line, remove pager markers and ansi
/// escapes, apply any vendor-specific decoration patterns, collapse blank
/// runs, and trim.
#[must_use]
pub fn clean_output(
    raw: &str,
    command: &str,
    base_prompt: &str,
    extra_patterns: &[&Regex],
) -> String {
    let mut text = normalize_line_endings(raw);

    text = ansi_pattern().replace_all(&text, "").into_owned();
    text = strip_command_echo(&text, command).to_owned();
    text = strip_trailing_prompt(&text, base_prompt);
    text = pager_marker_pattern().replace_all(&text, "").into_owned();

    for pattern in extra_patterns {
        text = pattern.replace_all(&text, "").into_owned();
    }

    text = collapse_blank_runs(&text);

    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::{
        bracketed_prompt_pattern,
        clean_output,
        commit_context_pattern,
        config_stage_pattern,
        strip_command_echo,
        strip_trailing_prompt,
    };

    #[test]
    fn echo_body_prompt_round_trips_to_body() {
        let raw = "show version\r\nCisco IOS Software, Version 15.2\r\nuptime is 1 week\r\nRouter#";

        let cleaned = clean_output(raw, "show version", "Router", &[]);

        assert_eq!(
            cleaned,
            "Cisco IOS Software, Version 15.2\nuptime is 1 week"
        );
    }

    #[test]
    fn double_echo_is_consumed() {
        let raw = "show version\nshow version\nbody\nRouter#";

        let cleaned = clean_output(raw, "show version", "Router", &[]);

        assert_eq!(cleaned, "body");
    }

    #[test]
    fn pager_markers_are_removed() {
        let raw = "show run\nline one\n ---- More ---- \nline two\nswitch#";

        let cleaned = clean_output(raw, "show run", "switch", &[]);

        assert_eq!(cleaned, "line one\n\nline two");
    }

    #[test]
    fn ansi_sequences_are_removed() {
        let raw = "show log\n\u{1b}[2Kentry one\nHost#";

        let cleaned = clean_output(raw, "show log", "Host", &[]);

        assert_eq!(cleaned, "entry one");
    }

    #[test]
    fn arista_config_stages_are_scrubbed() {
        let raw = "configure\nswitch(s1)(config)#interface Et1\nswitch(s2)#";

        let cleaned = clean_output(raw, "configure", "switch", &[config_stage_pattern()]);

        assert!(!cleaned.contains("(s1)"));
        assert!(!cleaned.contains("(s2)"));
    }

    #[test]
    fn junos_context_markers_are_scrubbed() {
        let raw = "set interfaces ge-0/0/0 description test\n[edit]\ncommit complete\n{master:0}\nadmin@fw> ";

        let cleaned = clean_output(
            raw,
            "set interfaces ge-0/0/0 description test",
            "fw",
            &[commit_context_pattern()],
        );

        assert_eq!(cleaned, "commit complete");
    }

    #[test]
    fn huawei_bracketed_prompts_are_scrubbed() {
        let pattern = bracketed_prompt_pattern("CE6850").unwrap();
        let raw = "display version\n<CE6850>some output\n[CE6850-GigabitEthernet0/0/1]more\n<CE6850>";

        let cleaned = clean_output(raw, "display version", "CE6850", &[&pattern]);

        assert_eq!(cleaned, "some output\nmore");
    }

    #[test]
    fn echo_only_capture_cleans_to_empty() {
        assert_eq!(strip_command_echo("show clock", "show clock"), "");
    }

    #[test]
    fn prompt_without_base_needs_terminator() {
        assert_eq!(strip_trailing_prompt("body\nRouter#", ""), "body");
        assert_eq!(strip_trailing_prompt("body\nnot a prompt", ""), "body\nnot a prompt");
    }
}
