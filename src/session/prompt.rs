use regex::bytes::Regex;

/// The prompt terminators recognized when learning a base prompt.
const TERMINATORS: [char; 4] = ['#', '>', '$', '%'];

/// The learned shape of a device's prompt. The base prompt is the
/// hostname-like prefix with mode terminators stripped; the pattern is the
/// compiled matcher handed to the channel once learning succeeds.
#[derive(Default)]
pub struct PromptModel {
    /// The hostname-like prefix of the prompt, no terminator.
    pub base: String,
}

impl PromptModel {
    /// Strip trailing whitespace plus a single prompt terminator (plus any
    /// whitespace before it) from a prompt line, leaving the base.
    #[must_use]
    pub fn strip_terminator(line: &str) -> &str {
        let line = line.trim_end();

        let Some(stripped) = line.strip_suffix(TERMINATORS) else {
            return line;
        };

        stripped.trim_end()
    }

    /// The last non-empty line of a capture -- where the prompt lives.
    #[must_use]
    pub fn last_line(capture: &str) -> &str {
        capture
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim()
    }

    /// Build the channel prompt pattern for a learned base: the base
    /// anywhere in a line that ends with a terminator. `extra_terminators`
    /// lets vendors whose prompts close with something else (the `]` of a
    /// VRP system view) widen the set.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the escaped base somehow fails to
    /// compile.
    pub fn build_pattern(
        base: &str,
        extra_terminators: &str,
    ) -> Result<Regex, regex::Error> {
        Regex::new(&format!(
            r"(?m)^[^\n]*{}[^\n]*[#>$%{}]\s*$",
            regex::escape(base),
            regex::escape(extra_terminators),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::PromptModel;

    #[test]
    fn terminator_stripping() {
        assert_eq!(PromptModel::strip_terminator("Router# "), "Router");
        assert_eq!(PromptModel::strip_terminator("Router>"), "Router");
        assert_eq!(PromptModel::strip_terminator("user@host:~$ "), "user@host:~");
        assert_eq!(PromptModel::strip_terminator("fw %"), "fw");
        assert_eq!(PromptModel::strip_terminator("no-terminator"), "no-terminator");
    }

    #[test]
    fn last_line_skips_trailing_blanks() {
        assert_eq!(PromptModel::last_line("banner\n\nRouter> \n\n"), "Router>");
    }

    #[test]
    fn built_pattern_matches_mode_variants() {
        let pattern = PromptModel::build_pattern("Router", "").unwrap();

        assert!(pattern.is_match(b"Router>"));
        assert!(pattern.is_match(b"Router# "));
        assert!(pattern.is_match(b"Router(config)# "));
        assert!(pattern.is_match(b"Router(config-if)# "));
        assert!(!pattern.is_match(b"Some output from Router about stuff"));
    }

    #[test]
    fn extra_terminators_widen_the_set() {
        let pattern = PromptModel::build_pattern("Huawei", "]").unwrap();

        assert!(pattern.is_match(b"<Huawei>"));
        assert!(pattern.is_match(b"[Huawei]"));
        assert!(pattern.is_match(b"[Huawei-GigabitEthernet0/0/1]"));
    }
}
