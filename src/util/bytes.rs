/// Determines if `needle` occurs anywhere in `haystack`.
pub fn contains_subslice<T: PartialEq>(
    haystack: &[T],
    needle: &[T],
) -> bool {
    if needle.is_empty() {
        return false;
    }

    if needle.len() > haystack.len() {
        return false;
    }

    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Returns the tail window of `b` used for prompt searching: at most
/// `depth` bytes, advanced to the first newline inside the window so the
/// search never starts mid-line.
pub fn prompt_search_window(
    b: &[u8],
    depth: usize,
) -> &[u8] {
    if b.len() <= depth {
        return b;
    }

    let window = &b[b.len() - depth..];

    let Some(partition) = window.iter().position(|c| *c == b'\n') else {
        return window;
    };

    &window[partition..]
}

#[cfg(test)]
mod tests {
    use super::{
        contains_subslice,
        prompt_search_window,
    };

    #[test]
    fn subslice_matching() {
        assert!(contains_subslice(b"Router# show", b"# "));
        assert!(!contains_subslice(b"Router#", b"switch"));
        assert!(!contains_subslice(b"anything", b""));
    }

    #[test]
    fn window_starts_at_a_line_boundary() {
        let b = b"aaaa\nbbbb\ncccc";

        assert_eq!(prompt_search_window(b, 7), b"\ncccc");
        assert_eq!(prompt_search_window(b, 100), b.as_slice());
    }
}
