mod args;
#[allow(clippy::module_inception)]
mod channel;
mod constants;
mod interact;
/// Compiled-once prompt, password, and confirmation patterns.
pub mod patterns;
mod read_loop;
mod read_until;
mod send_input;
mod write;

pub use args::Args;
pub use channel::{
    CancelHandle,
    Channel,
};
pub use constants::{
    DEFAULT_RETURN_CHAR,
    INTERACT_GRACE,
    PROMPT_TERMINATORS,
};
pub use interact::InteractEvent;

#[cfg(test)]
mod tests {
    use super::patterns::{
        default_prompt_pattern,
        password_prompt_pattern,
    };
    use super::{
        Args,
        Channel,
        InteractEvent,
    };
    use crate::errors::NetgripError;
    use crate::transport::scripted::Scripted;
    use std::time::Duration;

    fn opened_channel(transport: Scripted) -> Channel {
        let mut chan = Channel::new(Args::default(), transport);

        chan.open().unwrap();

        chan
    }

    #[test]
    fn read_until_prompt_returns_as_soon_as_prompt_lands() {
        let transport = Scripted::new()
            .prompt(b"Router> ")
            .rule(b"show clock", b"show clock\n12:00:00 UTC\nRouter> ");

        let mut chan = opened_channel(transport);

        let rb = chan
            .send_input("show clock", Some(Duration::from_secs(2)))
            .unwrap();

        assert!(String::from_utf8(rb).unwrap().contains("12:00:00 UTC"));
    }

    #[test]
    fn read_until_prompt_times_out_with_partial_output() {
        let transport = Scripted::new().rule(b"show tech", b"gathering, hold on...\n");

        let mut chan = opened_channel(transport);

        let err = chan
            .send_input("show tech", Some(Duration::from_millis(200)))
            .unwrap_err();

        match err {
            NetgripError::Timeout { collected, .. } => {
                assert!(String::from_utf8(collected).unwrap().contains("gathering"));
            }
            other => panic!("expected timeout, got {other}"),
        }
    }

    #[test]
    fn read_until_explicit_waits_for_the_exact_bytes() {
        let transport = Scripted::new().rule(
            b"copy run start",
            b"copy run start\nDestination filename [startup-config]? ",
        );

        let mut chan = opened_channel(transport);

        chan.write_and_return(b"copy run start").unwrap();

        let rb = chan
            .read_until_explicit(b"[startup-config]?", Some(Duration::from_secs(2)))
            .unwrap();

        assert!(String::from_utf8(rb).unwrap().contains("Destination filename"));

        // the sequence never arriving means a timeout, not a hang
        let err = chan
            .read_until_explicit(b"never printed", Some(Duration::from_millis(200)))
            .unwrap_err();

        assert!(matches!(err, NetgripError::Timeout { .. }));
    }

    #[test]
    fn read_window_collects_whatever_arrived_and_tolerates_quiet() {
        let transport = Scripted::new();
        let handle = transport.handle();

        let mut chan = opened_channel(transport);

        handle.inject(b"unsolicited ");
        handle.inject(b"syslog burst");

        let rb = chan.read_window(Duration::from_millis(150)).unwrap();

        assert_eq!(rb, b"unsolicited syslog burst");

        // a quiet channel yields an empty capture, not an error
        let rb = chan.read_window(Duration::from_millis(100)).unwrap();

        assert!(rb.is_empty());
    }

    #[test]
    fn cancellation_unblocks_a_pending_read() {
        let transport = Scripted::new();
        let mut chan = opened_channel(transport);

        let handle = chan.cancel_handle();

        handle.cancel();

        let err = chan
            .read_until_prompt(Some(Duration::from_secs(5)))
            .unwrap_err();

        assert!(matches!(err, NetgripError::Canceled));
    }

    #[test]
    fn get_prompt_extracts_the_match() {
        let transport = Scripted::new().prompt(b"switch-a# ");

        let mut chan = opened_channel(transport);

        let prompt = chan.get_prompt(Some(Duration::from_secs(2))).unwrap();

        assert_eq!(String::from_utf8(prompt).unwrap().trim_end(), "switch-a#");
    }

    #[test]
    fn close_before_open_is_a_no_op() {
        let mut chan = Channel::new(Args::default(), Scripted::new());

        chan.close().unwrap();
        chan.close().unwrap();
    }

    #[test]
    fn send_and_confirm_answers_dialogues() {
        let transport = Scripted::new()
            .prompt(b"<Huawei>")
            .rule(b"save", b"save\nAre you sure to continue?[Y/N]:")
            .rule(b"y", b"y\nInfo: Save the configuration successfully.\n<Huawei>");

        let mut chan = opened_channel(transport);

        let rb = chan
            .send_and_confirm(
                "save",
                "y",
                &super::patterns::confirmation_pattern(),
                Some(Duration::from_secs(2)),
            )
            .unwrap();

        assert!(String::from_utf8(rb).unwrap().contains("successfully"));
    }

    #[test]
    fn send_interactive_walks_scripted_exchanges() {
        let transport = Scripted::new()
            .prompt(b"switch> ")
            .rule(b"enable", b"enable\nPassword: ")
            .rule_with_prompt(b"sekrit", b"\nswitch# ", b"switch# ");

        let mut chan = opened_channel(transport);

        let events = [
            InteractEvent::expecting(String::from("enable"), password_prompt_pattern()),
            InteractEvent::secret(String::from("sekrit"), None),
        ];

        let rb = chan
            .send_interactive(&events, Some(Duration::from_secs(2)))
            .unwrap();

        assert!(String::from_utf8(rb).unwrap().contains("switch#"));
    }

    #[test]
    fn default_pattern_set_on_fresh_channel() {
        let chan = Channel::new(Args::default(), Scripted::new());

        assert_eq!(
            chan.args.prompt_pattern.as_str(),
            default_prompt_pattern().as_str()
        );
    }
}
