use super::constants::ANSI_ESCAPE_BYTE;
use super::Channel;
use crate::errors::NetgripError;
use crate::transport::base::Transport;
use core::str;
use core::time::Duration;
use log::debug;
use once_cell::sync::OnceCell;
use regex::bytes::Regex;
use std::collections::VecDeque;
use std::sync::mpsc::{
    Receiver,
    Sender,
    TryRecvError,
};
use std::sync::{
    Arc,
    Mutex,
};
use std::thread;

/// # Panics
///
/// Returns (once) the byte-level ansi escape pattern used to scrub device
/// output as it is read. This should realistically never panic.
#[allow(clippy::expect_used)]
fn ansi_bytes_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"[\x1b\x9b][\[\]()#;?]*(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07|(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~])")
            .expect("failed compiling pattern, this is a bug")
    })
}

impl Channel {
    pub(super) fn read_loop(
        transport: &Arc<Mutex<dyn Transport + Send>>,
        queue: &Arc<Mutex<VecDeque<Vec<u8>>>>,
        read_delay: Duration,
        read_error_sender: &Sender<NetgripError>,
        read_done_receiver: &Receiver<bool>,
    ) {
        loop {
            match read_done_receiver.try_recv() {
                Ok(_) | Err(TryRecvError::Disconnected) => {
                    debug!("channel read loop done");

                    return;
                }
                Err(TryRecvError::Empty) => {}
            }

            let read_result = match transport.lock() {
                Ok(mut transport) => transport.read(),
                Err(err) => {
                    read_error_sender
                        .send(NetgripError::Internal(format!(
                            "failed acquiring transport lock in read loop, error: {err}"
                        )))
                        .ok();

                    return;
                }
            };

            let mut b = match read_result {
                Ok(b) => b,
                Err(err) => {
                    // surface the error and stop; the next operation-level
                    // read will pick it up
                    read_error_sender.send(err).ok();

                    return;
                }
            };

            if !b.is_empty() {
                if b.contains(&ANSI_ESCAPE_BYTE) {
                    b = ansi_bytes_pattern().replace_all(b.as_slice(), &b""[..]).to_vec();
                }

                debug!(
                    "channel read\n{}",
                    str::from_utf8(b.as_slice()).unwrap_or("failed decoding bytes, cannot log")
                );

                if let Ok(mut queue) = queue.lock() {
                    queue.push_back(b);
                }
            }

            thread::sleep(read_delay);
        }
    }
}
