use crate::errors::NetgripError;
use crate::transport::base::Transport;

use super::Args;

use log::{
    debug,
    info,
};
use std::collections::VecDeque;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::mpsc::{
    channel,
    Receiver,
    Sender,
    TryRecvError,
};
use std::sync::{
    Arc,
    Mutex,
};
use std::thread;

/// A cancellation handle for in-flight channel operations. Cloning is
/// cheap; cancelling unparks any deadline loop on the owning channel at
/// its next poll.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation of whatever the owning channel is doing.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The netgrip `Channel` object -- the channel wraps the transport object
/// and handles sending to and reading from it. A background read loop
/// drains the transport into an internal queue so operation-level reads
/// are deadline-bounded and never block on the wire.
pub struct Channel {
    /// The arguments that the channel was created with.
    pub args: Args,
    pub(super) transport: Arc<Mutex<dyn Transport + Send>>,
    pub(super) queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    read_error_receiver: Option<Receiver<NetgripError>>,
    read_done_sender: Option<Sender<bool>>,
    cancel: Arc<AtomicBool>,
}

impl Channel {
    /// Returns a new instance of `Channel` wrapping the given transport.
    #[must_use]
    pub fn new(
        args: Args,
        t: impl Transport + Send + 'static,
    ) -> Self {
        Self {
            args,
            transport: Arc::new(Mutex::new(t)),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            read_error_receiver: None,
            read_done_sender: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open the channel and underlying transport, then kick off the
    /// internal read loop which constantly drains the transport.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the transport cannot be opened.
    pub fn open(&mut self) -> Result<(), NetgripError> {
        {
            let mut transport = self.transport.lock().map_err(|err| {
                NetgripError::Internal(format!(
                    "failed acquiring transport lock during open, error: {err}"
                ))
            })?;

            transport.open()?;
        }

        self.cancel.store(false, Ordering::SeqCst);

        let read_loop_transport = Arc::<Mutex<dyn Transport + Send>>::clone(&self.transport);
        let read_loop_queue = Arc::<Mutex<VecDeque<Vec<u8>>>>::clone(&self.queue);
        let read_delay = self.args.read_delay;

        let (read_error_sender, read_error_receiver) = channel::<NetgripError>();
        self.read_error_receiver = Some(read_error_receiver);

        let (read_done_sender, read_done_receiver) = channel::<bool>();
        self.read_done_sender = Some(read_done_sender);

        debug!("starting channel read loop");

        thread::spawn(move || {
            Self::read_loop(
                &read_loop_transport,
                &read_loop_queue,
                read_delay,
                &read_error_sender,
                &read_done_receiver,
            );
        });

        Ok(())
    }

    /// Close the channel and underlying transport. Idempotent -- closing a
    /// channel that never opened (or already closed) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the transport lock is poisoned.
    pub fn close(&mut self) -> Result<(), NetgripError> {
        info!("channel closing");

        if let Some(sender) = self.read_done_sender.take() {
            // the loop may have already exited on transport death; a dead
            // receiver is fine
            sender.send(true).ok();
        }

        self.read_error_receiver = None;

        match self.transport.lock() {
            Ok(mut transport) => {
                transport.close()?;

                Ok(())
            }
            Err(err) => Err(NetgripError::Internal(format!(
                "failed acquiring lock on transport, error: {err}"
            ))),
        }
    }

    /// Returns a shared handle to the underlying transport -- used by the
    /// keepalive watchdog, which probes from its own thread.
    #[must_use]
    pub fn transport_handle(&self) -> Arc<Mutex<dyn Transport + Send>> {
        Arc::<Mutex<dyn Transport + Send>>::clone(&self.transport)
    }

    /// Returns a handle that cancels in-flight operations on this channel.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::<AtomicBool>::clone(&self.cancel),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Reads one chunk from the queue being filled by the background read
    /// loop; empty vec when the queue is quiet.
    ///
    /// # Errors
    ///
    /// Returns a `NetgripError` if the read loop hit an unrecoverable
    /// transport error.
    pub fn read(&mut self) -> Result<Vec<u8>, NetgripError> {
        if let Some(receiver) = self.read_error_receiver.as_ref() {
            match receiver.try_recv() {
                Ok(err) => return Err(err),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }
        }

        let mut queue = self.queue.lock().map_err(|err| {
            NetgripError::Internal(format!("failed acquiring queue lock, error: {err}"))
        })?;

        Ok(queue.pop_front().unwrap_or_default())
    }
}
