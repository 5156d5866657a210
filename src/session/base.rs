use crate::channel::{
    Args as ChannelArgs,
    Channel,
};
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::session::prompt::PromptModel;
use crate::transport::base::Transport;
use crate::vendors::VendorProfile;
use core::time::Duration;
use log::warn;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::mpsc::{
    channel as mpsc_channel,
    RecvTimeoutError,
    Sender,
};
use std::sync::Arc;
use std::thread;

/// How often the keepalive watchdog probes the transport.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// The shared per-device session state every vendor plugin builds on: the
/// channel, the learned prompt, the privilege/configuration mode flags,
/// and the caller-supplied credentials and options.
pub struct BaseSession {
    /// The credentials the session was built from; immutable.
    pub credentials: Credentials,
    /// Merged per-operation options.
    pub options: AdvancedOptions,
    /// The vendor dialect data.
    pub profile: VendorProfile,
    /// The channel this session drives.
    pub channel: Channel,
    /// The learned prompt model.
    pub prompt: PromptModel,
    /// Whatever the device printed up to the first learned prompt -- the
    /// login banner, kept for device-type detection.
    pub banner: String,
    /// Whether `connect` completed (transport up, preparation done).
    pub connected: bool,
    /// Privilege (enable) mode flag.
    pub in_enable_mode: bool,
    /// Configuration mode flag. Implies `in_enable_mode` on platforms
    /// that gate config behind privilege.
    pub in_config_mode: bool,
    /// Shell mode flag (platforms that land in a bootstrap shell).
    pub in_shell_mode: bool,
    /// Operational mode flag (Junos-style operational CLIs).
    pub in_operational_mode: bool,
    /// Connection attempts burned by the last `connect`.
    pub connection_retries_used: u32,
    healthy: Arc<AtomicBool>,
    keepalive_stop: Option<Sender<bool>>,
}

impl BaseSession {
    /// Build a session core over the given transport. The channel's return
    /// character comes from the vendor profile.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        options: AdvancedOptions,
        profile: VendorProfile,
        transport: impl Transport + Send + 'static,
    ) -> Self {
        let mut channel_args = ChannelArgs::default();
        channel_args.return_char = profile.return_char.to_owned();

        if options.fast_mode {
            channel_args.prompt_pattern = crate::channel::patterns::fast_prompt_pattern();
        }

        Self {
            credentials,
            options,
            profile,
            channel: Channel::new(channel_args, transport),
            prompt: PromptModel::default(),
            banner: String::new(),
            connected: false,
            in_enable_mode: false,
            in_config_mode: false,
            in_shell_mode: false,
            in_operational_mode: false,
            connection_retries_used: 0,
            healthy: Arc::new(AtomicBool::new(false)),
            keepalive_stop: None,
        }
    }

    /// The per-command deadline for this session.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.options.command_timeout()
    }

    /// Store a learned base prompt and point the channel's prompt pattern
    /// at it.
    ///
    /// # Errors
    ///
    /// Returns `PromptNotFound` for an empty base and `Internal` if the
    /// pattern fails to compile.
    pub fn set_prompt(
        &mut self,
        base: &str,
    ) -> Result<(), NetgripError> {
        if base.is_empty() {
            return Err(NetgripError::PromptNotFound(String::from(
                "device prompt reduced to an empty base",
            )));
        }

        let pattern = PromptModel::build_pattern(base, self.profile.extra_prompt_terminators)
            .map_err(|err| {
                NetgripError::Internal(format!(
                    "failed compiling prompt pattern for base '{base}', error: {err}"
                ))
            })?;

        self.prompt.base = base.to_owned();
        self.channel.args.prompt_pattern = pattern;

        Ok(())
    }

    /// The first failure marker found in (lower-cased) cleaned output.
    #[must_use]
    pub fn failure_marker(
        &self,
        clean: &str,
    ) -> Option<&'static str> {
        let lowered = clean.to_lowercase();

        self.profile
            .failed_when_contains
            .iter()
            .find(|marker| lowered.contains(*marker))
            .copied()
    }

    /// Whether the session is healthy -- connected and not flagged by the
    /// keepalive watchdog or a cancellation.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.connected && self.healthy.load(Ordering::SeqCst)
    }

    /// Mark the session healthy/unhealthy.
    pub fn set_healthy(
        &self,
        healthy: bool,
    ) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Arm the keepalive watchdog: a thread probing the transport every
    /// 30 s, flagging the session unhealthy on the first failed probe.
    pub fn start_keepalive(&mut self) {
        if self.keepalive_stop.is_some() {
            return;
        }

        let transport = self.channel.transport_handle();
        let healthy = Arc::<AtomicBool>::clone(&self.healthy);
        let (stop_sender, stop_receiver) = mpsc_channel::<bool>();

        self.keepalive_stop = Some(stop_sender);

        thread::spawn(move || loop {
            match stop_receiver.recv_timeout(KEEPALIVE_INTERVAL) {
                Ok(_) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let probe_ok = transport
                .lock()
                .map(|mut t| t.keepalive_probe().is_ok())
                .unwrap_or(false);

            if !probe_ok {
                warn!("keepalive probe failed, marking session unhealthy");

                healthy.store(false, Ordering::SeqCst);

                return;
            }
        });
    }

    /// Stop the keepalive watchdog if armed.
    pub fn stop_keepalive(&mut self) {
        // dropping the sender disconnects the receiver, which stops the
        // watchdog at its next tick
        self.keepalive_stop.take();
    }
}
