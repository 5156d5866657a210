use super::{
    ProfileSession,
    VendorProfile,
};
use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::errors::NetgripError;
use crate::session::{
    BaseSession,
    Session,
};
use crate::transport::base::Transport;
use log::debug;

/// EdgeSwitch: enable-gated IOS-ish CLI; saving asks "Are you sure?".
pub const EDGESWITCH_PROFILE: VendorProfile = VendorProfile {
    requires_enable: true,
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "y",
    reboot: Some("reload"),
    reboot_answer: "y",
    ..VendorProfile::defaults("ubiquiti_edgeswitch")
};

/// EdgeRouter speaks the VyOS dialect: commit-based, `save` expecting
/// "Done".
pub const EDGEROUTER_PROFILE: VendorProfile = VendorProfile {
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    commit: Some("commit"),
    config_marker: "#",
    disable_paging: Some("terminal length 0"),
    terminal_width: Some("terminal width 512"),
    show_config: Some("show configuration"),
    save_config: Some("save"),
    reboot: Some("reboot"),
    ..VendorProfile::defaults("ubiquiti_edgerouter")
};

/// UniFi switches expose the EdgeSwitch CLI one `telnet localhost` hop
/// past a linux shell.
pub const UNIFI_PROFILE: VendorProfile = VendorProfile {
    requires_enable: true,
    enter_config: Some("configure"),
    exit_config: Some("exit"),
    show_config: Some("show running-config"),
    save_config: Some("write memory"),
    save_answer: "y",
    ..VendorProfile::defaults("ubiquiti_unifi")
};

/// UniFi session: preparation first hops from the management shell into
/// the switch CLI, and disconnect exits that hop before closing ssh.
pub struct UniFi {
    base: BaseSession,
}

impl Session for UniFi {
    fn base(&self) -> &BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSession {
        &mut self.base
    }

    fn session_preparation(&mut self) -> Result<(), NetgripError> {
        let timeout = self.base.command_timeout();

        debug!("hopping into the switch cli via telnet");

        // the inner CLI greets with its own prompt; the default pattern
        // still matches it
        self.base.channel.send_input("telnet localhost", Some(timeout))?;

        self.base.in_shell_mode = false;

        self.set_base_prompt()?;

        if self.base.options.fast_mode {
            return Ok(());
        }

        if let Err(err) = self.disable_paging() {
            log::warn!("disable paging failed (continuing): {err}");
        }

        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), NetgripError> {
        if !self.base.connected {
            return Ok(());
        }

        if self.base.in_config_mode {
            self.exit_config_mode().ok();
        }

        // leave the telnet hop before tearing down ssh
        debug!("exiting the telnet hop");

        self.base.channel.write_and_return(b"exit").ok();

        self.base.stop_keepalive();
        self.base.channel.close()?;

        self.base.connected = false;
        self.base.in_enable_mode = false;
        self.base.in_config_mode = false;
        self.base.set_healthy(false);

        Ok(())
    }
}

pub(crate) fn edgeswitch(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        EDGESWITCH_PROFILE,
        transport,
    ))
}

pub(crate) fn edgerouter(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(ProfileSession::new(
        credentials,
        options,
        EDGEROUTER_PROFILE,
        transport,
    ))
}

pub(crate) fn unifi(
    credentials: Credentials,
    options: AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Box<dyn Session + Send> {
    Box::new(UniFi {
        base: BaseSession::new(credentials, options, UNIFI_PROFILE, transport),
    })
}
