use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::session::Session;
use crate::transport::base::Transport;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

/// The Cisco-family family of platforms.
pub mod cisco;

/// Arista EOS.
pub mod arista;

/// Aruba OS (mobility controllers) and AOS-CX switches.
pub mod aruba;

/// Ciena SAOS.
pub mod ciena;

/// Dell OS10.
pub mod dell;

/// Ericsson IPOS routers and MINI-LINK gear.
pub mod ericsson;

/// Extreme EXOS.
pub mod extreme;

/// Fortinet FortiOS.
pub mod fortinet;

/// The minimal generic platform, also used by auto-detection probes.
pub mod generic;

/// Huawei VRP.
pub mod huawei;

/// Juniper Junos and SRX.
pub mod juniper;

/// Plain linux hosts.
pub mod linux;

/// MikroTik RouterOS and SwOS.
pub mod mikrotik;

/// Palo Alto PAN-OS.
pub mod paloalto;

/// HP ProCurve.
pub mod procurve;

/// Ubiquiti EdgeSwitch, EdgeRouter, and UniFi.
pub mod ubiquiti;

/// Versa FlexVNF.
pub mod versa;

/// VyOS.
pub mod vyos;

/// Everything the shared session engine needs to know about a platform's
/// dialect, as data. Behavioral differences that data cannot express live
/// in the vendor modules as `Session` method overrides; everything else is
/// a field here.
#[derive(Clone, Copy)]
pub struct VendorProfile {
    /// The device-type tag this profile serves.
    pub device_type: &'static str,
    /// The return character submitted after every input.
    pub return_char: &'static str,
    /// Whether commands require privilege (enable) mode first.
    pub requires_enable: bool,
    /// Whether disabling the pager itself requires enable mode.
    pub paging_requires_enable: bool,
    /// Command entering configuration mode, if the platform has one.
    pub enter_config: Option<&'static str>,
    /// Command leaving configuration mode.
    pub exit_config: Option<&'static str>,
    /// Commit command for commit-based platforms, issued before leaving
    /// configuration mode.
    pub commit: Option<&'static str>,
    /// Substring of the prompt that marks configuration mode.
    pub config_marker: &'static str,
    /// Command disabling pagination.
    pub disable_paging: Option<&'static str>,
    /// Command widening the terminal.
    pub terminal_width: Option<&'static str>,
    /// Command printing the running configuration.
    pub show_config: Option<&'static str>,
    /// Command persisting the running configuration.
    pub save_config: Option<&'static str>,
    /// Answer for save confirmations; empty means a bare return.
    pub save_answer: &'static str,
    /// Reboot command.
    pub reboot: Option<&'static str>,
    /// Answer for reboot confirmations; empty means a bare return.
    pub reboot_answer: &'static str,
    /// Graceful logout command issued on disconnect, if any.
    pub logout: Option<&'static str>,
    /// Answer for "save before exit?" style logout dialogues.
    pub logout_answer: &'static str,
    /// Lower-cased substrings that mark a command as failed when they
    /// appear in its output.
    pub failed_when_contains: &'static [&'static str],
    /// Extra prompt terminator characters beyond `# > $ %`.
    pub extra_prompt_terminators: &'static str,
}

/// The failure markers common across CLIs; most vendor profiles use these
/// as-is.
pub const DEFAULT_FAILED_WHEN: &[&str] = &[
    "% invalid",
    "invalid command",
    "invalid input",
    "syntax error",
    "unknown command",
    "error:",
    "% error",
    "command fail",
    "not found",
    "incomplete command",
    "% ambiguous",
];

impl VendorProfile {
    /// A baseline profile: no config mode, no paging, no enable, default
    /// markers. Vendor modules override fields with struct update syntax.
    #[must_use]
    pub const fn defaults(device_type: &'static str) -> Self {
        Self {
            device_type,
            return_char: "\n",
            requires_enable: false,
            paging_requires_enable: false,
            enter_config: None,
            exit_config: None,
            commit: None,
            config_marker: ")#",
            disable_paging: None,
            terminal_width: None,
            show_config: None,
            save_config: None,
            save_answer: "y",
            reboot: None,
            reboot_answer: "y",
            logout: None,
            logout_answer: "n",
            failed_when_contains: DEFAULT_FAILED_WHEN,
            extra_prompt_terminators: "",
        }
    }
}

/// A session with no behavioral deltas -- everything its platform needs is
/// expressed by profile data, so the shared engine's provided methods are
/// used unchanged. Most platforms are this.
pub struct ProfileSession {
    base: crate::session::BaseSession,
}

impl ProfileSession {
    /// Build a data-only session for the given profile.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        options: AdvancedOptions,
        profile: VendorProfile,
        transport: impl Transport + Send + 'static,
    ) -> Self {
        Self {
            base: crate::session::BaseSession::new(credentials, options, profile, transport),
        }
    }
}

impl Session for ProfileSession {
    fn base(&self) -> &crate::session::BaseSession {
        &self.base
    }

    fn base_mut(&mut self) -> &mut crate::session::BaseSession {
        &mut self.base
    }
}

/// A session constructor as stored in the registry: credentials, merged
/// options, and an un-opened transport in; a boxed, un-connected vendor
/// session out.
pub type SessionConstructor = fn(
    Credentials,
    AdvancedOptions,
    Box<dyn Transport + Send>,
) -> Box<dyn Session + Send>;

/// The device-type registry: tag to constructor, one data-driven table.
///
/// # Panics
///
/// Never in practice; the map is built from literals.
pub fn registry() -> &'static BTreeMap<&'static str, SessionConstructor> {
    static REGISTRY: OnceCell<BTreeMap<&'static str, SessionConstructor>> = OnceCell::new();

    REGISTRY.get_or_init(|| {
        BTreeMap::from([
            ("cisco_ios", cisco::ios as SessionConstructor),
            ("cisco_ios_xe", cisco::ios),
            ("cisco_nxos", cisco::nxos),
            ("cisco_asa", cisco::asa),
            ("cisco_ios_xr", cisco::ios_xr),
            ("cisco_sg300", cisco::sg300),
            ("arista_eos", arista::eos),
            ("juniper_junos", juniper::junos),
            ("juniper_srx", juniper::srx),
            ("paloalto_panos", paloalto::panos),
            ("ciena_saos", ciena::saos),
            ("fortinet_fortios", fortinet::fortios),
            ("ericsson_ipos", ericsson::ipos),
            ("ericsson_mltn", ericsson::mltn),
            ("linux", linux::host),
            ("vyos", vyos::vyos),
            ("huawei_vrp", huawei::vrp),
            ("hp_procurve", procurve::procurve),
            ("aruba_os", aruba::os),
            ("aruba_aoscx", aruba::aoscx),
            ("ubiquiti_edgeswitch", ubiquiti::edgeswitch),
            ("ubiquiti_edgerouter", ubiquiti::edgerouter),
            ("ubiquiti_unifi", ubiquiti::unifi),
            ("mikrotik_routeros", mikrotik::routeros),
            ("mikrotik_switchos", mikrotik::switchos),
            ("extreme_exos", extreme::exos),
            ("dell_os10", dell::os10),
            ("versa_flexvnf", versa::flexvnf),
            ("generic", generic::generic),
        ])
    })
}

/// The sorted list of supported device-type tags.
#[must_use]
pub fn supported_device_types() -> Vec<&'static str> {
    registry().keys().copied().collect()
}
