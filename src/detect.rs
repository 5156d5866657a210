use crate::config::{
    AdvancedOptions,
    Credentials,
};
use crate::dispatch;
use crate::errors::NetgripError;
use crate::session::Session;
use crate::transport::base::Transport;
use log::{
    debug,
    info,
};

/// Match a (lower-cased) login banner against the detection ruleset and
/// return the device-type tag it implies. Rules run in priority order;
/// family defaults (bare `aruba` means AOS-CX, bare `ubiquiti` means
/// EdgeSwitch) are heuristics -- callers that know better pass an explicit
/// tag to the dispatcher instead.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn detect_from_banner(banner: &str) -> Option<&'static str> {
    let b = banner.to_lowercase();

    let has = |needle: &str| b.contains(needle);
    let has_any = |needles: &[&str]| needles.iter().any(|needle| b.contains(needle));

    if has_any(&[
        "cisco", "ios", "nx-os", "asa", "nexus", "ios-xr", "ios-xe", "sg300",
    ]) {
        if has("ios-xr") || has("ios xr") {
            return Some("cisco_ios_xr");
        }

        if has("nx-os") || has("nexus") {
            return Some("cisco_nxos");
        }

        if has("asa") {
            return Some("cisco_asa");
        }

        if has("sg300") {
            return Some("cisco_sg300");
        }

        if has("ios-xe") || has("ios xe") {
            return Some("cisco_ios_xe");
        }

        return Some("cisco_ios");
    }

    if has("junos") || has("juniper") {
        if has("srx") {
            return Some("juniper_srx");
        }

        return Some("juniper_junos");
    }

    if has_any(&["ciena", "saos"]) {
        return Some("ciena_saos");
    }

    if has_any(&["fortinet", "fortios", "fortigate"]) {
        return Some("fortinet_fortios");
    }

    if has_any(&["palo alto", "pan-os", "panos"]) {
        return Some("paloalto_panos");
    }

    if has_any(&["ericsson", "ipos"]) {
        return Some("ericsson_ipos");
    }

    if has("minilink") || has("mini-link") {
        return Some("ericsson_mltn");
    }

    if has_any(&["linux", "ubuntu", "centos", "redhat", "debian", "bash"]) {
        return Some("linux");
    }

    if has_any(&["huawei", "vrp", "ne8000"]) {
        return Some("huawei_vrp");
    }

    if has("arista") {
        return Some("arista_eos");
    }

    if has("procurve") {
        return Some("hp_procurve");
    }

    if has("aruba") {
        if has("arubaos") || has("mobility controller") {
            return Some("aruba_os");
        }

        return Some("aruba_aoscx");
    }

    if has("ubiquiti") || has("ubnt") {
        if has("edgerouter") || has("edgeos") {
            return Some("ubiquiti_edgerouter");
        }

        if has("edgeswitch") {
            return Some("ubiquiti_edgeswitch");
        }

        if has("unifi") {
            return Some("ubiquiti_unifi");
        }

        return Some("ubiquiti_edgeswitch");
    }

    if has("mikrotik") || has("routeros") {
        if has("switchos") {
            return Some("mikrotik_switchos");
        }

        return Some("mikrotik_routeros");
    }

    if has("extremexos") || has("exos") {
        return Some("extreme_exos");
    }

    if has("dell") && has("os10") {
        return Some("dell_os10");
    }

    if has_any(&["versa", "flexvnf"]) {
        return Some("versa_flexvnf");
    }

    None
}

/// Probe a device for its type: open a generic session, provoke a banner
/// and prompt with a benign empty write, and run the ruleset over what
/// came back. The probe session is always closed, including on errors.
///
/// # Errors
///
/// Returns a `NetgripError` if the probe session cannot connect.
pub fn auto_detect(
    credentials: &Credentials,
    options: &AdvancedOptions,
) -> Result<Option<String>, NetgripError> {
    let mut probe_credentials = credentials.clone();
    probe_credentials.device_type = String::from("generic");

    let session = dispatch::build_session(probe_credentials, options.clone())?;

    run_probe(session)
}

/// Like [`auto_detect`] but over a caller-supplied transport.
///
/// # Errors
///
/// Returns a `NetgripError` if the probe session cannot connect.
pub fn auto_detect_with_transport(
    credentials: &Credentials,
    options: &AdvancedOptions,
    transport: Box<dyn Transport + Send>,
) -> Result<Option<String>, NetgripError> {
    let mut probe_credentials = credentials.clone();
    probe_credentials.device_type = String::from("generic");

    let session =
        dispatch::build_session_with_transport(probe_credentials, options.clone(), transport)?;

    run_probe(session)
}

fn run_probe(
    mut session: Box<dyn Session + Send>,
) -> Result<Option<String>, NetgripError> {
    let connect_result = session.connect();

    if let Err(err) = connect_result {
        session.disconnect().ok();

        return Err(err);
    }

    // the banner accumulated up to the first prompt, plus the prompt
    // itself, is what the ruleset reads
    let mut evidence = session.base().banner.clone();

    if let Ok(prompt) = session.get_prompt() {
        evidence.push('\n');
        evidence.push_str(prompt.as_str());
    }

    session.disconnect().ok();

    let detected = detect_from_banner(evidence.as_str());

    match detected {
        Some(tag) => info!("auto-detection matched '{tag}'"),
        None => debug!("auto-detection found no match"),
    }

    Ok(detected.map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::detect_from_banner;

    #[test]
    fn nexus_wins_over_bare_cisco() {
        let banner = "Cisco Nexus Operating System (NX-OS) Software\ncisco Nexus9000";

        assert_eq!(detect_from_banner(banner), Some("cisco_nxos"));
    }

    #[test]
    fn cisco_family_variants() {
        assert_eq!(
            detect_from_banner("Cisco IOS XR Software, Version 7.3"),
            Some("cisco_ios_xr")
        );
        assert_eq!(
            detect_from_banner("Cisco Adaptive Security Appliance (ASA)"),
            Some("cisco_asa")
        );
        assert_eq!(
            detect_from_banner("Cisco IOS Software, C2960"),
            Some("cisco_ios")
        );
        assert_eq!(detect_from_banner("SG300-28 26-Port Gigabit"), Some("cisco_sg300"));
    }

    #[test]
    fn juniper_srx_refinement() {
        assert_eq!(
            detect_from_banner("JUNOS Software Release [12.1X46] on srx240"),
            Some("juniper_srx")
        );
        assert_eq!(detect_from_banner("juniper junos 18.4"), Some("juniper_junos"));
    }

    #[test]
    fn family_defaults_are_applied() {
        assert_eq!(detect_from_banner("Aruba 2930F"), Some("aruba_aoscx"));
        assert_eq!(
            detect_from_banner("ArubaOS (MODEL: 7005), Mobility Controller"),
            Some("aruba_os")
        );
        assert_eq!(detect_from_banner("Welcome to UBNT something"), Some("ubiquiti_edgeswitch"));
        assert_eq!(
            detect_from_banner("ubnt EdgeRouter Lite, EdgeOS v1.10"),
            Some("ubiquiti_edgerouter")
        );
    }

    #[test]
    fn linux_distributions() {
        assert_eq!(
            detect_from_banner("Welcome to Ubuntu 20.04.3 LTS (GNU/Linux 5.4.0)"),
            Some("linux")
        );
    }

    #[test]
    fn mikrotik_and_friends() {
        assert_eq!(
            detect_from_banner("MikroTik RouterOS 6.48"),
            Some("mikrotik_routeros")
        );
        assert_eq!(detect_from_banner("ExtremeXOS (X440G2)"), Some("extreme_exos"));
        assert_eq!(detect_from_banner("Dell EMC Networking OS10"), Some("dell_os10"));
        assert_eq!(detect_from_banner("Versa FlexVNF 21.2"), Some("versa_flexvnf"));
    }

    #[test]
    fn silence_yields_none() {
        assert_eq!(detect_from_banner("login banner with nothing of note"), None);
    }
}
