//! Every supported device-type tag must construct through the dispatcher
//! and complete session preparation against a mock shell speaking that
//! vendor's prompt dialect.

mod common;

use common::{
    fast_options,
    session_over,
};
use netgrip::transport::scripted::Scripted;

/// The mock login dialogue per tag: the banner printed at login and the
/// prompt a bare return elicits afterward.
fn login_dialogue(tag: &str) -> Scripted {
    match tag {
        "cisco_ios" | "cisco_ios_xe" => Scripted::new()
            .banner(b"Router line 0\r\nRouter> ")
            .prompt(b"Router> "),
        "cisco_nxos" => Scripted::new()
            .banner(b"Cisco Nexus Operating System\r\nswitch# ")
            .prompt(b"switch# "),
        "cisco_asa" => Scripted::new().banner(b"asa-fw> ").prompt(b"asa-fw> "),
        "cisco_ios_xr" => Scripted::new()
            .banner(b"RP/0/RP0/CPU0:core1# ")
            .prompt(b"RP/0/RP0/CPU0:core1# "),
        "cisco_sg300" => Scripted::new().banner(b"sg300# ").prompt(b"sg300# "),
        "arista_eos" => Scripted::new()
            .banner(b"Arista DCS-7050\r\nleaf1> ")
            .prompt(b"leaf1> "),
        "juniper_junos" | "juniper_srx" => Scripted::new()
            .banner(b"--- JUNOS 18.4R1 built 2018\r\nadmin@fw> ")
            .prompt(b"admin@fw> "),
        "paloalto_panos" => Scripted::new()
            .banner(b"admin@PA-220> ")
            .prompt(b"admin@PA-220> "),
        "ciena_saos" => Scripted::new().banner(b"saos-7> ").prompt(b"saos-7> "),
        "fortinet_fortios" => Scripted::new()
            .banner(b"FGT60E # ")
            .prompt(b"FGT60E # "),
        "ericsson_ipos" => Scripted::new()
            .banner(b"[local]edge1# ")
            .prompt(b"[local]edge1# "),
        "ericsson_mltn" => Scripted::new().banner(b"mltn> ").prompt(b"mltn> "),
        "linux" => Scripted::new()
            .banner(b"Welcome to Ubuntu 20.04\r\nuser@host:~$ ")
            .prompt(b"user@host:~$ "),
        "vyos" => Scripted::new()
            .banner(b"vyos@vyos:~$ ")
            .prompt(b"vyos@vyos:~$ "),
        "huawei_vrp" => Scripted::new()
            .banner(b"Info: The max number of VTY users is 10\r\n<Huawei>")
            .prompt(b"<Huawei>"),
        "hp_procurve" => Scripted::new()
            .banner(b"ProCurve J9772A Switch\r\nProCurve# ")
            .prompt(b"ProCurve# "),
        "aruba_os" => Scripted::new()
            .banner(b"(host) [mynode] # ")
            .prompt(b"(host) [mynode] # "),
        "aruba_aoscx" => Scripted::new().banner(b"switch# ").prompt(b"switch# "),
        "ubiquiti_edgeswitch" => Scripted::new()
            .banner(b"(UBNT EdgeSwitch) >")
            .prompt(b"(UBNT EdgeSwitch) >"),
        "ubiquiti_edgerouter" => Scripted::new()
            .banner(b"Welcome to EdgeOS\r\nubnt@erl:~$ ")
            .prompt(b"ubnt@erl:~$ "),
        "ubiquiti_unifi" => Scripted::new()
            .banner(b"US-24-250W-BZ.v4.0.66# ")
            .prompt(b"US-24-250W-BZ.v4.0.66# ")
            .rule_with_prompt(b"telnet localhost", b"telnet localhost\r\n(UBNT) >", b"(UBNT) >"),
        "mikrotik_routeros" | "mikrotik_switchos" => Scripted::new()
            .banner(b"MikroTik RouterOS 6.48\r\n[admin@MikroTik] > ")
            .prompt(b"[admin@MikroTik] > "),
        "extreme_exos" => Scripted::new()
            .banner(b"ExtremeXOS\r\nX450-48t.1 # ")
            .prompt(b"X450-48t.1 # "),
        "dell_os10" => Scripted::new().banner(b"OS10# ").prompt(b"OS10# "),
        "versa_flexvnf" => Scripted::new()
            .banner(b"admin@versa-flexvnf> ")
            .prompt(b"admin@versa-flexvnf> "),
        "generic" => Scripted::new().banner(b"something% ").prompt(b"something% "),
        other => panic!("no login dialogue for '{other}'"),
    }
}

#[test]
fn every_tag_prepares_against_its_mock_shell() {
    for tag in netgrip::vendors::supported_device_types() {
        let (mut session, _handle) = session_over(tag, fast_options(), login_dialogue(tag));

        session
            .connect()
            .unwrap_or_else(|err| panic!("preparation failed for '{tag}': {err}"));

        assert!(session.is_connected(), "'{tag}' should report connected");
        assert!(
            !session.base().prompt.base.is_empty(),
            "'{tag}' should have learned a base prompt"
        );

        session.disconnect().unwrap();
    }
}

#[test]
fn learned_bases_strip_terminators() {
    let cases = [
        ("cisco_ios", "Router"),
        ("juniper_junos", "admin@fw"),
        ("linux", "user@host:~"),
        ("mikrotik_routeros", "[admin@MikroTik]"),
    ];

    for (tag, expected_base) in cases {
        let (mut session, _handle) = session_over(tag, fast_options(), login_dialogue(tag));

        session.connect().unwrap();

        assert_eq!(
            session.base().prompt.base, expected_base,
            "unexpected base for '{tag}'"
        );

        session.disconnect().unwrap();
    }
}

#[test]
fn huawei_base_sheds_the_brackets() {
    let (mut session, _handle) =
        session_over("huawei_vrp", fast_options(), login_dialogue("huawei_vrp"));

    session.connect().unwrap();

    assert_eq!(session.base().prompt.base, "Huawei");

    session.disconnect().unwrap();
}

#[test]
fn exos_base_sheds_the_counter() {
    let (mut session, _handle) =
        session_over("extreme_exos", fast_options(), login_dialogue("extreme_exos"));

    session.connect().unwrap();

    assert_eq!(session.base().prompt.base, "X450-48t");

    session.disconnect().unwrap();
}

#[test]
fn disconnect_is_idempotent() {
    let (mut session, handle) = session_over("cisco_ios", fast_options(), login_dialogue("cisco_ios"));

    session.connect().unwrap();

    session.disconnect().unwrap();
    session.disconnect().unwrap();
    session.disconnect().unwrap();

    assert_eq!(handle.close_count(), 1);
}

#[test]
fn operations_before_connect_are_rejected() {
    let (mut session, _handle) = session_over("cisco_ios", fast_options(), Scripted::new());

    let err = session.send_command("show version").unwrap_err();

    assert!(matches!(err, netgrip::NetgripError::NotConnected));
}
