//! The end-to-end flows: enable escalation, commit-based configuration,
//! save confirmations, login-name mutation, and the UniFi two-stage hop,
//! each against a scripted device shell.

mod common;

use common::{
    fast_options,
    full_options,
    session_over,
};
use netgrip::config::Credentials;
use netgrip::transport::scripted::Scripted;

#[test]
fn cisco_ios_show_version_through_enable() {
    let transport = Scripted::new()
        .banner(b"User Access Verification\r\nRouter> ")
        .prompt(b"Router> ")
        .rule(b"terminal length 0", b"terminal length 0\r\nRouter> ")
        .rule(b"terminal width 511", b"terminal width 511\r\nRouter> ")
        .rule(b"enable", b"enable\r\nPassword: ")
        .rule_with_prompt(b"secret", b"\r\nRouter#", b"Router#")
        .rule(
            b"show version",
            b"show version\r\nCisco IOS Software, C2960 Software, Version 15.0(2)SE\r\nUptime is 3 weeks\r\nRouter#",
        );

    let (mut session, _handle) = session_over("cisco_ios", full_options(), transport);

    session.connect().unwrap();

    let result = session.send_command("show version").unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.starts_with("Cisco IOS Software"));
    assert!(!result.output.contains("Router#"));
    assert_eq!(result.device_type, "cisco_ios");
    assert_eq!(result.host, "10.0.0.1");

    session.disconnect().unwrap();
}

#[test]
fn juniper_config_commits_and_scrubs_context() {
    let transport = Scripted::new()
        .banner(b"--- JUNOS 18.4R1 ---\r\nadmin@fw> ")
        .prompt(b"admin@fw> ")
        .rule_with_prompt(b"configure", b"configure\r\nEntering configuration mode\r\n[edit]\r\nadmin@fw# ", b"[edit]\r\nadmin@fw# ")
        .rule(
            b"set interfaces ge-0/0/0 description test",
            b"set interfaces ge-0/0/0 description test\r\n[edit]\r\nadmin@fw# ",
        )
        .rule_with_prompt(
            b"commit and-quit",
            b"commit and-quit\r\ncommit complete\r\nExiting configuration mode\r\nadmin@fw> ",
            b"admin@fw> ",
        );

    let (mut session, _handle) = session_over("juniper_junos", fast_options(), transport);

    session.connect().unwrap();

    let result = session
        .send_config(&["set interfaces ge-0/0/0 description test"])
        .unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.contains("commit complete"));
    assert!(!result.output.contains("[edit]"));

    session.disconnect().unwrap();
}

#[test]
fn huawei_save_answers_the_confirmation() {
    let transport = Scripted::new()
        .banner(b"<Huawei>")
        .prompt(b"<Huawei>")
        .rule(b"save", b"save\r\nThe current configuration will be written to the device.\r\nAre you sure to continue?[Y/N]:")
        .rule(b"y", b"y\r\nInfo: The configuration is being saved ... Save complete\r\n<Huawei>");

    let (mut session, _handle) = session_over("huawei_vrp", fast_options(), transport);

    session.connect().unwrap();

    let result = session.save_config().unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.contains("Save complete"));

    session.disconnect().unwrap();
}

#[test]
fn mikrotik_reports_the_unmutated_username() {
    // the wire name carries the terminal-negotiation suffix; the
    // credentials reported back never do
    assert_eq!(
        netgrip::vendors::mikrotik::login_name("admin"),
        "admin+ct511w4098h"
    );

    let credentials = Credentials::password("10.0.0.9", "admin", "secret", "mikrotik_routeros");

    let session =
        netgrip::dispatch::build_session(credentials, fast_options()).unwrap();

    assert_eq!(session.base().credentials.username, "admin");
}

#[test]
fn linux_command_over_a_plain_shell() {
    let transport = Scripted::new()
        .banner(b"Welcome to Ubuntu 20.04\r\nuser@host:~$ ")
        .prompt(b"user@host:~$ ")
        .rule(b"id", b"id\r\nuid=1000(user) gid=1000(user)\r\nuser@host:~$ ");

    let (mut session, _handle) = session_over("linux", fast_options(), transport);

    session.connect().unwrap();

    let result = session.send_command("id").unwrap();

    assert!(result.success);
    assert!(result.output.contains("uid=1000"));

    session.disconnect().unwrap();
}

#[test]
fn unifi_two_stage_login_and_teardown() {
    let transport = Scripted::new()
        .banner(b"US-24-250W-BZ.v4.0.66# ")
        .prompt(b"US-24-250W-BZ.v4.0.66# ")
        .rule_with_prompt(b"telnet localhost", b"telnet localhost\r\n(UBNT) >", b"(UBNT) >")
        .rule_with_prompt(b"enable", b"enable\r\n(UBNT) #", b"(UBNT) #")
        .rule(
            b"show version",
            b"show version\r\nSoftware Version.... 4.0.66\r\n(UBNT) #",
        );

    let (mut session, handle) = session_over("ubiquiti_unifi", fast_options(), transport);

    session.connect().unwrap();

    let result = session.send_command("show version").unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.contains("Software Version"));

    session.disconnect().unwrap();

    // the telnet hop is exited before ssh goes down
    let transcript = handle.transcript();
    let exit_position = transcript.rfind("exit").expect("exit must have been sent");
    let show_position = transcript.find("show version").unwrap();

    assert!(exit_position > show_position);
    assert_eq!(handle.close_count(), 1);
    assert!(handle.closed());
}

#[test]
fn rejected_config_statement_stops_the_batch() {
    let transport = Scripted::new()
        .banner(b"Router> ")
        .prompt(b"Router> ")
        .rule_with_prompt(b"enable", b"enable\r\nRouter#", b"Router#")
        .rule_with_prompt(
            b"configure terminal",
            b"configure terminal\r\nRouter(config)#",
            b"Router(config)#",
        )
        .rule(
            b"interface GigabitEthernet0/1",
            b"interface GigabitEthernet0/1\r\nRouter(config-if)#",
        )
        .rule(
            b"speed warp",
            b"speed warp\r\n% Invalid input detected at '^' marker.\r\nRouter(config-if)#",
        )
        .rule_with_prompt(b"end", b"end\r\nRouter#", b"Router#");

    let (mut session, _handle) = session_over("cisco_ios", fast_options(), transport);

    session.connect().unwrap();

    let result = session
        .send_config(&[
            "interface GigabitEthernet0/1",
            "speed warp",
            "this must never be sent",
        ])
        .unwrap();

    assert!(!result.success);
    assert!(result.output.contains("% Invalid input"));

    let transcript = _handle.transcript();

    assert!(!transcript.contains("this must never be sent"));

    session.disconnect().unwrap();
}

#[test]
fn reboot_succeeds_once_the_confirmation_is_accepted() {
    let transport = Scripted::new()
        .banner(b"Router> ")
        .prompt(b"Router> ")
        .rule_with_prompt(b"enable", b"enable\r\nRouter#", b"Router#")
        .rule(b"reload", b"reload\r\nProceed with reload? [confirm]");

    let (mut session, handle) = session_over("cisco_ios", fast_options(), transport);

    session.connect().unwrap();

    let result = session.reboot_device().unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.contains("Proceed with reload?"));
    assert!(handle.transcript().contains("reload"));

    // a rebooting device is done being reused
    assert!(!session.is_healthy());

    session.disconnect().unwrap();
}

#[test]
fn exos_prompt_counter_never_leaks_into_output() {
    let transport = Scripted::new()
        .banner(b"ExtremeXOS\r\nX450-48t.1 # ")
        .prompt(b"X450-48t.1 # ")
        .rule_with_prompt(
            b"show version",
            b"show version\r\nImage : ExtremeXOS version 16.2.5.4\r\nX450-48t.2 # ",
            b"X450-48t.2 # ",
        );

    let (mut session, _handle) = session_over("extreme_exos", fast_options(), transport);

    session.connect().unwrap();

    let result = session.send_command("show version").unwrap();

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.output.contains("ExtremeXOS version 16.2.5.4"));
    assert!(
        !result.output.contains("X450-48t."),
        "counter leaked: {}",
        result.output
    );

    session.disconnect().unwrap();
}

#[test]
fn timeouts_fold_into_failed_results_when_asked() {
    let mut options = fast_options();
    options.fail_on_error = false;
    options.command_retry_count = 0;
    options.command_timeout = 1;

    let transport = Scripted::new()
        .banner(b"Router> ")
        .prompt(b"Router> ")
        .rule_with_prompt(b"enable", b"enable\r\nRouter#", b"Router#")
        .rule(b"show tech-support", b"show tech-support\r\ngathering, this takes forever");

    let (mut session, _handle) = session_over("cisco_ios", options, transport);

    session.connect().unwrap();

    let result = session.send_command("show tech-support").unwrap();

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("timed out"));
    assert!(result.output.contains("gathering"));

    session.disconnect().unwrap();
}
