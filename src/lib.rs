#![deny(clippy::all)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::implicit_return)]
#![allow(clippy::question_mark_used)]
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::exhaustive_enums)]
#![allow(clippy::exhaustive_structs)]
#![allow(clippy::partial_pub_fields)]
#![allow(clippy::multiple_inherent_impl)]

//! netgrip drives interactive command-line sessions over SSH against
//! heterogeneous network equipment -- routers, switches, firewalls,
//! wireless controllers, and plain linux hosts -- behind one uniform
//! operation surface: send a command, apply configuration, fetch or
//! persist the running config, reboot, disconnect. The per-vendor
//! dialect differences (privilege escalation, configuration modes,
//! pagination, prompt shapes, confirmation dialogues) are absorbed by
//! vendor plugins layered over a shared session engine.

/// Channel is the object that consumes from and writes to netgrip
/// transports, buffering device output behind a background reader so that
/// higher layers get deadline-bounded, prompt-aware reads.
pub mod channel;

/// Credential and option records supplied by callers at the request
/// boundary.
pub mod config;

/// Device-type auto-detection from login banners.
pub mod detect;

/// The device-type dispatch table -- device-type tag in, un-connected
/// vendor session out.
pub mod dispatch;

/// The netgrip error taxonomy.
pub mod errors;

/// The process-wide connection pool with idle reaping.
pub mod pool;

/// `CommandResult` -- the value returned from session operations.
pub mod response;

/// Output sanitation: command echo, trailing prompt, ANSI, pager markers,
/// and vendor context decorations are stripped here.
pub mod sanitize;

/// The session layer: the `Session` trait (the operation surface plus the
/// vendor-overridable hooks) and the shared `BaseSession` engine.
pub mod session;

/// Transport module holds the base transport trait and the transport
/// implementations.
pub mod transport {
    /// Base transport module providing the trait all transports implement.
    pub mod base;

    /// A canned-dialogue transport used to exercise sessions against mock
    /// device shells in tests.
    pub mod scripted;

    /// The ssh2 (libssh2) transport -- the default way netgrip reaches a
    /// device, including the progressive algorithm fallback chain.
    pub mod ssh;

    /// A transport that reaches the target through a bastion: an outer ssh
    /// client plus a `direct-tcpip` channel bridged to an inner ssh client.
    pub mod tunnel;
}

/// Vendor behavior plugins -- one module per platform family, plus the
/// data-driven profile registry.
pub mod vendors;

/// netgrip utilities.
pub mod util {
    /// Simple bytes helper functions.
    pub(crate) mod bytes;
}

pub use config::{
    AdvancedOptions,
    AuthMethod,
    Credentials,
    JumpHost,
};
pub use dispatch::build_session;
pub use errors::NetgripError;
pub use response::CommandResult;
pub use session::Session;
