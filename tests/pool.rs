//! Pool semantics: key uniqueness, busy signaling, idle reaping, and
//! unhealthy-session eviction.

mod common;

use common::{
    fast_options,
    session_over,
};
use netgrip::pool::{
    Acquire,
    ConnectionPool,
    PoolKey,
};
use netgrip::session::Session;
use netgrip::transport::scripted::{
    Scripted,
    ScriptedHandle,
};
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn key() -> PoolKey {
    PoolKey {
        host: String::from("10.0.0.1"),
        port: 22,
        username: String::from("admin"),
        device_type: String::from("cisco_ios"),
    }
}

fn connected_session() -> (Box<dyn Session + Send>, ScriptedHandle) {
    let transport = Scripted::new().banner(b"Router> ").prompt(b"Router> ");

    let (mut session, handle) = session_over("cisco_ios", fast_options(), transport);

    session.connect().unwrap();

    (session, handle)
}

#[test]
fn concurrent_inserts_for_one_key_leave_one_live_entry() {
    let pool = Arc::new(ConnectionPool::new());
    let successes = Arc::new(AtomicUsize::new(0));

    let mut workers = vec![];

    for _ in 0..4 {
        let pool = Arc::clone(&pool);
        let successes = Arc::clone(&successes);

        workers.push(thread::spawn(move || {
            let (session, _handle) = connected_session();

            if pool.insert(key(), session).is_ok() {
                successes.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(pool.len(), 1);
}

#[test]
fn acquire_flips_busy_and_release_restores() {
    let pool = ConnectionPool::new();
    let (session, _handle) = connected_session();

    pool.insert(key(), session).unwrap_or_else(|_| panic!("insert failed"));

    let held = match pool.acquire(&key()) {
        Acquire::Hit(session) => session,
        _ => panic!("expected a hit"),
    };

    assert!(matches!(pool.acquire(&key()), Acquire::Busy));

    pool.release(&key(), held);

    assert!(matches!(pool.acquire(&key()), Acquire::Hit(_)));
}

#[test]
fn idle_entries_are_reaped_and_closed() {
    let pool = ConnectionPool::new();
    let (session, handle) = connected_session();

    pool.insert(key(), session).unwrap_or_else(|_| panic!("insert failed"));

    // nothing young enough to reap yet
    pool.reap_idle(Duration::from_secs(600));
    assert_eq!(pool.len(), 1);

    pool.reap_idle(Duration::ZERO);

    assert!(pool.is_empty());
    assert!(handle.closed());
}

#[test]
fn unknown_keys_miss() {
    let pool = ConnectionPool::new();

    assert!(matches!(pool.acquire(&key()), Acquire::Miss));
}

#[test]
fn unhealthy_entries_are_evicted_on_acquire() {
    let pool = ConnectionPool::new();
    let (mut session, _handle) = connected_session();

    // a disconnected session is no longer healthy
    session.disconnect().unwrap();

    pool.insert(key(), session).unwrap_or_else(|_| panic!("insert failed"));

    assert!(matches!(pool.acquire(&key()), Acquire::Miss));
    assert!(pool.is_empty());
}

#[test]
fn force_cleanup_closes_everything() {
    let pool = ConnectionPool::new();

    let (session_a, handle_a) = connected_session();
    let (session_b, handle_b) = connected_session();

    pool.insert(key(), session_a).unwrap_or_else(|_| panic!("insert failed"));

    let mut other = key();
    other.host = String::from("10.0.0.2");

    pool.insert(other, session_b).unwrap_or_else(|_| panic!("insert failed"));

    assert_eq!(pool.len(), 2);

    pool.force_cleanup();

    assert!(pool.is_empty());
    assert!(handle_a.closed());
    assert!(handle_b.closed());
}

#[test]
fn cancellation_marks_the_session_unreusable() {
    let (mut session, _handle) = connected_session();

    assert!(session.is_healthy());

    session.cancel_handle().cancel();

    // the next operation observes the cancellation
    let err = session.send_command("show clock").unwrap_err();

    assert!(matches!(err, netgrip::NetgripError::Canceled));
    assert!(!session.is_healthy());
}
