use crate::config::Credentials;
use crate::errors::NetgripError;
use crate::session::Session;
use log::{
    debug,
    info,
    warn,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::{
    Duration,
    Instant,
};

/// How long an entry may sit unused before the reaper closes it.
pub const IDLE_MAX: Duration = Duration::from_secs(10 * 60);

/// How often the background reaper sweeps the pool.
pub const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// The identity a pooled session is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    /// Device host.
    pub host: String,
    /// Device port.
    pub port: u16,
    /// Username on the device.
    pub username: String,
    /// Lower-cased device-type tag.
    pub device_type: String,
}

impl PoolKey {
    /// Derive the pool key for a credential set.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            host: credentials.host.clone(),
            port: credentials.port,
            username: credentials.username.clone(),
            device_type: credentials.device_type.to_lowercase(),
        }
    }
}

struct PoolEntry {
    session: Option<Box<dyn Session + Send>>,
    in_use: bool,
    last_used: Instant,
}

/// The outcome of a pool acquire.
pub enum Acquire {
    /// A free, healthy session was checked out.
    Hit(Box<dyn Session + Send>),
    /// A live entry exists but another caller holds it.
    Busy,
    /// No live entry for the key.
    Miss,
}

/// A registry of live sessions keyed by `(host, port, username,
/// device-type)`, reusing connections across requests and reaping the
/// idle. One caller holds a given session at a time; the in-use flag
/// enforces it.
pub struct ConnectionPool {
    entries: Mutex<HashMap<PoolKey, PoolEntry>>,
}

impl ConnectionPool {
    /// An empty pool. Most callers want [`global`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check out the session for `key`. Unhealthy entries are evicted and
    /// reported as a miss; held entries report busy.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn acquire(
        &self,
        key: &PoolKey,
    ) -> Acquire {
        let evicted: Option<Box<dyn Session + Send>>;

        let outcome = {
            let mut entries = self.entries.lock().unwrap();

            let Some(entry) = entries.get_mut(key) else {
                return Acquire::Miss;
            };

            if entry.in_use {
                return Acquire::Busy;
            }

            let Some(session) = entry.session.take() else {
                // a held entry lost its session somehow; drop the husk
                entries.remove(key);

                return Acquire::Miss;
            };

            if session.is_healthy() {
                entry.in_use = true;

                debug!("pool hit for {}:{}", key.host, key.port);

                return Acquire::Hit(session);
            }

            entries.remove(key);
            evicted = Some(session);

            Acquire::Miss
        };

        // close the stale session outside the lock
        if let Some(mut session) = evicted {
            warn!("evicting unhealthy pooled session for {}", key.host);

            session.disconnect().ok();
        }

        outcome
    }

    /// Return a checked-out session. If its entry was evicted while out,
    /// the session is closed instead.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn release(
        &self,
        key: &PoolKey,
        session: Box<dyn Session + Send>,
    ) {
        let leftover = {
            let mut entries = self.entries.lock().unwrap();

            match entries.get_mut(key) {
                Some(entry) => {
                    entry.session = Some(session);
                    entry.in_use = false;
                    entry.last_used = Instant::now();

                    None
                }
                None => Some(session),
            }
        };

        if let Some(mut session) = leftover {
            session.disconnect().ok();
        }
    }

    /// Register a new session under `key`. A second live entry for the
    /// same key is forbidden; the call fails and the caller keeps the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns an error when a live entry already exists for the key.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert(
        &self,
        key: PoolKey,
        session: Box<dyn Session + Send>,
    ) -> Result<(), (Box<dyn Session + Send>, NetgripError)> {
        let mut entries = self.entries.lock().unwrap();

        if entries.contains_key(&key) {
            return Err((
                session,
                NetgripError::Internal(format!(
                    "a live pool entry already exists for {}@{}:{}",
                    key.username, key.host, key.port
                )),
            ));
        }

        entries.insert(
            key,
            PoolEntry {
                session: Some(session),
                in_use: false,
                last_used: Instant::now(),
            },
        );

        Ok(())
    }

    /// Return a checked-out session, inserting a fresh entry when none
    /// exists yet. Convenience over `release`/`insert` for callers that
    /// don't track which path produced their session.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn checkin(
        &self,
        key: PoolKey,
        session: Box<dyn Session + Send>,
    ) {
        let held = {
            let entries = self.entries.lock().unwrap();

            entries.get(&key).is_some_and(|entry| entry.in_use)
        };

        if held {
            self.release(&key, session);

            return;
        }

        if let Err((mut session, err)) = self.insert(key, session) {
            // an idle duplicate; the existing entry wins
            debug!("duplicate checkin rejected: {err}");

            session.disconnect().ok();
        }
    }

    /// Close and remove every entry idle longer than `max_idle` and not
    /// checked out. Sessions close outside the pool lock.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn reap_idle(
        &self,
        max_idle: Duration,
    ) {
        let expired: Vec<Box<dyn Session + Send>> = {
            let mut entries = self.entries.lock().unwrap();

            let expired_keys: Vec<PoolKey> = entries
                .iter()
                .filter(|(_, entry)| !entry.in_use && entry.last_used.elapsed() >= max_idle)
                .map(|(key, _)| key.clone())
                .collect();

            expired_keys
                .into_iter()
                .filter_map(|key| entries.remove(&key).and_then(|entry| entry.session))
                .collect()
        };

        for mut session in expired {
            info!("reaping idle pooled session to {}", session.base().credentials.host);

            session.disconnect().ok();
        }
    }

    /// The periodic sweep: close entries idle beyond [`IDLE_MAX`].
    pub fn reap(&self) {
        self.reap_idle(IDLE_MAX);
    }

    /// Close every entry synchronously and empty the pool.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn force_cleanup(&self) {
        let drained: Vec<Box<dyn Session + Send>> = {
            let mut entries = self.entries.lock().unwrap();

            entries
                .drain()
                .filter_map(|(_, entry)| entry.session)
                .collect()
        };

        for mut session in drained {
            session.disconnect().ok();
        }
    }

    /// How many entries (in use or idle) the pool holds.
    ///
    /// # Panics
    ///
    /// Panics if the pool lock is poisoned.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide pool. First access also starts the background reaper
/// sweeping every 60 s.
pub fn global() -> &'static ConnectionPool {
    static POOL: Lazy<ConnectionPool> = Lazy::new(|| {
        thread::spawn(|| loop {
            thread::sleep(REAP_INTERVAL);

            global().reap();
        });

        ConnectionPool::new()
    });

    &POOL
}
