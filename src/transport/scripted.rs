use crate::errors::NetgripError;
use crate::transport::base::Transport;
use crate::util::bytes::contains_subslice;
use std::collections::VecDeque;
use std::sync::{
    Arc,
    Mutex,
};

/// One canned exchange: when the written bytes contain `expect`, `response`
/// is queued for reading, and the bare-return prompt is optionally swapped
/// (privilege escalation and config entry change what a return elicits).
struct Rule {
    expect: Vec<u8>,
    response: Vec<u8>,
    new_prompt: Option<Vec<u8>>,
    consumed: bool,
}

struct State {
    banner: Vec<u8>,
    prompt: Vec<u8>,
    rules: Vec<Rule>,
    pending: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    opened: bool,
    closed: bool,
    open_count: u32,
    close_count: u32,
}

impl State {
    fn respond(
        &mut self,
        b: &[u8],
    ) {
        if is_bare_return(b) {
            let prompt = self.prompt.clone();

            if !prompt.is_empty() {
                self.pending.push_back(prompt);
            }

            return;
        }

        for rule in &mut self.rules {
            if rule.consumed {
                continue;
            }

            if contains_subslice(b, rule.expect.as_slice()) {
                rule.consumed = true;

                self.pending.push_back(rule.response.clone());

                if let Some(new_prompt) = rule.new_prompt.take() {
                    self.prompt = new_prompt;
                }

                return;
            }
        }
    }
}

fn is_bare_return(b: &[u8]) -> bool {
    !b.is_empty() && b.iter().all(|c| *c == b'\n' || *c == b'\r')
}

/// A canned-dialogue transport for exercising sessions against mock device
/// shells. Build it with a banner, the current prompt (returned whenever a
/// bare return is written), and expect/response rules, then hand it to a
/// session exactly like a real transport.
pub struct Scripted {
    state: Arc<Mutex<State>>,
    host: String,
    port: u16,
}

/// A handle onto a [`Scripted`] transport's internal state, letting tests
/// inspect the write transcript and inject output after construction.
#[derive(Clone)]
pub struct ScriptedHandle {
    state: Arc<Mutex<State>>,
}

impl Scripted {
    /// Returns a new scripted transport with no dialogue configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                banner: vec![],
                prompt: vec![],
                rules: vec![],
                pending: VecDeque::new(),
                writes: vec![],
                opened: false,
                closed: false,
                open_count: 0,
                close_count: 0,
            })),
            host: String::from("mock"),
            port: 22,
        }
    }

    /// Set the bytes emitted as soon as the transport opens (the login
    /// banner plus the first prompt).
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn banner(
        self,
        b: &[u8],
    ) -> Self {
        self.state.lock().unwrap().banner = b.to_vec();

        self
    }

    /// Set the bytes emitted whenever a bare return is written -- the
    /// device's current prompt.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn prompt(
        self,
        b: &[u8],
    ) -> Self {
        self.state.lock().unwrap().prompt = b.to_vec();

        self
    }

    /// Add an expect/response rule. Rules fire at most once, in insertion
    /// order, when a write contains `expect`.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn rule(
        self,
        expect: &[u8],
        response: &[u8],
    ) -> Self {
        self.state.lock().unwrap().rules.push(Rule {
            expect: expect.to_vec(),
            response: response.to_vec(),
            new_prompt: None,
            consumed: false,
        });

        self
    }

    /// Like [`Self::rule`], but also swaps the bare-return prompt after the
    /// rule fires -- escalation and config-mode entry do this on real gear.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn rule_with_prompt(
        self,
        expect: &[u8],
        response: &[u8],
        new_prompt: &[u8],
    ) -> Self {
        self.state.lock().unwrap().rules.push(Rule {
            expect: expect.to_vec(),
            response: response.to_vec(),
            new_prompt: Some(new_prompt.to_vec()),
            consumed: false,
        });

        self
    }

    /// Returns a handle for post-construction inspection.
    #[must_use]
    pub fn handle(&self) -> ScriptedHandle {
        ScriptedHandle {
            state: Arc::<Mutex<State>>::clone(&self.state),
        }
    }
}

impl Default for Scripted {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::missing_panics_doc)]
impl ScriptedHandle {
    /// Everything written to the transport, concatenated, lossily decoded.
    #[must_use]
    pub fn transcript(&self) -> String {
        let state = self.state.lock().unwrap();

        String::from_utf8_lossy(state.writes.concat().as_slice()).into_owned()
    }

    /// How many times the transport has been opened.
    #[must_use]
    pub fn open_count(&self) -> u32 {
        self.state.lock().unwrap().open_count
    }

    /// How many times the transport has been closed.
    #[must_use]
    pub fn close_count(&self) -> u32 {
        self.state.lock().unwrap().close_count
    }

    /// Whether the transport is currently closed.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// Queue bytes for reading, as if the device spoke unprompted.
    pub fn inject(
        &self,
        b: &[u8],
    ) {
        self.state.lock().unwrap().pending.push_back(b.to_vec());
    }
}

#[allow(clippy::missing_panics_doc)]
impl Transport for Scripted {
    fn open(&mut self) -> Result<(), NetgripError> {
        let mut state = self.state.lock().unwrap();

        state.opened = true;
        state.closed = false;
        state.open_count += 1;

        let banner = state.banner.clone();

        if !banner.is_empty() {
            state.pending.push_back(banner);
        }

        Ok(())
    }

    fn close(&mut self) -> Result<(), NetgripError> {
        let mut state = self.state.lock().unwrap();

        if !state.closed {
            state.closed = true;
            state.close_count += 1;
        }

        Ok(())
    }

    fn alive(&mut self) -> bool {
        let state = self.state.lock().unwrap();

        state.opened && !state.closed
    }

    fn read(&mut self) -> Result<Vec<u8>, NetgripError> {
        let mut state = self.state.lock().unwrap();

        Ok(state.pending.pop_front().unwrap_or_default())
    }

    fn read_n(
        &mut self,
        _n: u16,
    ) -> Result<Vec<u8>, NetgripError> {
        self.read()
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        let mut state = self.state.lock().unwrap();

        if state.closed {
            return Err(NetgripError::NotConnected);
        }

        state.writes.push(b.to_vec());
        state.respond(b);

        Ok(())
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::Scripted;
    use crate::transport::base::Transport;

    #[test]
    fn banner_arrives_on_open() {
        let mut t = Scripted::new().banner(b"Router> ");

        t.open().unwrap();

        assert_eq!(t.read().unwrap(), b"Router> ");
        assert!(t.read().unwrap().is_empty());
    }

    #[test]
    fn alive_tracks_the_open_close_lifecycle() {
        let mut t = Scripted::new();

        assert!(!t.alive());

        t.open().unwrap();
        assert!(t.alive());

        t.close().unwrap();
        assert!(!t.alive());
    }

    #[test]
    fn bare_return_elicits_prompt() {
        let mut t = Scripted::new().prompt(b"Router> ");

        t.open().unwrap();
        t.write(b"\n").unwrap();

        assert_eq!(t.read().unwrap(), b"Router> ");
    }

    #[test]
    fn rules_fire_once_in_order() {
        let mut t = Scripted::new()
            .rule(b"show version", b"show version\nIOS 15.2\nRouter> ")
            .rule(b"show clock", b"show clock\n12:00:00\nRouter> ");

        t.open().unwrap();
        t.write(b"show clock\n").unwrap();

        assert_eq!(t.read().unwrap(), b"show clock\n12:00:00\nRouter> ");

        t.write(b"show clock\n").unwrap();

        assert!(t.read().unwrap().is_empty());
    }

    #[test]
    fn rule_can_mutate_prompt() {
        let mut t = Scripted::new()
            .prompt(b"Router> ")
            .rule_with_prompt(b"enable", b"Router# ", b"Router# ");

        t.open().unwrap();
        t.write(b"enable\n").unwrap();
        t.read().unwrap();
        t.write(b"\n").unwrap();

        assert_eq!(t.read().unwrap(), b"Router# ");
    }
}
