use crate::errors::NetgripError;
use crate::transport::base::{
    Transport,
    TransportArgs,
};
use crate::transport::ssh::{
    open_client,
    Ssh,
};
use log::debug;
use std::io::{
    Read,
    Write,
};
use std::net::TcpListener;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PUMP_IDLE_SLEEP: Duration = Duration::from_millis(5);
const PUMP_BUF_SIZE: usize = 8_192;

/// A transport that reaches the target device through a bastion.
///
/// `open` first opens an authenticated ssh client to the bastion, asks it
/// for a `direct-tcpip` channel to the target, bridges that channel to a
/// loopback socket, and finally runs a full inner ssh transport (its own
/// handshake, auth, and pty'd shell) across the bridge. All reads and
/// writes after that delegate straight to the inner transport. `close`
/// tears down the inner client first, then the bastion client.
pub struct Tunnel {
    bastion_args: TransportArgs,
    target_args: TransportArgs,
    inner: Option<Ssh>,
    local_port: Option<u16>,
    pump_stop: Arc<AtomicBool>,
    pump_handle: Option<thread::JoinHandle<()>>,
}

impl Tunnel {
    /// Returns a new, un-opened `Tunnel` transport. `bastion_args` point
    /// at the jump host; `target_args` describe the device behind it.
    #[must_use]
    pub fn new(
        bastion_args: TransportArgs,
        target_args: TransportArgs,
    ) -> Self {
        Self {
            bastion_args,
            target_args,
            inner: None,
            local_port: None,
            pump_stop: Arc::new(AtomicBool::new(false)),
            pump_handle: None,
        }
    }

    /// Open the bastion client, allocate the `direct-tcpip` channel, and
    /// start the byte pump between it and a loopback listener. Returns the
    /// loopback port the inner client should dial.
    fn start_bridge(&mut self) -> Result<u16, NetgripError> {
        let bastion = open_client(&self.bastion_args)?;

        debug!(
            "bastion client up, tunneling to {}:{}",
            self.target_args.host, self.target_args.port
        );

        let mut tunnel_channel = bastion
            .channel_direct_tcpip(
                self.target_args.host.as_str(),
                self.target_args.port,
                None,
            )
            .map_err(|err| {
                NetgripError::Connect(format!(
                    "bastion refused direct-tcpip channel to {}:{}, error: {err}",
                    self.target_args.host, self.target_args.port
                ))
            })?;

        let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| {
            NetgripError::Connect(format!("failed binding bridge listener, error: {err}"))
        })?;

        let local_port = listener
            .local_addr()
            .map_err(|err| {
                NetgripError::Connect(format!("failed reading bridge address, error: {err}"))
            })?
            .port();

        let stop = Arc::<AtomicBool>::clone(&self.pump_stop);

        // the pump thread owns the bastion client and the tunnel channel;
        // it tears both down when the stop flag flips
        let handle = thread::spawn(move || {
            let Ok((mut sock, _)) = listener.accept() else {
                return;
            };

            sock.set_nonblocking(true).ok();
            bastion.set_blocking(false);

            let mut sock_buf = [0_u8; PUMP_BUF_SIZE];
            let mut chan_buf = [0_u8; PUMP_BUF_SIZE];

            while !stop.load(Ordering::SeqCst) {
                let mut moved = false;

                match sock.read(&mut sock_buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        bastion.set_blocking(true);
                        let wrote = tunnel_channel.write_all(&sock_buf[..n]).is_ok()
                            && tunnel_channel.flush().is_ok();
                        bastion.set_blocking(false);

                        if !wrote {
                            break;
                        }

                        moved = true;
                    }
                    Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(_) => break,
                }

                match tunnel_channel.read(&mut chan_buf) {
                    Ok(0) => {
                        if tunnel_channel.eof() {
                            break;
                        }
                    }
                    Ok(n) => {
                        if sock.write_all(&chan_buf[..n]).is_err() {
                            break;
                        }

                        moved = true;
                    }
                    Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(_) => break,
                }

                if !moved {
                    thread::sleep(PUMP_IDLE_SLEEP);
                }
            }

            bastion.set_blocking(true);
            tunnel_channel.close().ok();
            bastion.disconnect(None, "netgrip tunnel closed", None).ok();
        });

        self.pump_handle = Some(handle);
        self.local_port = Some(local_port);

        Ok(local_port)
    }
}

impl Transport for Tunnel {
    fn open(&mut self) -> Result<(), NetgripError> {
        let local_port = self.start_bridge()?;

        let mut inner_args = self.target_args.clone();
        inner_args.host = String::from("127.0.0.1");
        inner_args.port = local_port;

        let mut inner = Ssh::new(inner_args);

        inner.open()?;

        self.inner = Some(inner);

        Ok(())
    }

    fn close(&mut self) -> Result<(), NetgripError> {
        // inner first, then the bastion side
        if let Some(mut inner) = self.inner.take() {
            inner.close().ok();
        }

        self.pump_stop.store(true, Ordering::SeqCst);

        // if the bridge never saw its connection, the pump is still parked
        // in accept(); a throwaway dial releases it
        if let Some(port) = self.local_port.take() {
            std::net::TcpStream::connect(("127.0.0.1", port)).ok();
        }

        if let Some(handle) = self.pump_handle.take() {
            handle.join().ok();
        }

        Ok(())
    }

    fn alive(&mut self) -> bool {
        self.inner.as_mut().is_some_and(Transport::alive)
    }

    fn read(&mut self) -> Result<Vec<u8>, NetgripError> {
        self.inner
            .as_mut()
            .map_or(Err(NetgripError::NotConnected), Transport::read)
    }

    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, NetgripError> {
        match self.inner.as_mut() {
            Some(inner) => inner.read_n(n),
            None => Err(NetgripError::NotConnected),
        }
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), NetgripError> {
        match self.inner.as_mut() {
            Some(inner) => inner.write(b),
            None => Err(NetgripError::NotConnected),
        }
    }

    fn keepalive_probe(&mut self) -> Result<(), NetgripError> {
        match self.inner.as_mut() {
            Some(inner) => inner.keepalive_probe(),
            None => Err(NetgripError::NotConnected),
        }
    }

    fn host(&self) -> String {
        self.target_args.host.clone()
    }

    fn port(&self) -> u16 {
        self.target_args.port
    }
}
