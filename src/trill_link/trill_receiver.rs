use super::trill_state::TrillState;
use crate::{error, event, info, warn};
use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::{net::UdpSocket, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Background listener feeding [`TrillState`] from UDP datagrams.
///
/// Shutdown is fire-and-forget: [`TrillReceiver::stop`] only cancels the token,
/// the task releases its socket on its own.
pub struct TrillReceiver {
    state: Arc<TrillState>,
    c_tok: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TrillReceiver {
    /// Largest UDP payload, datagrams of any size must fit.
    const MAX_DATAGRAM: usize = 65_535;
    /// Pause after a receive error so a broken socket does not spin the task.
    const ERROR_BACKOFF: Duration = Duration::from_millis(20);

    /// Binds `0.0.0.0:port` inside the spawned task. A failed bind is logged and
    /// leaves the state frozen at its last value.
    ///
    /// # Arguments
    /// * `port` - The UDP port the trill sender targets.
    /// * `state` - The shared flag every decoded datagram is written to.
    ///
    /// # Returns
    /// A [`TrillReceiver`] handle; must be called inside a tokio runtime.
    pub fn start(port: u16, state: Arc<TrillState>) -> Self {
        let c_tok = CancellationToken::new();
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let state_local = Arc::clone(&state);
        let c_tok_local = c_tok.clone();
        let handle = tokio::spawn(async move {
            let socket = tokio::select! {
                () = c_tok_local.cancelled() => return,
                res = UdpSocket::bind(addr) => match res {
                    Ok(socket) => socket,
                    Err(e) => {
                        error!("Trill receiver could not bind {addr}: {e}");
                        return;
                    }
                }
            };
            Self::listen(socket, state_local, c_tok_local).await;
        });
        Self { state, c_tok, handle: Some(handle) }
    }

    /// Listens on an already bound socket.
    pub fn spawn(socket: UdpSocket, state: Arc<TrillState>) -> Self {
        let c_tok = CancellationToken::new();
        let handle =
            tokio::spawn(Self::listen(socket, Arc::clone(&state), c_tok.clone()));
        Self { state, c_tok, handle: Some(handle) }
    }

    async fn listen(socket: UdpSocket, state: Arc<TrillState>, c_tok: CancellationToken) {
        match socket.local_addr() {
            Ok(addr) => info!("Trill receiver listening on {addr}"),
            Err(_) => info!("Trill receiver listening"),
        }
        let mut buf = vec![0u8; Self::MAX_DATAGRAM];
        loop {
            let recv = tokio::select! {
                () = c_tok.cancelled() => break,
                recv = socket.recv_from(&mut buf) => recv,
            };
            match recv {
                Ok((len, _)) => match state.apply_payload(&buf[..len]) {
                    Ok(active) => event!("Lip trill state: {active}"),
                    Err(e) => warn!("Dropping malformed trill payload ({len} bytes): {e}"),
                },
                Err(e) => {
                    error!("Trill UDP receive error: {e}");
                    tokio::select! {
                        () = c_tok.cancelled() => break,
                        () = tokio::time::sleep(Self::ERROR_BACKOFF) => {}
                    }
                }
            }
        }
        drop(socket);
        info!("Trill receiver stopped");
    }

    pub fn state(&self) -> Arc<TrillState> { Arc::clone(&self.state) }

    pub fn is_active(&self) -> bool { self.state.is_active() }

    /// Cancels the listener. Never blocks and may be called any number of times.
    pub fn stop(&self) { self.c_tok.cancel(); }

    pub fn is_finished(&self) -> bool { self.handle.as_ref().is_none_or(JoinHandle::is_finished) }

    /// Stops and waits for the task to release its socket.
    pub async fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Trill receiver task failed: {e}");
            }
        }
    }
}

impl Drop for TrillReceiver {
    fn drop(&mut self) { self.c_tok.cancel(); }
}
