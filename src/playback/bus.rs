//! Loopback command bus between the scheduler and the player.
//!
//! A listener thread owns the player connection and serves newline-delimited
//! [`BusRequest`]s, answering each with a [`BusReply`]. It is the only background task of the
//! process and never sees scheduler state.

use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

use crate::{
    foundation::error::{ClockError, ClockResult},
    playback::{
        command::{BusReply, BusRequest},
        ipc::PlayerTarget,
    },
};

/// Handle to the running bus listener.
#[derive(Debug)]
pub struct CommandBus {
    local_addr: SocketAddr,
    _server: JoinHandle<()>,
}

impl CommandBus {
    /// Bind `addr` and start serving `target`. The listener is accepting before this returns,
    /// so callers may dial [`CommandBus::local_addr`] immediately.
    pub fn start<T: PlayerTarget + 'static>(addr: SocketAddr, target: T) -> ClockResult<Self> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| ClockError::player(format!("bind command bus on {addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ClockError::player(format!("command bus address: {e}")))?;

        let server = thread::Builder::new()
            .name("steamclock-command-bus".to_owned())
            .spawn(move || serve(listener, target))
            .map_err(|e| ClockError::player(format!("spawn command bus thread: {e}")))?;

        tracing::info!(%local_addr, "command bus listening");
        Ok(Self {
            local_addr,
            _server: server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

fn serve<T: PlayerTarget>(listener: TcpListener, mut target: T) {
    for conn in listener.incoming() {
        match conn {
            Ok(stream) => {
                let peer = stream.peer_addr().ok();
                if let Err(e) = serve_connection(stream, &mut target) {
                    tracing::warn!(?peer, error = %e, "command bus connection dropped");
                }
            }
            Err(e) => tracing::warn!(error = %e, "command bus accept failed"),
        }
    }
}

fn serve_connection<T: PlayerTarget>(stream: TcpStream, target: &mut T) -> std::io::Result<()> {
    let mut writer = stream.try_clone()?;
    for line in BufReader::new(stream).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<BusRequest>(&line) {
            Ok(req) => {
                tracing::debug!(id = req.id, command = ?req.command, "forwarding player command");
                match target.execute(&req.command) {
                    Ok(()) => BusReply::ok(req.id),
                    Err(e) => BusReply::failed(req.id, e.to_string()),
                }
            }
            Err(e) => BusReply::failed(0, format!("malformed request: {e}")),
        };
        let mut out = serde_json::to_string(&reply).map_err(std::io::Error::other)?;
        out.push('\n');
        writer.write_all(out.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/playback/bus.rs"]
mod tests;
