use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpStream},
    path::Path,
    time::Duration,
};

use crate::{
    foundation::{
        config::ClockConfig,
        error::{ClockError, ClockResult},
    },
    playback::{
        bus::CommandBus,
        command::{BusReply, BusRequest, LoadMode, PlayerCommand},
        ipc::MpvIpc,
    },
};

/// Command sink the scheduler drives. Calls return once the command is delivered, not once
/// playback finishes.
pub trait Player {
    /// One-time display setup: fullscreen, muted.
    fn configure(&mut self) -> ClockResult<()>;

    /// Queue `path` and start playing it right away.
    fn play(&mut self, path: &Path) -> ClockResult<()>;
}

/// Client end of the [`CommandBus`].
pub struct RemotePlayer {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    next_id: u64,
    bus: Option<CommandBus>,
}

impl RemotePlayer {
    pub fn dial(addr: SocketAddr, timeout: Duration) -> ClockResult<Self> {
        let stream = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|e| ClockError::player(format!("dial command bus at {addr}: {e}")))?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| ClockError::player(format!("set bus read timeout: {e}")))?;
        let reader = stream
            .try_clone()
            .map_err(|e| ClockError::player(format!("clone bus stream: {e}")))?;
        Ok(Self {
            writer: stream,
            reader: BufReader::new(reader),
            next_id: 1,
            bus: None,
        })
    }

    /// Keep the bus alive for as long as this client.
    pub fn with_bus(mut self, bus: CommandBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// The bus this client owns, when it was started by [`connect`].
    pub fn bus(&self) -> Option<&CommandBus> {
        self.bus.as_ref()
    }

    pub fn send(&mut self, command: PlayerCommand) -> ClockResult<()> {
        let id = self.next_id;
        self.next_id += 1;

        let mut line = serde_json::to_string(&BusRequest { id, command })
            .map_err(|e| ClockError::player(format!("encode bus request: {e}")))?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| ClockError::player(format!("write to command bus: {e}")))?;

        // A reply that missed an earlier read timeout is still queued ahead of ours.
        let reply = loop {
            let mut buf = String::new();
            let n = self
                .reader
                .read_line(&mut buf)
                .map_err(|e| ClockError::player(format!("read from command bus: {e}")))?;
            if n == 0 {
                return Err(ClockError::player("command bus closed the connection"));
            }
            let reply: BusReply = serde_json::from_str(buf.trim())
                .map_err(|e| ClockError::player(format!("decode bus reply: {e}")))?;
            if reply.id < id {
                tracing::debug!(stale = reply.id, waiting_on = id, "dropping late bus reply");
                continue;
            }
            if reply.id > id {
                return Err(ClockError::player(format!(
                    "bus reply for request {} while waiting on {id}",
                    reply.id
                )));
            }
            break reply;
        };
        match reply.error {
            None => Ok(()),
            Some(err) => Err(ClockError::player(err)),
        }
    }
}

impl Player for RemotePlayer {
    fn configure(&mut self) -> ClockResult<()> {
        self.send(PlayerCommand::SetFullscreen { on: true })?;
        self.send(PlayerCommand::SetMute { on: true })
    }

    fn play(&mut self, path: &Path) -> ClockResult<()> {
        let path = std::path::absolute(path)
            .map_err(|e| ClockError::player(format!("resolve '{}': {e}", path.display())))?;
        self.send(PlayerCommand::LoadFile {
            path,
            mode: LoadMode::AppendPlay,
        })?;
        self.send(PlayerCommand::SetPause { paused: false })
    }
}

/// Open the player socket, start the bus in front of it, and dial the bus.
pub fn connect(cfg: &ClockConfig) -> ClockResult<RemotePlayer> {
    let ipc = MpvIpc::connect(&cfg.player_socket, cfg.player_timeout)?;
    let bus = CommandBus::start(cfg.bus_addr, ipc)?;
    let player = RemotePlayer::dial(bus.local_addr(), cfg.player_timeout)?;
    Ok(player.with_bus(bus))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
