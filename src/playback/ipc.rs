//! Direct connection to mpv's JSON IPC socket.

use std::{
    io::{BufRead, BufReader, Write},
    path::Path,
    time::Duration,
};

use serde_json::{Value, json};

use crate::{
    foundation::error::{ClockError, ClockResult},
    playback::command::PlayerCommand,
};

/// Where the command bus delivers commands.
pub trait PlayerTarget: Send {
    fn execute(&mut self, command: &PlayerCommand) -> ClockResult<()>;
}

#[cfg(unix)]
type IpcStream = std::os::unix::net::UnixStream;

/// Line-delimited JSON session with a running mpv (`--input-ipc-server=<socket>`).
#[cfg(unix)]
pub struct MpvIpc {
    writer: IpcStream,
    reader: BufReader<IpcStream>,
    next_request_id: u64,
}

#[cfg(unix)]
impl MpvIpc {
    pub fn connect(socket: &Path, timeout: Duration) -> ClockResult<Self> {
        let stream = IpcStream::connect(socket).map_err(|e| {
            ClockError::player(format!(
                "cannot reach mpv at '{}' (is it running with --input-ipc-server?): {e}",
                socket.display()
            ))
        })?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| ClockError::player(format!("set mpv read timeout: {e}")))?;
        let reader = stream
            .try_clone()
            .map_err(|e| ClockError::player(format!("clone mpv socket: {e}")))?;
        Ok(Self {
            writer: stream,
            reader: BufReader::new(reader),
            next_request_id: 1,
        })
    }

    /// Send one raw command and return its `data` field.
    pub fn request(&mut self, args: Vec<Value>) -> ClockResult<Value> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let mut line = json!({ "command": args, "request_id": request_id }).to_string();
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| ClockError::player(format!("write to mpv: {e}")))?;

        // Property-change and playback events share the socket; skip until our reply.
        loop {
            let mut buf = String::new();
            let n = self
                .reader
                .read_line(&mut buf)
                .map_err(|e| ClockError::player(format!("read from mpv: {e}")))?;
            if n == 0 {
                return Err(ClockError::player("mpv closed the IPC socket"));
            }
            let msg: Value = match serde_json::from_str(buf.trim()) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!(error = %e, line = buf.trim(), "ignoring unparsable mpv line");
                    continue;
                }
            };
            if msg.get("event").is_some() {
                continue;
            }
            if msg.get("request_id").and_then(Value::as_u64) != Some(request_id) {
                continue;
            }
            return match msg.get("error").and_then(Value::as_str) {
                Some("success") => Ok(msg.get("data").cloned().unwrap_or(Value::Null)),
                Some(err) => Err(ClockError::player(format!("mpv rejected command: {err}"))),
                None => Err(ClockError::player("mpv reply without status")),
            };
        }
    }
}

#[cfg(unix)]
impl PlayerTarget for MpvIpc {
    fn execute(&mut self, command: &PlayerCommand) -> ClockResult<()> {
        self.request(command.to_mpv_args()).map(|_| ())
    }
}

#[cfg(not(unix))]
pub struct MpvIpc;

#[cfg(not(unix))]
impl MpvIpc {
    pub fn connect(socket: &Path, _timeout: Duration) -> ClockResult<Self> {
        Err(ClockError::player(format!(
            "mpv IPC socket '{}' requires a unix platform",
            socket.display()
        )))
    }
}

#[cfg(not(unix))]
impl PlayerTarget for MpvIpc {
    fn execute(&mut self, _command: &PlayerCommand) -> ClockResult<()> {
        Err(ClockError::player("mpv IPC requires a unix platform"))
    }
}

#[cfg(all(test, unix))]
#[path = "../../tests/unit/playback/ipc.rs"]
mod tests;
