use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// How `loadfile` treats the current playlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadMode {
    Replace,
    Append,
    AppendPlay,
}

impl LoadMode {
    pub fn as_mpv_flag(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
            Self::AppendPlay => "append-play",
        }
    }
}

/// The player commands the clock needs, as carried over the command bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    SetFullscreen { on: bool },
    SetMute { on: bool },
    LoadFile { path: PathBuf, mode: LoadMode },
    SetPause { paused: bool },
}

impl PlayerCommand {
    /// Argument array of the equivalent mpv JSON IPC `command`.
    pub fn to_mpv_args(&self) -> Vec<Value> {
        match self {
            Self::SetFullscreen { on } => vec![json!("set_property"), json!("fullscreen"), json!(on)],
            Self::SetMute { on } => vec![json!("set_property"), json!("mute"), json!(on)],
            Self::LoadFile { path, mode } => vec![
                json!("loadfile"),
                json!(path.to_string_lossy()),
                json!(mode.as_mpv_flag()),
            ],
            Self::SetPause { paused } => vec![json!("set_property"), json!("pause"), json!(paused)],
        }
    }
}

/// One command sent to the bus, tagged so the reply can be matched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusRequest {
    pub id: u64,
    pub command: PlayerCommand,
}

/// Acknowledgement for one [`BusRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusReply {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BusReply {
    pub fn ok(id: u64) -> Self {
        Self { id, error: None }
    }

    pub fn failed(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/command.rs"]
mod tests;
