use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::AssemblyError;

/// Identifies one remote assembly attempt. Only the latest id is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// User-issued controls (buttons on the translate screen, console lines).
    Command(Command),
    /// Result of a remote assembly task, posted back by the driver.
    AssemblyFinished {
        request: RequestId,
        outcome: Result<String, AssemblyError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CameraOn,
    CameraOff,
    ToggleCamera,
    Start,
    Stop,
    ToggleInference,
    Clear,
    ToggleFacing,
    DismissError,
}

impl Command {
    /// Console keywords accepted by the binary.
    pub fn parse(input: &str) -> Option<Self> {
        let cmd = match input.trim().to_ascii_lowercase().as_str() {
            "on" | "camera on" => Command::CameraOn,
            "off" | "camera off" => Command::CameraOff,
            "camera" => Command::ToggleCamera,
            "start" => Command::Start,
            "stop" => Command::Stop,
            "toggle" | "go" => Command::ToggleInference,
            "clear" => Command::Clear,
            "flip" => Command::ToggleFacing,
            "dismiss" | "ok" => Command::DismissError,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Informational feedback pulses. Carry no session semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPulse {
    Light,
    Medium,
    Success,
    Warning,
}
