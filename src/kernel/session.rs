use serde::{Deserialize, Serialize};

/// Lifecycle of one translate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Camera powered down. Detection cannot start.
    #[default]
    CameraOff,
    /// Camera live, no detection cadence armed.
    Idle,
    /// Camera live and the detection cadence is producing labels.
    Running,
}

impl SessionPhase {
    pub fn camera_on(self) -> bool {
        !matches!(self, SessionPhase::CameraOff)
    }

    pub fn running(self) -> bool {
        matches!(self, SessionPhase::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    CameraOn,
    CameraOff,
    Start,
    Stop,
}

pub struct SessionGraph;

impl SessionGraph {
    /// (Current phase, Request) -> next phase, or `None` when the request is
    /// not valid from here. `Running` has no direct edge to `CameraOff`; the
    /// controller must stop detection first.
    pub fn transition(current: SessionPhase, request: SessionRequest) -> Option<SessionPhase> {
        use SessionPhase as P;
        use SessionRequest as R;

        match (current, request) {
            (P::CameraOff, R::CameraOn) => Some(P::Idle),
            (P::Idle, R::Start) => Some(P::Running),
            (P::Idle, R::CameraOff) => Some(P::CameraOff),
            (P::Running, R::Stop) => Some(P::Idle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_cycle() {
        let mut phase = SessionPhase::default();
        for req in [SessionRequest::CameraOn, SessionRequest::Start, SessionRequest::Stop, SessionRequest::CameraOff] {
            phase = SessionGraph::transition(phase, req).unwrap();
        }
        assert_eq!(phase, SessionPhase::CameraOff);
    }

    #[test]
    fn start_requires_camera() {
        assert_eq!(SessionGraph::transition(SessionPhase::CameraOff, SessionRequest::Start), None);
    }

    #[test]
    fn running_cannot_drop_camera_directly() {
        assert_eq!(SessionGraph::transition(SessionPhase::Running, SessionRequest::CameraOff), None);
    }
}
