use std::mem;
use tracing::{debug, info, warn};

use super::event::{Command, Event, HapticPulse, RequestId};
use super::scheduler::{Cadence, Debounce, SideEffect};
use super::session::{SessionGraph, SessionPhase, SessionRequest};
use super::state::{join_words, SessionState, StateDelta};
use super::telemetry::event::{AssemblyFailureKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Tick;
use crate::camera::Camera;
use crate::config::ControllerConfig;
use crate::detector::{Detector, Vocabulary};
use crate::error::{AssemblyError, ControllerError};

pub const PERMISSION_MESSAGE: &str = "Please grant camera permission to use this feature";
pub const TRANSLATE_FAILED_MESSAGE: &str = "Failed to translate. Please try again.";

#[derive(Debug, Clone, Copy)]
struct PendingAssembly {
    request: RequestId,
    issued_at: Tick,
}

/// Detection loop controller.
///
/// Owns the detection cadence, the debounce window, the word buffer and the
/// in-flight assembly request. Synchronous and frame driven: it never awaits,
/// and remote work leaves as [`SideEffect::RequestAssembly`] and comes back as
/// [`Event::AssemblyFinished`].
pub struct Controller {
    pub state: SessionState,
    pub telemetry: TelemetryRecorder,
    pub tick: Tick,
    config: ControllerConfig,
    vocabulary: Vocabulary,
    detector: Box<dyn Detector>,
    camera: Box<dyn Camera>,
    detection: Cadence,
    debounce: Debounce,
    in_flight: Option<PendingAssembly>,
    outbox: Vec<SideEffect>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        vocabulary: Vocabulary,
        detector: Box<dyn Detector>,
        camera: Box<dyn Camera>,
    ) -> Self {
        Self {
            state: SessionState::new(),
            telemetry: TelemetryRecorder::new(),
            tick: Tick::new(),
            detection: Cadence::new(config.detection_frames),
            debounce: Debounce::new(config.debounce_frames),
            config,
            vocabulary,
            detector,
            camera,
            in_flight: None,
            outbox: Vec::new(),
        }
    }

    /// One frame: advance time, apply events, then run due timers.
    pub fn step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        self.tick = self.tick.next();

        for event in events {
            match event {
                Event::Command(cmd) => {
                    if let Err(e) = self.handle(cmd) {
                        debug!("Command {:?} rejected: {}", cmd, e);
                    }
                }
                Event::AssemblyFinished { request, outcome } => self.on_assembly_finished(request, outcome),
            }
        }

        self.run_timers();
        self.take_effects()
    }

    /// Step `frames` times with no events, collecting every side effect.
    pub fn advance(&mut self, frames: u64) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for _ in 0..frames {
            effects.extend(self.step(Vec::new()));
        }
        effects
    }

    pub fn take_effects(&mut self) -> Vec<SideEffect> {
        mem::take(&mut self.outbox)
    }

    pub fn handle(&mut self, cmd: Command) -> Result<(), ControllerError> {
        match cmd {
            Command::CameraOn => self.camera_on(),
            Command::CameraOff => {
                self.camera_off();
                Ok(())
            }
            Command::ToggleCamera => self.toggle_camera(),
            Command::Start => self.start(),
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::ToggleInference => {
                if self.state.running() {
                    self.stop();
                    Ok(())
                } else {
                    self.start()
                }
            }
            Command::Clear => {
                self.clear();
                Ok(())
            }
            Command::ToggleFacing => {
                self.toggle_camera_facing();
                Ok(())
            }
            Command::DismissError => {
                self.dismiss_error();
                Ok(())
            }
        }
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.map(|p| p.request)
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    // === Camera ===

    pub fn camera_on(&mut self) -> Result<(), ControllerError> {
        if self.state.camera_on() {
            return Ok(());
        }
        if let Err(e) = self.camera.power_on() {
            warn!("Camera refused to power on: {}", e);
            self.state.reduce(StateDelta::ErrorRaised(PERMISSION_MESSAGE.to_string()));
            return Err(e.into());
        }
        self.transition(SessionRequest::CameraOn);
        if self.state.error.is_some() {
            self.state.reduce(StateDelta::ErrorDismissed);
        }
        self.outbox.push(SideEffect::Haptic(HapticPulse::Medium));
        Ok(())
    }

    /// Stops detection first if it is running.
    pub fn camera_off(&mut self) {
        if self.state.running() {
            self.stop();
        }
        if self.state.camera_on() {
            self.camera.power_off();
            self.transition(SessionRequest::CameraOff);
        }
    }

    pub fn toggle_camera(&mut self) -> Result<(), ControllerError> {
        if self.state.camera_on() {
            self.camera_off();
            Ok(())
        } else {
            self.camera_on()
        }
    }

    pub fn toggle_camera_facing(&mut self) {
        let facing = self.state.facing.flipped();
        self.camera.set_facing(facing);
        self.state.reduce(StateDelta::FacingChanged(facing));
        self.outbox.push(SideEffect::Haptic(HapticPulse::Light));
    }

    // === Detection loop ===

    pub fn start(&mut self) -> Result<(), ControllerError> {
        match self.state.phase {
            SessionPhase::CameraOff => Err(ControllerError::CameraOff),
            SessionPhase::Running => Ok(()),
            SessionPhase::Idle => {
                self.transition(SessionRequest::Start);
                self.detection.arm(self.tick);
                info!("Detection started at frame {}", self.tick.frame);
                self.outbox.push(SideEffect::Haptic(HapticPulse::Success));
                Ok(())
            }
        }
    }

    /// Leaves the buffer and any pending debounce window alone.
    pub fn stop(&mut self) {
        if !self.state.running() {
            return;
        }
        self.detection.disarm();
        self.transition(SessionRequest::Stop);
        info!("Detection stopped with {} buffered word(s)", self.state.words().len());
        self.outbox.push(SideEffect::Haptic(HapticPulse::Warning));
    }

    pub fn clear(&mut self) {
        let dropped_words = self.state.words().len();
        if let Some(p) = self.in_flight.take() {
            debug!("Clear retires in-flight request {}", p.request);
        }
        self.state.reduce(StateDelta::Cleared);
        self.telemetry.record(TelemetryEvent::Cleared { dropped_words });
        self.outbox.push(SideEffect::Haptic(HapticPulse::Light));
    }

    pub fn dismiss_error(&mut self) {
        if self.state.error.is_some() {
            self.state.reduce(StateDelta::ErrorDismissed);
        }
    }

    fn run_timers(&mut self) {
        // Detection first: a detection on the debounce frame re-arms the window.
        if self.detection.poll(self.tick) {
            self.detect();
        }
        if self.debounce.poll(self.tick) {
            self.assemble();
        }
    }

    fn detect(&mut self) {
        let tick = self.tick;
        let Some(obs) = self.detector.next_observation() else {
            self.telemetry.record(TelemetryEvent::DetectionMissed { tick });
            return;
        };

        if !self.vocabulary.contains(&obs.label) {
            warn!("Detector produced label outside vocabulary: '{}'", obs.label);
            self.telemetry.record(TelemetryEvent::DetectionRejected { tick });
            return;
        }

        debug!("Frame {}: detected '{}' ({:.2})", tick.frame, obs.label, obs.confidence);
        self.state.reduce(StateDelta::WordDetected(obs));
        self.telemetry.record(TelemetryEvent::Detection { tick, buffer_len: self.state.words().len() });
        self.outbox.push(SideEffect::Haptic(HapticPulse::Light));
        self.debounce.trigger(tick);
    }

    // === Assembly ===

    /// Turns the current buffer into a translation: short buffers are joined
    /// locally, everything else goes out as one remote request.
    pub fn assemble(&mut self) {
        let words = self.state.words().to_vec();
        if words.is_empty() {
            return;
        }

        if (self.config.short_circuit_min..=self.config.short_circuit_max).contains(&words.len()) {
            if let Some(p) = self.in_flight.take() {
                debug!("Short-circuit supersedes request {}", p.request);
            }
            let translation = join_words(&words, " ");
            info!("Assembled {} word(s) locally", words.len());
            self.state.reduce(StateDelta::Assembled { translation });
            self.telemetry.record(TelemetryEvent::ShortCircuit { words: words.len() });
            return;
        }

        let request = RequestId::new();
        if let Some(p) = self.in_flight.replace(PendingAssembly {
            request,
            issued_at: self.tick,
        }) {
            debug!("Request {} superseded by {}", p.request, request);
        }
        info!("Requesting remote assembly {} for {} word(s)", request, words.len());
        self.telemetry.record(TelemetryEvent::AssemblyRequested { request, words: words.len() });
        self.outbox.push(SideEffect::RequestAssembly { request, words });
    }

    pub fn on_assembly_finished(&mut self, request: RequestId, outcome: Result<String, AssemblyError>) {
        let pending = match self.in_flight {
            Some(p) if p.request == request => p,
            _ => {
                info!("Discarded stale assembly response {}", request);
                self.telemetry.record(TelemetryEvent::StaleResponseDiscarded { request });
                return;
            }
        };
        self.in_flight = None;
        let latency_ticks = self.tick.frame.saturating_sub(pending.issued_at.frame);

        let outcome = match outcome {
            Ok(text) if text.trim().is_empty() && self.config.empty_completion_is_error => {
                Err(AssemblyError::EmptyCompletion)
            }
            other => other,
        };

        match outcome {
            Ok(translation) => {
                info!("Remote assembly {} succeeded after {} frame(s)", request, latency_ticks);
                self.state.reduce(StateDelta::Assembled { translation });
                self.telemetry.record(TelemetryEvent::AssemblySucceeded { request, latency_ticks });
                self.outbox.push(SideEffect::Haptic(HapticPulse::Success));
            }
            Err(e) => {
                warn!("Remote assembly {} failed: {}", request, e);
                self.state.reduce(StateDelta::ErrorRaised(TRANSLATE_FAILED_MESSAGE.to_string()));
                self.telemetry.record(TelemetryEvent::AssemblyFailed {
                    request,
                    latency_ticks,
                    kind: AssemblyFailureKind::from(&e),
                });
            }
        }
    }

    fn transition(&mut self, request: SessionRequest) {
        let from = self.state.phase;
        match SessionGraph::transition(from, request) {
            Some(to) => {
                self.state.reduce(StateDelta::PhaseChanged(to));
                self.telemetry.record(TelemetryEvent::SessionTransition { from, to, tick: self.tick });
            }
            None => debug!("Ignored {:?} while {:?}", request, from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::SimulatedCamera;
    use crate::detector::ScriptedDetector;

    fn controller(labels: &[&str]) -> Controller {
        Controller::new(
            ControllerConfig::default(),
            Vocabulary::default(),
            Box::new(ScriptedDetector::new(labels.iter().copied())),
            Box::new(SimulatedCamera::default()),
        )
    }

    #[test]
    fn start_needs_camera() {
        let mut c = controller(&[]);
        assert_eq!(c.start(), Err(ControllerError::CameraOff));
        assert!(!c.state.running());
        c.camera_on().unwrap();
        c.start().unwrap();
        assert!(c.state.running());
    }

    #[test]
    fn out_of_vocabulary_labels_are_dropped() {
        let mut c = controller(&["hello", "pizza", "yes"]);
        c.camera_on().unwrap();
        c.start().unwrap();
        c.advance(60);
        assert_eq!(c.state.pending_sentence(), "hello yes");
        assert_eq!(c.telemetry.snapshot().detection_stats.rejected, 1);
    }

    #[test]
    fn haptics_follow_lifecycle() {
        let mut c = controller(&[]);
        c.camera_on().unwrap();
        c.start().unwrap();
        c.stop();
        let pulses: Vec<SideEffect> = c.take_effects();
        assert_eq!(
            pulses,
            vec![
                SideEffect::Haptic(HapticPulse::Medium),
                SideEffect::Haptic(HapticPulse::Success),
                SideEffect::Haptic(HapticPulse::Warning),
            ]
        );
    }
}
