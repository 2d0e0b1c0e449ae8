use std::collections::VecDeque;

use super::event::TelemetryEvent;
use crate::kernel::session::SessionPhase;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub session_stats: SessionStats,
    pub detection_stats: DetectionStats,
    pub assembly_stats: AssemblyStats,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub transitions: u64,
    pub runs_started: u64,
    pub clears: u64,
    pub words_dropped_by_clear: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DetectionStats {
    pub accepted: u64,
    pub missed: u64,
    pub rejected: u64,
    pub max_buffer_len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AssemblyStats {
    pub short_circuits: u64,
    pub requested: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub empty_completions: u64,
    pub stale_discarded: u64,
    pub total_latency_ticks: u64,
    pub avg_latency_ticks: f64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut completed = 0u64;

    for event in events {
        match event {
            TelemetryEvent::SessionTransition { to, .. } => {
                snap.session_stats.transitions += 1;
                if *to == SessionPhase::Running {
                    snap.session_stats.runs_started += 1;
                }
            }
            TelemetryEvent::Detection { buffer_len, .. } => {
                snap.detection_stats.accepted += 1;
                snap.detection_stats.max_buffer_len = snap.detection_stats.max_buffer_len.max(*buffer_len);
            }
            TelemetryEvent::DetectionMissed { .. } => snap.detection_stats.missed += 1,
            TelemetryEvent::DetectionRejected { .. } => snap.detection_stats.rejected += 1,
            TelemetryEvent::ShortCircuit { .. } => snap.assembly_stats.short_circuits += 1,
            TelemetryEvent::AssemblyRequested { .. } => snap.assembly_stats.requested += 1,
            TelemetryEvent::AssemblySucceeded { latency_ticks, .. } => {
                snap.assembly_stats.succeeded += 1;
                snap.assembly_stats.total_latency_ticks += latency_ticks;
                completed += 1;
            }
            TelemetryEvent::AssemblyFailed { latency_ticks, kind, .. } => {
                snap.assembly_stats.failed += 1;
                if *kind == super::event::AssemblyFailureKind::EmptyCompletion {
                    snap.assembly_stats.empty_completions += 1;
                }
                snap.assembly_stats.total_latency_ticks += latency_ticks;
                completed += 1;
            }
            TelemetryEvent::StaleResponseDiscarded { .. } => snap.assembly_stats.stale_discarded += 1,
            TelemetryEvent::Cleared { dropped_words } => {
                snap.session_stats.clears += 1;
                snap.session_stats.words_dropped_by_clear += *dropped_words as u64;
            }
        }
    }

    if completed > 0 {
        snap.assembly_stats.avg_latency_ticks = snap.assembly_stats.total_latency_ticks as f64 / completed as f64;
    }

    snap
}
