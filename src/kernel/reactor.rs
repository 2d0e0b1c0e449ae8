use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::controller::Controller;
use super::event::Event;
use super::scheduler::SideEffect;
use super::state::SessionState;
use super::time::TICK_MS;
use crate::services::llm::SentenceAssembler;

/// Async driver around the [`Controller`].
///
/// The controller stays pure; the reactor owns the clock, the event channel
/// and the remote assembly tasks.
pub struct Reactor<A: SentenceAssembler> {
    pub receiver: mpsc::Receiver<Event>,
    tx_clone: mpsc::Sender<Event>,
    pub controller: Controller,
    assembler: A,
    view_tx: watch::Sender<SessionState>,
}

impl<A: SentenceAssembler> Reactor<A> {
    pub fn new(receiver: mpsc::Receiver<Event>, tx: mpsc::Sender<Event>, controller: Controller, assembler: A) -> Self {
        let (view_tx, _) = watch::channel(controller.state.clone());
        Self {
            receiver,
            tx_clone: tx,
            controller,
            assembler,
            view_tx,
        }
    }

    /// Read-only session view, refreshed whenever the state version moves.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.view_tx.subscribe()
    }

    /// Pure step: one controller frame. MUST NOT await.
    pub fn tick_step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        let effects = self.controller.step(events);
        let state = &self.controller.state;
        self.view_tx.send_if_modified(|view| {
            if view.version == state.version {
                return false;
            }
            *view = state.clone();
            true
        });
        effects
    }

    /// Executes side effects. Assembly requests become detached tasks that
    /// post their outcome back into the event channel.
    pub fn dispatch(&self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::RequestAssembly { request, words } => {
                    let assembler = self.assembler.clone();
                    let tx = self.tx_clone.clone();
                    tokio::spawn(async move {
                        let outcome = assembler.assemble(words).await;
                        if tx.send(Event::AssemblyFinished { request, outcome }).await.is_err() {
                            debug!("Reactor gone before assembly {} returned", request);
                        }
                    });
                }
                SideEffect::Haptic(pulse) => debug!("[HAPTIC] {:?}", pulse),
            }
        }
    }

    /// Async driver loop. Returns when `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("Reactor started. Tick: {}ms", TICK_MS);

        let mut cadence = interval(Duration::from_millis(TICK_MS));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Reactor shutting down at frame {}", self.controller.tick.frame);
                    break;
                }
                _ = cadence.tick() => {}
            }

            let mut events: Vec<Event> = Vec::new();
            loop {
                match self.receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        warn!("Event channel closed; stopping reactor");
                        return;
                    }
                }
            }

            let effects = self.tick_step(events);
            self.dispatch(effects);
        }
    }
}
