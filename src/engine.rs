//! Presentation boundary
//!
//! A presentation layer talks to the simulation only through [`Intent`]s and
//! reads it only through [`RenderSnapshot`]s. [`Engine`] owns the session
//! state; input arriving from other threads goes through an [`IntentSender`]
//! and is drained once at the start of each tick. [`FixedClock`] turns
//! variable frame deltas into whole simulation ticks so render rate never
//! changes game balance.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GamePhase, GameState, Rotation, TickInput, TickReport, tick};
use crate::snapshot::RenderSnapshot;

/// A command from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Held rotation; stays in effect until replaced
    SetRotating(Rotation),
    /// Turret target
    SetAiming(Vec2),
    /// Shoot toward a point
    Fire(Vec2),
    TogglePause,
    StartSession,
    RetrySession,
}

/// Cloneable handle for sending intents from another thread
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: Sender<Intent>,
}

impl IntentSender {
    /// Queue an intent. Returns false if the engine is gone.
    pub fn send(&self, intent: Intent) -> bool {
        self.tx.send(intent).is_ok()
    }
}

/// Fixed-rate accumulator clock
#[derive(Debug, Clone)]
pub struct FixedClock {
    accumulator: f32,
    max_substeps: u32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(MAX_SUBSTEPS)
    }
}

impl FixedClock {
    pub fn new(max_substeps: u32) -> Self {
        debug_assert!(max_substeps > 0);
        Self {
            accumulator: 0.0,
            max_substeps,
        }
    }

    /// Feed a frame delta (seconds), get the number of ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < self.max_substeps {
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        // Drop backlog we could not catch up on
        if self.accumulator >= SIM_DT {
            log::warn!(
                "Simulation falling behind, dropping {:.1} ticks",
                self.accumulator / SIM_DT
            );
            self.accumulator %= SIM_DT;
        }
        steps
    }

    /// Fraction of a tick accumulated but not yet simulated, in [0, 1)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Owns a session and drives it from intents
pub struct Engine {
    state: GameState,
    rotation: Rotation,
    clock: FixedClock,
    inbox: Receiver<Intent>,
    outbox: Sender<Intent>,
}

impl Engine {
    pub fn new(seed: u64) -> Self {
        Self::from_state(GameState::new(seed))
    }

    /// Wrap an existing state (tests, replays)
    pub fn from_state(state: GameState) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            state,
            rotation: Rotation::None,
            clock: FixedClock::default(),
            inbox,
            outbox,
        }
    }

    /// Handle for queuing intents from other threads
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            tx: self.outbox.clone(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Apply an intent right now. Returns false if it was a no-op.
    pub fn apply(&mut self, intent: Intent) -> bool {
        log::trace!("Intent {:?} in {:?}", intent, self.state.phase);
        match intent {
            Intent::SetRotating(rotation) => {
                let changed = self.rotation != rotation;
                self.rotation = rotation;
                changed
            }
            Intent::SetAiming(point) => self.state.aim(point),
            Intent::Fire(target) => self.state.fire(target).is_some(),
            Intent::TogglePause => self.state.toggle_pause(),
            Intent::StartSession => self.start_or_retry(|s| s.start_session()),
            Intent::RetrySession => self.start_or_retry(|s| s.retry_session()),
        }
    }

    fn start_or_retry(&mut self, transition: impl FnOnce(&mut GameState) -> bool) -> bool {
        let started = transition(&mut self.state);
        if started {
            // Keys held on the previous screen do not carry over
            self.rotation = Rotation::None;
            self.clock.reset();
        }
        started
    }

    /// Apply every queued intent in arrival order
    pub fn drain_intents(&mut self) -> usize {
        let mut count = 0;
        while let Ok(intent) = self.inbox.try_recv() {
            self.apply(intent);
            count += 1;
        }
        count
    }

    /// Drain queued input and run exactly one tick
    pub fn step(&mut self) -> TickReport {
        self.drain_intents();
        let input = TickInput {
            rotation: self.rotation,
            ..Default::default()
        };
        tick(&mut self.state, &input)
    }

    /// Advance by a wall-clock frame delta. Returns the ticks that advanced
    /// the session; steps taken while not playing do not count.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let steps = self.clock.advance(frame_dt);
        let mut advanced = 0;
        for _ in 0..steps {
            if self.step().advanced {
                advanced += 1;
            }
        }
        advanced
    }

    /// Capture a snapshot, handing over events produced since the last one
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let events = self.state.take_events();
        RenderSnapshot::capture(&self.state, events)
    }
}
