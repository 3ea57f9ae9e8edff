use crate::catalog::{Command, CommandCatalog};
use crate::config::ExperimentConfig;
use crate::deck::Deck;
use crate::error::{ChordLabError, ClResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the engine is in the current trial's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstKey,
    AwaitingSecondKey,
    ResultPending,
    Resting,
    /// Deck empty and no trial active. Terminal; no outgoing transitions.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Correct => "Correct",
            Outcome::Incorrect => "Incorrect",
        }
    }
}

/// Which pause bucket applies before the next trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    AfterCorrect,
    AfterIncorrect,
    BlockRest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub kind: PauseKind,
    pub duration: Duration,
}

/// What `finalize_result` hands back to the scheduler: the classification
/// plus how long to wait before calling `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialReport {
    pub outcome: Outcome,
    pub pause: Pause,
}

/// Result of feeding one key-down into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// First key of the chord; highlighting should now follow it.
    First,
    /// Chord complete; the caller must finalize the result.
    Second,
    /// The event cannot be accepted in the current state. Never an error;
    /// the session carries on.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotListening,
    AlreadyHeld,
}

/// The three pause durations plus the block length. Plain configuration,
/// nothing here is computed.
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    pub block_size: usize,
    pub correct: Duration,
    pub incorrect: Duration,
    pub rest: Duration,
}

impl DelayPolicy {
    pub fn from_config(cfg: &ExperimentConfig) -> Self {
        Self {
            block_size: cfg.block_size,
            correct: Duration::from_millis(cfg.correct_delay_ms),
            incorrect: Duration::from_millis(cfg.incorrect_delay_ms),
            rest: Duration::from_millis(cfg.rest_delay_ms),
        }
    }
}

/// The trial scheduling state machine.
///
/// Owns the deck and the active trial. All transitions are driven by the
/// caller: `start`, then for each trial `on_key_down` until the chord is
/// complete, `finalize_result`, a caller-side wait, and `advance`. One
/// participant per engine; callers must serialize these calls.
pub struct TrialEngine {
    catalog: CommandCatalog,
    deck: Deck,
    policy: DelayPolicy,

    phase: Phase,
    active: Option<Command>,
    press_stack: Vec<String>,
    correct: bool,
    listening: bool,
    started: bool,
    result_reported: bool,

    trials_completed: u32,
    blocks_completed: u32,
}

impl TrialEngine {
    pub fn new(catalog: CommandCatalog, deck: Deck, policy: DelayPolicy) -> ClResult<Self> {
        catalog.validate()?;
        if policy.block_size == 0 {
            return Err(ChordLabError::Config(
                "block size must be at least 1".to_string(),
            ));
        }
        for &id in deck.ids() {
            if catalog.get(id).is_none() {
                return Err(ChordLabError::Config(format!(
                    "deck references command id {} absent from the catalog",
                    id
                )));
            }
        }

        Ok(Self {
            catalog,
            deck,
            policy,
            phase: Phase::Exhausted,
            active: None,
            press_stack: Vec::with_capacity(2),
            correct: true,
            listening: false,
            started: false,
            result_reported: false,
            trials_completed: 0,
            blocks_completed: 0,
        })
    }

    /// Issues the first trial. Returns `None` (and lands in `Exhausted`) if
    /// the deck was empty to begin with.
    pub fn start(&mut self) -> Option<&Command> {
        if self.started {
            warn!("session already started, ignoring");
            return None;
        }
        self.started = true;
        self.next_trial()
    }

    /// Feed a key-down. Only accepted while the listening window is open
    /// and the key is not already held; everything else is ignored locally.
    pub fn on_key_down(&mut self, key: &str) -> Press {
        if !self.listening {
            debug!(key, "key-down ignored, not listening");
            return Press::Ignored(IgnoreReason::NotListening);
        }

        let key = key.to_lowercase();
        if self.press_stack.contains(&key) {
            debug!(key, "key-down ignored, already held");
            return Press::Ignored(IgnoreReason::AlreadyHeld);
        }

        self.press_stack.push(key);
        debug!(stack = ?self.press_stack, "key press");

        if self.press_stack.len() < 2 {
            self.phase = Phase::AwaitingSecondKey;
            return Press::First;
        }

        // Chord complete. Close the listening window before anything else so
        // a racing third key can never land in the stack.
        self.listening = false;
        if let Some(cmd) = &self.active {
            let order_matches = self.press_stack[0].eq_ignore_ascii_case(&cmd.key_first)
                && self.press_stack[1].eq_ignore_ascii_case(&cmd.key_second);
            if !order_matches {
                self.correct = false;
            }
        }
        self.phase = Phase::ResultPending;
        Press::Second
    }

    /// Key-up events are telemetry only: logged, never mutate the press
    /// stack, never change highlighting.
    pub fn on_key_up(&self, key: &str) {
        debug!(key, listening = self.listening, "key up");
    }

    /// Classifies the finished trial and computes the pause before the next
    /// one. Returns `None` unless a chord is pending and unreported.
    pub fn finalize_result(&mut self) -> Option<TrialReport> {
        if self.phase != Phase::ResultPending || self.result_reported {
            return None;
        }

        let outcome = if self.correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.result_reported = true;
        self.trials_completed += 1;
        self.press_stack.clear();

        let pause = self.next_pause(outcome);
        if pause.kind == PauseKind::BlockRest {
            self.phase = Phase::Resting;
            self.blocks_completed += 1;
        }

        info!(
            outcome = outcome.label(),
            pause = ?pause.kind,
            trials = self.trials_completed,
            remaining = self.deck.len(),
            "trial finished"
        );
        Some(TrialReport { outcome, pause })
    }

    /// Issues the next trial after the scheduled pause has elapsed, or
    /// transitions to `Exhausted` when the deck has run dry.
    pub fn advance(&mut self) -> Option<&Command> {
        match self.phase {
            Phase::ResultPending | Phase::Resting if self.result_reported => self.next_trial(),
            Phase::Exhausted => None,
            _ => {
                warn!(phase = ?self.phase, "advance ignored, no reported result");
                None
            }
        }
    }

    fn next_trial(&mut self) -> Option<&Command> {
        let Some(id) = self.deck.draw() else {
            self.active = None;
            self.listening = false;
            self.phase = Phase::Exhausted;
            info!(
                trials = self.trials_completed,
                blocks = self.blocks_completed,
                "deck exhausted, session over"
            );
            return None;
        };

        let Some(cmd) = self.catalog.get(id).cloned() else {
            // Unreachable with a deck built from this catalog; checked in new().
            warn!(id, "deck id missing from catalog, ending session");
            self.active = None;
            self.listening = false;
            self.phase = Phase::Exhausted;
            return None;
        };

        info!(command = %cmd.label, remaining = self.deck.len(), "trial issued");
        self.active = Some(cmd);
        self.press_stack.clear();
        self.correct = true;
        self.listening = true;
        self.result_reported = false;
        self.phase = Phase::AwaitingFirstKey;
        self.active.as_ref()
    }

    fn next_pause(&self, outcome: Outcome) -> Pause {
        let remaining = self.deck.len();
        if remaining == 0 || remaining % self.policy.block_size == 0 {
            Pause {
                kind: PauseKind::BlockRest,
                duration: self.policy.rest,
            }
        } else {
            match outcome {
                Outcome::Correct => Pause {
                    kind: PauseKind::AfterCorrect,
                    duration: self.policy.correct,
                },
                Outcome::Incorrect => Pause {
                    kind: PauseKind::AfterIncorrect,
                    duration: self.policy.incorrect,
                },
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_command(&self) -> Option<&Command> {
        self.active.as_ref()
    }

    pub fn pressed_keys(&self) -> &[String] {
        &self.press_stack
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn trials_completed(&self) -> u32 {
        self.trials_completed
    }

    pub fn blocks_completed(&self) -> u32 {
        self.blocks_completed
    }
}
