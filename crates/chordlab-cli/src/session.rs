use chordlab_core::combos::CombinationIndex;
use chordlab_core::config::SessionSpec;
use chordlab_core::engine::{PauseKind, Press, TrialEngine};
use chordlab_core::render::GridRenderer;
use chordlab_core::sinks::{IlluminationSink, PresentationSink};
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Sleep};
use tracing::{info, warn};

/// Key events as delivered by the input source, normalized to lowercase
/// logical key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySignal {
    Down(String),
    Up(String),
    Quit,
}

/// Thin glue that serializes everything touching the engine: key events,
/// the render tick, and the single-shot pause timer all run through one
/// select loop, so no two transitions ever race. Teardown is dropping the
/// loop; the pending timer dies with it.
pub struct SessionController {
    spec: SessionSpec,
    engine: TrialEngine,
    renderer: GridRenderer,
    index: CombinationIndex,
    refresh: Duration,
    presentation: Box<dyn PresentationSink>,
    illumination: Box<dyn IlluminationSink>,
}

impl SessionController {
    pub fn new(
        spec: SessionSpec,
        engine: TrialEngine,
        renderer: GridRenderer,
        index: CombinationIndex,
        refresh_ms: u64,
        presentation: Box<dyn PresentationSink>,
        illumination: Box<dyn IlluminationSink>,
    ) -> Self {
        Self {
            spec,
            engine,
            renderer,
            index,
            refresh: Duration::from_millis(refresh_ms),
            presentation,
            illumination,
        }
    }

    fn present_trial(&mut self) -> bool {
        match self.engine.advance() {
            Some(cmd) => {
                let label = cmd.label.clone();
                self.presentation.command(&label);
                self.presentation.result("");
                true
            }
            None => false,
        }
    }

    pub async fn run(mut self, mut keys: mpsc::Receiver<KeySignal>) {
        info!(
            participant = %self.spec.participant_id,
            backlit = self.spec.lit_enabled,
            phase = ?self.spec.weight_kind,
            "session starting"
        );

        match self.engine.start() {
            Some(cmd) => {
                let label = cmd.label.clone();
                self.presentation.command(&label);
                self.presentation.result("");
            }
            None => {
                warn!("deck is empty, nothing to run");
                return;
            }
        }

        let mut tick = interval(self.refresh);
        let mut pending: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let grid = self
                        .renderer
                        .render(&self.engine, &self.index, self.spec.lit_enabled);
                    self.illumination.apply(&grid);
                }

                sig = keys.recv() => match sig {
                    None | Some(KeySignal::Quit) => {
                        info!("session teardown requested");
                        break;
                    }
                    Some(KeySignal::Up(key)) => self.engine.on_key_up(&key),
                    Some(KeySignal::Down(key)) => {
                        if self.engine.on_key_down(&key) == Press::Second {
                            if let Some(report) = self.engine.finalize_result() {
                                self.presentation.result(report.outcome.label());
                                if report.pause.kind == PauseKind::BlockRest
                                    && self.engine.deck_remaining() > 0
                                {
                                    self.presentation.result(&format!(
                                        "Rest, next command in {} sec.",
                                        report.pause.duration.as_secs()
                                    ));
                                }
                                pending = Some(Box::pin(sleep(report.pause.duration)));
                            }
                        }
                    }
                },

                // Resolves only while a pause timer is armed.
                _ = async {
                    match pending.as_mut() {
                        Some(timer) => timer.await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    pending = None;
                    if !self.present_trial() {
                        break;
                    }
                }
            }
        }

        info!(
            trials = self.engine.trials_completed(),
            blocks = self.engine.blocks_completed(),
            "session over"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordlab_core::catalog::{Command, CommandCatalog, WeightKind};
    use chordlab_core::config::ExperimentConfig;
    use chordlab_core::deck::Deck;
    use chordlab_core::engine::DelayPolicy;
    use chordlab_core::layout::{KeyDescriptor, KeyLayout};
    use chordlab_core::render::Grid;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl PresentationSink for Recorder {
        fn command(&mut self, text: &str) {
            self.0.lock().unwrap().push(format!("command:{}", text));
        }
        fn result(&mut self, text: &str) {
            self.0.lock().unwrap().push(format!("result:{}", text));
        }
    }

    struct DropFrames;

    impl IlluminationSink for DropFrames {
        fn apply(&mut self, _grid: &Grid) {}
    }

    fn key(name: &str, row: usize, col: usize) -> KeyDescriptor {
        KeyDescriptor {
            name: name.to_string(),
            label: name.to_uppercase(),
            row,
            col,
        }
    }

    fn fixture() -> (TrialEngine, GridRenderer, CombinationIndex) {
        let catalog = CommandCatalog::new(vec![Command {
            id: 0,
            label: "Turn up living room lights".to_string(),
            key_first: "control".to_string(),
            key_second: "s".to_string(),
            training_weight: 1,
            eval_weight: 1,
        }]);
        let layout = KeyLayout::new(6, 22, vec![key("control", 5, 1), key("s", 3, 3)]);
        let index = CombinationIndex::build(&catalog, &layout).unwrap();
        let config = ExperimentConfig::default();
        let engine = TrialEngine::new(
            catalog,
            Deck::from_ids(vec![0]),
            DelayPolicy::from_config(&config),
        )
        .unwrap();
        let renderer = GridRenderer::new(6, 22, config.palette);
        (engine, renderer, index)
    }

    #[tokio::test(start_paused = true)]
    async fn single_trial_session_runs_to_completion() {
        let (engine, renderer, index) = fixture();
        let log = Arc::new(Mutex::new(Vec::new()));
        let spec = SessionSpec {
            participant_id: "p01".to_string(),
            lit_enabled: true,
            weight_kind: WeightKind::Training,
        };
        let controller = SessionController::new(
            spec,
            engine,
            renderer,
            index,
            10,
            Box::new(Recorder(log.clone())),
            Box::new(DropFrames),
        );

        let (tx, rx) = mpsc::channel(8);
        tx.send(KeySignal::Down("control".to_string())).await.unwrap();
        tx.send(KeySignal::Down("s".to_string())).await.unwrap();
        controller.run(rx).await;

        let log = log.lock().unwrap();
        assert_eq!(log[0], "command:Turn up living room lights");
        assert_eq!(log[1], "result:");
        assert!(log.contains(&"result:Correct".to_string()));
        // Last trial of the deck ends with a rest pause, then the session
        // finishes without issuing another command.
        assert_eq!(
            log.iter().filter(|e| e.starts_with("command:")).count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quit_tears_the_session_down() {
        let (engine, renderer, index) = fixture();
        let log = Arc::new(Mutex::new(Vec::new()));
        let spec = SessionSpec {
            participant_id: "p02".to_string(),
            lit_enabled: false,
            weight_kind: WeightKind::Training,
        };
        let controller = SessionController::new(
            spec,
            engine,
            renderer,
            index,
            10,
            Box::new(Recorder(log.clone())),
            Box::new(DropFrames),
        );

        let (tx, rx) = mpsc::channel(8);
        tx.send(KeySignal::Down("control".to_string())).await.unwrap();
        tx.send(KeySignal::Quit).await.unwrap();
        controller.run(rx).await;

        let log = log.lock().unwrap();
        assert!(!log.contains(&"result:Correct".to_string()));
        assert!(!log.contains(&"result:Incorrect".to_string()));
    }
}
