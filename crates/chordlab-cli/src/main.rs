use chordlab_core::catalog::{CommandCatalog, WeightKind};
use chordlab_core::combos::CombinationIndex;
use chordlab_core::config::{ExperimentConfig, SessionSpec};
use chordlab_core::deck::build_deck;
use chordlab_core::engine::{DelayPolicy, TrialEngine};
use chordlab_core::error::ClResult;
use chordlab_core::layout::KeyLayout;
use chordlab_core::render::GridRenderer;
use chordlab_core::sinks::{IlluminationSink, NullIllumination};
use clap::Parser;
use std::process;
use tracing::{error, info, warn};

mod board;
mod input;
mod session;

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-key shortcut training with a reactive keyboard backlight")]
struct Cli {
    /// Participant identifier recorded in the session log
    participant: String,

    /// Enable reactive backlight hints for this session
    #[arg(long, default_value_t = false)]
    backlit: bool,

    /// Frequency column the trial deck is dealt from
    #[arg(long, value_enum, default_value_t = WeightKind::Training)]
    phase: WeightKind,

    /// Command catalog JSON (built-in study catalog when omitted)
    #[arg(long)]
    catalog: Option<String>,

    /// Key layout JSON (built-in study keyboard when omitted)
    #[arg(long)]
    layout: Option<String>,

    /// Experiment settings JSON
    #[arg(long)]
    config: Option<String>,

    /// Skip drawing the backlight board to the terminal
    #[arg(long, default_value_t = false)]
    no_board: bool,
}

fn load_or_exit<T>(what: &str, result: ClResult<T>) -> T {
    result.unwrap_or_else(|e| {
        error!("Failed to load {}: {}", what, e);
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    info!("🎛️  Initializing chordlab...");

    let config = match &cli.config {
        Some(path) => load_or_exit("settings", ExperimentConfig::load_from_file(path)),
        None => ExperimentConfig::default(),
    };
    load_or_exit("settings", config.validate());

    let catalog = match &cli.catalog {
        Some(path) => load_or_exit("catalog", CommandCatalog::load_from_file(path)),
        None => CommandCatalog::with_defaults(),
    };

    let layout = match &cli.layout {
        Some(path) => load_or_exit("layout", KeyLayout::load_from_file(path)),
        None => KeyLayout::with_defaults(),
    };
    load_or_exit("layout", layout.validate());

    let index = load_or_exit("combinations", CombinationIndex::build(&catalog, &layout));
    let deck = load_or_exit("deck", build_deck(&catalog, cli.phase));
    info!("🃏 Deck of {} trials dealt ({} weights)", deck.len(), cli.phase);
    tracing::debug!(order = ?deck.ids(), "full draw order");

    let engine = load_or_exit(
        "engine",
        TrialEngine::new(catalog, deck, DelayPolicy::from_config(&config)),
    );
    let renderer = GridRenderer::new(config.grid_rows, config.grid_cols, config.palette);

    let spec = SessionSpec {
        participant_id: cli.participant,
        lit_enabled: cli.backlit,
        weight_kind: cli.phase,
    };

    let illumination: Box<dyn IlluminationSink> = if cli.no_board {
        Box::new(NullIllumination)
    } else {
        Box::new(board::AnsiBoard::new())
    };
    let presentation = Box::new(board::ConsolePresenter);

    let raw_guard = match input::RawModeGuard::enable() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Raw terminal mode unavailable ({}), line input only", e);
            None
        }
    };

    let (tx, rx) = tokio::sync::mpsc::channel(64);
    let reader = input::spawn(tx);

    let controller = session::SessionController::new(
        spec,
        engine,
        renderer,
        index,
        config.refresh_ms,
        presentation,
        illumination,
    );
    controller.run(rx).await;

    drop(raw_guard);
    let _ = reader.join();
}
