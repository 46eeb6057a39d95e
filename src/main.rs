//! Slide 2048 entry point
//!
//! Terminal front end: reads key presses in raw mode (or replays a
//! `--script`), redraws the board after every move and paces itself with a
//! fixed-rate clock.

use std::path::PathBuf;

use clap::Parser;

use slide_2048::Settings;
use slide_2048::platform::{
    self, FixedRateClock, InputEvent, RunSummary, ScriptedInput, TerminalInput, TerminalSession,
    UnpacedClock,
};
use slide_2048::renderer::TextRenderer;
use slide_2048::sim::GameState;

const HELP_LINE: &str = "arrows/wasd/hjkl move, r restart, c keep playing, q quit";

#[derive(Parser, Debug)]
#[command(version, about = "Sliding-tile merge puzzle for the terminal")]
struct Args {
    /// Settings file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed (defaults to the system clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Replay these keys instead of reading the keyboard, e.g. "left up q"
    #[arg(long, value_name = "KEYS")]
    script: Option<String>,

    /// Also print frames captured mid-slide
    #[arg(long)]
    motion: bool,

    /// Don't clear the screen between frames
    #[arg(long)]
    no_clear: bool,
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn play_interactive(
    state: &mut GameState,
    renderer: &mut TextRenderer<std::io::Stdout>,
    no_clear: bool,
) -> std::io::Result<RunSummary> {
    let _session = TerminalSession::enter()?;
    renderer.clear_screen = !no_clear;
    renderer.raw_mode = true;
    renderer.footer = Some(HELP_LINE.to_string());

    let mut input = TerminalInput;
    let mut clock = FixedRateClock::new(state.settings.tick_period());
    Ok(platform::run(state, renderer, &mut input, &mut clock))
}

fn main() {
    env_logger::init();
    log::info!("Slide 2048 starting...");

    let args = Args::parse();
    let settings = args
        .config
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!(
        "{}x{} grid, win at {}, seed {seed}",
        settings.rows,
        settings.cols,
        settings.win_threshold
    );

    let mut state = match GameState::with_settings(settings, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid settings: {e}; using defaults");
            GameState::new(seed)
        }
    };
    let settings = state.settings.clone();

    let mut renderer = TextRenderer::new(
        std::io::stdout(),
        settings.rows,
        settings.cols,
        settings.cell_size,
    );
    renderer.show_motion = args.motion;

    let summary = match args.script {
        Some(script) => {
            let spacing = ScriptedInput::settle_spacing(
                settings.rows,
                settings.cols,
                settings.cell_size,
                settings.velocity,
            );
            let mut input = ScriptedInput::new(InputEvent::parse_line(&script), spacing);
            let mut clock = UnpacedClock::default();
            platform::run(&mut state, &mut renderer, &mut input, &mut clock)
        }
        None => match play_interactive(&mut state, &mut renderer, args.no_clear) {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("Terminal setup failed: {e}");
                std::process::exit(1);
            }
        },
    };

    log::info!(
        "Finished after {} ticks: {} moves, {} merges, best tile {}, {:?}",
        summary.ticks,
        summary.moves,
        summary.merges,
        summary.best_tile,
        summary.phase
    );
    println!("Best tile: {}", summary.best_tile);
}
