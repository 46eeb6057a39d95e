//! Platform abstraction layer
//!
//! Handles the collaborators around the simulation:
//! - Input events (`input`) and the raw-mode terminal (`terminal`)
//! - Tick pacing (`time`)
//! - The fixed-rate loop tying them to a `RenderSink`

pub mod input;
pub mod terminal;
pub mod time;

pub use input::{InputEvent, InputSource, ScriptedInput};
pub use terminal::{TerminalInput, TerminalSession};
pub use time::{FixedRateClock, FrameClock, UnpacedClock};

use crate::renderer::RenderSink;
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub moves: u32,
    pub phase: GamePhase,
    pub best_tile: u32,
    /// Merges committed over the run
    pub merges: usize,
    /// Tiles spawned after moves (start tiles excluded)
    pub spawns: usize,
    /// Moves that changed nothing
    pub blocked: usize,
}

/// Drive the game until the input source asks to quit.
///
/// Each tick drains the input source, feeds at most one command to the
/// simulation and renders when tiles are moving or the state changed.
pub fn run<R, I, C>(state: &mut GameState, sink: &mut R, input: &mut I, clock: &mut C) -> RunSummary
where
    R: RenderSink + ?Sized,
    I: InputSource + ?Sized,
    C: FrameClock + ?Sized,
{
    let start_ticks = state.time_ticks;
    let (mut merges, mut spawns, mut blocked) = (0, 0, 0);
    sink.render(&state.frame());

    loop {
        let polled = input.poll();
        if polled.contains(&InputEvent::Quit) {
            log::info!("Quit requested");
            break;
        }

        let mut commands = polled.into_iter().filter_map(InputEvent::to_tick_input);
        let command = commands.next().unwrap_or_default();
        let extra = commands.count();
        if extra > 0 {
            log::debug!("Dropped {extra} extra input(s) this tick");
        }

        let was_animating = state.is_animating();
        let events = tick(state, &command);
        for event in &events {
            log::trace!("event: {event:?}");
            match event {
                GameEvent::Settled { merges: n } => merges += n,
                GameEvent::Spawned { .. } => spawns += 1,
                GameEvent::Blocked { .. } => blocked += 1,
                _ => {}
            }
        }
        if let Some(committed) = state.take_settled_frame() {
            sink.render(&committed);
        }
        if was_animating || state.is_animating() || !events.is_empty() {
            sink.render(&state.frame());
        }

        clock.wait_next_tick();
    }

    RunSummary {
        ticks: state.time_ticks - start_ticks,
        moves: state.moves,
        phase: state.phase,
        best_tile: state.grid.max_value(),
        merges,
        spawns,
        blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Frame, Grid};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
    }

    impl RenderSink for Recorder {
        fn render(&mut self, frame: &Frame) {
            self.frames.push(frame.clone());
        }
    }

    fn state<const C: usize>(rows: &[[u32; C]]) -> GameState {
        let grid = Grid::from_rows(rows, crate::consts::CELL_SIZE);
        let settings = Settings::with_grid(grid.rows(), grid.cols());
        GameState::from_grid(settings, grid, 99).unwrap()
    }

    #[test]
    fn test_run_renders_every_animation_tick() {
        let mut game = state(&[[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
        let mut sink = Recorder::default();
        let mut input = ScriptedInput::new([InputEvent::Left], 40);
        let mut clock = UnpacedClock::default();

        let summary = run(&mut game, &mut sink, &mut input, &mut clock);

        assert_eq!(summary.moves, 1);
        // Initial frame, 29 in-flight ticks, then the committed grid and the post-spawn grid
        assert_eq!(sink.frames.len(), 32);
        assert!(sink.frames[0].settled);
        assert!(sink.frames[1..30].iter().all(|f| !f.settled));
        let committed = &sink.frames[30];
        assert!(committed.settled);
        assert_eq!(committed.tiles.len(), 1);
        let last = sink.frames.last().unwrap();
        assert!(last.settled);
        assert_eq!(last.tiles.len(), 2);
        assert_eq!(summary.spawns, 1);
        assert_eq!(summary.merges, 0);
    }

    #[test]
    fn test_quit_stops_immediately() {
        let mut game = GameState::new(1);
        let mut sink = Recorder::default();
        let mut input = ScriptedInput::new([], 0);
        let mut clock = UnpacedClock::default();
        let summary = run(&mut game, &mut sink, &mut input, &mut clock);
        assert_eq!(summary.ticks, 0);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_input_during_animation_is_lost() {
        let mut game = state(&[[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
        let mut sink = Recorder::default();
        // Right arrives one tick after Left, mid-slide
        let mut input = ScriptedInput::new([InputEvent::Left, InputEvent::Right], 0);
        let mut clock = UnpacedClock::default();
        let summary = run(&mut game, &mut sink, &mut input, &mut clock);
        assert_eq!(summary.moves, 0);
        assert!(game.is_animating());
        assert_eq!((summary.spawns, summary.blocked), (0, 0));
    }

    #[test]
    fn test_scripted_win_overlay() {
        let mut game = state(&[[1024, 0, 0, 1024], [0; 4], [0; 4], [0; 4]]);
        let mut sink = Recorder::default();
        let mut input = ScriptedInput::new([InputEvent::Left], 40);
        let mut clock = UnpacedClock::default();
        let summary = run(&mut game, &mut sink, &mut input, &mut clock);
        assert_eq!(summary.phase, GamePhase::Won);
        assert_eq!(summary.best_tile, 2048);
        assert_eq!(
            sink.frames.last().map(|f| f.overlay),
            Some(crate::sim::Overlay::Won)
        );
    }
}
