//! Fixed timestep progression tick
//!
//! One call per frame clock tick. Input is only honoured while idle; anything
//! arriving mid-animation is dropped so each move fully commits (grid, spawn,
//! terminal check) before the next begins.

use super::animate::Animation;
use super::direction::Direction;
use super::resolve::resolve;
use super::state::{AnimationState, GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub direction: Option<Direction>,
    /// Start over (accepted from `Won` or `Lost`)
    pub restart: bool,
    /// Keep playing after a win
    pub continue_after_win: bool,
}

impl TickInput {
    pub fn slide(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }

    pub fn continue_after_win() -> Self {
        Self {
            continue_after_win: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Advance the game by one tick, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if state.is_animating() {
        if !input.is_empty() {
            log::debug!("Dropped input during animation: {input:?}");
        }
        advance_animation(state, &mut events);
        return events;
    }

    if input.restart {
        match state.phase {
            GamePhase::Won | GamePhase::Lost => {
                state.restart();
                log::info!("Game restarted");
                events.push(GameEvent::Restarted);
            }
            GamePhase::Playing => log::debug!("Restart ignored while playing"),
        }
        return events;
    }

    if input.continue_after_win {
        if state.phase == GamePhase::Won {
            state.phase = GamePhase::Playing;
            state.keep_playing = true;
            log::info!("Continuing after win");
            events.push(GameEvent::Continued);
        }
        return events;
    }

    let Some(direction) = input.direction else {
        return events;
    };
    if state.phase != GamePhase::Playing {
        return events;
    }

    let result = resolve(&state.grid, direction);
    if !result.changed {
        events.push(GameEvent::Blocked { direction });
        check_loss(state, &mut events);
        return events;
    }

    events.push(GameEvent::Slid {
        direction,
        merges: result.merge_count(),
    });
    let animation = Animation::new(&state.grid, &result, state.settings.velocity);
    state.animation = AnimationState::Animating { animation, result };

    // The first step of the slide plays on the same tick as the key press
    advance_animation(state, &mut events);
    events
}

fn advance_animation(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let AnimationState::Animating { animation, .. } = &mut state.animation else {
        return;
    };
    animation.step();
    if !animation.is_settled() {
        return;
    }

    let AnimationState::Animating { animation, result } = std::mem::take(&mut state.animation)
    else {
        return;
    };
    log::debug!("Move settled after {} ticks", animation.ticks_elapsed());

    state.grid = result.apply(&state.grid);
    state.record_settled_frame();
    state.moves += 1;
    events.push(GameEvent::Settled {
        merges: result.merge_count(),
    });

    finish_move(state, events);
}

/// Post-commit: win check, then spawn, then loss check
fn finish_move(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.keep_playing && state.threshold_reached() {
        let value = state.grid.max_value();
        state.phase = GamePhase::Won;
        log::info!("Won with a {value} tile after {} moves", state.moves);
        events.push(GameEvent::Won { value });
        return;
    }

    if let Some((cell, value)) = state.spawn_random_tile() {
        log::debug!("Spawned {value} at {cell}");
        events.push(GameEvent::Spawned { cell, value });
    }

    check_loss(state, events);
}

fn check_loss(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.grid.is_stuck() {
        state.phase = GamePhase::Lost;
        log::info!(
            "Lost after {} moves (best tile {})",
            state.moves,
            state.grid.max_value()
        );
        events.push(GameEvent::Lost);
    }
}
