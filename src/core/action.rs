//! # Actions
//!
//! Everything that can happen in the tutor becomes an `Action`.
//! Learner presses Space? That's `Action::Advance`.
//! Arrow key? That's `Action::NextExercise`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller should
//! perform. No side effects here — persistence and narration happen in the
//! TUI layer.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and
//! effects. And debuggable: log every action, replay the exact session.

use log::debug;

use crate::core::phrases;
use crate::core::state::App;
use crate::core::engine::StepOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Execute the next step of the current exercise.
    Advance,
    NextExercise,
    PrevExercise,
    /// Jump to an exercise by index (clamped).
    GotoExercise(usize),
    /// Wipe the current exercise back to its initial state.
    ResetCurrent,
    /// Instructor shortcut: resolve every exercise at once.
    SolveAll,
    ToggleNarration,
    ToggleHints,
    Quit,
}

/// I/O the event loop performs after a state change. Narration effects are
/// only emitted while narration is enabled, so the caller never needs to
/// re-check the toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Save progress for all touched exercises.
    Persist,
    /// Speak without any persistent change (navigation, "already done").
    Narrate(String),
    /// Save progress, then speak.
    PersistAndNarrate(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {action:?}");
    match action {
        Action::Advance => {
            let result = app.engine.current_exercise().result();
            let outcome = app.engine.advance();
            app.step_description = phrases::describe_step(app.locale, &outcome, result);
            match outcome {
                StepOutcome::AlreadyComplete => narrate_only(app, phrases::already_complete(app.locale)),
                _ => {
                    let spoken = phrases::narrate_step(app.locale, &outcome, result);
                    persist_and_narrate(app, spoken)
                }
            }
        }
        Action::NextExercise => {
            let target = app.engine.current_index().saturating_add(1);
            goto_exercise(app, target)
        }
        Action::PrevExercise => {
            let target = app.engine.current_index().saturating_sub(1);
            goto_exercise(app, target)
        }
        Action::GotoExercise(index) => goto_exercise(app, index),
        Action::ResetCurrent => {
            app.engine.reset(app.engine.current_index());
            app.step_description = phrases::exercise_intro(
                app.locale,
                app.engine.current_index() + 1,
                app.engine.catalog().len(),
                app.engine.current_exercise(),
            );
            app.status_message = phrases::reset_message(app.locale);
            persist_and_narrate(app, phrases::reset_message(app.locale))
        }
        Action::SolveAll => {
            app.engine.solve_all();
            app.step_description = phrases::solved_all(app.locale);
            app.status_message = phrases::solved_all(app.locale);
            persist_and_narrate(app, phrases::solved_all(app.locale))
        }
        Action::ToggleNarration => {
            app.narration_enabled = !app.narration_enabled;
            app.status_message = phrases::narration_toggled(app.locale, app.narration_enabled);
            Effect::None
        }
        Action::ToggleHints => {
            app.show_hints = !app.show_hints;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Navigation: moves the view, never the viewed exercise's progress.
fn goto_exercise(app: &mut App, index: usize) -> Effect {
    let before = app.engine.current_index();
    let selected = app.engine.goto(index);
    if selected == before {
        return Effect::None;
    }

    let exercise = app.engine.current_exercise();
    app.step_description = phrases::exercise_intro(
        app.locale,
        selected + 1,
        app.engine.catalog().len(),
        exercise,
    );
    app.status_message = if app.engine.current_state().completed {
        phrases::already_complete(app.locale)
    } else {
        phrases::start_prompt(app.locale).to_string()
    };
    narrate_only(app, phrases::narrate_intro(app.locale, selected + 1, exercise))
}

fn narrate_only(app: &App, text: String) -> Effect {
    if app.narration_enabled {
        Effect::Narrate(text)
    } else {
        Effect::None
    }
}

fn persist_and_narrate(app: &App, text: String) -> Effect {
    if app.narration_enabled {
        Effect::PersistAndNarrate(text)
    } else {
        Effect::Persist
    }
}
