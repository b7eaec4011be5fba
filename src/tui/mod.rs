//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the board,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! never draws and never reads keys, so a different front end could replace
//! this module wholesale.
//!
//! The event loop owns the two effects the reducer can request: progress
//! saves go through `ProgressStore`, and narration is spawned as a tokio
//! task. Only one sentence plays at a time — starting a new one aborts
//! whatever is still being spoken, the way a tutor talks over themselves
//! when the learner rushes ahead.

mod event;
mod ui;

use std::sync::Arc;

use log::{info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::catalog::Catalog;
use crate::core::config::ResolvedConfig;
use crate::core::engine::Engine;
use crate::core::progress::ProgressStore;
use crate::core::state::App;
use crate::narration::{CommandNarrator, NarrationRequest, Narrator, SilentNarrator};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Builds the catalog named by the config, falling back to the built-in set
/// when the file is missing or unusable.
pub fn build_catalog(config: &ResolvedConfig) -> Catalog {
    match &config.catalog_path {
        Some(path) => match Catalog::from_toml_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    "Falling back to the built-in catalog, could not use {}: {e}",
                    path.display()
                );
                Catalog::default()
            }
        },
        None => Catalog::default(),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let catalog = build_catalog(&config);
    let store = ProgressStore::default_location()?;

    let mut engine = Engine::new(catalog, config.granularity);
    let saved = store.load(engine.catalog(), config.granularity);
    if !saved.is_empty() {
        info!("Resuming progress for {} exercise(s)", saved.len());
    }
    engine.restore_all(saved);

    // An empty command means no audio at all, even if narration gets toggled.
    let narrator: Arc<dyn Narrator> = if config.narration_command.is_empty() {
        Arc::new(SilentNarrator)
    } else {
        Arc::new(CommandNarrator::from_config(&config))
    };
    info!("Narrator: {}", narrator.name());

    let mut app = App::from_config(engine, &config);
    let mut narration_abort: Option<tokio::task::AbortHandle> = None;

    let mut terminal = ratatui::init();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(std::time::Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for tui_event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match tui_event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => continue,
                TuiEvent::Step => Action::Advance,
                TuiEvent::NextExercise => Action::NextExercise,
                TuiEvent::PrevExercise => Action::PrevExercise,
                TuiEvent::JumpTo(index) => Action::GotoExercise(index),
                TuiEvent::Reset => Action::ResetCurrent,
                TuiEvent::SolveAll => Action::SolveAll,
                TuiEvent::ToggleHints => Action::ToggleHints,
                TuiEvent::ToggleNarration => Action::ToggleNarration,
                TuiEvent::Quit | TuiEvent::ForceQuit => Action::Quit,
            };

            match update(&mut app, action) {
                Effect::None => {}
                Effect::Persist => store.persist(&app.engine),
                Effect::Narrate(text) => {
                    speak(&narrator, &app, text, &mut narration_abort);
                }
                Effect::PersistAndNarrate(text) => {
                    store.persist(&app.engine);
                    speak(&narrator, &app, text, &mut narration_abort);
                }
                Effect::Quit => should_quit = true,
            }
        }

        if should_quit {
            break;
        }
    }

    // Final save so a quit mid-exercise loses nothing.
    store.persist(&app.engine);
    if let Some(handle) = narration_abort.take() {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Speaks `text`, cancelling whatever sentence is still playing.
fn speak(
    narrator: &Arc<dyn Narrator>,
    app: &App,
    text: String,
    abort_slot: &mut Option<tokio::task::AbortHandle>,
) {
    if let Some(handle) = abort_slot.take() {
        handle.abort();
    }
    let narrator = Arc::clone(narrator);
    let request = NarrationRequest {
        text,
        locale: app.locale,
    };
    let handle = tokio::spawn(async move {
        if let Err(e) = narrator.speak(&request).await {
            warn!("Narration failed: {e}");
        }
    });
    *abort_slot = Some(handle.abort_handle());
}
