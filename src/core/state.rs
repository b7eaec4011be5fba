//! # Application State
//!
//! Core business state for the tutor. This module contains domain state
//! only — no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── engine: Engine            // catalog + per-exercise step machine
//! ├── locale: Locale            // phrase/narration language
//! ├── narration_enabled: bool   // audio toggle
//! ├── show_hints: bool          // hint panel toggle
//! ├── step_description: String  // what the last step did, human readable
//! └── status_message: String    // transient status bar text
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use crate::core::config::ResolvedConfig;
use crate::core::engine::Engine;
use crate::core::phrases::{self, Locale};

pub struct App {
    pub engine: Engine,
    pub locale: Locale,
    pub narration_enabled: bool,
    pub show_hints: bool,
    pub step_description: String,
    pub status_message: String,
}

impl App {
    pub fn new(engine: Engine, locale: Locale) -> Self {
        let intro = phrases::exercise_intro(
            locale,
            1,
            engine.catalog().len(),
            engine.current_exercise(),
        );
        Self {
            engine,
            locale,
            narration_enabled: false,
            show_hints: false,
            step_description: intro,
            status_message: phrases::start_prompt(locale).to_string(),
        }
    }

    pub fn from_config(engine: Engine, config: &ResolvedConfig) -> Self {
        let mut app = App::new(engine, config.locale);
        app.narration_enabled = config.narration_enabled;
        app
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(!app.narration_enabled);
        assert!(!app.show_hints);
        assert_eq!(app.step_description, "Exercício 1 de 9: 544 + 256");
        assert_eq!(app.status_message, "Pressione espaço para começar");
    }
}
