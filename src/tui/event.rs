use crossterm::event::{self, Event, KeyCode, KeyModifiers};

/// TUI-specific input events
pub enum TuiEvent {
    /// Space or Enter: run the next step.
    Step,
    NextExercise,
    PrevExercise,
    /// Digits 1-9 jump straight to that exercise.
    JumpTo(usize),
    Reset,
    SolveAll,
    ToggleHints,
    ToggleNarration,
    Quit,
    /// Ctrl+C, quits regardless of anything else.
    ForceQuit,
    Resize,
}

/// Poll for an event with the given timeout.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if event::poll(timeout).unwrap_or(false) {
        match event::read().ok()? {
            Event::Key(key_event) => {
                log::debug!(
                    "Key event: {:?} with modifiers {:?}",
                    key_event.code,
                    key_event.modifiers
                );
                match (key_event.modifiers, key_event.code) {
                    (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                    (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => Some(TuiEvent::Step),
                    (_, KeyCode::Right) | (_, KeyCode::Char('n')) => Some(TuiEvent::NextExercise),
                    (_, KeyCode::Left) | (_, KeyCode::Char('p')) => Some(TuiEvent::PrevExercise),
                    (_, KeyCode::Char(c @ '1'..='9')) => {
                        // '1' is exercise index 0
                        Some(TuiEvent::JumpTo(c as usize - '1' as usize))
                    }
                    (_, KeyCode::Char('r')) => Some(TuiEvent::Reset),
                    (_, KeyCode::Char('s')) => Some(TuiEvent::SolveAll),
                    (_, KeyCode::Char('h')) => Some(TuiEvent::ToggleHints),
                    (_, KeyCode::Char('a')) => Some(TuiEvent::ToggleNarration),
                    (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(TuiEvent::Quit),
                    _ => None,
                }
            }
            Event::Resize(_, _) => Some(TuiEvent::Resize),
            _ => None,
        }
    } else {
        None
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}
