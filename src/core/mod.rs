//! # Core Business Logic
//!
//! Everything the tutor *is*, minus the terminal. The TUI layer renders
//! this state and feeds actions into it; narration speaks the strings it
//! produces. Nothing in here touches the terminal.
//!
//! ```text
//! core
//! ├── digits    // 3-digit decomposition, the Column type
//! ├── catalog   // the exercise set (built-in or user TOML)
//! ├── engine    // the step machine: announce, resolve, carry
//! ├── phrases   // pt-BR / English sentences for panel and narration
//! ├── progress  // save/load to ~/.soma/progress.json
//! ├── config    // defaults → file → env → CLI resolution
//! ├── state     // the App struct
//! └── action    // Action + update() reducer → Effect
//! ```

pub mod action;
pub mod catalog;
pub mod config;
pub mod digits;
pub mod engine;
pub mod phrases;
pub mod progress;
pub mod state;
