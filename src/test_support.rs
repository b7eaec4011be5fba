//! Shared helpers for unit tests. Compiled only under `cfg(test)`.

use crate::core::catalog::Catalog;
use crate::core::engine::{Engine, Granularity};
use crate::core::phrases::Locale;
use crate::core::state::App;

/// An `App` over the built-in catalog with default settings: column
/// granularity, pt-BR, narration off.
pub fn test_app() -> App {
    App::new(
        Engine::new(Catalog::default(), Granularity::Column),
        Locale::PtBr,
    )
}
